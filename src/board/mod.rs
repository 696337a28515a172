//! A single mutable message with an edit counter, served at `/tweet`.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

/// The board's current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    pub edits: u64,
}

/// Holds one message; every post replaces it and bumps the edit count.
#[derive(Debug)]
pub struct MessageBoard {
    current: Message,
}

impl Default for MessageBoard {
    fn default() -> Self {
        Self {
            current: Message {
                msg: Some("blank".to_owned()),
                edits: 0,
            },
        }
    }
}

impl MessageBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the message. An absent message is stored as absent.
    pub fn post(&mut self, msg: Option<String>) {
        self.current.msg = msg;
        self.current.edits += 1;
        tracing::debug!(edits = self.current.edits, "board message replaced");
    }

    pub fn read(&self) -> Message {
        self.current.clone()
    }
}

pub type SharedBoard = Arc<RwLock<MessageBoard>>;
