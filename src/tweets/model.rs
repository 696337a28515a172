//! Tweet records and their wire representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque tweet identifier. Serializes as a hyphenated UUID string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TweetId(Uuid);

impl TweetId {
    /// A fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TweetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TweetId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A stored tweet.
///
/// `handle` and `msg` are whatever the author sent, including nothing at all;
/// absent fields are left out of the JSON form. `parent_id` is set only on
/// replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    pub id: TweetId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<TweetId>,
}

impl Tweet {
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Input to [`TweetStore::create`](super::TweetStore::create).
#[derive(Debug, Clone, Default)]
pub struct NewTweet {
    pub handle: Option<String>,
    pub msg: Option<String>,
    pub parent_id: Option<TweetId>,
}

impl NewTweet {
    /// A top-level tweet.
    pub fn new(handle: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            handle: Some(handle.into()),
            msg: Some(msg.into()),
            parent_id: None,
        }
    }

    /// Turn this into a reply to `parent`.
    #[must_use]
    pub fn reply_to(mut self, parent: TweetId) -> Self {
        self.parent_id = Some(parent);
        self
    }
}

/// A single tweet as returned by a fetch: the tweet plus its direct replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TweetThread {
    #[serde(flatten)]
    pub tweet: Tweet,
    pub children: Vec<Tweet>,
}
