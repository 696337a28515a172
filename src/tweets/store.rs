//! The tweet collection and its CRUD operations.

use std::collections::VecDeque;

use thiserror::Error;

use super::model::{NewTweet, Tweet, TweetId, TweetThread};

/// Errors from store operations that can be refused.
///
/// Missing ids on get/update/delete are not errors; those operations report
/// absence through `Option`/`bool`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("can't reply to tweet {0} because it doesn't exist")]
    InvalidParent(TweetId),
}

/// Owns every tweet, newest first.
///
/// Lookups are linear scans; the collection is expected to stay small.
#[derive(Debug, Default)]
pub struct TweetStore {
    tweets: VecDeque<Tweet>,
}

impl TweetStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the single tweet every fresh server starts with.
    pub fn seeded() -> Self {
        let mut store = Self::new();
        store.insert(NewTweet::new("lordsnipp", "stay safe"));
        store
    }

    /// Add a tweet at the top of the collection.
    ///
    /// A reply is only accepted if its parent is currently stored; otherwise the
    /// collection is left untouched.
    pub fn create(&mut self, new: NewTweet) -> Result<Tweet, StoreError> {
        if let Some(parent) = new.parent_id {
            if !self.contains(parent) {
                return Err(StoreError::InvalidParent(parent));
            }
        }
        Ok(self.insert(new))
    }

    fn insert(&mut self, new: NewTweet) -> Tweet {
        let tweet = Tweet {
            handle: new.handle,
            msg: new.msg,
            id: self.fresh_id(),
            parent_id: new.parent_id,
        };
        tracing::debug!(id = %tweet.id, parent = ?tweet.parent_id, "tweet created");
        self.tweets.push_front(tweet.clone());
        tweet
    }

    // Ids must stay unique among stored tweets.
    fn fresh_id(&self) -> TweetId {
        loop {
            let id = TweetId::random();
            if !self.contains(id) {
                return id;
            }
        }
    }

    /// Fetch a tweet together with its direct replies.
    pub fn get(&self, id: TweetId) -> Option<TweetThread> {
        let tweet = self.find(id)?.clone();
        Some(TweetThread {
            children: self.children_of(id),
            tweet,
        })
    }

    /// Remove a tweet. Its replies stay behind with a dangling `parent_id`.
    ///
    /// Returns `false` if no such tweet was stored.
    pub fn delete(&mut self, id: TweetId) -> bool {
        let Some(pos) = self.tweets.iter().position(|t| t.id == id) else {
            return false;
        };
        self.tweets.remove(pos);
        tracing::debug!(%id, "tweet deleted");
        true
    }

    /// Replace the message of a tweet in place, leaving everything else as is.
    ///
    /// Returns `false` if no such tweet was stored.
    pub fn update(&mut self, id: TweetId, msg: Option<String>) -> bool {
        let Some(tweet) = self.tweets.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        tweet.msg = msg;
        tracing::debug!(%id, "tweet updated");
        true
    }

    /// Every tweet, newest first.
    pub fn list(&self) -> Vec<Tweet> {
        self.tweets.iter().cloned().collect()
    }

    /// Iterate over every tweet, newest first, without cloning.
    pub fn iter(&self) -> impl Iterator<Item = &Tweet> {
        self.tweets.iter()
    }

    pub fn contains(&self, id: TweetId) -> bool {
        self.find(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.tweets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweets.is_empty()
    }

    fn find(&self, id: TweetId) -> Option<&Tweet> {
        self.tweets.iter().find(|t| t.id == id)
    }
}
