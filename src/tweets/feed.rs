//! The feed: a read-only projection of the store.

use super::model::Tweet;
use super::store::TweetStore;

/// How a feed is derived from the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedOptions {
    /// Include replies alongside top-level tweets. Off by default.
    pub include_replies: bool,
}

impl FeedOptions {
    pub fn with_replies() -> Self {
        Self {
            include_replies: true,
        }
    }
}

impl TweetStore {
    /// The tweets a viewer sees, newest first.
    ///
    /// Without `include_replies` only top-level tweets are returned.
    pub fn feed(&self, options: FeedOptions) -> Vec<Tweet> {
        self.iter()
            .filter(|t| options.include_replies || !t.is_reply())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tweets::NewTweet;

    fn store_with_thread() -> (TweetStore, Tweet, Tweet, Tweet) {
        let mut store = TweetStore::new();
        let root = store.create(NewTweet::new("lordsnipp", "stay safe")).unwrap();
        let reply = store
            .create(NewTweet::new("a", "hi").reply_to(root.id))
            .unwrap();
        let other = store.create(NewTweet::new("b", "hello")).unwrap();
        (store, root, reply, other)
    }

    #[test]
    fn default_feed_is_top_level_only() {
        let (store, root, _reply, other) = store_with_thread();
        assert_eq!(FeedOptions::default(), FeedOptions { include_replies: false });
        let ids: Vec<_> = store.feed(FeedOptions::default()).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![other.id, root.id]);
    }

    #[test]
    fn feed_without_replies_is_the_parentless_subset() {
        let (store, ..) = store_with_thread();
        let expected: Vec<_> = store.list().into_iter().filter(|t| t.parent_id.is_none()).collect();
        assert_eq!(store.feed(FeedOptions::default()), expected);
    }

    #[test]
    fn feed_with_replies_is_everything() {
        let (store, ..) = store_with_thread();
        assert_eq!(store.feed(FeedOptions::with_replies()), store.list());
    }
}
