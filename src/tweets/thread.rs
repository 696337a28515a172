//! Reply linkage: resolving a tweet's direct replies.

use super::model::{Tweet, TweetId};
use super::store::TweetStore;

impl TweetStore {
    /// Every stored tweet whose parent is `id`, newest first.
    ///
    /// Replies whose parent has been deleted are never returned by any fetch,
    /// since their parent no longer resolves.
    pub fn children_of(&self, id: TweetId) -> Vec<Tweet> {
        self.iter()
            .filter(|t| t.parent_id == Some(id))
            .cloned()
            .collect()
    }
}
