//! The tweet domain: records, the store that owns them, the feed, and reply linkage.
//!
//! Nothing in here knows about HTTP. Absence is reported as `Option`/`bool`,
//! and the one refusable operation (replying to a missing tweet) as
//! [`StoreError`].

use std::sync::Arc;

use tokio::sync::RwLock;

mod feed;
mod model;
mod store;
mod thread;

pub use feed::FeedOptions;
pub use model::{NewTweet, Tweet, TweetId, TweetThread};
pub use store::{StoreError, TweetStore};

/// The store as shared between connection tasks.
///
/// Reads (get, list, feed) take the read lock; create, update and delete take
/// the write lock for the whole operation.
pub type SharedStore = Arc<RwLock<TweetStore>>;

/// Wrap `store` for sharing across tasks.
pub fn shared(store: TweetStore) -> SharedStore {
    Arc::new(RwLock::new(store))
}
