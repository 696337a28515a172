//! HTTP surface of the service.
//!
//! | Method | Path          | Handler             |
//! |--------|---------------|---------------------|
//! | POST   | `/tweet`      | [`board::post`]     |
//! | GET    | `/tweet`      | [`board::read`]     |
//! | POST   | `/tweets`     | [`tweets::create`]  |
//! | GET    | `/tweets`     | [`tweets::feed`]    |
//! | GET    | `/tweets/:id` | [`tweets::get`]     |
//! | PUT    | `/tweets/:id` | [`tweets::update`]  |
//! | DELETE | `/tweets/:id` | [`tweets::delete`]  |
//!
//! Handlers return `Result<Response, ApiError>`; errors are rendered as
//! `{"error": …}` with the matching status code.

pub mod board;
mod error;
pub mod tweets;

use std::sync::Arc;

use tokio::sync::RwLock;

pub use error::ApiError;

use crate::Router;
use crate::board::{MessageBoard, SharedBoard};
use crate::context::Context;
use crate::middleware::{BoxFuture, LoggerMiddleware};
use crate::security::{AuthMiddleware, QueryFlag};
use crate::tweets::{self as store, FeedOptions, SharedStore, TweetStore};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub tweets: SharedStore,
    pub board: SharedBoard,
    /// How `GET /tweets` derives the feed.
    pub feed: FeedOptions,
}

impl AppState {
    /// Fresh state: the seeded tweet store and a blank board.
    pub fn new(feed: FeedOptions) -> Self {
        Self::with_store(TweetStore::seeded(), feed)
    }

    pub fn with_store(tweets: TweetStore, feed: FeedOptions) -> Self {
        Self {
            tweets: store::shared(tweets),
            board: Arc::new(RwLock::new(MessageBoard::new())),
            feed,
        }
    }
}

/// Which optional behaviour the routes are built with.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteOptions {
    /// Put `GET /tweets/:id` behind the `?auth=true` gate.
    pub require_auth: bool,
}

/// Build the service router around `state`.
pub fn router(state: AppState, options: RouteOptions) -> Router {
    let mut router = Router::new();
    router.layer(LoggerMiddleware);

    router.post("/tweet", with_state(&state, board::post));
    router.get("/tweet", with_state(&state, board::read));

    router.post("/tweets", with_state(&state, tweets::create));
    router.get("/tweets", with_state(&state, tweets::feed));
    let single = router.get("/tweets/:id", with_state(&state, tweets::get));
    if options.require_auth {
        single.layer(AuthMiddleware::new(QueryFlag::default()));
    }
    router.put("/tweets/:id", with_state(&state, tweets::update));
    router.delete("/tweets/:id", with_state(&state, tweets::delete));

    router
}

// Bind a state-taking handler into a router handler, rendering its error.
fn with_state<F, Fut>(
    state: &AppState,
    handler: F,
) -> impl Fn(Context) -> BoxFuture + Send + Sync + 'static
where
    F: Fn(AppState, Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<crate::Response, ApiError>> + Send + 'static,
{
    let state = state.clone();
    move |ctx: Context| -> BoxFuture {
        let fut = handler(state.clone(), ctx);
        Box::pin(async move { fut.await.unwrap_or_else(ApiError::into_response) })
    }
}
