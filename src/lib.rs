//! # tweetfeed
//!
//! A small tweet-feed HTTP service on a from-scratch async HTTP/1.1 stack.
//!
//! Tweets live in an in-memory [`tweets::TweetStore`]. Replies point at their
//! parent and are attached as `children` when a single tweet is fetched; the
//! feed shows top-level tweets only unless configured otherwise. A single
//! mutable message with an edit counter is served alongside at `/tweet`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tweetfeed::Server;
//! use tweetfeed::api::{self, AppState, RouteOptions};
//! use tweetfeed::tweets::FeedOptions;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = AppState::new(FeedOptions::default());
//!     let router = api::router(state, RouteOptions { require_auth: true });
//!     let server = Server::bind("127.0.0.1:3000").await?;
//!     server.serve(router, std::future::pending()).await?;
//!     Ok(())
//! }
//! ```

// ── Domain ────────────────────────────────────────────────────────────────────
pub mod board;
pub mod tweets;

// ── HTTP stack ────────────────────────────────────────────────────────────────
pub mod context;
pub mod http;
pub mod middleware;
pub mod router;
pub mod security;
pub mod server;

// ── Application ───────────────────────────────────────────────────────────────
pub mod api;
pub mod config;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use http::{Headers, Method, Request, Response, StatusCode};
pub use router::Router;
pub use server::{Server, ServerError};
