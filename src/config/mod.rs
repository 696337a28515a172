//! Command line and environment configuration.

use clap::Parser;

use crate::api::RouteOptions;
use crate::tweets::FeedOptions;

/// Serve the tweet feed over HTTP.
#[derive(Debug, Clone, Parser)]
#[command(name = "tweetfeed", version, about)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "TWEETFEED_ADDR", default_value = "127.0.0.1:3000")]
    pub addr: String,

    /// Require `?auth=true` on `GET /tweets/:id`.
    #[arg(long, env = "TWEETFEED_REQUIRE_AUTH")]
    pub require_auth: bool,

    /// Show replies in `GET /tweets` alongside top-level tweets.
    #[arg(long, env = "TWEETFEED_INCLUDE_REPLIES")]
    pub include_replies: bool,
}

impl Config {
    pub fn feed_options(&self) -> FeedOptions {
        FeedOptions {
            include_replies: self.include_replies,
        }
    }

    pub fn route_options(&self) -> RouteOptions {
        RouteOptions {
            require_auth: self.require_auth,
        }
    }
}
