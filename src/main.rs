use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tweetfeed::Server;
use tweetfeed::api::{self, AppState};
use tweetfeed::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tweetfeed=info")),
        )
        .init();

    let config = Config::parse();
    tracing::debug!(?config, "configuration loaded");

    let state = AppState::new(config.feed_options());
    let router = api::router(state, config.route_options());

    let server = Server::bind(&config.addr).await?;
    server
        .serve(router, shutdown_signal())
        .await
        .context("serving tweet feed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c, running until killed");
        std::future::pending::<()>().await;
    }
}
