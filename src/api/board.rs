//! `/tweet` handlers for the single-message board.

use serde::Deserialize;

use super::{ApiError, AppState};
use crate::context::Context;
use crate::{Response, StatusCode};

#[derive(Debug, Deserialize)]
struct PostMessage {
    msg: Option<String>,
}

/// `POST /tweet`: replace the board message.
pub async fn post(state: AppState, ctx: Context) -> Result<Response, ApiError> {
    let body: PostMessage = ctx.body()?;
    state.board.write().await.post(body.msg);
    Ok(Response::new(StatusCode::Ok).body("updated msg"))
}

/// `GET /tweet`: the message and how often it changed.
pub async fn read(state: AppState, _ctx: Context) -> Result<Response, ApiError> {
    let message = state.board.read().await.read();
    Ok(Response::json(StatusCode::Ok, &message))
}
