//! `/tweets` handlers.

use serde::{Deserialize, Deserializer};
use serde_json::json;

use super::{ApiError, AppState};
use crate::context::Context;
use crate::tweets::{NewTweet, TweetId};
use crate::{Response, StatusCode};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTweet {
    handle: Option<String>,
    msg: Option<String>,
    // Outer `None`: no `parentId` key. `Some(None)`: an explicit `null`.
    #[serde(default, deserialize_with = "present")]
    parent_id: Option<Option<String>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
struct UpdateTweet {
    msg: Option<String>,
}

fn raw_id(ctx: &Context) -> &str {
    ctx.param("id").unwrap_or_default()
}

fn not_found(ctx: &Context) -> ApiError {
    ApiError::NotFound(raw_id(ctx).to_owned())
}

// Ids that don't parse can't name a stored tweet.
fn path_id(ctx: &Context) -> Result<TweetId, ApiError> {
    raw_id(ctx).parse().map_err(|_| not_found(ctx))
}

/// `POST /tweets`: add a tweet, or a reply when `parentId` is given.
pub async fn create(state: AppState, ctx: Context) -> Result<Response, ApiError> {
    let body: CreateTweet = ctx.body()?;

    let parent_id = body
        .parent_id
        .map(|raw| {
            raw.and_then(|raw| raw.parse::<TweetId>().ok())
                .ok_or(ApiError::InvalidParent)
        })
        .transpose()?;

    let new = NewTweet {
        handle: body.handle,
        msg: body.msg,
        parent_id,
    };
    let tweet = state.tweets.write().await.create(new)?;

    Ok(Response::json(StatusCode::Ok, &tweet))
}

/// `GET /tweets`: the feed.
pub async fn feed(state: AppState, _ctx: Context) -> Result<Response, ApiError> {
    let feed = state.tweets.read().await.feed(state.feed);
    Ok(Response::json(StatusCode::Ok, &feed))
}

/// `GET /tweets/:id`: one tweet with its replies.
pub async fn get(state: AppState, ctx: Context) -> Result<Response, ApiError> {
    let id = path_id(&ctx)?;
    let thread = state
        .tweets
        .read()
        .await
        .get(id)
        .ok_or_else(|| not_found(&ctx))?;
    Ok(Response::json(StatusCode::Ok, &thread))
}

/// `PUT /tweets/:id`: replace the message.
pub async fn update(state: AppState, ctx: Context) -> Result<Response, ApiError> {
    let body: UpdateTweet = ctx.body()?;
    let id = path_id(&ctx)?;

    if !state.tweets.write().await.update(id, body.msg) {
        return Err(not_found(&ctx));
    }

    Ok(Response::json(
        StatusCode::Ok,
        &json!({ "msg": format!("updated tweet with id {}", raw_id(&ctx)) }),
    ))
}

/// `DELETE /tweets/:id`
pub async fn delete(state: AppState, ctx: Context) -> Result<Response, ApiError> {
    let id = path_id(&ctx)?;

    if !state.tweets.write().await.delete(id) {
        return Err(not_found(&ctx));
    }

    Ok(Response::json(
        StatusCode::Ok,
        &json!({ "msg": format!("deleted tweet with id \"{}\"", raw_id(&ctx)) }),
    ))
}
