//! Middleware that enforces an [`Authorize`] predicate.

use std::sync::Arc;

use serde_json::json;

use super::Authorize;
use crate::{
    Response, StatusCode,
    context::Context,
    middleware::{BoxFuture, Middleware, Next},
};

/// Short-circuits with `401 {"error":"unauthorized"}` when the predicate refuses
/// the request; otherwise forwards it untouched.
///
/// # Examples
///
/// ```rust,no_run
/// use tweetfeed::{Router, Response, StatusCode, context::Context};
/// use tweetfeed::security::{AuthMiddleware, QueryFlag};
///
/// let mut router = Router::new();
/// router
///     .get("/tweets/:id", |_ctx: Context| async { Response::new(StatusCode::Ok) })
///     .layer(AuthMiddleware::new(QueryFlag::default()));
/// ```
pub struct AuthMiddleware {
    gate: Arc<dyn Authorize>,
}

impl AuthMiddleware {
    pub fn new(gate: impl Authorize + 'static) -> Self {
        Self {
            gate: Arc::new(gate),
        }
    }
}

impl Middleware for AuthMiddleware {
    fn handle(&self, ctx: Context, next: Next) -> BoxFuture {
        if self.gate.authorize(ctx.request()) {
            return Box::pin(next.run(ctx));
        }

        tracing::info!(
            method = %ctx.request().method(),
            path = %ctx.request().path(),
            "request refused by authorization gate"
        );
        Box::pin(async {
            Response::json(StatusCode::Unauthorized, &json!({ "error": "unauthorized" }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::QueryFlag;
    use crate::{Request, Router};

    fn request(target: &str) -> Request {
        let raw = format!("GET {target} HTTP/1.1\r\n\r\n");
        Request::parse(raw.as_bytes()).unwrap().0
    }

    fn gated_router() -> Router {
        let mut router = Router::new();
        router
            .get("/secret", |_ctx: Context| async { Response::new(StatusCode::Ok) })
            .layer(AuthMiddleware::new(QueryFlag::default()));
        router
    }

    #[tokio::test]
    async fn refused_request_gets_401_json() {
        let res = gated_router().route(request("/secret")).await;
        assert_eq!(res.status(), StatusCode::Unauthorized);
        assert_eq!(res.body_ref(), br#"{"error":"unauthorized"}"#);
    }

    #[tokio::test]
    async fn allowed_request_reaches_handler() {
        let res = gated_router().route(request("/secret?auth=true")).await;
        assert_eq!(res.status(), StatusCode::Ok);
    }
}
