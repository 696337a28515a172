//! Request routing: map URL patterns and HTTP methods to handler functions.
//!
//! Two pattern styles are supported:
//!
//! | Pattern        | Example match   | Captured params |
//! |----------------|-----------------|-----------------|
//! | `/tweets`      | `/tweets`       | *(none)*        |
//! | `/tweets/:id`  | `/tweets/42`    | `id → "42"`     |
//!
//! Captured segments are percent-decoded.
//!
//! Trailing slashes are normalized on both patterns and incoming paths, so `/tweets/` and
//! `/tweets` are treated as equivalent.
//!
//! Routes are matched in registration order; the first route whose method and pattern both
//! match the incoming request wins. Router-wide middleware wraps every request, matched or
//! not; route middleware only wraps its own route.

use std::sync::Arc;

use percent_encoding::percent_decode_str;
use serde_json::json;

use crate::context::{Context, PathParams};
use crate::middleware::{BoxFuture, Middleware, MiddlewareHandler, Next, from_middleware};
use crate::{Method, Request, Response, StatusCode};

/// Type-erased async handler that processes a [`Context`] and returns a [`Response`].
pub type Handler = Arc<dyn Fn(Context) -> BoxFuture + Send + Sync + 'static>;

/// Conversion trait for async handler functions.
///
/// Any `Fn(Context) -> impl Future<Output = Response> + Send` that is also
/// `Send + Sync + 'static` implements this trait via the blanket impl below.
pub trait IntoHandler: Send + Sync + 'static {
    /// Call the handler with the given context, boxing the returned future.
    fn call(&self, ctx: Context) -> BoxFuture;
}

impl<T, F> IntoHandler for T
where
    T: Fn(Context) -> F + Send + Sync + 'static,
    F: Future<Output = Response> + Send + 'static,
{
    fn call(&self, ctx: Context) -> BoxFuture {
        Box::pin((self)(ctx))
    }
}

// A single path segment, either a literal string or a named capture (`:name`).
#[derive(Debug, Clone)]
enum Segment {
    Static(String),
    Parameter(String),
}

// Compiled representation of a route pattern string.
#[derive(Debug, Clone)]
enum Pattern {
    // Matches one exact path string, e.g. `/tweets`.
    Exact(String),
    // Matches a fixed number of segments where some may be named captures, e.g. `/tweets/:id`.
    Parameterized { segments: Vec<Segment> },
}

fn trim_trailing_slash(path: &str) -> &str {
    if path != "/" && path.ends_with('/') {
        &path[..path.len() - 1]
    } else {
        path
    }
}

impl Pattern {
    /// Parse a route pattern string.
    ///
    /// Patterns containing `:` compile to [`Pattern::Parameterized`], everything else to
    /// [`Pattern::Exact`]. A trailing slash (other than on the root `/`) is stripped first.
    fn parse(pattern: &str) -> Self {
        let pattern = trim_trailing_slash(pattern);

        if pattern.contains(':') {
            let segments = pattern
                .split('/')
                .filter(|s| !s.is_empty())
                .map(|s| match s.strip_prefix(':') {
                    Some(p) => Segment::Parameter(p.to_string()),
                    None => Segment::Static(s.to_string()),
                })
                .collect();

            return Pattern::Parameterized { segments };
        }

        Pattern::Exact(pattern.to_string())
    }

    // Try to match `path` against this pattern, returning extracted [`PathParams`] on success.
    fn matches(&self, path: &str) -> Option<PathParams> {
        let path = trim_trailing_slash(path);

        match self {
            Pattern::Exact(p) => (p == path).then(PathParams::new),
            Pattern::Parameterized { segments } => {
                let mut params = PathParams::new();
                let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

                if segments.len() != path_segments.len() {
                    return None;
                }

                for (seg, path_seg) in segments.iter().zip(path_segments) {
                    match seg {
                        Segment::Static(s) if s != path_seg => return None,
                        Segment::Static(_) => {}
                        Segment::Parameter(name) => {
                            let value = percent_decode_str(path_seg).decode_utf8_lossy();
                            params.insert(name.clone(), value.into_owned());
                        }
                    }
                }

                Some(params)
            }
        }
    }
}

/// A registered route binding a method + pattern to a handler and its own middleware.
pub struct Route {
    method: Method,
    pattern: Pattern,
    handler: Handler,
    layers: Vec<MiddlewareHandler>,
}

impl Route {
    fn new(method: Method, pattern: &str, handler: Handler) -> Self {
        Self {
            method,
            pattern: Pattern::parse(pattern),
            handler,
            layers: Vec::new(),
        }
    }

    /// Wrap only this route in `middleware`. Layers run in the order they are added.
    pub fn layer(&mut self, middleware: impl Middleware + 'static) -> &mut Self {
        self.layers.push(from_middleware(Arc::new(middleware)));
        self
    }

    // Returns `Some(params)` when both the HTTP method and path pattern match.
    fn matches(&self, method: &Method, path: &str) -> Option<PathParams> {
        if &self.method == method {
            self.pattern.matches(path)
        } else {
            None
        }
    }

    // The route handler as the terminal link of a middleware chain.
    fn terminal(&self) -> MiddlewareHandler {
        let handler = Arc::clone(&self.handler);
        Arc::new(move |ctx: Context, _next: Next| handler(ctx))
    }
}

/// HTTP request router that dispatches requests to registered handler functions.
///
/// When no route matches, a `404 Not Found` JSON error is returned.
///
/// # Examples
///
/// ```rust,no_run
/// use tweetfeed::{Router, Response, StatusCode, context::Context};
///
/// let mut router = Router::new();
///
/// router.get("/tweets/:id", |ctx: Context| async move {
///     let id = ctx.param("id").unwrap_or("unknown").to_owned();
///     Response::new(StatusCode::Ok).body(id)
/// });
/// ```
pub struct Router {
    routes: Vec<Route>,
    layers: Vec<MiddlewareHandler>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Create a new, empty `Router`.
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            layers: Vec::new(),
        }
    }

    /// Register a handler for `GET` requests matching `path`.
    pub fn get(&mut self, path: &str, handler: impl IntoHandler) -> &mut Route {
        self.add_route(Method::Get, path, handler)
    }

    /// Register a handler for `POST` requests matching `path`.
    pub fn post(&mut self, path: &str, handler: impl IntoHandler) -> &mut Route {
        self.add_route(Method::Post, path, handler)
    }

    /// Register a handler for `PUT` requests matching `path`.
    pub fn put(&mut self, path: &str, handler: impl IntoHandler) -> &mut Route {
        self.add_route(Method::Put, path, handler)
    }

    /// Register a handler for `DELETE` requests matching `path`.
    pub fn delete(&mut self, path: &str, handler: impl IntoHandler) -> &mut Route {
        self.add_route(Method::Delete, path, handler)
    }

    /// Wrap every request, including unmatched ones, in `middleware`.
    ///
    /// Router-wide layers run before any route layer, in the order they are added.
    pub fn layer(&mut self, middleware: impl Middleware + 'static) -> &mut Self {
        self.layers.push(from_middleware(Arc::new(middleware)));
        self
    }

    // Erase the concrete handler type and store it as a `Handler` trait object.
    fn add_route(&mut self, method: Method, path: &str, handler: impl IntoHandler) -> &mut Route {
        let handler: Handler = Arc::new(move |ctx: Context| handler.call(ctx));
        self.routes.push(Route::new(method, path, handler));
        let last = self.routes.len() - 1;
        &mut self.routes[last]
    }

    /// Return the number of routes registered in this router.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Return `true` if no routes have been registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Dispatch `request` through the middleware chain to the first matching route.
    pub async fn route(&self, request: Request) -> Response {
        let mut chain = self.layers.clone();

        let matched = self
            .routes
            .iter()
            .find_map(|route| Some((route, route.matches(request.method(), request.path())?)));

        let ctx = match matched {
            Some((route, params)) => {
                chain.extend(route.layers.iter().cloned());
                chain.push(route.terminal());
                Context::with_params(request, params)
            }
            None => {
                chain.push(Arc::new(|ctx: Context, _next: Next| -> BoxFuture {
                    Box::pin(async move { not_found(&ctx) })
                }));
                Context::new(request)
            }
        };

        Next::new(chain).run(ctx).await
    }
}

fn not_found(ctx: &Context) -> Response {
    let request = ctx.request();
    Response::json(
        StatusCode::NotFound,
        &json!({ "error": format!("no route for {} {}", request.method(), request.path()) }),
    )
}
