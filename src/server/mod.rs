//! Async TCP server using Tokio.
//!
//! Accepts TCP connections and dispatches HTTP/1.1 requests to a handler function.
//! Supports HTTP/1.1 persistent connections (keep-alive) and pipelined requests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::{Buf, BytesMut};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use crate::Router;
use crate::http::{
    StatusCode,
    request::{Request, RequestError},
    response::Response,
};

/// Errors produced by the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// Maximum size of a complete HTTP request we will buffer before rejecting it (8 MiB).
const MAX_REQUEST_SIZE: usize = 8 * 1024 * 1024;

/// Initial read buffer capacity per connection.
const INITIAL_BUF_SIZE: usize = 4096;

/// The HTTP server.
///
/// # Examples
///
/// ```rust,no_run
/// use tweetfeed::Server;
/// use tweetfeed::api::{self, AppState, RouteOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let router = api::router(AppState::new(Default::default()), RouteOptions::default());
///     let server = Server::bind("127.0.0.1:3000").await?;
///     server.serve(router, std::future::pending()).await?;
///     Ok(())
/// }
/// ```
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl Server {
    /// Binds the server to the given TCP address.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address cannot be bound.
    pub async fn bind(addr: impl AsRef<str>) -> Result<Self, ServerError> {
        let addr = addr.as_ref();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind {
                addr: addr.to_owned(),
                source: e,
            })?;
        let local_addr = listener.local_addr()?;
        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serves `router` until `shutdown` resolves.
    pub async fn serve(
        self,
        router: Router,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), ServerError> {
        let router = Arc::new(router);
        self.run(
            move |req| {
                let router = Arc::clone(&router);
                async move { router.route(req).await }
            },
            shutdown,
        )
        .await
    }

    /// Accepts connections and dispatches requests to `handler` until `shutdown`
    /// resolves.
    ///
    /// The handler is shared across all spawned Tokio tasks. Connections that
    /// are already open when `shutdown` fires are left to finish on their own.
    pub async fn run<H, F>(
        self,
        handler: H,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), ServerError>
    where
        H: Fn(Request) -> F + Send + Sync + 'static,
        F: Future<Output = Response> + Send + 'static,
    {
        let handler = Arc::new(handler);
        info!(address = %self.local_addr, "tweetfeed listening");

        tokio::pin!(shutdown);

        loop {
            let accepted = tokio::select! {
                accepted = self.listener.accept() => accepted,
                () = &mut shutdown => {
                    info!("shutdown requested, no longer accepting connections");
                    return Ok(());
                }
            };

            let (stream, peer_addr) = match accepted {
                Ok(pair) => pair,
                Err(e) => {
                    error!(error = %e, "failed to accept connection");
                    continue;
                }
            };

            debug!(peer = %peer_addr, "connection accepted");
            let handler = Arc::clone(&handler);

            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, peer_addr, handler).await {
                    warn!(peer = %peer_addr, error = %e, "connection closed with error");
                }
            });
        }
    }
}

/// Takes one complete request off the front of `buf`, if there is one.
///
/// `Ok(None)` means more bytes are needed.
fn take_request(buf: &mut BytesMut) -> Result<Option<Request>, RequestError> {
    if buf.is_empty() {
        return Ok(None);
    }

    let (request, body_offset) = match Request::parse(&buf[..]) {
        Ok(pair) => pair,
        Err(RequestError::Incomplete) => return Ok(None),
        Err(e) => return Err(e),
    };

    let total = body_offset.saturating_add(request.content_length().unwrap_or(0));
    if total > MAX_REQUEST_SIZE {
        return Err(RequestError::TooLarge {
            max_bytes: MAX_REQUEST_SIZE,
        });
    }
    if buf.len() < total {
        return Ok(None);
    }

    buf.advance(total);
    Ok(Some(request))
}

/// Handles a single TCP connection over its lifetime.
async fn handle_connection<H, F>(
    mut stream: TcpStream,
    peer_addr: SocketAddr,
    handler: Arc<H>,
) -> Result<(), std::io::Error>
where
    H: Fn(Request) -> F + Send + Sync + 'static,
    F: Future<Output = Response> + Send + 'static,
{
    let mut buf = BytesMut::with_capacity(INITIAL_BUF_SIZE);

    loop {
        let request = match take_request(&mut buf) {
            Ok(Some(request)) => request,
            Ok(None) => {
                if buf.len() > MAX_REQUEST_SIZE {
                    return reject(&mut stream, peer_addr, RequestError::TooLarge {
                        max_bytes: MAX_REQUEST_SIZE,
                    })
                    .await;
                }
                if stream.read_buf(&mut buf).await? == 0 {
                    debug!(peer = %peer_addr, "connection closed by peer");
                    return Ok(());
                }
                continue;
            }
            Err(e) => return reject(&mut stream, peer_addr, e).await,
        };

        let keep_alive = request.is_keep_alive();

        debug!(
            peer = %peer_addr,
            method = %request.method(),
            path = %request.path(),
            "dispatching request"
        );

        let response = handler(request).await.keep_alive(keep_alive);
        stream.write_all(&response.into_bytes()).await?;
        stream.flush().await?;

        if !keep_alive {
            debug!(peer = %peer_addr, "Connection: close, shutting down");
            return Ok(());
        }
    }
}

// Answer an unparseable request and close the connection.
async fn reject(
    stream: &mut TcpStream,
    peer_addr: SocketAddr,
    err: RequestError,
) -> Result<(), std::io::Error> {
    let status = match err {
        RequestError::TooLarge { .. } => StatusCode::PayloadTooLarge,
        _ => StatusCode::BadRequest,
    };
    warn!(peer = %peer_addr, error = %err, %status, "rejecting request");

    let response = Response::json(status, &serde_json::json!({ "error": err.to_string() }))
        .keep_alive(false);
    stream.write_all(&response.into_bytes()).await?;
    stream.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_request_waits_for_full_body() {
        let mut buf = BytesMut::from(&b"POST /tweet HTTP/1.1\r\nContent-Length: 5\r\n\r\nms"[..]);
        assert!(take_request(&mut buf).unwrap().is_none());
        buf.extend_from_slice(b"g=x");
        let req = take_request(&mut buf).unwrap().unwrap();
        assert_eq!(req.body().as_ref(), b"msg=x");
        assert!(buf.is_empty());
    }

    #[test]
    fn take_request_leaves_pipelined_bytes() {
        let mut buf = BytesMut::from(&b"GET /a HTTP/1.1\r\n\r\nGET /b HTTP/1.1\r\n\r\n"[..]);
        assert_eq!(take_request(&mut buf).unwrap().unwrap().path(), "/a");
        assert_eq!(take_request(&mut buf).unwrap().unwrap().path(), "/b");
        assert!(take_request(&mut buf).unwrap().is_none());
    }

    #[test]
    fn take_request_rejects_oversized_declared_body() {
        let raw = format!(
            "POST /tweets HTTP/1.1\r\nContent-Length: {}\r\n\r\n",
            MAX_REQUEST_SIZE + 1
        );
        let mut buf = BytesMut::from(raw.as_bytes());
        assert!(matches!(
            take_request(&mut buf),
            Err(RequestError::TooLarge { .. })
        ));
    }
}
