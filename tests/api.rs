//! End-to-end tests against a real server on an ephemeral port.

use std::net::SocketAddr;

use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;

use tweetfeed::Server;
use tweetfeed::api::{self, AppState, RouteOptions};
use tweetfeed::tweets::FeedOptions;

struct TestServer {
    addr: SocketAddr,
    _shutdown: oneshot::Sender<()>,
}

async fn start(options: RouteOptions) -> TestServer {
    let server = Server::bind("127.0.0.1:0").await.unwrap();
    let addr = server.local_addr();
    let router = api::router(AppState::new(FeedOptions::default()), options);
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        server
            .serve(router, async move {
                let _ = rx.await;
            })
            .await
            .unwrap();
    });
    TestServer {
        addr,
        _shutdown: tx,
    }
}

struct Reply {
    status: u16,
    head: String,
    body: Vec<u8>,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

fn split_reply(raw: &[u8]) -> Reply {
    let sep = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has a header terminator");
    let head = String::from_utf8(raw[..sep].to_vec()).unwrap();
    let status = head.split(' ').nth(1).unwrap().parse().unwrap();
    Reply {
        status,
        head,
        body: raw[sep + 4..].to_vec(),
    }
}

async fn send(addr: SocketAddr, method: &str, target: &str, body: Option<Value>) -> Reply {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let raw = match body {
        Some(body) => {
            let body = body.to_string();
            format!(
                "{method} {target} HTTP/1.1\r\nHost: test\r\nConnection: close\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
                body.len()
            )
        }
        None => format!("{method} {target} HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n"),
    };
    stream.write_all(raw.as_bytes()).await.unwrap();

    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    split_reply(&out)
}

#[tokio::test]
async fn threaded_feed_over_the_wire() {
    let server = start(RouteOptions::default()).await;

    let feed = send(server.addr, "GET", "/tweets", None).await;
    assert_eq!(feed.status, 200);
    assert!(feed.head.contains("Content-Type: application/json"));
    let seed = feed.json()[0].clone();
    assert_eq!(seed["handle"], json!("lordsnipp"));
    assert_eq!(seed["msg"], json!("stay safe"));
    assert!(seed.get("parentId").is_none());
    let t1 = seed["id"].as_str().unwrap().to_owned();

    let created = send(
        server.addr,
        "POST",
        "/tweets",
        Some(json!({ "handle": "a", "msg": "hi", "parentId": t1 })),
    )
    .await;
    assert_eq!(created.status, 200);
    let t2 = created.json();
    assert_eq!(t2["parentId"], json!(t1));

    let parent = send(server.addr, "GET", &format!("/tweets/{t1}"), None).await;
    assert_eq!(parent.status, 200);
    assert_eq!(parent.json()["children"], json!([t2]));

    let child = send(server.addr, "GET", &format!("/tweets/{}", t2["id"].as_str().unwrap()), None).await;
    assert_eq!(child.json()["children"], json!([]));

    let feed = send(server.addr, "GET", "/tweets", None).await;
    let ids: Vec<_> = feed
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].clone())
        .collect();
    assert_eq!(ids, vec![json!(t1)]);
}

#[tokio::test]
async fn delete_unknown_id_is_404() {
    let server = start(RouteOptions::default()).await;
    let res = send(server.addr, "DELETE", "/tweets/unknown-id", None).await;
    assert_eq!(res.status, 404);
    assert_eq!(
        res.json(),
        json!({ "error": "tweet with id \"unknown-id\" not found" })
    );
}

#[tokio::test]
async fn gate_requires_auth_true() {
    let server = start(RouteOptions { require_auth: true }).await;
    let feed = send(server.addr, "GET", "/tweets", None).await;
    let id = feed.json()[0]["id"].as_str().unwrap().to_owned();

    let denied = send(server.addr, "GET", &format!("/tweets/{id}?auth=yes"), None).await;
    assert_eq!(denied.status, 401);
    assert_eq!(denied.json(), json!({ "error": "unauthorized" }));

    let allowed = send(server.addr, "GET", &format!("/tweets/{id}?auth=true"), None).await;
    assert_eq!(allowed.status, 200);
}

#[tokio::test]
async fn keep_alive_serves_pipelined_requests() {
    let server = start(RouteOptions::default()).await;
    let mut stream = TcpStream::connect(server.addr).await.unwrap();

    stream
        .write_all(
            b"GET /tweet HTTP/1.1\r\nHost: test\r\n\r\nGET /tweet HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n",
        )
        .await
        .unwrap();

    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.matches("HTTP/1.1 200 OK").count(), 2);
    assert!(text.contains("Connection: keep-alive"));
    assert!(text.contains("Connection: close"));
}

#[tokio::test]
async fn garbage_is_400_and_closes() {
    let server = start(RouteOptions::default()).await;
    let mut stream = TcpStream::connect(server.addr).await.unwrap();
    stream.write_all(b"NOT HTTP AT ALL\r\n\r\n").await.unwrap();

    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    let reply = split_reply(&out);
    assert_eq!(reply.status, 400);
    assert!(reply.head.contains("Connection: close"));
}
