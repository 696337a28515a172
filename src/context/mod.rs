//! Per-request context: the request, the captured path parameters, and body decoding.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::Request;
use crate::http::request::parse_urlencoded;

/// Errors produced while decoding a request body into a typed value.
#[derive(Debug, Error)]
pub enum BodyError {
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request body is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Path parameters captured by the matched route pattern.
#[derive(Default, Debug, Clone)]
pub struct PathParams {
    map: HashMap<String, String>,
}

impl PathParams {
    /// Create a new empty parameters map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a captured value
    pub fn insert(&mut self, key: String, value: String) {
        self.map.insert(key, value);
    }

    /// Get a captured value by parameter name
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Everything a handler or middleware gets to see about one request.
pub struct Context {
    request: Request,
    params: PathParams,
}

impl Context {
    /// Create a context with no path parameters
    pub fn new(request: Request) -> Self {
        Self::with_params(request, PathParams::new())
    }

    /// Create a context carrying the parameters captured by the router
    pub fn with_params(request: Request, params: PathParams) -> Self {
        Self { request, params }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn params(&self) -> &PathParams {
        &self.params
    }

    /// Shorthand for a captured path parameter.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key)
    }

    /// Decode the body into `T`.
    ///
    /// `application/x-www-form-urlencoded` bodies are turned into a JSON object
    /// of strings first, so the same DTO serves both encodings. JSON bodies, and
    /// bodies without a `Content-Type`, are parsed as JSON. An empty body, or a
    /// body of any other media type, decodes as the empty object `{}`, so DTOs
    /// made of optional fields see every field as absent.
    pub fn body<T>(&self) -> Result<T, BodyError>
    where
        T: DeserializeOwned,
    {
        let body = self.request.body();
        let media_type = self.request.headers().media_type();

        let value = match media_type {
            Some(m) if m.eq_ignore_ascii_case("application/x-www-form-urlencoded") => {
                let text = std::str::from_utf8(body)?;
                let object = parse_urlencoded(text)
                    .into_iter()
                    .map(|(k, v)| (k, serde_json::Value::String(v)))
                    .collect::<serde_json::Map<_, _>>();
                serde_json::Value::Object(object)
            }
            Some(m) if !m.eq_ignore_ascii_case("application/json") => empty_object(),
            _ if body.iter().all(u8::is_ascii_whitespace) => empty_object(),
            _ => serde_json::from_slice(body)?,
        };

        Ok(serde_json::from_value(value)?)
    }
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Body {
        handle: Option<String>,
        msg: Option<String>,
    }

    fn ctx(content_type: Option<&str>, body: &str) -> Context {
        let ct = content_type
            .map(|c| format!("Content-Type: {c}\r\n"))
            .unwrap_or_default();
        let raw = format!(
            "POST /tweets HTTP/1.1\r\n{ct}Content-Length: {}\r\n\r\n{body}",
            body.len()
        );
        let (req, _) = Request::parse(raw.as_bytes()).unwrap();
        Context::new(req)
    }

    #[test]
    fn json_body() {
        let c = ctx(Some("application/json"), r#"{"handle":"a","msg":"hi"}"#);
        let b: Body = c.body().unwrap();
        assert_eq!(b.handle.as_deref(), Some("a"));
        assert_eq!(b.msg.as_deref(), Some("hi"));
    }

    #[test]
    fn form_body() {
        let c = ctx(
            Some("application/x-www-form-urlencoded"),
            "handle=lordsnipp&msg=stay+safe",
        );
        let b: Body = c.body().unwrap();
        assert_eq!(b.handle.as_deref(), Some("lordsnipp"));
        assert_eq!(b.msg.as_deref(), Some("stay safe"));
    }

    #[test]
    fn empty_body_is_empty_object() {
        let b: Body = ctx(Some("application/json"), "").body().unwrap();
        assert_eq!(b, Body { handle: None, msg: None });
    }

    #[test]
    fn unknown_media_type_is_ignored() {
        let b: Body = ctx(Some("text/plain"), "msg=hi").body().unwrap();
        assert_eq!(b.msg, None);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = ctx(None, "{not json").body::<Body>().unwrap_err();
        assert!(matches!(err, BodyError::Json(_)));
    }

    #[test]
    fn params_lookup() {
        let (req, _) = Request::parse(b"GET /tweets/1 HTTP/1.1\r\n\r\n").unwrap();
        let mut params = PathParams::new();
        params.insert("id".to_owned(), "1".to_owned());
        let c = Context::with_params(req, params);
        assert_eq!(c.param("id"), Some("1"));
        assert_eq!(c.params().len(), 1);
        assert_eq!(c.param("other"), None);
    }
}
