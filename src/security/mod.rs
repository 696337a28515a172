//! Authorization gate.
//!
//! The tweet core has no notion of who is asking. Access control is a
//! predicate over the request ([`Authorize`]) that [`AuthMiddleware`] runs
//! before the route handler.

mod middleware;

pub use middleware::AuthMiddleware;

use crate::Request;

/// Decides whether a request may proceed.
pub trait Authorize: Send + Sync {
    fn authorize(&self, request: &Request) -> bool;
}

/// Allows a request when a query parameter has an exact value.
///
/// The service's gate is `QueryFlag::new("auth", "true")`: `?auth=true` passes,
/// `?auth=TRUE`, `?auth=1`, a repeated `auth` or no parameter at all do not.
#[derive(Debug, Clone)]
pub struct QueryFlag {
    name: String,
    value: String,
}

impl QueryFlag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Default for QueryFlag {
    fn default() -> Self {
        Self::new("auth", "true")
    }
}

impl Authorize for QueryFlag {
    fn authorize(&self, request: &Request) -> bool {
        let mut values = request.query_params(&self.name);
        values.next() == Some(self.value.as_str()) && values.next().is_none()
    }
}

/// Closures work as predicates too.
impl<F> Authorize for F
where
    F: Fn(&Request) -> bool + Send + Sync,
{
    fn authorize(&self, request: &Request) -> bool {
        self(request)
    }
}
