//! Errors surfaced to API clients as `{"error": …}` bodies.

use serde_json::json;
use thiserror::Error;

use crate::context::BodyError;
use crate::tweets::StoreError;
use crate::{Response, StatusCode};

#[derive(Debug, Error)]
pub enum ApiError {
    /// The id in the path does not name a stored tweet. Holds the id as sent.
    #[error("tweet with id \"{0}\" not found")]
    NotFound(String),

    #[error("can't reply to tweet that doesn't exist")]
    InvalidParent,

    #[error(transparent)]
    BadRequest(#[from] BodyError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidParent(_) => ApiError::InvalidParent,
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) | ApiError::InvalidParent => StatusCode::NotFound,
            ApiError::BadRequest(_) => StatusCode::BadRequest,
        }
    }

    pub fn into_response(self) -> Response {
        tracing::info!("returning error to client: {self}");
        Response::json(self.status_code(), &json!({ "error": self.to_string() }))
    }
}
