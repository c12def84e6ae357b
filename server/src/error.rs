//! The JSON error envelope and its status-code mapping.
//!
//! # Design
//! Every non-2xx response carries the same body,
//! `{"object":"error","message":"..."}`. Extractor rejections are converted
//! into `ApiError` so malformed ids and bodies use the envelope too instead of
//! axum's plain-text defaults.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use todo_core::StoreError;
use tracing::{error, warn};

/// Value of the `WWW-Authenticate` challenge sent with 401 responses.
pub const CHALLENGE: &str = r#"Basic realm="todos""#;

/// Failures surfaced to HTTP callers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body was not valid JSON of the expected shape.
    #[error("json: wrong params: {0}")]
    InvalidBody(String),

    /// A path parameter could not be parsed.
    #[error("path: wrong params: {0}")]
    InvalidPath(String),

    /// Missing or wrong basic-auth credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// No route matches the request path.
    #[error("no route for {0}")]
    RouteNotFound(String),

    /// The path exists but not for this method.
    #[error("method {method} not allowed on {path}")]
    MethodNotAllowed { method: String, path: String },

    /// The request did not finish within the configured deadline.
    #[error("request timed out")]
    Timeout,

    /// A middleware failed for a reason other than the deadline.
    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) | ApiError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidPath(rejection.body_text())
    }
}

/// Wire shape of the error envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub object: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            object: "error".to_string(),
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "request rejected");
        }

        let mut response = (status, Json(ErrorBody::new(self.to_string()))).into_response();
        if let ApiError::Unauthorized = self {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(CHALLENGE));
        }
        response
    }
}
