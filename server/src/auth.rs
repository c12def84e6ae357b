//! Global HTTP basic-auth gate.
//!
//! Installed as router-wide middleware when credentials are configured.
//! Requests without a matching `Authorization: Basic` header are answered
//! with 401 before any handler runs.

use std::fmt;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::error::ApiError;

/// The single username/password pair the gate accepts.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// True when `header` is a well-formed basic-auth value for these
    /// credentials.
    pub fn accepts(&self, header: &str) -> bool {
        let Some((username, password)) = parse_basic(header) else {
            return false;
        };
        let username_ok = username.as_bytes().ct_eq(self.username.as_bytes());
        let password_ok = password.as_bytes().ct_eq(self.password.as_bytes());
        (username_ok & password_ok).into()
    }

    /// Encoded `Authorization` header value for these credentials.
    pub fn header_value(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {encoded}")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Decode `Basic <base64(user:pass)>` into its two halves.
fn parse_basic(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

pub async fn require_basic_auth(
    State(credentials): State<Credentials>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| credentials.accepts(value));

    if !authorized {
        debug!(method = %request.method(), path = %request.uri().path(), "basic auth failed");
        return Err(ApiError::Unauthorized);
    }
    Ok(next.run(request).await)
}
