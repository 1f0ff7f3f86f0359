use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::errors::WikiError;
use crate::types::AppState;

/// The single username/password pair accepted by the wiki.
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self { username: username.to_string(), password: password.to_string() }
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

/// Decode an `Authorization: Basic ...` header into username and password.
pub fn parse_basic(value: &HeaderValue) -> Option<(String, String)> {
    let (scheme, encoded) = value.to_str().ok()?.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = String::from_utf8(STANDARD.decode(encoded.trim()).ok()?).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Middleware requiring valid Basic credentials before the wrapped route runs.
pub async fn require_basic_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let supplied = request.headers().get(header::AUTHORIZATION).and_then(parse_basic);
    match supplied {
        Some((username, password)) if state.credentials.verify(&username, &password) => {
            next.run(request).await
        }
        Some((username, _)) => {
            log::warn!("Rejected credentials for user '{}' on {}", username, request.uri().path());
            WikiError::Unauthorized.into_response()
        }
        None => {
            log::debug!("No Basic credentials on {}", request.uri().path());
            WikiError::Unauthorized.into_response()
        }
    }
}
