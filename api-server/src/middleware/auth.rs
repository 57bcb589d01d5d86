//! Authentication middleware
//!
//! Optional static API key. When `INTEL_API_KEY` is unset every request
//! passes; otherwise `Authorization: Bearer <key>` or `X-API-Key: <key>`
//! must match.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::{AppError, AppState};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Middleware: Require the configured API key
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.config.api_key.as_deref() else {
        return Ok(next.run(req).await);
    };

    let authorized = extract_key(&req) == Some(expected);
    if !authorized {
        tracing::warn!(path = %req.uri().path(), "rejected request with missing or invalid API key");
        return Err(AppError::Unauthorized);
    }
    Ok(next.run(req).await)
}

/// Bearer token first, then the API key header
fn extract_key(req: &Request) -> Option<&str> {
    let headers = req.headers();
    if let Some(token) = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        return Some(token.trim());
    }
    headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()).map(str::trim)
}
