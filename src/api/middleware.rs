//! API Middleware
//!
//! Session extraction, page-route gating, and request logging.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use uuid::Uuid;

use crate::access::{authorize, AccessDecision};
use crate::domain::{RequestContext, Role};
use crate::session::SessionClaims;

use super::AppState;

/// Cookie carrying the session token for browser clients
pub const SESSION_COOKIE: &str = "portal_session";

/// Raw bearer token of the current request, kept for logout
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

// =========================================================================
// Session extraction middleware
// =========================================================================

/// Resolve the session token (cookie or Authorization header) into a
/// request context.
///
/// This middleware never blocks a request: an absent, unknown, or expired
/// token simply yields a GUEST context. Enforcement happens in the page
/// gate and in per-endpoint role checks.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let headers = request.headers();

    let correlation_id = headers
        .get("X-Correlation-Id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    let mut context = RequestContext::new().with_correlation_id(correlation_id);

    if let Some(token) = extract_token(headers) {
        if let Some(claims) = state.sessions.resolve(&token).await {
            context = context.with_subject(claims.subject_id, claims.role);
            request.extensions_mut().insert(claims);
        }
        request.extensions_mut().insert(BearerToken(token));
    }

    request.extensions_mut().insert(context);

    next.run(request).await
}

/// Pull the session token from the Authorization header or the session
/// cookie, in that order.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        if let Some(token) = auth.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    let cookies = headers.get("cookie").and_then(|v| v.to_str().ok())?;
    cookies.split(';').find_map(|pair| {
        pair.trim()
            .strip_prefix(SESSION_COOKIE)
            .and_then(|rest| rest.strip_prefix('='))
            .map(|token| token.to_string())
    })
}

// =========================================================================
// Page gate middleware
// =========================================================================

/// Gate page routes on (path, role).
///
/// Runs after `session_middleware`. Unauthorized page access is always a
/// redirect, never an error body.
pub async fn page_gate_middleware(request: Request<Body>, next: Next) -> Response {
    let role = request
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.role)
        .unwrap_or(Role::Guest);

    match authorize(request.uri().path(), role) {
        AccessDecision::Allow => next.run(request).await,
        AccessDecision::Redirect(target) => Redirect::to(&target).into_response(),
    }
}

// =========================================================================
// Request logging
// =========================================================================

/// Headers that should be masked in logs
const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie"];

/// Mask sensitive headers for logging
pub fn mask_headers_for_logging(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let name_lower = name.as_str().to_lowercase();
            let masked_value = if SENSITIVE_HEADERS.contains(&name_lower.as_str()) {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("[invalid utf8]").to_string()
            };
            (name.to_string(), masked_value)
        })
        .collect()
}

/// Request logging middleware
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let headers = mask_headers_for_logging(request.headers());

    let correlation_id = request
        .extensions()
        .get::<RequestContext>()
        .and_then(|ctx| ctx.correlation_id);

    let start = std::time::Instant::now();

    tracing::info!(
        method = %method,
        uri = %uri,
        correlation_id = ?correlation_id,
        headers = ?headers,
        "Incoming request"
    );

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        correlation_id = ?correlation_id,
        "Request completed"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token_from_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer abc123".parse().unwrap());

        assert_eq!(extract_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "cookie",
            "theme=dark; portal_session=tok42; lang=en".parse().unwrap(),
        );

        assert_eq!(extract_token(&headers), Some("tok42".to_string()));
    }

    #[test]
    fn test_bearer_takes_precedence_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer header-token".parse().unwrap());
        headers.insert("cookie", "portal_session=cookie-token".parse().unwrap());

        assert_eq!(extract_token(&headers), Some("header-token".to_string()));
    }

    #[test]
    fn test_extract_token_absent() {
        let headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert("cookie", "theme=dark".parse().unwrap());
        assert_eq!(extract_token(&headers), None);
    }

    #[test]
    fn test_mask_headers_for_logging() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());
        headers.insert("cookie", "portal_session=secret".parse().unwrap());
        headers.insert("authorization", "Bearer secret".parse().unwrap());

        let masked = mask_headers_for_logging(&headers);

        let cookie = masked.iter().find(|(k, _)| k == "cookie");
        let auth = masked.iter().find(|(k, _)| k == "authorization");
        let content_type = masked.iter().find(|(k, _)| k == "content-type");

        assert_eq!(cookie.unwrap().1, "[REDACTED]");
        assert_eq!(auth.unwrap().1, "[REDACTED]");
        assert_eq!(content_type.unwrap().1, "application/json");
    }
}
