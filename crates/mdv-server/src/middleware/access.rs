//! Access gate applied to every viewer route.
//!
//! The viewer is meant to sit behind the hosting application's login. The
//! gate is the seam where that check plugs in; the built-in gates either
//! allow everything or require a static bearer token.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Decides whether a request may reach the viewer.
pub trait AccessGate: Send + Sync {
    /// Return `true` if a request with `headers` is allowed.
    fn allows(&self, headers: &HeaderMap) -> bool;
}

/// Gate that allows every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAll;

impl AccessGate for AllowAll {
    fn allows(&self, _headers: &HeaderMap) -> bool {
        true
    }
}

/// Gate that requires `Authorization: Bearer <token>`.
#[derive(Clone)]
pub struct BearerToken {
    token: String,
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerToken").finish_non_exhaustive()
    }
}

impl BearerToken {
    /// Create a gate accepting `token`.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl AccessGate for BearerToken {
    fn allows(&self, headers: &HeaderMap) -> bool {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .is_some_and(|presented| constant_time_eq(presented.as_bytes(), self.token.as_bytes()))
    }
}

/// Compare without short-circuiting on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Reject requests the gate does not allow with 401.
pub(crate) async fn require_access(
    State(gate): State<Arc<dyn AccessGate>>,
    request: Request,
    next: Next,
) -> Response {
    if gate.allows(request.headers()) {
        return next.run(request).await;
    }

    tracing::debug!(path = %request.uri().path(), "Access denied");
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"))],
    )
        .into_response()
}
