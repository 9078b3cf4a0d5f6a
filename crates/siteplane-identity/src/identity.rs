//! Gateway-injected identity header extractor.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use http::StatusCode;
use http::request::Parts;

/// Header carrying the identity provider's user id, injected by the gateway
/// after session verification.
pub const USER_ID_HEADER: &str = "x-siteplane-user-id";

/// Authenticated caller identity.
///
/// `auth_id` is the provider-assigned user id (an opaque string), not a local
/// row id. The required form rejects with 401 when the header is absent or
/// empty; use `Option<Identity>` on read routes that fail soft.
#[derive(Debug, Clone)]
pub struct Identity {
    pub auth_id: String,
}

fn auth_id_from_parts(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let auth_id = auth_id_from_parts(parts);
        async move {
            let auth_id = auth_id.ok_or(StatusCode::UNAUTHORIZED)?;
            Ok(Self { auth_id })
        }
    }
}

impl<S> OptionalFromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Option<Self>, Self::Rejection>> + Send {
        let auth_id = auth_id_from_parts(parts);
        async move { Ok(auth_id.map(|auth_id| Self { auth_id })) }
    }
}
