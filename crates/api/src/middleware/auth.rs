//! Authentication extractors.
//!
//! Resolves the caller from a bearer token or the `token` cookie and admits
//! them through the role gate declared by the handler's extractor type.

use std::marker::PhantomData;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use axum_extra::{
    extract::cookie::CookieJar,
    headers::{Authorization, HeaderMapExt, authorization::Bearer},
};

use feastflow_core::Role;

use crate::error::{AppError, set_sentry_user};
use crate::services::access::{AccessError, Identity, authorize};
use crate::state::AppState;

/// Name of the cookie carrying the session token.
pub const TOKEN_COOKIE: &str = "token";

/// Pull the session token from a request's headers.
///
/// The `Authorization: Bearer` header wins over the cookie when both are
/// present.
#[must_use]
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>() {
        return Some(bearer.token().to_owned());
    }

    CookieJar::from_headers(headers)
        .get(TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .filter(|value| !value.is_empty())
}

/// The set of roles a route admits.
pub trait RolePolicy {
    const ALLOWED: &'static [Role];
}

/// Any authenticated caller.
pub struct AnyRole;

impl RolePolicy for AnyRole {
    const ALLOWED: &'static [Role] = &Role::ALL;
}

/// Extractor that requires a valid token whose role passes `P`.
///
/// # Example
///
/// ```rust,ignore
/// struct AdminOnly;
///
/// impl RolePolicy for AdminOnly {
///     const ALLOWED: &'static [Role] = &[Role::Admin];
/// }
///
/// async fn audit(RequireRole { identity, .. }: RequireRole<AdminOnly>) -> impl IntoResponse {
///     format!("hello, {}", identity.email)
/// }
/// ```
pub struct RequireRole<P = AnyRole> {
    pub identity: Identity,
    policy: PhantomData<P>,
}

/// Extractor that requires any authenticated caller.
pub type RequireAuth = RequireRole<AnyRole>;

impl<P> FromRequestParts<AppState> for RequireRole<P>
where
    P: RolePolicy + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers).ok_or(AccessError::MissingToken)?;

        let identity = state
            .tokens()
            .verify(&token)
            .map(Identity::from)
            .map_err(|_| AccessError::InvalidToken)?;

        authorize(Some(&identity), P::ALLOWED)?;

        set_sentry_user(&identity.user_id, Some(&identity.email));
        tracing::Span::current().record("user_id", tracing::field::display(identity.user_id));

        Ok(Self {
            identity,
            policy: PhantomData,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{HeaderValue, header};

    use super::*;

    #[test]
    fn test_token_from_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; token=from.cookie.jwt"),
        );
        assert_eq!(
            token_from_headers(&headers).as_deref(),
            Some("from.cookie.jwt")
        );
    }

    #[test]
    fn test_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from.header.jwt"),
        );
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("token=from.cookie.jwt"),
        );
        assert_eq!(
            token_from_headers(&headers).as_deref(),
            Some("from.header.jwt")
        );
    }

    #[test]
    fn test_no_token() {
        assert!(token_from_headers(&HeaderMap::new()).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic Zm9vOmJhcg=="));
        assert!(token_from_headers(&headers).is_none());
    }

    #[test]
    fn test_any_role_admits_every_role() {
        assert_eq!(AnyRole::ALLOWED.len(), 3);
        for role in Role::ALL {
            assert!(AnyRole::ALLOWED.contains(&role));
        }
    }
}
