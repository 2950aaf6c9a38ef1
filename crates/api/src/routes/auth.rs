//! Authentication route handlers.
//!
//! Register and login return the token in the body and also set it as an
//! `HttpOnly` cookie, so both browser and API clients can use it.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::{
    WithRejection,
    cookie::{Cookie, CookieJar, SameSite},
};
use serde_json::json;
use time::OffsetDateTime;

use crate::config::ApiConfig;
use crate::error::{AppError, Result, clear_sentry_user};
use crate::middleware::RequireAuth;
use crate::middleware::auth::TOKEN_COOKIE;
use crate::services::auth::{AuthService, AuthSession, LoginRequest, RegisterRequest, Registration};
use crate::state::AppState;

/// How long the overwritten cookie survives after logout.
const LOGOUT_COOKIE_SECONDS: i64 = 10;

/// Build the session cookie for a freshly issued token.
fn session_cookie(config: &ApiConfig, token: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Strict)
        .path("/")
        .secure(config.is_production())
        .max_age(time::Duration::days(i64::from(config.jwt.cookie_days)))
        .build()
}

fn session_response(
    state: &AppState,
    status: StatusCode,
    session: AuthSession,
) -> impl IntoResponse + use<> {
    let jar = CookieJar::new().add(session_cookie(state.config(), session.token.clone()));
    (
        status,
        jar,
        Json(json!({
            "success": true,
            "token": session.token,
            "user": session.user.public(),
        })),
    )
}

/// Register a new account.
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<RegisterRequest>, AppError>,
) -> Result<impl IntoResponse> {
    let registration = Registration::try_from(req)?;
    let session = AuthService::new(state.pool(), state.tokens())
        .register(registration)
        .await?;

    Ok(session_response(&state, StatusCode::CREATED, session))
}

/// Log in with email and password.
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<impl IntoResponse> {
    let session = AuthService::new(state.pool(), state.tokens())
        .login(req)
        .await?;

    tracing::info!(user_id = %session.user.id, "user logged in");

    Ok(session_response(&state, StatusCode::OK, session))
}

/// Current user's profile.
pub async fn me(State(state): State<AppState>, auth: RequireAuth) -> Result<impl IntoResponse> {
    let user = AuthService::new(state.pool(), state.tokens())
        .get_user(auth.identity.user_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "user": user.profile(),
    })))
}

/// Log out by overwriting the session cookie.
///
/// Tokens are not revoked server-side; a client holding the token can keep
/// using it until it expires.
pub async fn logout(auth: RequireAuth) -> impl IntoResponse {
    let cookie = Cookie::build((TOKEN_COOKIE, "none"))
        .http_only(true)
        .path("/")
        .expires(OffsetDateTime::now_utc() + time::Duration::seconds(LOGOUT_COOKIE_SECONDS))
        .build();

    tracing::info!(user_id = %auth.identity.user_id, "user logged out");
    clear_sentry_user();

    (
        CookieJar::new().add(cookie),
        Json(json!({
            "success": true,
            "message": "User logged out successfully",
        })),
    )
}
