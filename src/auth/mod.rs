//! Cookie-based session authentication.
//!
//! `POST /jwt` stores a signed token in the `token` cookie; the middleware here
//! verifies it and exposes the caller's identity to handlers as [`SessionUser`].

mod token;

pub use token::*;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::config::AppEnv;
use crate::errors::AppError;
use crate::models::SessionUser;
use crate::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "token";

/// Build the session cookie with the attributes for `env`.
///
/// Production serves the frontend from another site, so the cookie must be
/// `Secure; SameSite=None` to be sent cross-site.
pub fn session_cookie(token: String, env: AppEnv) -> Cookie<'static> {
    with_policy(Cookie::new(SESSION_COOKIE, token), env)
}

/// Expired cookie that clears the session, with the same attributes it was set with.
pub fn removal_cookie(env: AppEnv) -> Cookie<'static> {
    let mut cookie = with_policy(Cookie::from(SESSION_COOKIE), env);
    cookie.make_removal();
    cookie
}

fn with_policy(mut cookie: Cookie<'static>, env: AppEnv) -> Cookie<'static> {
    let same_site = if env.is_production() {
        SameSite::None
    } else {
        SameSite::Strict
    };

    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(env.is_production());
    cookie.set_same_site(same_site);
    cookie
}

/// Require a valid session cookie and attach the caller's identity.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Err(AppError::Unauthorized("unauthorized access".to_string()));
    };

    let claims = match state.sessions.verify(cookie.value()) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(error = %err, path = %request.uri().path(), "session token rejected");
            return Err(AppError::Unauthorized("unauthorized access".to_string()));
        }
    };

    request.extensions_mut().insert(SessionUser {
        email: claims.email,
    });

    Ok(next.run(request).await)
}

/// Ensure a `userEmail` scope matches the authenticated identity.
pub fn ensure_owner(user: &SessionUser, requested_email: &str) -> Result<(), AppError> {
    if user.email == requested_email {
        Ok(())
    } else {
        Err(AppError::Forbidden("forbidden access".to_string()))
    }
}
