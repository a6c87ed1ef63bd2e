//! Session API endpoints.

use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;

use super::{Ack, ValidJson};
use crate::auth::{removal_cookie, session_cookie};
use crate::errors::AppError;
use crate::models::SessionRequest;
use crate::AppState;

/// POST /jwt - Sign a session token and set it as the `token` cookie.
///
/// Credentials are checked by the external identity provider before the
/// frontend calls this endpoint.
pub async fn issue_session(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidJson(request): ValidJson<SessionRequest>,
) -> Result<(CookieJar, Json<Ack>), AppError> {
    let token = state.sessions.issue(&request.email)?;
    let jar = jar.add(session_cookie(token, state.config.app_env));
    Ok((jar, Ack::ok()))
}

/// POST /logout - Clear the session cookie.
pub async fn clear_session(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Ack>) {
    let jar = jar.add(removal_cookie(state.config.app_env));
    (jar, Ack::ok())
}
