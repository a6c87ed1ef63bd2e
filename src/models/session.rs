//! Session models: the identity claim carried by the `token` cookie.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body for `POST /jwt`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SessionRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
}

/// Claims signed into the session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Identity attached to a request once its session token verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub email: String,
}
