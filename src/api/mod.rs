//! REST API module.
//!
//! Contains all routes' handlers plus the request plumbing they share.

mod posts;
mod session;
mod volunteers;

pub use posts::*;
pub use session::*;
pub use volunteers::*;

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use validator::Validate;

use crate::errors::AppError;

/// Static readiness text served at `/`.
pub const READY_MESSAGE: &str = "Hello World, Server is Ready";

/// `{ success: true }` acknowledgment, optionally with a message.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Ack {
    pub fn ok() -> Json<Self> {
        Json(Self {
            success: true,
            message: None,
        })
    }

    pub fn with_message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: Some(message.into()),
        })
    }
}

/// JSON body that has been parsed and validated.
///
/// Malformed bodies and failed validation both become `AppError::Validation`.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// `?userEmail=` scope used by the "my ..." listings.
#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    #[serde(rename = "userEmail")]
    pub user_email: Option<String>,
}

impl OwnerQuery {
    /// The requested email, or a validation error when it is missing or blank.
    pub fn require(self) -> Result<String, AppError> {
        self.user_email
            .filter(|email| !email.trim().is_empty())
            .ok_or_else(|| AppError::Validation("User email is required".to_string()))
    }
}

/// GET / - readiness text.
pub async fn root() -> &'static str {
    READY_MESSAGE
}
