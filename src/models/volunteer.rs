//! VolunteerRequest model: one user's application to a post.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::fields::{strip_identity, RecordId};

/// A stored application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolunteerRequest {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub post_id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volunteer_email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VolunteerRequest {
    pub fn from_new(id: RecordId, new: NewVolunteerRequest) -> Self {
        Self {
            id,
            post_id: new.post_id,
            organizer_email: new.organizer_email,
            volunteer_email: new.volunteer_email,
            extra: new.extra,
        }
    }
}

/// Request body for `POST /be-volunteer`.
///
/// Older clients sent the target post as `_id`; it is accepted as an alias of
/// `post_id` and never reused as the request's own identifier.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewVolunteerRequest {
    #[serde(alias = "_id")]
    pub post_id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "organizer_email must not be empty"))]
    pub organizer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "volunteer_email must not be empty"))]
    pub volunteer_email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewVolunteerRequest {
    pub fn without_identity(mut self) -> Self {
        strip_identity(&mut self.extra);
        self
    }
}
