//! Post model: a volunteer opportunity with a capacity counter.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::fields::{optional_volunteer_need, strip_identity, volunteer_need, Deadline, RecordId};
use crate::errors::AppError;

/// A stored volunteer opportunity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(default)]
    pub post_title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Deadline>,
    #[serde(default, deserialize_with = "volunteer_need")]
    pub total_volunteer_need: i64,
    /// Descriptive fields the service does not interpret (thumbnail, category, location, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Post {
    pub fn from_new(id: RecordId, new: NewPost) -> Self {
        Self {
            id,
            post_title: new.post_title,
            description: new.description,
            organizer_email: new.organizer_email,
            deadline: new.deadline,
            total_volunteer_need: new.total_volunteer_need,
            extra: new.extra,
        }
    }

    /// Apply a merge update, leaving the identifier untouched.
    pub fn merge(&mut self, fields: &Map<String, Value>) -> Result<(), AppError> {
        let mut current = match serde_json::to_value(&*self)? {
            Value::Object(map) => map,
            _ => return Err(AppError::Internal("post did not serialize to an object".into())),
        };
        for (key, value) in fields {
            current.insert(key.clone(), value.clone());
        }
        let mut merged: Post = serde_json::from_value(Value::Object(current))?;
        merged.id = self.id;
        *self = merged;
        Ok(())
    }
}

/// Request body for creating a post.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewPost {
    #[serde(default)]
    #[validate(length(min = 1, message = "post_title is required"))]
    pub post_title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Deadline>,
    #[serde(default, deserialize_with = "volunteer_need")]
    pub total_volunteer_need: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewPost {
    /// The store assigns identifiers, never the client.
    pub fn without_identity(mut self) -> Self {
        strip_identity(&mut self.extra);
        self
    }
}

/// Request body for a merge update of a post. Only submitted fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PostChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "post_title must not be empty"))]
    pub post_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Deadline>,
    #[serde(
        default,
        deserialize_with = "optional_volunteer_need",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_volunteer_need: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PostChanges {
    /// Flatten into the field map handed to `$set`, minus any identifier.
    pub fn into_fields(mut self) -> Result<Map<String, Value>, AppError> {
        strip_identity(&mut self.extra);
        match serde_json::to_value(self)? {
            Value::Object(fields) => Ok(fields),
            _ => Err(AppError::Internal("changes did not serialize to an object".into())),
        }
    }
}
