//! Document store module.
//!
//! MongoDB is the source of truth for posts and volunteer requests. The
//! in-memory store mirrors its semantics for tests and local runs.

mod memory;
mod mongo;

pub use memory::*;
pub use mongo::*;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::config::{Config, StoreBackend};
use crate::errors::AppError;
use crate::models::{
    DeleteAck, InsertAck, NewPost, NewVolunteerRequest, Post, RecordId, UpdateAck,
    VolunteerRequest,
};

/// Collection holding posts.
pub const POSTS_COLLECTION: &str = "posts";
/// Collection holding volunteer requests.
pub const VOLUNTEER_REQUESTS_COLLECTION: &str = "volunteer_requests";

/// Operations the handlers need from the document store.
#[async_trait]
pub trait Store: Send + Sync {
    /// Round-trip to the store to confirm it is reachable.
    async fn ping(&self) -> Result<(), AppError>;

    async fn insert_post(&self, post: NewPost) -> Result<InsertAck, AppError>;

    /// All posts in natural store order.
    async fn list_posts(&self) -> Result<Vec<Post>, AppError>;

    /// At most `limit` posts, earliest deadline first.
    async fn list_posts_by_deadline(&self, limit: usize) -> Result<Vec<Post>, AppError>;

    async fn get_post(&self, id: RecordId) -> Result<Option<Post>, AppError>;

    async fn list_posts_by_organizer(&self, email: &str) -> Result<Vec<Post>, AppError>;

    /// Merge `fields` into the post; fields not present are left alone.
    async fn update_post(
        &self,
        id: RecordId,
        fields: Map<String, Value>,
    ) -> Result<UpdateAck, AppError>;

    async fn delete_post(&self, id: RecordId) -> Result<DeleteAck, AppError>;

    /// Atomically decrement the post's `total_volunteer_need` if it is positive.
    ///
    /// Returns `false` when the post is missing or has no slots left.
    async fn claim_volunteer_slot(&self, id: RecordId) -> Result<bool, AppError>;

    /// Give back a slot taken by `claim_volunteer_slot`.
    async fn release_volunteer_slot(&self, id: RecordId) -> Result<(), AppError>;

    async fn insert_volunteer_request(
        &self,
        request: NewVolunteerRequest,
    ) -> Result<InsertAck, AppError>;

    async fn list_volunteer_requests_by_organizer(
        &self,
        email: &str,
    ) -> Result<Vec<VolunteerRequest>, AppError>;

    async fn delete_volunteer_request(&self, id: RecordId) -> Result<DeleteAck, AppError>;

    /// Release the connection. Called once on shutdown.
    async fn close(&self);
}

/// Open the configured store and verify it answers a ping.
pub async fn init_store(config: &Config) -> Result<Arc<dyn Store>, AppError> {
    match config.store_backend {
        StoreBackend::Mongo => {
            let store = MongoStore::connect(&config.mongodb_uri, &config.db_name).await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store, data is lost on shutdown");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
