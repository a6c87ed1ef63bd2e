//! In-process store with the same semantics as the MongoDB store.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::Store;
use crate::errors::AppError;
use crate::models::{
    DeleteAck, InsertAck, NewPost, NewVolunteerRequest, Post, RecordId, UpdateAck,
    VolunteerRequest,
};

#[derive(Default)]
struct Collections {
    posts: Vec<Post>,
    volunteer_requests: Vec<VolunteerRequest>,
}

/// Store holding documents in insertion order behind a single lock.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn insert_post(&self, post: NewPost) -> Result<InsertAck, AppError> {
        let id = RecordId::new();
        self.collections
            .write()
            .await
            .posts
            .push(Post::from_new(id, post));
        Ok(InsertAck::new(id))
    }

    async fn list_posts(&self) -> Result<Vec<Post>, AppError> {
        Ok(self.collections.read().await.posts.clone())
    }

    async fn list_posts_by_deadline(&self, limit: usize) -> Result<Vec<Post>, AppError> {
        let mut posts = self.collections.read().await.posts.clone();
        // Stable sort; posts without a deadline come first, like the store's null ordering
        posts.sort_by(|a, b| a.deadline.cmp(&b.deadline));
        posts.truncate(limit);
        Ok(posts)
    }

    async fn get_post(&self, id: RecordId) -> Result<Option<Post>, AppError> {
        let collections = self.collections.read().await;
        Ok(collections.posts.iter().find(|post| post.id == id).cloned())
    }

    async fn list_posts_by_organizer(&self, email: &str) -> Result<Vec<Post>, AppError> {
        let collections = self.collections.read().await;
        Ok(collections
            .posts
            .iter()
            .filter(|post| post.organizer_email.as_deref() == Some(email))
            .cloned()
            .collect())
    }

    async fn update_post(
        &self,
        id: RecordId,
        fields: Map<String, Value>,
    ) -> Result<UpdateAck, AppError> {
        let mut collections = self.collections.write().await;
        let Some(post) = collections.posts.iter_mut().find(|post| post.id == id) else {
            return Ok(UpdateAck::new(0, 0));
        };

        let before = serde_json::to_value(&*post)?;
        post.merge(&fields)?;
        let modified = before != serde_json::to_value(&*post)?;

        Ok(UpdateAck::new(1, u64::from(modified)))
    }

    async fn delete_post(&self, id: RecordId) -> Result<DeleteAck, AppError> {
        let mut collections = self.collections.write().await;
        let before = collections.posts.len();
        collections.posts.retain(|post| post.id != id);
        Ok(DeleteAck::new((before - collections.posts.len()) as u64))
    }

    async fn claim_volunteer_slot(&self, id: RecordId) -> Result<bool, AppError> {
        let mut collections = self.collections.write().await;
        match collections.posts.iter_mut().find(|post| post.id == id) {
            Some(post) if post.total_volunteer_need > 0 => {
                post.total_volunteer_need -= 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn release_volunteer_slot(&self, id: RecordId) -> Result<(), AppError> {
        let mut collections = self.collections.write().await;
        if let Some(post) = collections.posts.iter_mut().find(|post| post.id == id) {
            post.total_volunteer_need += 1;
        }
        Ok(())
    }

    async fn insert_volunteer_request(
        &self,
        request: NewVolunteerRequest,
    ) -> Result<InsertAck, AppError> {
        let id = RecordId::new();
        self.collections
            .write()
            .await
            .volunteer_requests
            .push(VolunteerRequest::from_new(id, request));
        Ok(InsertAck::new(id))
    }

    async fn list_volunteer_requests_by_organizer(
        &self,
        email: &str,
    ) -> Result<Vec<VolunteerRequest>, AppError> {
        let collections = self.collections.read().await;
        Ok(collections
            .volunteer_requests
            .iter()
            .filter(|request| request.organizer_email.as_deref() == Some(email))
            .cloned()
            .collect())
    }

    async fn delete_volunteer_request(&self, id: RecordId) -> Result<DeleteAck, AppError> {
        let mut collections = self.collections.write().await;
        let before = collections.volunteer_requests.len();
        collections.volunteer_requests.retain(|request| request.id != id);
        Ok(DeleteAck::new(
            (before - collections.volunteer_requests.len()) as u64,
        ))
    }

    async fn close(&self) {}
}
