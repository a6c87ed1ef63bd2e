//! MongoDB-backed store.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, Document};
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{Store, POSTS_COLLECTION, VOLUNTEER_REQUESTS_COLLECTION};
use crate::errors::AppError;
use crate::models::{
    DeleteAck, InsertAck, NewPost, NewVolunteerRequest, Post, RecordId, UpdateAck,
    VolunteerRequest,
};

/// Store backed by a single long-lived MongoDB client.
///
/// The driver pools connections internally, so one client is shared by every request.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    posts: Collection<Document>,
    volunteer_requests: Collection<Document>,
}

impl MongoStore {
    /// Connect with the Stable API v1 and ping the deployment.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self, AppError> {
        let mut options = ClientOptions::parse(uri).await?;
        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );
        let client = Client::with_options(options)?;

        let store = Self::new(client, db_name);
        store.ping().await?;
        tracing::info!("Pinged your deployment. Connected to MongoDB database {}", db_name);

        Ok(store)
    }

    pub fn new(client: Client, db_name: &str) -> Self {
        let db = client.database(db_name);
        Self {
            posts: db.collection(POSTS_COLLECTION),
            volunteer_requests: db.collection(VOLUNTEER_REQUESTS_COLLECTION),
            client,
        }
    }

    async fn find_all<T: DeserializeOwned>(
        collection: &Collection<Document>,
        filter: Document,
    ) -> Result<Vec<T>, AppError> {
        let documents: Vec<Document> = collection.find(filter).await?.try_collect().await?;
        documents.into_iter().map(decode).collect()
    }

    async fn insert(
        collection: &Collection<Document>,
        document: Document,
    ) -> Result<InsertAck, AppError> {
        let result = collection.insert_one(document).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::Internal("store returned a non-ObjectId identifier".into()))?;
        Ok(InsertAck::new(id.into()))
    }
}

fn decode<T: DeserializeOwned>(document: Document) -> Result<T, AppError> {
    Ok(bson::from_document(document)?)
}

fn by_id(id: RecordId) -> Document {
    doc! { "_id": id.object_id() }
}

#[async_trait]
impl Store for MongoStore {
    async fn ping(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    async fn insert_post(&self, post: NewPost) -> Result<InsertAck, AppError> {
        Self::insert(&self.posts, bson::to_document(&post)?).await
    }

    async fn list_posts(&self) -> Result<Vec<Post>, AppError> {
        Self::find_all(&self.posts, doc! {}).await
    }

    async fn list_posts_by_deadline(&self, limit: usize) -> Result<Vec<Post>, AppError> {
        let documents: Vec<Document> = self
            .posts
            .find(doc! {})
            .sort(doc! { "deadline": 1 })
            .limit(limit as i64)
            .await?
            .try_collect()
            .await?;
        documents.into_iter().map(decode).collect()
    }

    async fn get_post(&self, id: RecordId) -> Result<Option<Post>, AppError> {
        self.posts.find_one(by_id(id)).await?.map(decode).transpose()
    }

    async fn list_posts_by_organizer(&self, email: &str) -> Result<Vec<Post>, AppError> {
        Self::find_all(&self.posts, doc! { "organizer_email": email }).await
    }

    async fn update_post(
        &self,
        id: RecordId,
        fields: Map<String, Value>,
    ) -> Result<UpdateAck, AppError> {
        if fields.is_empty() {
            // `$set` rejects an empty document on older servers
            let matched = self.posts.count_documents(by_id(id)).await?;
            return Ok(UpdateAck::new(matched, 0));
        }

        let set = bson::to_document(&fields)?;
        let result = self
            .posts
            .update_one(by_id(id), doc! { "$set": set })
            .await?;
        Ok(UpdateAck::new(result.matched_count, result.modified_count))
    }

    async fn delete_post(&self, id: RecordId) -> Result<DeleteAck, AppError> {
        let result = self.posts.delete_one(by_id(id)).await?;
        Ok(DeleteAck::new(result.deleted_count))
    }

    async fn claim_volunteer_slot(&self, id: RecordId) -> Result<bool, AppError> {
        let claimed = self
            .posts
            .find_one_and_update(
                doc! { "_id": id.object_id(), "total_volunteer_need": { "$gt": 0 } },
                doc! { "$inc": { "total_volunteer_need": -1 } },
            )
            .await?;
        Ok(claimed.is_some())
    }

    async fn release_volunteer_slot(&self, id: RecordId) -> Result<(), AppError> {
        self.posts
            .update_one(by_id(id), doc! { "$inc": { "total_volunteer_need": 1 } })
            .await?;
        Ok(())
    }

    async fn insert_volunteer_request(
        &self,
        request: NewVolunteerRequest,
    ) -> Result<InsertAck, AppError> {
        Self::insert(&self.volunteer_requests, bson::to_document(&request)?).await
    }

    async fn list_volunteer_requests_by_organizer(
        &self,
        email: &str,
    ) -> Result<Vec<VolunteerRequest>, AppError> {
        Self::find_all(&self.volunteer_requests, doc! { "organizer_email": email }).await
    }

    async fn delete_volunteer_request(&self, id: RecordId) -> Result<DeleteAck, AppError> {
        let result = self.volunteer_requests.delete_one(by_id(id)).await?;
        Ok(DeleteAck::new(result.deleted_count))
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
        tracing::info!("MongoDB client shut down");
    }
}
