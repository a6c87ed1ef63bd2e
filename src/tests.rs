//! Integration tests for the volunteer backend.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde_json::{json, Map, Value};

use crate::config::Config;
use crate::db::{MemoryStore, Store};
use crate::errors::AppError;
use crate::models::{
    DeleteAck, InsertAck, NewPost, NewVolunteerRequest, Post, RecordId, UpdateAck,
    VolunteerRequest,
};
use crate::{create_router, AppState};

const ORGANIZER: &str = "org@example.com";

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new())).await
    }

    async fn with_store(store: Arc<dyn Store>) -> Self {
        let app = create_router(AppState::new(store, Config::for_tests()));

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestFixture {
            client: Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn add_post(&self, body: Value) -> String {
        let resp = self
            .client
            .post(self.url("/add-post"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        body["insertedId"].as_str().unwrap().to_string()
    }

    async fn get_post(&self, id: &str) -> Value {
        let resp = self
            .client
            .get(self.url(&format!("/post-details/{}", id)))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        resp.json().await.unwrap()
    }

    async fn volunteer(&self, body: Value) -> Response {
        self.client
            .post(self.url("/be-volunteer"))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    /// Sign in as `email` and return the `Cookie` header value to replay.
    async fn session_cookie(&self, email: &str) -> String {
        let resp = self
            .client
            .post(self.url("/jwt"))
            .json(&json!({ "email": email }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let set_cookie = set_cookie_header(&resp);
        set_cookie.split(';').next().unwrap().to_string()
    }
}

fn set_cookie_header(resp: &Response) -> String {
    resp.headers()
        .get(header::SET_COOKIE)
        .expect("missing Set-Cookie")
        .to_str()
        .unwrap()
        .to_string()
}

fn beach_cleanup() -> Value {
    json!({
        "post_title": "Beach Cleanup",
        "description": "Help clean the shore",
        "organizer_email": ORGANIZER,
        "deadline": "2025-07-01T09:00:00Z",
        "total_volunteer_need": "3"
    })
}

#[tokio::test]
async fn test_root_ready() {
    let fixture = TestFixture::new().await;

    let resp = fixture.client.get(fixture.url("/")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "Hello World, Server is Ready");
}

#[tokio::test]
async fn test_cors_headers_on_responses() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/posts"))
        .header(header::ORIGIN, "https://volunteer.example")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

// ==================== POSTS ====================

#[tokio::test]
async fn test_add_post_and_fetch() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/add-post"))
        .json(&beach_cleanup())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let ack: Value = resp.json().await.unwrap();
    assert_eq!(ack["acknowledged"], true);
    let id = ack["insertedId"].as_str().unwrap();

    let post = fixture.get_post(id).await;
    assert_eq!(post["_id"], id);
    assert_eq!(post["post_title"], "Beach Cleanup");
    assert_eq!(post["description"], "Help clean the shore");
    assert_eq!(post["total_volunteer_need"], 3);
    assert_eq!(post["deadline"], "2025-07-01T09:00:00.000Z");
}

#[tokio::test]
async fn test_add_post_accepts_datetime_local_deadline() {
    let fixture = TestFixture::new().await;

    let id = fixture
        .add_post(json!({
            "post_title": "Park Planting",
            "description": "Plant trees",
            "deadline": "2025-07-01T09:00"
        }))
        .await;

    let post = fixture.get_post(&id).await;
    assert_eq!(post["post_title"], "Park Planting");
    assert_eq!(post["deadline"], "2025-07-01T09:00:00.000Z");
}

#[tokio::test]
async fn test_add_post_keeps_unrecognized_deadline() {
    let fixture = TestFixture::new().await;

    let id = fixture
        .add_post(json!({
            "post_title": "Park Planting",
            "description": "Plant trees",
            "deadline": "07/01/2025"
        }))
        .await;

    let post = fixture.get_post(&id).await;
    assert_eq!(post["deadline"], "07/01/2025");

    let resp = fixture
        .client
        .get(fixture.url("/limited-posts"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let posts: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(posts.len(), 1);
}

#[tokio::test]
async fn test_add_post_passes_through_extra_fields() {
    let fixture = TestFixture::new().await;

    let mut body = beach_cleanup();
    body["thumbnail"] = json!("https://img.example/beach.png");
    body["category"] = json!("environment");
    let id = fixture.add_post(body).await;

    let post = fixture.get_post(&id).await;
    assert_eq!(post["thumbnail"], "https://img.example/beach.png");
    assert_eq!(post["category"], "environment");
}

#[tokio::test]
async fn test_add_post_ignores_client_identifier() {
    let fixture = TestFixture::new().await;

    let forged = RecordId::new().to_string();
    let mut body = beach_cleanup();
    body["_id"] = json!(forged);
    let id = fixture.add_post(body).await;

    assert_ne!(id, forged);
    assert_eq!(fixture.get_post(&id).await["_id"], id);
}

#[tokio::test]
async fn test_add_post_requires_title_and_description() {
    let fixture = TestFixture::new().await;

    for body in [
        json!({ "description": "Help clean the shore" }),
        json!({ "post_title": "Beach Cleanup" }),
        json!({ "post_title": "", "description": "Help clean the shore" }),
    ] {
        let resp = fixture
            .client
            .post(fixture.url("/add-post"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    let resp = fixture
        .client
        .post(fixture.url("/add-post"))
        .header(header::CONTENT_TYPE, "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let posts: Value = fixture
        .client
        .get(fixture.url("/posts"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(posts.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_add_post_coerces_volunteer_need() {
    let fixture = TestFixture::new().await;

    for (raw, expected) in [
        (json!("lots"), 0),
        (json!(-4), 0),
        (json!("7 people"), 7),
        (json!(2.8), 2),
        (Value::Null, 0),
    ] {
        let mut body = beach_cleanup();
        body["total_volunteer_need"] = raw;
        let id = fixture.add_post(body).await;
        assert_eq!(fixture.get_post(&id).await["total_volunteer_need"], expected);
    }
}

#[tokio::test]
async fn test_list_posts() {
    let fixture = TestFixture::new().await;

    fixture.add_post(beach_cleanup()).await;
    let mut other = beach_cleanup();
    other["post_title"] = json!("Food Drive");
    fixture.add_post(other).await;

    let resp = fixture.client.get(fixture.url("/posts")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let posts: Value = resp.json().await.unwrap();
    let titles: Vec<&str> = posts
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["post_title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Beach Cleanup", "Food Drive"]);
}

#[tokio::test]
async fn test_limited_posts_sorted_and_capped() {
    let fixture = TestFixture::new().await;

    for day in [9, 3, 7, 1, 8, 5, 2, 6] {
        let mut body = beach_cleanup();
        body["post_title"] = json!(format!("day {}", day));
        body["deadline"] = json!(format!("2025-08-0{}", day));
        fixture.add_post(body).await;
    }

    let resp = fixture
        .client
        .get(fixture.url("/limited-posts"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let posts: Value = resp.json().await.unwrap();
    let deadlines: Vec<&str> = posts
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["deadline"].as_str().unwrap())
        .collect();

    assert_eq!(deadlines.len(), 6);
    assert!(deadlines.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(deadlines[0], "2025-08-01T00:00:00.000Z");
    assert_eq!(deadlines[5], "2025-08-07T00:00:00.000Z");
}

#[tokio::test]
async fn test_post_details_missing_is_null() {
    let fixture = TestFixture::new().await;

    let post = fixture.get_post(&RecordId::new().to_string()).await;
    assert!(post.is_null());
}

#[tokio::test]
async fn test_post_details_malformed_id() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/post-details/not-an-object-id"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_update_my_post_merges_and_keeps_identity() {
    let fixture = TestFixture::new().await;
    let id = fixture.add_post(beach_cleanup()).await;

    let resp = fixture
        .client
        .put(fixture.url(&format!("/update-my-post/{}", id)))
        .json(&json!({
            "_id": RecordId::new().to_string(),
            "description": "Bring gloves",
            "total_volunteer_need": "10"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let ack: Value = resp.json().await.unwrap();
    assert_eq!(ack["matchedCount"], 1);
    assert_eq!(ack["modifiedCount"], 1);

    let post = fixture.get_post(&id).await;
    assert_eq!(post["_id"], id);
    assert_eq!(post["post_title"], "Beach Cleanup");
    assert_eq!(post["description"], "Bring gloves");
    assert_eq!(post["total_volunteer_need"], 10);
}

#[tokio::test]
async fn test_update_unknown_post_matches_nothing() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .put(fixture.url(&format!("/update-my-post/{}", RecordId::new())))
        .json(&json!({ "description": "Bring gloves" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let ack: Value = resp.json().await.unwrap();
    assert_eq!(ack["matchedCount"], 0);
    assert_eq!(ack["modifiedCount"], 0);
}

#[tokio::test]
async fn test_update_rejects_blank_title() {
    let fixture = TestFixture::new().await;
    let id = fixture.add_post(beach_cleanup()).await;

    let resp = fixture
        .client
        .put(fixture.url(&format!("/update-my-post/{}", id)))
        .json(&json!({ "post_title": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    assert_eq!(fixture.get_post(&id).await["post_title"], "Beach Cleanup");
}

#[tokio::test]
async fn test_delete_then_get_is_null() {
    let fixture = TestFixture::new().await;
    let id = fixture.add_post(beach_cleanup()).await;

    let resp = fixture
        .client
        .delete(fixture.url(&format!("/delete-my-post/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let ack: Value = resp.json().await.unwrap();
    assert_eq!(ack["deletedCount"], 1);

    assert!(fixture.get_post(&id).await.is_null());

    let again: Value = fixture
        .client
        .delete(fixture.url(&format!("/delete-my-post/{}", id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(again["deletedCount"], 0);
}

// ==================== VOLUNTEERING ====================

#[tokio::test]
async fn test_be_volunteer_until_full() {
    let fixture = TestFixture::new().await;
    let id = fixture.add_post(beach_cleanup()).await;

    for remaining in [2, 1, 0] {
        let resp = fixture
            .volunteer(json!({
                "post_id": id,
                "organizer_email": ORGANIZER,
                "volunteer_email": "sam@example.com",
                "volunteer_name": "Sam"
            }))
            .await;
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Volunteer request submitted");
        assert_eq!(fixture.get_post(&id).await["total_volunteer_need"], remaining);
    }

    let resp = fixture
        .volunteer(json!({ "post_id": id, "organizer_email": ORGANIZER }))
        .await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "No more volunteers needed");

    let cookie = fixture.session_cookie(ORGANIZER).await;
    let requests: Value = fixture
        .client
        .get(fixture.url(&format!("/be-volunteer-posts?userEmail={}", ORGANIZER)))
        .header(header::COOKIE, cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(requests.as_array().unwrap().len(), 3);
    assert_eq!(requests[0]["post_id"], id);
    assert_eq!(requests[0]["volunteer_name"], "Sam");
}

#[tokio::test]
async fn test_be_volunteer_when_none_needed() {
    let fixture = TestFixture::new().await;
    let mut body = beach_cleanup();
    body["total_volunteer_need"] = json!(0);
    let id = fixture.add_post(body).await;
    let before = fixture.get_post(&id).await;

    let resp = fixture
        .volunteer(json!({ "post_id": id, "organizer_email": ORGANIZER }))
        .await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NO_VOLUNTEERS_NEEDED");

    assert_eq!(fixture.get_post(&id).await, before);

    let cookie = fixture.session_cookie(ORGANIZER).await;
    let requests: Value = fixture
        .client
        .get(fixture.url(&format!("/be-volunteer-posts?userEmail={}", ORGANIZER)))
        .header(header::COOKIE, cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(requests.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_be_volunteer_unknown_post() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .volunteer(json!({ "post_id": RecordId::new().to_string() }))
        .await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "No more volunteers needed");
}

#[tokio::test]
async fn test_be_volunteer_requires_target() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .volunteer(json!({ "volunteer_email": "sam@example.com" }))
        .await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_be_volunteer_accepts_legacy_id_field() {
    let fixture = TestFixture::new().await;
    let id = fixture.add_post(beach_cleanup()).await;

    let resp = fixture
        .volunteer(json!({ "_id": id, "organizer_email": ORGANIZER }))
        .await;
    assert_eq!(resp.status(), 200);
    assert_eq!(fixture.get_post(&id).await["total_volunteer_need"], 2);

    let cookie = fixture.session_cookie(ORGANIZER).await;
    let requests: Value = fixture
        .client
        .get(fixture.url(&format!("/be-volunteer-posts?userEmail={}", ORGANIZER)))
        .header(header::COOKIE, cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(requests[0]["post_id"], id);
    assert_ne!(requests[0]["_id"], id);
}

#[tokio::test]
async fn test_concurrent_volunteers_never_overbook() {
    let fixture = Arc::new(TestFixture::new().await);
    let id = fixture.add_post(beach_cleanup()).await;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let fixture = fixture.clone();
        let id = id.clone();
        handles.push(tokio::spawn(async move {
            fixture
                .volunteer(json!({ "post_id": id, "organizer_email": ORGANIZER }))
                .await
                .status()
                .as_u16()
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            200 => accepted += 1,
            400 => {}
            other => panic!("unexpected status {}", other),
        }
    }

    assert_eq!(accepted, 3);
    assert_eq!(fixture.get_post(&id).await["total_volunteer_need"], 0);
}

#[tokio::test]
async fn test_failed_request_insert_releases_slot() {
    let fixture = TestFixture::with_store(Arc::new(FailingRequestStore::default())).await;
    let id = fixture.add_post(beach_cleanup()).await;

    let resp = fixture
        .volunteer(json!({ "post_id": id, "organizer_email": ORGANIZER }))
        .await;
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Server Error");
    assert_eq!(body["error"]["message"], "simulated write failure");

    assert_eq!(fixture.get_post(&id).await["total_volunteer_need"], 3);
}

#[tokio::test]
async fn test_delete_be_volunteer_post() {
    let fixture = TestFixture::new().await;
    let id = fixture.add_post(beach_cleanup()).await;
    fixture
        .volunteer(json!({ "post_id": id, "organizer_email": ORGANIZER }))
        .await;

    let cookie = fixture.session_cookie(ORGANIZER).await;
    let list_url = fixture.url(&format!("/be-volunteer-posts?userEmail={}", ORGANIZER));
    let requests: Value = fixture
        .client
        .get(&list_url)
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let request_id = requests[0]["_id"].as_str().unwrap().to_string();

    let resp = fixture
        .client
        .delete(fixture.url(&format!("/delete-be-volunteer-post/{}", request_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let ack: Value = resp.json().await.unwrap();
    assert_eq!(ack["deletedCount"], 1);

    let requests: Value = fixture
        .client
        .get(&list_url)
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(requests.as_array().unwrap().is_empty());
}

// ==================== SESSIONS ====================

#[tokio::test]
async fn test_issue_session_sets_cookie() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/jwt"))
        .json(&json!({ "email": ORGANIZER }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let set_cookie = set_cookie_header(&resp);
    assert!(set_cookie.starts_with("token="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Strict"));
    assert!(!set_cookie.contains("Secure"));

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "success": true }));
}

#[tokio::test]
async fn test_issue_session_requires_email() {
    let fixture = TestFixture::new().await;

    for body in [json!({}), json!({ "email": "" }), json!({ "email": 42 })] {
        let resp = fixture
            .client
            .post(fixture.url("/jwt"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        assert!(resp.headers().get(header::SET_COOKIE).is_none());
    }
}

#[tokio::test]
async fn test_issue_session_accepts_any_email_claim() {
    let fixture = TestFixture::new().await;

    let cookie = fixture.session_cookie("volunteer-hub-user").await;
    assert!(cookie.starts_with("token="));
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let fixture = TestFixture::new().await;

    // Idempotent: works with or without an active session
    for _ in 0..2 {
        let resp = fixture
            .client
            .post(fixture.url("/logout"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);

        let set_cookie = set_cookie_header(&resp);
        assert!(set_cookie.starts_with("token=;"));
        assert!(set_cookie.contains("Max-Age=0"));
        assert!(set_cookie.contains("HttpOnly"));

        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["success"], true);
    }
}

#[tokio::test]
async fn test_my_posts_requires_session() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url(&format!("/my-posts?userEmail={}", ORGANIZER)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let resp = fixture
        .client
        .get(fixture.url(&format!("/my-posts?userEmail={}", ORGANIZER)))
        .header(header::COOKIE, "token=forged.token.value")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_my_posts_filters_by_owner() {
    let fixture = TestFixture::new().await;

    fixture.add_post(beach_cleanup()).await;
    let mut other = beach_cleanup();
    other["organizer_email"] = json!("someone@example.com");
    fixture.add_post(other).await;

    let cookie = fixture.session_cookie(ORGANIZER).await;
    let resp = fixture
        .client
        .get(fixture.url(&format!("/my-posts?userEmail={}", ORGANIZER)))
        .header(header::COOKIE, cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let posts: Value = resp.json().await.unwrap();
    let posts = posts.as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["organizer_email"], ORGANIZER);
}

#[tokio::test]
async fn test_my_posts_rejects_other_identity() {
    let fixture = TestFixture::new().await;

    let cookie = fixture.session_cookie(ORGANIZER).await;
    for path in [
        "/my-posts?userEmail=someone@example.com",
        "/be-volunteer-posts?userEmail=someone@example.com",
    ] {
        let resp = fixture
            .client
            .get(fixture.url(path))
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 403);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"]["code"], "FORBIDDEN");
    }
}

#[tokio::test]
async fn test_my_posts_requires_email_param() {
    let fixture = TestFixture::new().await;

    let cookie = fixture.session_cookie(ORGANIZER).await;
    for path in ["/my-posts", "/my-posts?userEmail=", "/be-volunteer-posts"] {
        let resp = fixture
            .client
            .get(fixture.url(path))
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["message"], "User email is required");
    }
}

// ==================== HELPERS ====================

/// Memory store whose volunteer-request inserts always fail.
#[derive(Default)]
struct FailingRequestStore {
    inner: MemoryStore,
}

#[async_trait]
impl Store for FailingRequestStore {
    async fn ping(&self) -> Result<(), AppError> {
        self.inner.ping().await
    }

    async fn insert_post(&self, post: NewPost) -> Result<InsertAck, AppError> {
        self.inner.insert_post(post).await
    }

    async fn list_posts(&self) -> Result<Vec<Post>, AppError> {
        self.inner.list_posts().await
    }

    async fn list_posts_by_deadline(&self, limit: usize) -> Result<Vec<Post>, AppError> {
        self.inner.list_posts_by_deadline(limit).await
    }

    async fn get_post(&self, id: RecordId) -> Result<Option<Post>, AppError> {
        self.inner.get_post(id).await
    }

    async fn list_posts_by_organizer(&self, email: &str) -> Result<Vec<Post>, AppError> {
        self.inner.list_posts_by_organizer(email).await
    }

    async fn update_post(
        &self,
        id: RecordId,
        fields: Map<String, Value>,
    ) -> Result<UpdateAck, AppError> {
        self.inner.update_post(id, fields).await
    }

    async fn delete_post(&self, id: RecordId) -> Result<DeleteAck, AppError> {
        self.inner.delete_post(id).await
    }

    async fn claim_volunteer_slot(&self, id: RecordId) -> Result<bool, AppError> {
        self.inner.claim_volunteer_slot(id).await
    }

    async fn release_volunteer_slot(&self, id: RecordId) -> Result<(), AppError> {
        self.inner.release_volunteer_slot(id).await
    }

    async fn insert_volunteer_request(
        &self,
        _request: NewVolunteerRequest,
    ) -> Result<InsertAck, AppError> {
        Err(AppError::Database("simulated write failure".to_string()))
    }

    async fn list_volunteer_requests_by_organizer(
        &self,
        email: &str,
    ) -> Result<Vec<VolunteerRequest>, AppError> {
        self.inner.list_volunteer_requests_by_organizer(email).await
    }

    async fn delete_volunteer_request(&self, id: RecordId) -> Result<DeleteAck, AppError> {
        self.inner.delete_volunteer_request(id).await
    }

    async fn close(&self) {}
}
