//! Volunteer Hub Backend
//!
//! REST backend for volunteer posts and volunteer requests, stored in MongoDB,
//! with cookie-carried session tokens for owner-scoped listings.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::SessionCodec;
use config::Config;
use db::Store;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub sessions: Arc<SessionCodec>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            sessions: Arc::new(SessionCodec::new(&config.token_secret)),
            config: Arc::new(config),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.app_env.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Volunteer Hub Backend");
    tracing::info!("Environment: {:?}", config.app_env);
    tracing::info!("Database: {}", config.db_name);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Connect once; the handle is shared by every request
    let store = db::init_store(&config).await?;

    let bind_addr = config.bind_addr;
    let state = AppState::new(store.clone(), config);

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Server is listening on port: {}", bind_addr.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    // Identity-scoped listings
    let session_routes = Router::new()
        .route("/my-posts", get(api::list_my_posts))
        .route("/be-volunteer-posts", get(api::list_be_volunteer_posts))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    let public_routes = Router::new()
        .route("/", get(api::root))
        // Session
        .route("/jwt", post(api::issue_session))
        .route("/logout", post(api::clear_session))
        // Posts
        .route("/add-post", post(api::add_post))
        .route("/posts", get(api::list_posts))
        .route("/limited-posts", get(api::list_limited_posts))
        .route("/post-details/{id}", get(api::get_post))
        .route("/update-my-post/{id}", put(api::update_my_post))
        .route("/delete-my-post/{id}", delete(api::delete_my_post))
        // Volunteering
        .route("/be-volunteer", post(api::be_volunteer))
        .route(
            "/delete-be-volunteer-post/{id}",
            delete(api::delete_be_volunteer_post),
        );

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy.
///
/// Without an allowlist any origin may call the API, but credentials (the
/// session cookie) are only allowed for explicitly listed origins.
fn cors_layer(config: &Config) -> CorsLayer {
    let cors = if config.cors_allowed_origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        let allowed: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_credentials(true)
    };

    cors.allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ])
    .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
}

/// Resolve on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests;
