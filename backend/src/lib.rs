// Library exports for the API binary, tooling binaries and tests
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use config::Config;
use services::announcements::AnnouncementService;
use services::authorizer::TeacherDirectory;
use store::RecordStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub announcements: AnnouncementService,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire the service against `store`, authorizing requesters through the
    /// teachers collection of the same store.
    pub fn new(store: Arc<dyn RecordStore>, config: Arc<Config>) -> Self {
        let authorizer = Arc::new(TeacherDirectory::new(store.clone()));
        let announcements = AnnouncementService::new(store.clone(), authorizer);
        Self {
            store,
            announcements,
            config,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::metrics::metrics_handler))
        .route("/announcements/active", get(routes::announcements::list_active))
        .route(
            "/announcements",
            get(routes::announcements::list_all).post(routes::announcements::create_announcement),
        )
        .route(
            "/announcements/{id}",
            put(routes::announcements::update_announcement)
                .delete(routes::announcements::delete_announcement),
        )
        .with_state(state)
}
