use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AnnouncementError,
    middleware::requester::Requester,
    models::announcement::{
        Announcement, CreateAnnouncementRequest, DeleteConfirmation, UpdateAnnouncementRequest,
    },
    services::metrics,
    store::Document,
    AppState,
};

fn observe<T>(
    operation: &str,
    result: Result<T, AnnouncementError>,
) -> Result<T, AnnouncementError> {
    let outcome = match &result {
        Ok(_) => "ok",
        Err(e) => e.outcome(),
    };
    metrics::record(operation, outcome);
    result
}

/// GET /announcements/active: public, announcements currently in their window.
pub async fn list_active(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, AnnouncementError> {
    observe("list_active", state.announcements.list_active().await).map(Json)
}

/// GET /announcements?username=: every stored announcement, teachers only.
pub async fn list_all(
    State(state): State<AppState>,
    Requester(username): Requester,
) -> Result<Json<Vec<Document>>, AnnouncementError> {
    observe("list_all", state.announcements.list_all(&username).await).map(Json)
}

/// POST /announcements: `created_by` in the body doubles as the credential.
pub async fn create_announcement(
    State(state): State<AppState>,
    Json(body): Json<CreateAnnouncementRequest>,
) -> Result<(StatusCode, Json<Announcement>), AnnouncementError> {
    observe("create", state.announcements.create(body).await)
        .map(|announcement| (StatusCode::CREATED, Json(announcement)))
}

/// PUT /announcements/{id}?username=
pub async fn update_announcement(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Requester(username): Requester,
    Json(body): Json<UpdateAnnouncementRequest>,
) -> Result<Json<Announcement>, AnnouncementError> {
    observe("update", state.announcements.update(&id, &username, body).await).map(Json)
}

/// DELETE /announcements/{id}?username=
pub async fn delete_announcement(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Requester(username): Requester,
) -> Result<Json<DeleteConfirmation>, AnnouncementError> {
    observe("delete", state.announcements.delete(&id, &username).await).map(Json)
}
