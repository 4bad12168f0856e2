use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::{
    error::AnnouncementError,
    models::announcement::{
        Announcement, CreateAnnouncementRequest, DeleteConfirmation, UpdateAnnouncementRequest,
    },
    services::{
        active_window::ActiveWindow,
        authorizer::Authorizer,
        timestamp::{parse_iso_datetime, parse_utc},
    },
    store::{Document, RecordStore, ANNOUNCEMENTS},
};

pub type Clock = fn() -> DateTime<Utc>;

/// Announcement CRUD over an injected store. Each call is one independent
/// unit of work; the authorization check and the write are not wrapped in a
/// transaction.
#[derive(Clone)]
pub struct AnnouncementService {
    store: Arc<dyn RecordStore>,
    authorizer: Arc<dyn Authorizer>,
    clock: Clock,
}

impl AnnouncementService {
    pub fn new(store: Arc<dyn RecordStore>, authorizer: Arc<dyn Authorizer>) -> Self {
        Self {
            store,
            authorizer,
            clock: Utc::now,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Public listing: stored records inside their active window right now.
    /// Records with unparseable dates are left out, never reported as errors.
    pub async fn list_active(&self) -> Result<Vec<Document>, AnnouncementError> {
        let now = (self.clock)();
        let records = self.store.find_all(ANNOUNCEMENTS).await?;
        let total = records.len();

        let active: Vec<Document> = records
            .into_iter()
            .filter(|doc| ActiveWindow::of_document(doc).is_active(now))
            .collect();

        debug!("{} of {} announcement(s) active", active.len(), total);
        Ok(active)
    }

    /// Every stored record, malformed or not.
    pub async fn list_all(&self, requesting_username: &str) -> Result<Vec<Document>, AnnouncementError> {
        self.authorize(requesting_username).await?;
        Ok(self.store.find_all(ANNOUNCEMENTS).await?)
    }

    pub async fn create(&self, req: CreateAnnouncementRequest) -> Result<Announcement, AnnouncementError> {
        self.authorize(&req.created_by).await?;

        let now = (self.clock)();
        validate_expiration(&req.expiration_date, now)?;
        // An empty start date means "none" and is stored as sent.
        if let Some(start_date) = req.start_date.as_deref().filter(|s| !s.is_empty()) {
            validate_start(start_date)?;
        }

        let created_at = now.to_rfc3339();
        let mut record = Document::new();
        record.insert("message".into(), json!(req.message));
        record.insert("start_date".into(), json!(req.start_date));
        record.insert("expiration_date".into(), json!(req.expiration_date));
        record.insert("created_by".into(), json!(req.created_by));
        record.insert("created_at".into(), json!(created_at));
        let id = self.store.insert(ANNOUNCEMENTS, record).await?;

        info!("Announcement {} created by {}", id, req.created_by);
        Ok(Announcement {
            id,
            message: req.message,
            start_date: req.start_date,
            expiration_date: req.expiration_date,
            created_by: req.created_by,
            created_at,
        })
    }

    /// Partial update. Every provided field is validated before anything is
    /// written, so a rejected request leaves the record untouched.
    pub async fn update(
        &self,
        id: &str,
        requesting_username: &str,
        req: UpdateAnnouncementRequest,
    ) -> Result<Announcement, AnnouncementError> {
        self.authorize(requesting_username).await?;

        let now = (self.clock)();
        let mut fields = Document::new();
        if let Some(message) = req.message {
            fields.insert("message".into(), Value::String(message));
        }
        if let Some(start_date) = req.start_date {
            validate_start(&start_date)?;
            fields.insert("start_date".into(), Value::String(start_date));
        }
        if let Some(expiration_date) = req.expiration_date {
            validate_expiration(&expiration_date, now)?;
            fields.insert("expiration_date".into(), Value::String(expiration_date));
        }

        let existing = self
            .store
            .find_one(ANNOUNCEMENTS, id)
            .await?
            .ok_or(AnnouncementError::NotFound)?;
        if fields.is_empty() {
            return Ok(Announcement::from_document(existing)?);
        }

        // Decode the merged record before writing: a stored record that cannot
        // be read back as an announcement is left as it is.
        let mut merged = existing;
        merged.extend(fields.clone());
        let updated = Announcement::from_document(merged)?;

        let changed: Vec<String> = fields.keys().cloned().collect();
        if !self.store.update(ANNOUNCEMENTS, id, fields).await? {
            return Err(AnnouncementError::NotFound);
        }
        info!(
            "Announcement {} updated by {} ({})",
            id,
            requesting_username,
            changed.join(", ")
        );
        Ok(updated)
    }

    pub async fn delete(
        &self,
        id: &str,
        requesting_username: &str,
    ) -> Result<DeleteConfirmation, AnnouncementError> {
        self.authorize(requesting_username).await?;

        if self.store.delete(ANNOUNCEMENTS, id).await? == 0 {
            return Err(AnnouncementError::NotFound);
        }

        info!("Announcement {} deleted by {}", id, requesting_username);
        Ok(DeleteConfirmation::default())
    }

    async fn authorize(&self, username: &str) -> Result<(), AnnouncementError> {
        if self.authorizer.is_valid(username).await? {
            Ok(())
        } else {
            debug!("Rejected unknown requester {:?}", username);
            Err(AnnouncementError::Unauthorized)
        }
    }
}

fn validate_expiration(value: &str, now: DateTime<Utc>) -> Result<(), AnnouncementError> {
    let expiration = parse_utc(value)
        .map_err(|_| AnnouncementError::InvalidInput("Invalid expiration date format".into()))?;
    if expiration <= now {
        return Err(AnnouncementError::InvalidInput(
            "Expiration date must be in the future".into(),
        ));
    }
    Ok(())
}

fn validate_start(value: &str) -> Result<(), AnnouncementError> {
    parse_iso_datetime(value)
        .map(|_| ())
        .map_err(|_| AnnouncementError::InvalidInput("Invalid start date format".into()))
}
