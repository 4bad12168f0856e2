use serde::{Deserialize, Serialize};

use crate::store::{Document, StoreError};

/// Announcement as persisted. Date fields hold the client-supplied strings
/// verbatim; they are validated on write, never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub expiration_date: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub created_at: String,
}

impl Announcement {
    pub fn from_document(document: Document) -> Result<Self, StoreError> {
        Ok(serde_json::from_value(serde_json::Value::Object(document))?)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateAnnouncementRequest {
    pub message: String,
    pub start_date: Option<String>,
    pub expiration_date: String,
    pub created_by: String,
}

/// Partial update; `None` leaves the stored field untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAnnouncementRequest {
    pub message: Option<String>,
    pub start_date: Option<String>,
    pub expiration_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteConfirmation {
    pub message: String,
}

impl Default for DeleteConfirmation {
    fn default() -> Self {
        Self {
            message: "Announcement deleted successfully".to_string(),
        }
    }
}
