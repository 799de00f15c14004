use chrono::{DateTime, Utc};
use serde::Serialize;

/// A static piece of health advice. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthTip {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
