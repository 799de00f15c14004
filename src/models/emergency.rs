use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{decode_document, encode_document, not_blank, Record};
use crate::db::Document;
use crate::error::AppError;
use crate::utils::temporal;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmergencyStatus {
    #[default]
    Pending,
    InProgress,
    Resolved,
}

impl EmergencyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmergencyStatus::Pending => "pending",
            EmergencyStatus::InProgress => "in_progress",
            EmergencyStatus::Resolved => "resolved",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Location {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EmergencyCreate {
    #[validate(custom = "not_blank")]
    pub patient_name: String,
    #[validate(custom = "not_blank")]
    pub phone: String,
    #[validate]
    pub location: Location,
    #[validate(custom = "not_blank")]
    pub emergency_type: String,
    #[validate(custom = "not_blank")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyReport {
    pub id: String,
    pub patient_name: String,
    pub phone: String,
    pub location: Location,
    pub emergency_type: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub status: EmergencyStatus,
}

impl EmergencyReport {
    pub fn new(id: String, input: EmergencyCreate, reported_at: DateTime<Utc>) -> Self {
        Self {
            id,
            patient_name: input.patient_name,
            phone: input.phone,
            location: input.location,
            emergency_type: input.emergency_type,
            description: input.description,
            timestamp: reported_at,
            status: EmergencyStatus::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct EmergencyDocument {
    id: String,
    patient_name: String,
    phone: String,
    location: Location,
    emergency_type: String,
    description: String,
    timestamp: String,
    status: EmergencyStatus,
}

impl Record for EmergencyReport {
    const COLLECTION: &'static str = "emergencies";
    const NAME: &'static str = "Emergency";

    fn id(&self) -> &str {
        &self.id
    }

    fn to_document(&self) -> Result<Document, AppError> {
        encode_document(&EmergencyDocument {
            id: self.id.clone(),
            patient_name: self.patient_name.clone(),
            phone: self.phone.clone(),
            location: self.location.clone(),
            emergency_type: self.emergency_type.clone(),
            description: self.description.clone(),
            timestamp: temporal::encode(&self.timestamp),
            status: self.status,
        })
    }

    fn from_document(document: Document) -> Result<Self, AppError> {
        let stored: EmergencyDocument = decode_document(document)?;
        Ok(Self {
            timestamp: temporal::decode(&stored.timestamp)?,
            id: stored.id,
            patient_name: stored.patient_name,
            phone: stored.phone,
            location: stored.location,
            emergency_type: stored.emergency_type,
            description: stored.description,
            status: stored.status,
        })
    }
}
