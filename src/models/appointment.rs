use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::{decode_document, encode_document, not_blank, storable_date, Record};
use crate::db::Document;
use crate::error::AppError;
use crate::utils::temporal;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AppointmentCreate {
    #[validate(custom = "not_blank")]
    pub patient_name: String,
    #[validate(custom = "not_blank")]
    pub patient_phone: String,
    #[validate(custom = "not_blank")]
    pub doctor_name: String,
    #[validate(custom = "not_blank")]
    pub specialty: String,
    #[validate(custom = "storable_date")]
    pub appointment_date: NaiveDate,
    #[validate(custom = "not_blank")]
    pub appointment_time: String,
    #[validate(custom = "not_blank")]
    pub reason: String,
}

/// Partial update: a `None` field is left untouched, never cleared.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct AppointmentUpdate {
    #[validate(custom = "not_blank")]
    pub patient_name: Option<String>,
    #[validate(custom = "not_blank")]
    pub patient_phone: Option<String>,
    #[validate(custom = "not_blank")]
    pub doctor_name: Option<String>,
    #[validate(custom = "not_blank")]
    pub specialty: Option<String>,
    #[validate(custom = "storable_date")]
    pub appointment_date: Option<NaiveDate>,
    #[validate(custom = "not_blank")]
    pub appointment_time: Option<String>,
    #[validate(custom = "not_blank")]
    pub reason: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub notes: Option<String>,
}

impl AppointmentUpdate {
    /// Storage fields for the values that are present, temporal ones encoded.
    pub fn into_fields(self) -> Document {
        let mut fields = Document::new();
        let mut set = |name: &str, value: Option<String>| {
            if let Some(value) = value {
                fields.insert(name.to_owned(), Value::String(value));
            }
        };
        set("patient_name", self.patient_name);
        set("patient_phone", self.patient_phone);
        set("doctor_name", self.doctor_name);
        set("specialty", self.specialty);
        set(
            "appointment_date",
            self.appointment_date.as_ref().map(temporal::encode),
        );
        set("appointment_time", self.appointment_time);
        set("reason", self.reason);
        set("status", self.status.map(|status| status.as_str().to_owned()));
        set("notes", self.notes);
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalAppointment {
    pub id: String,
    pub patient_name: String,
    pub patient_phone: String,
    pub doctor_name: String,
    pub specialty: String,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub reason: String,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MedicalAppointment {
    pub fn new(id: String, input: AppointmentCreate, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            patient_name: input.patient_name,
            patient_phone: input.patient_phone,
            doctor_name: input.doctor_name,
            specialty: input.specialty,
            appointment_date: input.appointment_date,
            appointment_time: input.appointment_time,
            reason: input.reason,
            status: AppointmentStatus::default(),
            notes: None,
            created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AppointmentDocument {
    id: String,
    patient_name: String,
    patient_phone: String,
    doctor_name: String,
    specialty: String,
    appointment_date: String,
    appointment_time: String,
    reason: String,
    status: AppointmentStatus,
    #[serde(default)]
    notes: Option<String>,
    created_at: String,
}

impl Record for MedicalAppointment {
    const COLLECTION: &'static str = "appointments";
    const NAME: &'static str = "Appointment";

    fn id(&self) -> &str {
        &self.id
    }

    fn to_document(&self) -> Result<Document, AppError> {
        encode_document(&AppointmentDocument {
            id: self.id.clone(),
            patient_name: self.patient_name.clone(),
            patient_phone: self.patient_phone.clone(),
            doctor_name: self.doctor_name.clone(),
            specialty: self.specialty.clone(),
            appointment_date: temporal::encode(&self.appointment_date),
            appointment_time: self.appointment_time.clone(),
            reason: self.reason.clone(),
            status: self.status,
            notes: self.notes.clone(),
            created_at: temporal::encode(&self.created_at),
        })
    }

    fn from_document(document: Document) -> Result<Self, AppError> {
        let stored: AppointmentDocument = decode_document(document)?;
        Ok(Self {
            appointment_date: temporal::decode(&stored.appointment_date)?,
            created_at: temporal::decode(&stored.created_at)?,
            id: stored.id,
            patient_name: stored.patient_name,
            patient_phone: stored.patient_phone,
            doctor_name: stored.doctor_name,
            specialty: stored.specialty,
            appointment_time: stored.appointment_time,
            reason: stored.reason,
            status: stored.status,
            notes: stored.notes,
        })
    }
}
