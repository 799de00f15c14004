//! Resource schemas and their storage document shapes.
//!
//! Each resource has an API-facing record with real chrono types and a
//! private document struct holding the encoded strings that actually go to
//! the store. Conversions between the two always run through
//! [`crate::utils::temporal`].

use chrono::{Datelike, NaiveDate};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use validator::ValidationError;

use crate::db::Document;
use crate::error::AppError;

pub mod appointment;
pub mod consultation;
pub mod emergency;
pub mod health_tip;

pub use appointment::{AppointmentCreate, AppointmentStatus, AppointmentUpdate, MedicalAppointment};
pub use consultation::{ConsultationCreate, ConsultationStatus, ConsultationType, MedicalConsultation};
pub use emergency::{EmergencyCreate, EmergencyReport, EmergencyStatus, Location};
pub use health_tip::HealthTip;

/// A resource persisted as one document in its own collection.
pub trait Record: Sized {
    const COLLECTION: &'static str;
    /// Human-readable name used in error messages.
    const NAME: &'static str;

    fn id(&self) -> &str;
    fn to_document(&self) -> Result<Document, AppError>;
    fn from_document(document: Document) -> Result<Self, AppError>;
}

pub(crate) fn encode_document<S: Serialize>(stored: &S) -> Result<Document, AppError> {
    match serde_json::to_value(stored)? {
        Value::Object(map) => Ok(map),
        other => Err(AppError::Internal(format!(
            "record serialised to a non-object value: {other}"
        ))),
    }
}

pub(crate) fn decode_document<S: DeserializeOwned>(document: Document) -> Result<S, AppError> {
    serde_json::from_value(Value::Object(document))
        .map_err(|err| AppError::CorruptDocument(err.to_string()))
}

/// Required text fields must contain something other than whitespace.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::Borrowed("must not be blank"));
        return Err(err);
    }
    Ok(())
}

/// Dates must fit the four-digit year encoding so stored values stay sortable.
pub(crate) fn storable_date(date: &NaiveDate) -> Result<(), ValidationError> {
    if !(0..=9999).contains(&date.year()) {
        let mut err = ValidationError::new("year_range");
        err.message = Some(Cow::Borrowed("year must be between 0 and 9999"));
        return Err(err);
    }
    Ok(())
}
