use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use validator::Validate;

use super::{decode_document, encode_document, not_blank, Record};
use crate::db::Document;
use crate::error::AppError;
use crate::utils::temporal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsultationType {
    Virtual,
    Presential,
}

impl FromStr for ConsultationType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "virtual" => Ok(ConsultationType::Virtual),
            // The mobile client sends the Spanish label.
            "presential" | "presencial" => Ok(ConsultationType::Presential),
            _ => Err(format!(
                "invalid consultation_type {raw:?}, expected one of: virtual, presential"
            )),
        }
    }
}

impl fmt::Display for ConsultationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsultationType::Virtual => f.write_str("virtual"),
            ConsultationType::Presential => f.write_str("presential"),
        }
    }
}

impl<'de> Deserialize<'de> for ConsultationType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsultationStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ConsultationCreate {
    #[validate(custom = "not_blank")]
    pub patient_name: String,
    #[validate(custom = "not_blank")]
    pub patient_phone: String,
    #[validate(custom = "not_blank")]
    pub doctor_name: String,
    pub consultation_type: ConsultationType,
    #[validate(custom = "not_blank")]
    pub symptoms: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalConsultation {
    pub id: String,
    pub patient_name: String,
    pub patient_phone: String,
    pub doctor_name: String,
    pub consultation_type: ConsultationType,
    pub symptoms: String,
    pub consultation_date: DateTime<Utc>,
    pub status: ConsultationStatus,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
}

impl MedicalConsultation {
    pub fn new(id: String, input: ConsultationCreate, requested_at: DateTime<Utc>) -> Self {
        Self {
            id,
            patient_name: input.patient_name,
            patient_phone: input.patient_phone,
            doctor_name: input.doctor_name,
            consultation_type: input.consultation_type,
            symptoms: input.symptoms,
            consultation_date: requested_at,
            status: ConsultationStatus::default(),
            diagnosis: None,
            treatment: None,
            follow_up_date: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ConsultationDocument {
    id: String,
    patient_name: String,
    patient_phone: String,
    doctor_name: String,
    consultation_type: ConsultationType,
    symptoms: String,
    consultation_date: String,
    status: ConsultationStatus,
    #[serde(default)]
    diagnosis: Option<String>,
    #[serde(default)]
    treatment: Option<String>,
    #[serde(default)]
    follow_up_date: Option<String>,
}

impl Record for MedicalConsultation {
    const COLLECTION: &'static str = "consultations";
    const NAME: &'static str = "Consultation";

    fn id(&self) -> &str {
        &self.id
    }

    fn to_document(&self) -> Result<Document, AppError> {
        encode_document(&ConsultationDocument {
            id: self.id.clone(),
            patient_name: self.patient_name.clone(),
            patient_phone: self.patient_phone.clone(),
            doctor_name: self.doctor_name.clone(),
            consultation_type: self.consultation_type,
            symptoms: self.symptoms.clone(),
            consultation_date: temporal::encode(&self.consultation_date),
            status: self.status,
            diagnosis: self.diagnosis.clone(),
            treatment: self.treatment.clone(),
            follow_up_date: self.follow_up_date.as_ref().map(temporal::encode),
        })
    }

    fn from_document(document: Document) -> Result<Self, AppError> {
        let stored: ConsultationDocument = decode_document(document)?;
        Ok(Self {
            consultation_date: temporal::decode(&stored.consultation_date)?,
            follow_up_date: temporal::decode_opt(stored.follow_up_date.as_deref())?,
            id: stored.id,
            patient_name: stored.patient_name,
            patient_phone: stored.patient_phone,
            doctor_name: stored.doctor_name,
            consultation_type: stored.consultation_type,
            symptoms: stored.symptoms,
            status: stored.status,
            diagnosis: stored.diagnosis,
            treatment: stored.treatment,
        })
    }
}
