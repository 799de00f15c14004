use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use validator::Validate;

use super::Collection;
use crate::db::{DocumentStore, SortDirection};
use crate::error::AppError;
use crate::models::{ConsultationCreate, MedicalConsultation};
use crate::utils::new_id;

const SORT_FIELD: &str = "consultation_date";

#[derive(Clone)]
pub struct ConsultationService {
    consultations: Collection<MedicalConsultation>,
}

impl ConsultationService {
    pub fn new(store: Arc<dyn DocumentStore>, list_limit: usize) -> Self {
        Self {
            consultations: Collection::new(store, list_limit),
        }
    }

    #[instrument(skip(self, input), fields(consultation_type = %input.consultation_type))]
    pub async fn create(&self, input: ConsultationCreate) -> Result<MedicalConsultation, AppError> {
        input.validate()?;
        let consultation = MedicalConsultation::new(new_id(), input, Utc::now());
        self.consultations.insert(&consultation).await?;
        info!(id = %consultation.id, "consultation requested");
        Ok(consultation)
    }

    pub async fn get(&self, id: &str) -> Result<MedicalConsultation, AppError> {
        self.consultations.get(id).await
    }

    /// Most recent consultations first.
    pub async fn list(&self) -> Result<Vec<MedicalConsultation>, AppError> {
        self.consultations
            .list(Some((SORT_FIELD, SortDirection::Descending)))
            .await
    }
}
