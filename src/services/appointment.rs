use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};
use validator::Validate;

use super::Collection;
use crate::db::{DocumentStore, SortDirection};
use crate::error::AppError;
use crate::models::{AppointmentCreate, AppointmentUpdate, MedicalAppointment};
use crate::utils::new_id;

const SORT_FIELD: &str = "appointment_date";

#[derive(Clone)]
pub struct AppointmentService {
    appointments: Collection<MedicalAppointment>,
}

impl AppointmentService {
    pub fn new(store: Arc<dyn DocumentStore>, list_limit: usize) -> Self {
        Self {
            appointments: Collection::new(store, list_limit),
        }
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: AppointmentCreate) -> Result<MedicalAppointment, AppError> {
        input.validate()?;
        let appointment = MedicalAppointment::new(new_id(), input, Utc::now());
        self.appointments.insert(&appointment).await?;
        info!(id = %appointment.id, date = %appointment.appointment_date, "appointment scheduled");
        Ok(appointment)
    }

    pub async fn get(&self, id: &str) -> Result<MedicalAppointment, AppError> {
        self.appointments.get(id).await
    }

    /// Appointments by ascending date.
    pub async fn list(&self) -> Result<Vec<MedicalAppointment>, AppError> {
        self.appointments
            .list(Some((SORT_FIELD, SortDirection::Ascending)))
            .await
    }

    /// Apply the fields present in `changes` and return the resulting state.
    #[instrument(skip(self, changes))]
    pub async fn update(
        &self,
        id: &str,
        changes: AppointmentUpdate,
    ) -> Result<MedicalAppointment, AppError> {
        changes.validate()?;
        let fields = changes.into_fields();
        if fields.is_empty() {
            debug!("empty update, returning current state");
            return self.appointments.get(id).await;
        }

        let changed: Vec<String> = fields.keys().cloned().collect();
        self.appointments.update_fields(id, fields).await?;
        info!(?changed, "appointment updated");
        self.appointments.get(id).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.appointments.delete(id).await?;
        info!("appointment deleted");
        Ok(())
    }
}
