use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{info, instrument, warn};
use validator::Validate;

use super::Collection;
use crate::db::{Document, DocumentStore};
use crate::error::AppError;
use crate::models::{EmergencyCreate, EmergencyReport, EmergencyStatus};
use crate::utils::new_id;

#[derive(Clone)]
pub struct EmergencyService {
    reports: Collection<EmergencyReport>,
}

impl EmergencyService {
    pub fn new(store: Arc<dyn DocumentStore>, list_limit: usize) -> Self {
        Self {
            reports: Collection::new(store, list_limit),
        }
    }

    #[instrument(skip(self, input), fields(emergency_type = %input.emergency_type))]
    pub async fn create(&self, input: EmergencyCreate) -> Result<EmergencyReport, AppError> {
        input.validate()?;
        let report = EmergencyReport::new(new_id(), input, Utc::now());
        self.reports.insert(&report).await?;

        info!(id = %report.id, "emergency report stored");
        dispatch_alert(&report);
        Ok(report)
    }

    pub async fn get(&self, id: &str) -> Result<EmergencyReport, AppError> {
        self.reports.get(id).await
    }

    /// Every stored report, in no particular order.
    pub async fn list(&self) -> Result<Vec<EmergencyReport>, AppError> {
        self.reports.list(None).await
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, id: &str, status: EmergencyStatus) -> Result<(), AppError> {
        let mut fields = Document::new();
        fields.insert("status".into(), Value::String(status.as_str().to_owned()));
        self.reports.update_fields(id, fields).await?;
        info!(status = status.as_str(), "emergency status updated");
        Ok(())
    }
}

/// Notification stub: logs the alert on the `emergency_alert` target.
fn dispatch_alert(report: &EmergencyReport) {
    warn!(
        target: "emergency_alert",
        id = %report.id,
        emergency_type = %report.emergency_type,
        reporter = %report.patient_name,
        latitude = report.location.latitude,
        longitude = report.location.longitude,
        address = %report.location.address,
        "EMERGENCY ALERT"
    );
}
