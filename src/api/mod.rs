//! HTTP surface.
//!
//! Translates requests into service calls and service results into JSON
//! responses. No business rules live here.

use std::sync::Arc;

use actix_web::web;

use crate::db::DocumentStore;
use crate::services::{AppointmentService, ConsultationService, EmergencyService, HealthTipService};

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use routes::configure;

/// Services shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub emergencies: EmergencyService,
    pub appointments: AppointmentService,
    pub consultations: ConsultationService,
    pub health_tips: HealthTipService,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, list_limit: usize) -> Self {
        Self {
            emergencies: EmergencyService::new(Arc::clone(&store), list_limit),
            appointments: AppointmentService::new(Arc::clone(&store), list_limit),
            consultations: ConsultationService::new(store, list_limit),
            health_tips: HealthTipService::new(),
        }
    }
}

/// Register state, extractor configs and all routes under `prefix`.
pub fn configure_app(state: AppState, prefix: String) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(state))
            .app_data(middleware::json_config())
            .app_data(middleware::query_config())
            .service(web::scope(&prefix).configure(configure));
    }
}
