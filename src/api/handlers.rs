use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::AppState;
use crate::error::AppError;
use crate::models::{AppointmentCreate, AppointmentUpdate, ConsultationCreate, EmergencyCreate, EmergencyStatus};

pub const SERVICE_NAME: &str = "Salud al Paso API - UNAN";

#[derive(Debug, Serialize)]
struct Message {
    message: &'static str,
}

fn message(message: &'static str) -> HttpResponse {
    HttpResponse::Ok().json(Message { message })
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: EmergencyStatus,
}

pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "timestamp": Utc::now(),
    }))
}

// ===== Emergencies =====

pub async fn create_emergency(
    state: web::Data<AppState>,
    body: web::Json<EmergencyCreate>,
) -> Result<HttpResponse, AppError> {
    let report = state.emergencies.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(report))
}

pub async fn list_emergencies(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.emergencies.list().await?))
}

pub async fn get_emergency(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.emergencies.get(&id).await?))
}

pub async fn update_emergency_status(
    state: web::Data<AppState>,
    id: web::Path<String>,
    query: web::Query<StatusQuery>,
) -> Result<HttpResponse, AppError> {
    state.emergencies.update_status(&id, query.status).await?;
    Ok(message("Emergency status updated"))
}

// ===== Appointments =====

pub async fn create_appointment(
    state: web::Data<AppState>,
    body: web::Json<AppointmentCreate>,
) -> Result<HttpResponse, AppError> {
    let appointment = state.appointments.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(appointment))
}

pub async fn list_appointments(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.appointments.list().await?))
}

pub async fn get_appointment(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.appointments.get(&id).await?))
}

pub async fn update_appointment(
    state: web::Data<AppState>,
    id: web::Path<String>,
    body: web::Json<AppointmentUpdate>,
) -> Result<HttpResponse, AppError> {
    let appointment = state.appointments.update(&id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(appointment))
}

pub async fn delete_appointment(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.appointments.delete(&id).await?;
    Ok(message("Appointment deleted successfully"))
}

// ===== Consultations =====

pub async fn create_consultation(
    state: web::Data<AppState>,
    body: web::Json<ConsultationCreate>,
) -> Result<HttpResponse, AppError> {
    let consultation = state.consultations.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(consultation))
}

pub async fn list_consultations(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.consultations.list().await?))
}

pub async fn get_consultation(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.consultations.get(&id).await?))
}

// ===== Health tips =====

pub async fn list_health_tips(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.health_tips.list())
}
