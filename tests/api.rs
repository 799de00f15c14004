use std::collections::HashSet;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::{json, Value};

use salud::api::{configure_app, AppState};
use salud::config::DatabaseConfig;
use salud::db::{self, DocumentStore, MemoryStore};

macro_rules! app {
    ($store:expr) => {
        test::init_service(
            App::new().configure(configure_app(AppState::new($store, 1000), "/api".to_owned())),
        )
        .await
    };
}

fn memory() -> Arc<dyn DocumentStore> {
    Arc::new(MemoryStore::new())
}

async fn sqlite() -> Arc<dyn DocumentStore> {
    let config = DatabaseConfig {
        url: "sqlite::memory:".into(),
        max_connections: 1,
        ..DatabaseConfig::default()
    };
    db::connect(&config).await.expect("in-memory sqlite store")
}

fn appointment_body(date: &str) -> Value {
    json!({
        "patient_name": "Carlos Mendoza",
        "patient_phone": "+505-7654-3210",
        "doctor_name": "Dr. Ana Rodríguez",
        "specialty": "Cardiología",
        "appointment_date": date,
        "appointment_time": "10:30",
        "reason": "Chequeo rutinario"
    })
}

fn consultation_body(patient: &str) -> Value {
    json!({
        "patient_name": patient,
        "patient_phone": "+505-5432-1098",
        "doctor_name": "Dr. Roberto Martínez",
        "consultation_type": "virtual",
        "symptoms": "Dolor de cabeza persistente y mareos ocasionales"
    })
}

fn emergency_body(patient: &str) -> Value {
    json!({
        "patient_name": patient,
        "phone": "+505-8765-4321",
        "location": {"latitude": 12.1364, "longitude": -86.2514, "address": "Managua, Nicaragua"},
        "emergency_type": "Dolor de pecho",
        "description": "Dolor intenso en el pecho y dificultad para respirar"
    })
}

async fn appointment_lifecycle(store: Arc<dyn DocumentStore>) {
    let app = app!(store);

    let req = test::TestRequest::post()
        .uri("/api/appointments")
        .set_json(appointment_body("2025-01-20"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let id = created["id"].as_str().expect("id assigned").to_owned();
    assert!(!id.is_empty());
    assert_eq!(created["status"], "scheduled");
    assert_eq!(created["appointment_date"], "2025-01-20");

    let req = test::TestRequest::get().uri(&format!("/api/appointments/{id}")).to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, created);

    let req = test::TestRequest::put()
        .uri(&format!("/api/appointments/{id}"))
        .set_json(json!({"status": "confirmed", "notes": "Paciente confirmó asistencia"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["status"], "confirmed");
    assert_eq!(updated["notes"], "Paciente confirmó asistencia");
    for field in [
        "id",
        "patient_name",
        "patient_phone",
        "doctor_name",
        "specialty",
        "appointment_date",
        "appointment_time",
        "reason",
        "created_at",
    ] {
        assert_eq!(updated[field], created[field], "{field} changed");
    }

    let req = test::TestRequest::delete().uri(&format!("/api/appointments/{id}")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Appointment deleted successfully");

    let req = test::TestRequest::get().uri(&format!("/api/appointments/{id}")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Appointment not found");
}

#[actix_rt::test]
async fn appointment_lifecycle_in_memory() {
    appointment_lifecycle(memory()).await;
}

#[actix_rt::test]
async fn appointment_lifecycle_on_sqlite() {
    appointment_lifecycle(sqlite().await).await;
}

#[actix_rt::test]
async fn root_and_health() {
    let app = app!(memory());

    let req = test::TestRequest::get().uri("/api/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["message"].as_str().unwrap().contains("Salud al Paso API"));
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[actix_rt::test]
async fn missing_required_field_is_422_and_nothing_is_stored() {
    let app = app!(memory());

    let mut body = appointment_body("2025-01-20");
    body.as_object_mut().unwrap().remove("reason");
    let req = test::TestRequest::post().uri("/api/appointments").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::post()
        .uri("/api/appointments")
        .set_json(json!({"patient_name": "Test"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::get().uri("/api/appointments").to_request();
    let listed: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(listed.is_empty());
}

#[actix_rt::test]
async fn malformed_date_and_blank_text_are_422() {
    let app = app!(memory());

    let req = test::TestRequest::post()
        .uri("/api/appointments")
        .set_json(appointment_body("2025-02-30"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );

    let mut body = appointment_body("2025-01-20");
    body["doctor_name"] = json!("   ");
    let req = test::TestRequest::post().uri("/api/appointments").set_json(body).to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[actix_rt::test]
async fn five_digit_and_negative_years_are_422() {
    let app = app!(memory());

    for date in ["+10000-01-01", "-0002-06-01"] {
        let req = test::TestRequest::post()
            .uri("/api/appointments")
            .set_json(appointment_body(date))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
    let req = test::TestRequest::get().uri("/api/appointments").to_request();
    let listed: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(listed.is_empty());

    let req = test::TestRequest::post()
        .uri("/api/appointments")
        .set_json(appointment_body("9999-12-31"))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/appointments/{}", created["id"].as_str().unwrap());

    let req = test::TestRequest::put()
        .uri(&uri)
        .set_json(json!({"appointment_date": "+10000-01-01"}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    let req = test::TestRequest::get().uri(&uri).to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["appointment_date"], "9999-12-31");
}

#[actix_rt::test]
async fn wrong_content_type_keeps_actix_status() {
    let app = app!(memory());

    let req = test::TestRequest::post()
        .uri("/api/appointments")
        .insert_header(("content-type", "text/plain"))
        .set_payload(appointment_body("2025-01-20").to_string())
        .to_request();
    let status = test::call_service(&app, req).await.status();
    assert!(status.is_client_error());
    assert_ne!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::post()
        .uri("/api/appointments")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"patient_name\": ")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[actix_rt::test]
async fn unknown_ids_are_404_not_500() {
    let app = app!(memory());

    let cases = [
        test::TestRequest::get().uri("/api/appointments/nope"),
        test::TestRequest::put()
            .uri("/api/appointments/nope")
            .set_json(json!({"status": "cancelled"})),
        test::TestRequest::delete().uri("/api/appointments/nope"),
        test::TestRequest::get().uri("/api/consultations/nope"),
        test::TestRequest::get().uri("/api/emergencies/nope"),
        test::TestRequest::put().uri("/api/emergencies/nope?status=resolved"),
    ];
    for req in cases {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

#[actix_rt::test]
async fn appointments_list_in_ascending_date_order() {
    let app = app!(memory());
    for date in ["2025-05-01", "2024-02-29", "2025-01-20", "2024-12-31"] {
        let req = test::TestRequest::post()
            .uri("/api/appointments")
            .set_json(appointment_body(date))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get().uri("/api/appointments").to_request();
    let listed: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    let dates: Vec<&str> = listed
        .iter()
        .map(|a| a["appointment_date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, ["2024-02-29", "2024-12-31", "2025-01-20", "2025-05-01"]);
}

async fn consultations_newest_first(store: Arc<dyn DocumentStore>) {
    let app = app!(store);
    let mut created_ids = Vec::new();
    for patient in ["Lucía Herrera", "José Pérez", "Ana López"] {
        let req = test::TestRequest::post()
            .uri("/api/consultations")
            .set_json(consultation_body(patient))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["status"], "pending");
        assert_eq!(created["consultation_type"], "virtual");
        created_ids.push(created["id"].as_str().unwrap().to_owned());
    }

    let req = test::TestRequest::get().uri("/api/consultations").to_request();
    let listed: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.len(), 3);
    let dates: Vec<chrono::DateTime<chrono::Utc>> = listed
        .iter()
        .map(|c| serde_json::from_value(c["consultation_date"].clone()).unwrap())
        .collect();
    assert!(dates.windows(2).all(|pair| pair[0] >= pair[1]));

    let req = test::TestRequest::get()
        .uri(&format!("/api/consultations/{}", created_ids[0]))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["patient_name"], "Lucía Herrera");
}

#[actix_rt::test]
async fn consultations_newest_first_in_memory() {
    consultations_newest_first(memory()).await;
}

#[actix_rt::test]
async fn consultations_newest_first_on_sqlite() {
    consultations_newest_first(sqlite().await).await;
}

#[actix_rt::test]
async fn invalid_consultation_type_is_422() {
    let app = app!(memory());
    let mut body = consultation_body("Lucía Herrera");
    body["consultation_type"] = json!("carrier pigeon");
    let req = test::TestRequest::post().uri("/api/consultations").set_json(body).to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[actix_rt::test]
async fn emergency_report_and_status_update() {
    let app = app!(memory());

    let req = test::TestRequest::post()
        .uri("/api/emergencies")
        .set_json(emergency_body("María González"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let id = created["id"].as_str().unwrap().to_owned();
    assert_eq!(created["status"], "pending");
    assert_eq!(created["location"]["latitude"], 12.1364);

    let req = test::TestRequest::put()
        .uri(&format!("/api/emergencies/{id}?status=in_progress"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Emergency status updated");

    let req = test::TestRequest::get().uri("/api/emergencies").to_request();
    let listed: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["status"], "in_progress");
    assert_eq!(listed[0]["timestamp"], created["timestamp"]);
}

#[actix_rt::test]
async fn emergency_status_outside_vocabulary_is_422() {
    let app = app!(memory());
    let req = test::TestRequest::post()
        .uri("/api/emergencies")
        .set_json(emergency_body("Pedro"))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap();

    for uri in [
        format!("/api/emergencies/{id}?status=forgotten"),
        format!("/api/emergencies/{id}"),
    ] {
        let req = test::TestRequest::put().uri(&uri).to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}

#[actix_rt::test]
async fn created_ids_are_unique() {
    let app = app!(memory());
    let mut ids = HashSet::new();
    for _ in 0..25 {
        let patient: String = Name().fake();
        let req = test::TestRequest::post()
            .uri("/api/emergencies")
            .set_json(emergency_body(&patient))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created["patient_name"], patient.as_str());
        assert!(ids.insert(created["id"].as_str().unwrap().to_owned()));
    }
}

#[actix_rt::test]
async fn health_tips_are_six_complete_records() {
    let app = app!(memory());
    let req = test::TestRequest::get().uri("/api/health-tips").to_request();
    let tips: Vec<Value> = test::call_and_read_body_json(&app, req).await;

    assert_eq!(tips.len(), 6);
    for tip in &tips {
        for field in ["id", "title", "content", "category"] {
            assert!(!tip[field].as_str().unwrap_or_default().is_empty(), "{field} empty");
        }
        assert_eq!(tip["is_active"], true);
    }
}
