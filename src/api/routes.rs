use actix_web::web;

use super::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(handlers::root))
        .route("/", web::get().to(handlers::root))
        .route("/health", web::get().to(handlers::health))
        .service(
            web::resource("/emergencies")
                .route(web::post().to(handlers::create_emergency))
                .route(web::get().to(handlers::list_emergencies)),
        )
        .service(
            web::resource("/emergencies/{id}")
                .route(web::get().to(handlers::get_emergency))
                .route(web::put().to(handlers::update_emergency_status)),
        )
        .service(
            web::resource("/appointments")
                .route(web::post().to(handlers::create_appointment))
                .route(web::get().to(handlers::list_appointments)),
        )
        .service(
            web::resource("/appointments/{id}")
                .route(web::get().to(handlers::get_appointment))
                .route(web::put().to(handlers::update_appointment))
                .route(web::delete().to(handlers::delete_appointment)),
        )
        .service(
            web::resource("/consultations")
                .route(web::post().to(handlers::create_consultation))
                .route(web::get().to(handlers::list_consultations)),
        )
        .service(
            web::resource("/consultations/{id}").route(web::get().to(handlers::get_consultation)),
        )
        .route("/health-tips", web::get().to(handlers::list_health_tips));
}
