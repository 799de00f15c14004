use actix_cors::Cors;
use actix_web::error::JsonPayloadError;
use actix_web::web;

use crate::error::AppError;

/// Any origin, method and header.
pub fn cors() -> Cors {
    Cors::permissive()
}

/// Bodies that do not deserialise are validation failures (422). Content type
/// and size errors keep actix's own status.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| match err {
        JsonPayloadError::Deserialize(inner) => AppError::Validation(inner.to_string()).into(),
        other => other.into(),
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}
