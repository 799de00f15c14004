//! Salud al Paso API
//!
//! Main entry point for the Salud al Paso backend.

use actix_web::{App, HttpServer};
use anyhow::Context;
use tracing::info;
use tracing_actix_web::TracingLogger;

use salud::api::{self, middleware, AppState};
use salud::{config, db, telemetry};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let config = config::load_config().context("failed to load configuration")?;
    telemetry::init(&config.logging)?;

    // Connect to the document store
    let store = db::connect(&config.database)
        .await
        .context("failed to open document store")?;

    let state = AppState::new(store, config.api.list_limit);
    let prefix = config.api.prefix.clone();
    let address = (config.server.host.clone(), config.server.port);
    info!(host = %address.0, port = address.1, %prefix, "starting Salud al Paso API");

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::cors())
            .wrap(TracingLogger::default())
            .configure(api::configure_app(state.clone(), prefix.clone()))
    })
    .bind(address)?
    .run()
    .await?;

    Ok(())
}
