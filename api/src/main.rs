use std::env;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use pv_core::services::VerificationCoordinator;
use pv_infra::directory::FirebaseDirectory;
use pv_infra::verify::TwilioVerifyClient;

use pv_api::middleware::cors::create_cors;
use pv_api::routes::{self, verification::AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("Starting PhoneVerify API server");

    // Construct the two external clients once at startup and inject them;
    // the coordinator itself holds no global state.
    let directory = Arc::new(
        FirebaseDirectory::from_env()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?,
    );
    let provider = Arc::new(
        TwilioVerifyClient::from_env()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?,
    );
    let coordinator = Arc::new(VerificationCoordinator::new(directory, provider));

    let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let server_port = env::var("SERVER_PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()
        .map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "SERVER_PORT must be a valid port number",
            )
        })?;
    let bind_address = format!("{server_host}:{server_port}");
    info!(bind_address = %bind_address, "Binding HTTP server");

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(AppState {
                coordinator: coordinator.clone(),
            }))
            .route("/health", web::get().to(routes::health_check))
            .configure(routes::verification::configure::<FirebaseDirectory, TwilioVerifyClient>)
    })
    .bind(&bind_address)?
    .run()
    .await
}
