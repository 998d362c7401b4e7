use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;

use estate_admin::common::{database, tracing};
use estate_admin::metrics::{AppMetrics, MetricsMiddleware};
use estate_admin::router;
use estate_admin::security::PasswordHasher;

#[actix::main]
async fn main() -> anyhow::Result<()> {
    let config = estate_admin::config::load().context("Failed to load configuration")?;

    tracing::init(&config.observability);

    ::tracing::info!(
        name = %config.app.name,
        version = %config.app.version,
        environment = %config.app.environment,
        "Starting"
    );

    let db = database::connect(&config.database)
        .await
        .context("Failed to connect to the database")?;
    let hasher = PasswordHasher::from_config(&config.auth.argon2)
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 parameters: {e}"))?;
    let metrics = AppMetrics::with_config(Some(&config));

    let server = config.server.clone();
    let auth = config.auth.clone();

    ::tracing::info!(
        host = %server.host,
        port = server.port,
        workers = server.workers,
        "Listening"
    );

    HttpServer::new(move || {
        let cors = if server.cors_origins.is_empty() {
            Cors::permissive()
        } else {
            server
                .cors_origins
                .iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
                .allow_any_method()
                .allow_any_header()
                .max_age(3600)
        };

        App::new()
            .wrap(MetricsMiddleware::new(metrics.clone()))
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(Data::new(db.clone()))
            .app_data(Data::new(hasher.clone()))
            .app_data(Data::new(auth.clone()))
            .configure(router::route)
    })
    .workers(config.server.workers)
    .shutdown_timeout(config.server.shutdown_timeout)
    .bind(config.server.address())
    .with_context(|| format!("Failed to bind {}:{}", config.server.host, config.server.port))?
    .run()
    .await
    .context("Server error")
}
