//! Dearly HTTP server.
//!
//! Wires the booking engine to Postgres, SMTP, and the alignment service,
//! then serves the API with a background reminder sweep.

use dearly_booking::providers::SystemClock;
use dearly_booking::{BookingConfig, BookingEngine, BookingEnvironment};
use dearly_postgres::{
    PostgresAppointmentStore, PostgresSessionStore, PostgresSlotStore, run_migrations,
};
use dearly_server::alignment::HttpAligner;
use dearly_server::mailer::build_mailer;
use dearly_server::{AppState, Config, build_router, reminders};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dearly_server=info,dearly_booking=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Dearly server");

    let config = Config::from_env();
    info!(
        postgres_url = %config.postgres.redacted_url(),
        port = config.server.port,
        "Configuration loaded"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.postgres.max_connections)
        .acquire_timeout(Duration::from_secs(config.postgres.connect_timeout))
        .connect(&config.postgres.url)
        .await?;
    run_migrations(&pool).await?;
    info!("Database connected, migrations applied");

    let mailer = build_mailer(&config.smtp)?;
    let booking_config = BookingConfig {
        manage_base_url: config.booking.manage_base_url.clone(),
        playback_base_url: config.booking.playback_base_url.clone(),
        staff_email: config.booking.staff_email.clone(),
    };
    let env = BookingEnvironment::new(
        Arc::new(SystemClock),
        Arc::new(PostgresSlotStore::new(pool.clone())),
        Arc::new(PostgresSessionStore::new(pool.clone())),
        Arc::new(PostgresAppointmentStore::new(pool)),
        mailer,
        booking_config,
    );
    let engine = BookingEngine::new(env);

    let aligner = Arc::new(HttpAligner::new(
        config.alignment.base_url.clone(),
        config.alignment.api_key.clone(),
        Duration::from_secs(config.alignment.timeout_secs),
    ));
    let state = AppState::new(engine.clone(), Config::api_tokens(), aligner);

    tokio::spawn(reminders::run_reminder_loop(
        engine,
        config.reminders.clone(),
    ));

    let app = build_router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
