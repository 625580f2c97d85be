//! MentorHub booking service entry point.
//!
//! Wires the Postgres adapters, booking handlers, auto-decline monitor,
//! and the Axum HTTP surface together, then serves until SIGINT/SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mentorhub::adapters::http::{
    admin_router, booking_router, health_router, AdminAppState, BookingAppState,
};
use mentorhub::adapters::jobs::{AutoDeclineMonitor, AutoDeclineMonitorConfig};
use mentorhub::adapters::notify::LogNotifier;
use mentorhub::adapters::payment::MockPaymentProvider;
use mentorhub::adapters::postgres::{
    PostgresProfileReader, PostgresSessionStore, PostgresUserDirectory,
};
use mentorhub::application::handlers::booking::{
    AcceptBookingHandler, BookingPolicy, CancelBookingHandler, CreateBookingHandler,
    GetBookingHandler, ListSlotsHandler,
};
use mentorhub::config::AppConfig;
use mentorhub::ports::{MentorProfileReader, Notifier, PaymentProvider, SessionStore, UserDirectory};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    info!(
        environment = ?config.server.environment,
        "starting mentorhub booking service"
    );

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    // Adapters
    let store: Arc<dyn SessionStore> = Arc::new(PostgresSessionStore::new(pool.clone()));
    let users: Arc<dyn UserDirectory> = Arc::new(PostgresUserDirectory::new(pool.clone()));
    let profiles: Arc<dyn MentorProfileReader> = Arc::new(PostgresProfileReader::new(pool.clone()));
    let payments: Arc<dyn PaymentProvider> = Arc::new(MockPaymentProvider::new());
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier::new());

    // Handlers
    let policy = BookingPolicy {
        slot_minutes: config.booking.slot_minutes,
        slot_lead_minutes: config.booking.slot_lead_minutes,
        booking_lead_minutes: config.booking.booking_lead_minutes,
        default_hourly_rate_minor: config.booking.default_hourly_rate_minor,
        default_currency: config.booking.default_currency.clone(),
    };

    let list_slots = Arc::new(ListSlotsHandler::new(
        profiles.clone(),
        store.clone(),
        policy.clone(),
    ));
    let create = Arc::new(CreateBookingHandler::new(
        store.clone(),
        users.clone(),
        profiles.clone(),
        payments.clone(),
        notifier.clone(),
        policy,
    ));
    let accept = Arc::new(AcceptBookingHandler::new(store.clone()));
    let cancel = Arc::new(CancelBookingHandler::new(
        store.clone(),
        payments.clone(),
        notifier.clone(),
    ));
    let get = Arc::new(GetBookingHandler::new(store.clone()));

    // Background auto-decline monitor
    let monitor_config = AutoDeclineMonitorConfig {
        poll_interval: config.booking.poll_interval(),
        session_timeout: config.booking.session_timeout(),
        link_warning_minutes: config.booking.link_warning_minutes,
    };
    let monitor = Arc::new(AutoDeclineMonitor::with_config(
        store.clone(),
        cancel.clone(),
        monitor_config,
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let monitor_handle = {
        let monitor = monitor.clone();
        tokio::spawn(async move { monitor.run(shutdown_rx).await })
    };

    // HTTP surface
    let booking_state = BookingAppState::new(list_slots, create, accept, cancel.clone(), get);
    let admin_state = AdminAppState::new(store.clone(), monitor, cancel);

    let app = Router::new()
        .merge(health_router())
        .nest("/api", booking_router(booking_state).merge(admin_router(admin_state)))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shutting down, stopping auto-decline monitor");
    if shutdown_tx.send(true).is_err() {
        error!("auto-decline monitor already stopped");
    }
    monitor_handle.await?;

    info!("shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone()));

    if config.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins = config.server.cors_origins_list();
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let parsed: Vec<axum::http::HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
