use attendance::config::{self, CliArgs};
use attendance::state::AppState;
use attendance::storage::SqliteStorage;
use attendance::{create_app, db, run_migrations};
use clap::Parser;
use std::{net::SocketAddr, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Sets up stdout logging plus a daily rolling log file
///
/// The returned guard must be held until exit so buffered lines are written.
fn init_logging(debug: bool) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (file_layer, guard) = match config::get_config_dir_path() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir.join("logs"), "attendance.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().json().with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    guard
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    let args = CliArgs::parse();
    let _log_guard = init_logging(args.debug);
    let config = config::get_config(args);

    // Initialize the database pool
    let pool = Arc::new(db::init_pool(&config.database_url));
    {
        let mut conn = pool.get().expect("Failed to get connection");
        run_migrations(&mut conn);
    }

    let state = Arc::new(
        AppState::load(
            SqliteStorage::new(pool),
            config.persist_debounce(),
            config.default_target_percentage,
        )
        .await,
    );

    // Build our application with routes
    let app = create_app(state.clone());

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await.expect("Failed to bind address");
    info!("Listening on {}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
    }

    // Write any grid edits still waiting for their debounce window
    match state.shutdown().await {
        Ok(true) => info!("Flushed pending timetable edits"),
        Ok(false) => {}
        Err(e) => error!("Failed to flush pending timetable edits: {:#}", e),
    }
}
