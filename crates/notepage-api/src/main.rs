//! notepage-api - HTTP API server for notepage

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notepage_api::{build_router, AppState, ServerConfig};
use notepage_core::{InMemoryNoteRepository, NoteQueryRepository};
use notepage_db::{log_pool_metrics, Database};

/// Number of demo notes served in in-memory mode.
const DEMO_NOTE_COUNT: usize = 250;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: "notepage_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "notepage_api=debug,notepage_core=info,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optionally create a file appender with daily rotation
    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("notepage-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false)); // no ANSI in files by default
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        // Console-only output
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    let mut config = ServerConfig::from_lookup(|key| {
        if key == "NOTEPAGE_IN_MEMORY" && std::env::args().any(|a| a == "--in-memory") {
            return Some("true".to_string());
        }
        std::env::var(key).ok()
    })?;

    let notes: Arc<dyn NoteQueryRepository> = match config.database_url.take() {
        Some(database_url) if !config.in_memory => {
            info!("Connecting to database...");
            let db = Database::connect(&database_url, &config.pool_config()).await?;
            log_pool_metrics(db.pool());
            info!("Database connected");

            if config.run_migrations {
                info!("Running database migrations...");
                db.migrate().await?;
                info!("Database migrations complete");
            }
            Arc::new(db.notes)
        }
        _ => {
            info!(
                notes = DEMO_NOTE_COUNT,
                "Serving in-memory demo data (no database)"
            );
            Arc::new(InMemoryNoteRepository::with_demo_data(DEMO_NOTE_COUNT))
        }
    };

    let app = build_router(AppState::new(notes), &config);

    // Start server
    let addr: SocketAddr = config.bind_addr().parse()?;
    info!(
        request_timeout_secs = config.request_timeout.as_secs(),
        "Starting server on {}", addr
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
