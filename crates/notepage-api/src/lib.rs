//! notepage-api - HTTP API server for notepage
//!
//! Serves time-ordered notes through two pagination styles:
//!
//! - `GET /cursor?cursor=&limit=` keyset pagination with an opaque cursor
//! - `GET /offset?page=&page_size=` numbered pages with totals
//!
//! plus `GET /noteitems` (unpaged listing with owner names), `GET /health`
//! and `GET /`.

pub mod config;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use uuid::Uuid;

use notepage_core::NoteQueryRepository;

pub use config::ServerConfig;
pub use error::ApiError;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// STATE & ROUTER
// =============================================================================

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Note source, PostgreSQL or in-memory.
    pub notes: Arc<dyn NoteQueryRepository>,
}

impl AppState {
    pub fn new(notes: Arc<dyn NoteQueryRepository>) -> Self {
        Self { notes }
    }
}

/// Build the application router with its middleware stack.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(handlers::notes::hello))
        .route("/health", get(handlers::health::health_check))
        .route("/cursor", get(handlers::cursor::get_cursor_page))
        .route("/offset", get(handlers::offset::get_offset_page))
        .route("/noteitems", get(handlers::notes::list_note_items))
        // Middleware
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(config.allowed_origins.clone()))
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .max_age(std::time::Duration::from_secs(3600)),
        )
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
