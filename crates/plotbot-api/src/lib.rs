//! PlotBot HTTP API
//!
//! Serves the subject menu, the questions of a subject and answer lookups over
//! a dataset loaded once at startup. The dataset is injected into the router
//! as shared state and never mutated afterwards.

use std::path::Path;
use std::time::Duration;

use axum::{Router, routing::get};
use chrono::{DateTime, Utc};
use plotbot_core::{Dataset, LoadError, QaService, loader};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

pub mod config;
pub mod error;
pub mod handlers;
pub mod tracing_setup;
pub mod types;

use config::DataConfig;

/// Shared state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: QaService,
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(service: QaService) -> Self {
        Self { service, start_time: Utc::now() }
    }

    pub fn elapsed(&self) -> Duration {
        (Utc::now() - self.start_time).to_std().unwrap_or_default()
    }
}

/// Build the router around `service`.
pub fn create_app(service: QaService) -> Router {
    let routes = Router::new()
        .route("/", get(handlers::root))
        .route("/menu", get(handlers::menu))
        .route("/questions/{subject}", get(handlers::questions))
        .route("/answer", get(handlers::answer))
        .route("/health", get(handlers::health))
        .route("/openapi.json", get(handlers::openapi))
        .with_state(AppState::new(service));

    with_middleware(routes)
}

/// Wrap `router` in request tracing, permissive CORS and panic recovery.
///
/// A panicking handler yields a 500 `INTERNAL_ERROR` body instead of a
/// dropped connection; the CORS headers are still attached.
pub fn with_middleware(router: Router) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .layer(CatchPanicLayer::custom(error::panic_response)),
    )
}

/// Load the configured data file from `base_dir`.
///
/// Without `fail_fast` this never fails and may return an unavailable
/// dataset; with it, the load error is returned to the caller.
pub fn load_dataset(data: &DataConfig, base_dir: &Path) -> Result<Dataset, LoadError> {
    let path = data.resolve_path(base_dir);
    info!(path = %path.display(), fail_fast = data.fail_fast, "Loading question data");

    if data.fail_fast {
        loader::try_load(&path).map(Dataset::Loaded)
    } else {
        Ok(loader::load(&path))
    }
}
