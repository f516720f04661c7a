//! Web UI
//!
//! An axum server rendering a single page: pick an image, preview it, trigger
//! the pipeline and show the generated alt text or the error.

pub mod handlers;
pub mod page;
pub mod state;

pub use state::{Outcome, Session, ViewState};

use crate::pipeline::Pipeline;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tower_http::trace::TraceLayer;

/// Shared handler state: the single session and the pipeline that serves it.
#[derive(Clone)]
pub struct AppState {
    session: Arc<Mutex<Session>>,
    pipeline: Arc<Pipeline>,
    max_upload_bytes: usize,
}

impl AppState {
    pub fn new(pipeline: Pipeline, max_upload_bytes: usize) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new())),
            pipeline: Arc::new(pipeline),
            max_upload_bytes,
        }
    }

    /// Lock the session. Never held across an `.await`.
    pub fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn pipeline(&self) -> Arc<Pipeline> {
        Arc::clone(&self.pipeline)
    }
}

pub fn router(state: AppState) -> Router {
    let max_upload_bytes = state.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/image",
            get(handlers::preview).post(handlers::upload_image),
        )
        .route("/generate", post(handlers::generate))
        .route("/api/status", get(handlers::status))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
