//! HTTP surface: maps verbs and paths onto entry-store operations.
//!
//! Every handler takes the store lock only for the synchronous store call, never
//! across an `.await`. The feedback route does not touch the store at all.

pub mod entries;
pub mod error;
pub mod feedback;

use std::sync::{Arc, RwLockReadGuard, RwLockWriteGuard};

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::feedback::FeedbackProvider;
use crate::journal::{EntryStore, SharedStore};

pub use error::{ApiError, ErrorResponse};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub feedback: Arc<dyn FeedbackProvider>,
}

impl AppState {
    pub fn new(store: SharedStore, feedback: Arc<dyn FeedbackProvider>) -> Self {
        Self { store, feedback }
    }

    fn read_store(&self) -> Result<RwLockReadGuard<'_, EntryStore>, ApiError> {
        self.store
            .read()
            .map_err(|e| ApiError::Internal(format!("store lock poisoned: {e}")))
    }

    fn write_store(&self) -> Result<RwLockWriteGuard<'_, EntryStore>, ApiError> {
        self.store
            .write()
            .map_err(|e| ApiError::Internal(format!("store lock poisoned: {e}")))
    }
}

/// Build the application router. CORS is open to any origin.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/entries",
            get(entries::list_entries)
                .post(entries::create_entry)
                .delete(entries::clear_entries),
        )
        .route(
            "/entries/{id}",
            get(entries::get_entry)
                .put(entries::update_entry)
                .delete(entries::delete_entry),
        )
        .route("/generate-feedback", post(feedback::generate_feedback))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
