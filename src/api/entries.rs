use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use super::{ApiError, AppState};
use crate::journal::{EntryPatch, JournalEntry};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Case-insensitive search text; absent or empty lists everything.
    pub q: Option<String>,
}

/// `GET /entries[?q=...]`
pub async fn list_entries(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<JournalEntry>>, ApiError> {
    let store = state.read_store()?;
    let entries: Vec<JournalEntry> = match params.q.as_deref() {
        Some(q) if !q.is_empty() => store.search(q).into_iter().cloned().collect(),
        _ => store.list().to_vec(),
    };
    Ok(Json(entries))
}

/// `GET /entries/{id}`
pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JournalEntry>, ApiError> {
    let store = state.read_store()?;
    Ok(Json(store.get(&id)?.clone()))
}

/// `POST /entries`
pub async fn create_entry(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let entry = JournalEntry::from_value(body)?;

    let mut store = state.write_store()?;
    let created = store.create(entry)?.clone();
    let count = store.len();
    drop(store);

    tracing::info!(id = %created.id, count, "entry created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /entries/{id}`
pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<JournalEntry>, ApiError> {
    let Json(body) = payload?;
    let patch = EntryPatch::from_value(body)?;

    let updated = state.write_store()?.update(&id, &patch)?.clone();
    tracing::debug!(id = %id, "entry updated");
    Ok(Json(updated))
}

/// `DELETE /entries/{id}`. A miss is still a 204.
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let removed = state.write_store()?.delete(&id);
    tracing::info!(id = %id, removed, "entry deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /entries`
pub async fn clear_entries(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.write_store()?.clear();
    tracing::info!("all entries cleared");
    Ok(StatusCode::NO_CONTENT)
}
