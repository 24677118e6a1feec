use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use super::{ApiError, AppState};
use crate::feedback::{render_prompt, PromptFields};
use crate::journal::StoreError;

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub feedback: String,
}

/// `POST /generate-feedback`: render the prompt from the posted entry and return
/// the provider's text. The store is not touched; clients merge via `PUT`.
pub async fn generate_feedback(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let Json(body) = payload?;
    let fields: PromptFields = serde_json::from_value(body)
        .map_err(|e| StoreError::Validation(format!("invalid entry: {e}")))?;

    let prompt = render_prompt(&fields);
    let model = state.feedback.model().to_string();
    tracing::info!(model = %model, prompt_len = prompt.len(), "generating feedback");

    match state.feedback.generate(&prompt).await {
        Ok(feedback) => Ok(Json(FeedbackResponse { feedback })),
        Err(e) => {
            tracing::error!(
                error = %e,
                transient = e.is_transient(),
                model = %model,
                "feedback generation failed"
            );
            Err(e.into())
        }
    }
}
