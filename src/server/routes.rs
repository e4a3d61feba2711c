use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::Html,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::report::{self, Summary};
use crate::server::AppState;

/// Fixed outer message for summary failures; the underlying cause goes
/// in `details`.
const SUMMARY_ERROR: &str = "Failed to fetch issue summary";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}

fn error_response(details: String) -> ErrorResponse {
    ErrorResponse {
        error: SUMMARY_ERROR.to_string(),
        details,
    }
}

/// GET /summary - the machine-readable representation
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Summary>, (StatusCode, Json<ErrorResponse>)> {
    match state.reporter.run().await {
        Ok(summary) => Ok(Json(summary)),
        Err(e) => {
            tracing::error!("{}: {}", SUMMARY_ERROR, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(error_response(e.to_string())),
            ))
        }
    }
}

/// GET /dashboard - the human-readable representation
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> (StatusCode, Html<String>) {
    match state.reporter.run().await {
        Ok(summary) => (
            StatusCode::OK,
            Html(report::render_dashboard(&summary, Utc::now())),
        ),
        Err(e) => {
            tracing::error!("{}: {}", SUMMARY_ERROR, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(report::render_error_page(&e.to_string())),
            )
        }
    }
}
