//! Sensor Listing and Selection Routes

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use session::SensorEntry;

use crate::routes::{ErrorResponse, GUIDANCE_UPLOAD};
use crate::SharedState;

/// Query parameters for the sensor list
#[derive(Debug, Deserialize)]
pub struct SensorQuery {
    /// Case-insensitive substring filter
    pub q: Option<String>,
}

/// Response for the sensor list
#[derive(Debug, Serialize)]
pub struct SensorListResponse {
    pub sensors: Vec<SensorEntry>,
    pub selected: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// List the active log's sensors with their selection flags
pub async fn list(
    State(state): State<SharedState>,
    Query(params): Query<SensorQuery>,
) -> Json<SensorListResponse> {
    let state = state.read().await;
    let message = state
        .session
        .info()
        .is_none()
        .then(|| GUIDANCE_UPLOAD.to_string());

    Json(SensorListResponse {
        sensors: state.session.sensors(params.q.as_deref()),
        selected: state.session.selected(),
        message,
    })
}

/// Body for a single-sensor toggle
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub name: String,
    pub selected: bool,
}

/// Selection state after a mutation
#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub selected_count: usize,
}

/// Toggle one sensor's selection flag
pub async fn select(State(state): State<SharedState>, Json(req): Json<SelectRequest>) -> Response {
    let mut state = state.write().await;
    match state.session.set_selected(&req.name, req.selected) {
        Ok(()) => Json(SelectionResponse {
            selected_count: state.session.selected_count(),
        })
        .into_response(),
        Err(e) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

/// Body for the select-matches operation
#[derive(Debug, Deserialize)]
pub struct SelectMatchesRequest {
    /// Substring to match; empty selects every known sensor
    #[serde(default)]
    pub query: String,
}

/// Result of the select-matches operation
#[derive(Debug, Serialize)]
pub struct SelectMatchesResponse {
    pub matched: usize,
    pub selected_count: usize,
}

/// Mark every sensor matching the query as selected
pub async fn select_matches(
    State(state): State<SharedState>,
    Json(req): Json<SelectMatchesRequest>,
) -> Json<SelectMatchesResponse> {
    let mut state = state.write().await;
    let matched = state.session.select_matching(&req.query);
    Json(SelectMatchesResponse {
        matched,
        selected_count: state.session.selected_count(),
    })
}

/// Clear every selection flag
pub async fn deselect_all(State(state): State<SharedState>) -> Json<SelectionResponse> {
    let mut state = state.write().await;
    state.session.deselect_all();
    Json(SelectionResponse { selected_count: 0 })
}
