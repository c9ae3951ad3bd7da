//! Log Upload Route

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log_normalizer::NormalizeError;
use serde::Serialize;
use tracing::warn;

use crate::routes::ErrorResponse;
use crate::SharedState;

/// Response for a successful upload
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub file_name: String,
    pub rows: usize,
    pub sensors: Vec<String>,
    pub cache_hit: bool,
}

/// Accept a CSV upload and make it the session's active log.
///
/// An unrecognized shape answers 422 with an error naming both accepted
/// shapes; the previously loaded log (if any) stays active.
pub async fn upload(State(state): State<SharedState>, mut multipart: Multipart) -> Response {
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        let file_name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "upload.csv".to_string());
        match field.bytes().await {
            Ok(bytes) => {
                upload = Some((file_name, bytes.to_vec()));
                break;
            }
            Err(e) => {
                warn!("failed to read upload field: {}", e);
                return error_response(StatusCode::BAD_REQUEST, "could not read upload body");
            }
        }
    }

    let Some((file_name, bytes)) = upload else {
        return error_response(StatusCode::BAD_REQUEST, "no file field in upload");
    };

    let mut state = state.write().await;
    match state.session.load(&file_name, &bytes) {
        Ok((table, cache_hit)) => {
            let response = UploadResponse {
                file_name,
                rows: table.n_rows(),
                sensors: table.column_names().map(str::to_string).collect(),
                cache_hit,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e @ NormalizeError::UnrecognizedFormat { .. }) => {
            warn!("rejected upload '{}': {}", file_name, e);
            error_response(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string())
        }
        Err(e) => error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}
