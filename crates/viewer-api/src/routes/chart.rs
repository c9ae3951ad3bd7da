//! Chart Rendering Route

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chart_render::{render_combined, render_split, Series};
use serde::{Deserialize, Serialize};
use series_stats::{min_max_scale, SeriesSummary};

use crate::routes::{
    ErrorResponse, GUIDANCE_NOT_FOUND, GUIDANCE_NO_SAMPLES, GUIDANCE_SELECT, GUIDANCE_UPLOAD,
};
use crate::SharedState;

/// Query flags for chart rendering
#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    /// Rescale every series to [0, 1] independently
    #[serde(default)]
    pub normalize: bool,
    /// One stacked sub-plot per sensor instead of shared axes
    #[serde(default)]
    pub split: bool,
}

/// Summary for one plotted sensor
#[derive(Debug, Serialize)]
pub struct SensorStats {
    pub name: String,
    #[serde(flatten)]
    pub summary: SeriesSummary,
}

/// Chart response: either a guidance message or the rendered chart with
/// its statistics
#[derive(Debug, Serialize)]
pub struct ChartResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<Vec<SensorStats>>,
}

impl ChartResponse {
    fn guidance(message: &str) -> Self {
        Self {
            message: Some(message.to_string()),
            svg: None,
            stats: None,
        }
    }
}

/// Re-evaluate the session and render the selected sensors.
///
/// Every degenerate state answers with a guidance message instead of a
/// chart; none of them is an error status.
pub async fn render(State(state): State<SharedState>, Query(params): Query<ChartQuery>) -> Response {
    let state = state.read().await;

    let Some(table) = state.session.table() else {
        return Json(ChartResponse::guidance(GUIDANCE_UPLOAD)).into_response();
    };

    let selected = state.session.selected();
    if selected.is_empty() {
        return Json(ChartResponse::guidance(GUIDANCE_SELECT)).into_response();
    }

    // Selection entries can outlive the log they came from; plot only the
    // names present in the active table.
    let valid: Vec<&String> = selected
        .iter()
        .filter(|name| table.has_column(name))
        .collect();
    if valid.is_empty() {
        return Json(ChartResponse::guidance(GUIDANCE_NOT_FOUND)).into_response();
    }
    if table.is_empty() {
        return Json(ChartResponse::guidance(GUIDANCE_NO_SAMPLES)).into_response();
    }

    let plotted: Vec<(String, Vec<f64>)> = valid
        .iter()
        .map(|name| {
            let values = table.column(name).unwrap_or(&[]).to_vec();
            let values = if params.normalize {
                min_max_scale(&values)
            } else {
                values
            };
            ((*name).clone(), values)
        })
        .collect();

    let series: Vec<Series<'_>> = plotted
        .iter()
        .map(|(name, values)| Series {
            name: name.as_str(),
            values,
        })
        .collect();

    let rendered = if params.split {
        render_split(table.seconds(), &series, &state.config.chart)
    } else {
        render_combined(table.seconds(), &series, &state.config.chart)
    };

    match rendered {
        Ok(svg) => {
            let stats = plotted
                .iter()
                .map(|(name, values)| SensorStats {
                    name: name.clone(),
                    summary: SeriesSummary::compute(values),
                })
                .collect();
            Json(ChartResponse {
                message: None,
                svg: Some(svg),
                stats: Some(stats),
            })
            .into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}
