//! Route Handlers

pub mod chart;
pub mod logs;
pub mod sensors;

use serde::Serialize;

/// Error payload returned by failed operations
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Guidance shown before any log is loaded
pub(crate) const GUIDANCE_UPLOAD: &str = "Upload a CSV log to get started.";

/// Guidance shown when nothing is selected
pub(crate) const GUIDANCE_SELECT: &str = "Select sensors to plot, then request the chart.";

/// Guidance shown when the selection names no column of the active log
pub(crate) const GUIDANCE_NOT_FOUND: &str = "Selected sensors not found in data.";

/// Guidance shown for a recognized log with zero samples
pub(crate) const GUIDANCE_NO_SAMPLES: &str = "The loaded log contains no samples.";
