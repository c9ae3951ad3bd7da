//! Chart Rendering
//!
//! Draws the selected sensor series as SVG line charts: a single combined
//! axes, or one stacked sub-plot per sensor in split mode.

mod chart;

pub use chart::{render_combined, render_split, ChartConfig, Series};

use thiserror::Error;

/// Chart rendering errors
#[derive(Debug, Error)]
pub enum ChartError {
    /// Render was requested with no series at all
    #[error("no series selected to draw")]
    EmptySelection,

    /// The series exist but hold zero samples
    #[error("no samples to draw")]
    NoSamples,

    /// Backend-level drawing failure
    #[error("chart backend error: {0}")]
    Backend(String),
}
