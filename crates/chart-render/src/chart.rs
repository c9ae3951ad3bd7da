//! SVG Line Chart Drawing

use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ChartError;

/// Chart dimensions in pixels
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Drawing width
    pub width: u32,
    /// Height of the combined chart, and the split-mode floor
    pub height: u32,
    /// Height contributed by each sub-plot in split mode
    pub facet_height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 600,
            facet_height: 250,
        }
    }
}

impl ChartConfig {
    /// Total drawing height for `n` stacked sub-plots
    fn split_height(&self, n: usize) -> u32 {
        self.height.max(self.facet_height * n as u32)
    }
}

/// One named series to draw against the shared time axis
#[derive(Debug, Clone, Copy)]
pub struct Series<'a> {
    pub name: &'a str,
    pub values: &'a [f64],
}

/// Render all series on one shared pair of axes, with a legend.
pub fn render_combined(
    seconds: &[f64],
    series: &[Series<'_>],
    config: &ChartConfig,
) -> Result<String, ChartError> {
    validate(seconds, series)?;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (config.width, config.height))
            .into_drawing_area();
        draw_combined(&root, seconds, series).map_err(backend_err)?;
        root.present().map_err(|e| backend_err(e.into()))?;
    }
    Ok(svg)
}

/// Render one stacked sub-plot per series, each with its own value range.
pub fn render_split(
    seconds: &[f64],
    series: &[Series<'_>],
    config: &ChartConfig,
) -> Result<String, ChartError> {
    validate(seconds, series)?;

    let mut svg = String::new();
    {
        let height = config.split_height(series.len());
        let root = SVGBackend::with_string(&mut svg, (config.width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| backend_err(e.into()))?;

        let facets = root.split_evenly((series.len(), 1));
        for (facet, (one, color)) in facets.iter().zip(palette(series)) {
            draw_facet(facet, seconds, &one, color).map_err(backend_err)?;
        }
        root.present().map_err(|e| backend_err(e.into()))?;
    }
    Ok(svg)
}

fn validate(seconds: &[f64], series: &[Series<'_>]) -> Result<(), ChartError> {
    if series.is_empty() {
        return Err(ChartError::EmptySelection);
    }
    if seconds.is_empty() {
        return Err(ChartError::NoSamples);
    }
    Ok(())
}

fn backend_err(e: Box<dyn std::error::Error>) -> ChartError {
    ChartError::Backend(e.to_string())
}

/// Stable per-series palette colors
fn palette<'a>(series: &'a [Series<'a>]) -> impl Iterator<Item = (Series<'a>, RGBAColor)> {
    series
        .iter()
        .enumerate()
        .map(|(i, s)| (*s, Palette99::pick(i).to_rgba()))
}

/// Axis range with a degenerate-span guard: plotters cannot build a chart
/// over an empty interval, so a flat extent is widened by one unit.
fn padded(min: f64, max: f64) -> std::ops::Range<f64> {
    if max > min {
        min..max
    } else {
        min..(min + 1.0)
    }
}

fn value_extent(series: &[Series<'_>]) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for s in series {
        for &v in s.values {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    (lo, hi)
}

fn draw_combined<DB>(
    root: &DrawingArea<DB, Shift>,
    seconds: &[f64],
    series: &[Series<'_>],
) -> Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let x_range = padded(seconds[0], seconds[seconds.len() - 1]);
    let (y_lo, y_hi) = value_extent(series);
    let y_range = padded(y_lo, y_hi);

    let mut chart = ChartBuilder::on(root)
        .margin(25)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Time (Seconds)")
        .label_style(("sans-serif", 16))
        .draw()?;

    for (one, color) in palette(series) {
        chart
            .draw_series(LineSeries::new(
                seconds.iter().copied().zip(one.values.iter().copied()),
                color,
            ))?
            .label(one.name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

fn draw_facet<DB>(
    area: &DrawingArea<DB, Shift>,
    seconds: &[f64],
    series: &Series<'_>,
    color: RGBAColor,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let x_range = padded(seconds[0], seconds[seconds.len() - 1]);
    let (y_lo, y_hi) = value_extent(std::slice::from_ref(series));
    let y_range = padded(y_lo, y_hi);

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .caption(series.name, ("sans-serif", 18))
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 30)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Time (Seconds)")
        .label_style(("sans-serif", 14))
        .draw()?;

    chart.draw_series(LineSeries::new(
        seconds.iter().copied().zip(series.values.iter().copied()),
        color,
    ))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series<'a>(name: &'a str, values: &'a [f64]) -> Series<'a> {
        Series { name, values }
    }

    #[test]
    fn test_combined_renders_svg_with_legend() {
        let seconds = [0.0, 1.0, 2.0];
        let rpm = [800.0, 820.0, 900.0];
        let svg = render_combined(
            &seconds,
            &[series("RPM", &rpm)],
            &ChartConfig::default(),
        )
        .unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("RPM"));
        assert!(svg.contains("Time (Seconds)"));
    }

    #[test]
    fn test_split_height_scales_with_series_count() {
        let config = ChartConfig::default();
        assert_eq!(config.split_height(1), 600);
        assert_eq!(config.split_height(3), 750);

        let seconds = [0.0, 1.0];
        let a = [1.0, 2.0];
        let b = [3.0, 4.0];
        let c = [5.0, 6.0];
        let svg = render_split(
            &seconds,
            &[series("A", &a), series("B", &b), series("C", &c)],
            &config,
        )
        .unwrap();
        assert!(svg.contains("750"));
    }

    #[test]
    fn test_flat_single_point_series_does_not_panic() {
        let seconds = [1.0];
        let flat = [7.0];
        let svg = render_combined(
            &seconds,
            &[series("Coolant", &flat)],
            &ChartConfig::default(),
        )
        .unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_empty_selection_is_an_error() {
        let err = render_combined(&[0.0], &[], &ChartConfig::default()).unwrap_err();
        assert!(matches!(err, ChartError::EmptySelection));
    }

    #[test]
    fn test_no_samples_is_an_error() {
        let empty: [f64; 0] = [];
        let err = render_split(
            &[],
            &[series("RPM", &empty)],
            &ChartConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ChartError::NoSamples));
    }
}
