//! Descriptive Summary Computation

use serde::Serialize;

/// Describe-style summary for one sensor series
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeriesSummary {
    /// Number of samples
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation (n-1 denominator); `None` below two samples
    pub std: Option<f64>,
    /// Minimum value
    pub min: f64,
    /// Lower quartile
    pub q25: f64,
    /// Median
    pub median: f64,
    /// Upper quartile
    pub q75: f64,
    /// Maximum value
    pub max: f64,
}

impl SeriesSummary {
    /// Compute the summary for a series of samples
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;

        let m2 = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>();
        let std = (values.len() >= 2).then(|| (m2 / (n - 1.0)).sqrt());

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Self {
            count: values.len(),
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        }
    }
}

/// Quantile with linear interpolation between order statistics.
/// Expects `sorted` to be non-empty and ascending.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_count() {
        let summary = SeriesSummary::compute(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(summary.count, 5);
        assert!((summary.mean - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_sample_std() {
        // Sample std of [2, 4, 4, 4, 5, 5, 7, 9] is ~2.138
        let summary = SeriesSummary::compute(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let std = summary.std.unwrap();
        assert!((std - 2.138).abs() < 0.001);
    }

    #[test]
    fn test_singleton_has_no_std() {
        let summary = SeriesSummary::compute(&[42.0]);
        assert_eq!(summary.count, 1);
        assert!(summary.std.is_none());
        assert_eq!(summary.min, 42.0);
        assert_eq!(summary.max, 42.0);
        assert_eq!(summary.median, 42.0);
    }

    #[test]
    fn test_quartiles_interpolate() {
        let summary = SeriesSummary::compute(&[1.0, 2.0, 3.0, 4.0]);
        assert!((summary.q25 - 1.75).abs() < 1e-9);
        assert!((summary.median - 2.5).abs() < 1e-9);
        assert!((summary.q75 - 3.25).abs() < 1e-9);
    }

    #[test]
    fn test_unsorted_input() {
        let summary = SeriesSummary::compute(&[9.0, 1.0, 5.0]);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.median, 5.0);
        assert_eq!(summary.max, 9.0);
    }

    #[test]
    fn test_empty_series() {
        let summary = SeriesSummary::compute(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean, 0.0);
    }
}
