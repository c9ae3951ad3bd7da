//! Min-Max Rescaling

/// Rescale a series to `[0, 1]` using `(x - min) / (max - min)`.
///
/// A flat series maps to all zeros: the denominator is replaced by 1.0
/// when `max == min`, so there is no division fault.
pub fn min_max_scale(values: &[f64]) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };

    let (min, max) = values
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let denom = if max > min { max - min } else { 1.0 };

    values.iter().map(|v| (v - min) / denom).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_scales_to_unit_range() {
        let scaled = min_max_scale(&[10.0, 20.0, 30.0]);
        assert_eq!(scaled, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_flat_series_is_all_zeros() {
        let scaled = min_max_scale(&[7.0, 7.0, 7.0]);
        assert_eq!(scaled, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_empty_series() {
        assert!(min_max_scale(&[]).is_empty());
    }

    proptest! {
        #[test]
        fn prop_scaled_values_stay_in_unit_range(
            values in proptest::collection::vec(-1e9..1e9f64, 1..100)
        ) {
            let scaled = min_max_scale(&values);
            prop_assert_eq!(scaled.len(), values.len());
            prop_assert!(scaled.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }
}
