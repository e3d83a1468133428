//! Score normalisation for display.

/// Min-max normalisation within a given range [min_val, max_val], clamped to [0, 1].
pub fn minmax_normalise(value: f64, min_val: f64, max_val: f64) -> f64 {
    if (max_val - min_val).abs() < 1e-10 {
        return 0.5; // degenerate case
    }
    ((value - min_val) / (max_val - min_val)).clamp(0.0, 1.0)
}

/// Normalised score as a percentage in [0, 100].
pub fn to_percent(normalised: f64) -> f64 {
    normalised * 100.0
}

/// Frequency in [0, 1] as a percentage. Values outside [0, 1] are passed through unclamped.
pub fn frequency_percent(frequency: f64) -> f64 {
    frequency * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minmax_basic() {
        assert!((minmax_normalise(25.0, 0.0, 50.0) - 0.5).abs() < 1e-9);
        assert!((minmax_normalise(-12.0, -12.0, 6.0) - 0.0).abs() < 1e-9);
        assert!((minmax_normalise(6.0, -12.0, 6.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_minmax_clamps_out_of_range() {
        assert_eq!(minmax_normalise(60.0, 0.0, 50.0), 1.0);
        assert_eq!(minmax_normalise(-1.0, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_minmax_degenerate_range() {
        assert_eq!(minmax_normalise(3.0, 1.0, 1.0), 0.5);
    }

    #[test]
    fn test_percent() {
        assert!((to_percent(0.355) - 35.5).abs() < 1e-9);
        assert!((frequency_percent(0.1541) - 15.41).abs() < 1e-9);
    }
}
