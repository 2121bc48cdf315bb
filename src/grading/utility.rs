/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Scaled values within this distance of a representable step are snapped to it
/// before rounding, so a mean stored as `4.4499…` still counts as `4.45`.
const SNAP_STEPS: f64 = 1e6;

/// Rounds to one decimal place with halves going up (`3.95` → `4.0`, `4.45` → `4.5`).
pub fn round_half_up_tenth(value: f64) -> f64 {
    let scaled = (value * 10.0 * SNAP_STEPS).round() / SNAP_STEPS;
    (scaled + 0.5).floor() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_mean_values() {
        assert_eq!(mean(&[4.0, 6.0]), Some(5.0));
        assert_eq!(mean(&[1.0, 2.0, 3.0, 6.0]), Some(3.0));
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up_tenth(3.95), 4.0);
        assert_eq!(round_half_up_tenth(4.44), 4.4);
        assert_eq!(round_half_up_tenth(6.96), 7.0);
        assert_eq!(round_half_up_tenth(5.0), 5.0);
        assert_eq!(round_half_up_tenth(0.0), 0.0);
    }

    #[test]
    fn test_round_half_up_on_inexact_means() {
        // each of these means is stored just below its true .x5 value
        assert_eq!(round_half_up_tenth(mean(&[4.0, 4.0, 4.2, 5.6]).unwrap()), 4.5);
        assert_eq!(round_half_up_tenth(mean(&[1.7, 6.6]).unwrap()), 4.2);
        assert_eq!(round_half_up_tenth(mean(&[2.2, 3.5]).unwrap()), 2.9);
        assert_eq!(round_half_up_tenth(4.15), 4.2);
        assert_eq!(round_half_up_tenth(2.85), 2.9);
        assert_eq!(round_half_up_tenth(4.449), 4.4);
    }
}
