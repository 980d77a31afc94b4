//! Route-level aggregation of point probabilities.

/// The value selected from a set of point probabilities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selected {
    pub probability: f64,
    /// Position of the selected point in the original (unsorted) sequence.
    pub point: usize,
}

/// Nearest-rank percentile with floor indexing: after an ascending sort the
/// value at `floor(q * (n - 1))` is chosen. For n = 2 and q = 0.75 that is the
/// lower of the two values, so one bad leg among good ones does not dominate.
///
/// Returns `None` for an empty slice.
pub fn percentile_floor(values: &[f64], q: f64) -> Option<Selected> {
    if values.is_empty() {
        return None;
    }

    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let idx = (q * (values.len() - 1) as f64).floor() as usize;
    let point = *order.get(idx.min(values.len() - 1))?;

    Some(Selected {
        probability: values[point],
        point,
    })
}

/// Mean point probability; 0.0 when there are no points.
pub fn mean(values: &[f64]) -> f64 {
    match values.len() {
        0 => 0.0,
        n => values.iter().sum::<f64>() / n as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_value() {
        let s = percentile_floor(&[0.42], 0.75).unwrap();
        assert_eq!(s.probability, 0.42);
        assert_eq!(s.point, 0);
    }

    #[test]
    fn test_two_values_takes_lower() {
        let s = percentile_floor(&[0.9, 0.1], 0.75).unwrap();
        assert_eq!(s.probability, 0.1);
        assert_eq!(s.point, 1);
    }

    #[test]
    fn test_four_values_takes_third() {
        let s = percentile_floor(&[0.4, 0.1, 0.3, 0.2], 0.75).unwrap();
        assert_eq!(s.probability, 0.3);
        assert_eq!(s.point, 2);
    }

    #[test]
    fn test_five_values() {
        // floor(0.75 * 4) = 3
        let s = percentile_floor(&[0.5, 0.1, 0.9, 0.3, 0.7], 0.75).unwrap();
        assert_eq!(s.probability, 0.7);
    }

    #[test]
    fn test_extreme_quantiles() {
        let values = [0.5, 0.1, 0.9];
        assert_eq!(percentile_floor(&values, 0.0).unwrap().probability, 0.1);
        assert_eq!(percentile_floor(&values, 1.0).unwrap().probability, 0.9);
    }

    #[test]
    fn test_order_independent() {
        let a = percentile_floor(&[0.2, 0.8, 0.5, 0.1, 0.6], 0.75).unwrap();
        let b = percentile_floor(&[0.6, 0.1, 0.8, 0.2, 0.5], 0.75).unwrap();
        assert_eq!(a.probability, b.probability);
    }

    #[test]
    fn test_empty() {
        assert!(percentile_floor(&[], 0.75).is_none());
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[0.25, 0.75]), 0.5);
    }
}
