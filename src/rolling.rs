// =============================================================================
// Rolling window engine
// =============================================================================
//
// Generic trailing-window statistics over a value slice. For index i the
// window covers the `size` most recent points ending at i inclusive — never
// centered, never look-ahead. An output value is produced only when the
// window holds at least `min_periods` finite values; otherwise NaN.
//
// The engine is indicator-agnostic and deterministic: the same input slice
// always produces the bit-identical output slice.

/// Window parameters for a rolling statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpec {
    pub size: usize,
    pub min_periods: usize,
}

impl WindowSpec {
    /// Full window required: the first `size - 1` outputs are NaN.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            min_periods: size,
        }
    }

    /// Relax the fill requirement below the window size.
    pub fn with_min_periods(size: usize, min_periods: usize) -> Self {
        debug_assert!(min_periods <= size);
        Self { size, min_periods }
    }
}

/// Apply `stat` to the finite values of each trailing window.
///
/// `stat` sees only the finite values, in chronological order; NaN inputs
/// reduce the observation count rather than poisoning the window.
fn rolling_apply(values: &[f64], spec: WindowSpec, stat: impl Fn(&[f64]) -> f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut window: Vec<f64> = Vec::with_capacity(spec.size);

    for i in 0..values.len() {
        let start = (i + 1).saturating_sub(spec.size);
        window.clear();
        window.extend(values[start..=i].iter().copied().filter(|v| v.is_finite()));

        if spec.size == 0 || window.len() < spec.min_periods.max(1) {
            out.push(f64::NAN);
        } else {
            out.push(stat(&window));
        }
    }
    out
}

/// Rolling arithmetic mean.
pub fn rolling_mean(values: &[f64], spec: WindowSpec) -> Vec<f64> {
    rolling_apply(values, spec, |w| {
        w.iter().sum::<f64>() / w.len() as f64
    })
}

/// Rolling sample standard deviation (n - 1 denominator).
///
/// A window with a single observation has no sample deviation and yields NaN.
pub fn rolling_std(values: &[f64], spec: WindowSpec) -> Vec<f64> {
    rolling_apply(values, spec, |w| {
        if w.len() < 2 {
            return f64::NAN;
        }
        let mean = w.iter().sum::<f64>() / w.len() as f64;
        let var = w.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (w.len() - 1) as f64;
        var.sqrt()
    })
}

/// Rolling minimum.
pub fn rolling_min(values: &[f64], spec: WindowSpec) -> Vec<f64> {
    rolling_apply(values, spec, |w| w.iter().copied().fold(f64::INFINITY, f64::min))
}

/// Rolling maximum.
pub fn rolling_max(values: &[f64], spec: WindowSpec) -> Vec<f64> {
    rolling_apply(values, spec, |w| {
        w.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    })
}

/// Rolling Pearson correlation of two equal-length, already-aligned slices.
///
/// A pair contributes to a window only when BOTH sides are finite. Windows
/// with fewer than `min_periods` pairs, fewer than 2 pairs, or zero variance
/// on either side yield NaN.
pub fn rolling_correlation(a: &[f64], b: &[f64], spec: WindowSpec) -> Vec<f64> {
    debug_assert_eq!(a.len(), b.len());
    let mut out = Vec::with_capacity(a.len());
    let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(spec.size);

    for i in 0..a.len() {
        let start = (i + 1).saturating_sub(spec.size);
        pairs.clear();
        pairs.extend(
            a[start..=i]
                .iter()
                .zip(&b[start..=i])
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .map(|(x, y)| (*x, *y)),
        );

        if spec.size == 0 || pairs.len() < spec.min_periods.max(2) {
            out.push(f64::NAN);
            continue;
        }

        out.push(pearson(&pairs));
    }
    out
}

fn pearson(pairs: &[(f64, f64)]) -> f64 {
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        // Constant series: correlation undefined, not zero.
        f64::NAN
    } else {
        cov / denom
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn nan_count(values: &[f64]) -> usize {
        values.iter().filter(|v| v.is_nan()).count()
    }

    // ---- rolling_mean ----------------------------------------------------

    #[test]
    fn mean_leading_nan_count_is_size_minus_one() {
        let values: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let out = rolling_mean(&values, WindowSpec::new(5));
        assert_eq!(nan_count(&out[..4]), 4);
        assert!(out[4..].iter().all(|v| v.is_finite()));
    }

    #[test]
    fn mean_matches_direct_trailing_slice() {
        let values: Vec<f64> = vec![3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let spec = WindowSpec::new(3);
        let out = rolling_mean(&values, spec);
        for i in 2..values.len() {
            let direct = values[i - 2..=i].iter().sum::<f64>() / 3.0;
            assert!(
                (out[i] - direct).abs() < 1e-12,
                "index {i}: rolling {} vs direct {direct}",
                out[i]
            );
        }
    }

    #[test]
    fn mean_respects_min_periods() {
        let values: Vec<f64> = (1..=6).map(|x| x as f64).collect();
        let out = rolling_mean(&values, WindowSpec::with_min_periods(5, 2));
        assert!(out[0].is_nan());
        // Two observations available at index 1: mean(1, 2) = 1.5.
        assert!((out[1] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn mean_skips_nan_observations() {
        let values = vec![1.0, f64::NAN, 3.0, 5.0];
        let out = rolling_mean(&values, WindowSpec::with_min_periods(3, 2));
        // Window at index 2 = [1, NaN, 3] => two finite obs => mean 2.
        assert!((out[2] - 2.0).abs() < 1e-12);
        // Window at index 3 = [NaN, 3, 5] => mean 4.
        assert!((out[3] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn mean_all_nan_window_is_nan() {
        let values = vec![f64::NAN; 5];
        let out = rolling_mean(&values, WindowSpec::with_min_periods(3, 1));
        assert_eq!(nan_count(&out), 5);
    }

    // ---- rolling_std -----------------------------------------------------

    #[test]
    fn std_uses_sample_denominator() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let out = rolling_std(&values, WindowSpec::new(8));
        // Known sample std of this set is sqrt(32/7).
        let expected = (32.0_f64 / 7.0).sqrt();
        assert!(
            (out[7] - expected).abs() < 1e-12,
            "expected {expected}, got {}",
            out[7]
        );
    }

    #[test]
    fn std_of_flat_window_is_zero() {
        let values = vec![100.0; 10];
        let out = rolling_std(&values, WindowSpec::new(5));
        for &v in &out[4..] {
            assert!(v.abs() < 1e-12, "flat series must have zero std, got {v}");
        }
    }

    #[test]
    fn std_single_observation_is_nan() {
        let values = vec![1.0, 2.0];
        let out = rolling_std(&values, WindowSpec::with_min_periods(3, 1));
        assert!(out[0].is_nan());
        assert!(out[1].is_finite());
    }

    // ---- rolling_min / rolling_max ---------------------------------------

    #[test]
    fn min_max_track_window_extremes() {
        let values = vec![5.0, 3.0, 8.0, 1.0, 9.0];
        let lo = rolling_min(&values, WindowSpec::new(3));
        let hi = rolling_max(&values, WindowSpec::new(3));
        assert_eq!(lo[2], 3.0);
        assert_eq!(hi[2], 8.0);
        assert_eq!(lo[4], 1.0);
        assert_eq!(hi[4], 9.0);
    }

    // ---- rolling_correlation ---------------------------------------------

    #[test]
    fn correlation_of_identical_series_is_one() {
        let a: Vec<f64> = vec![1.0, 3.0, 2.0, 5.0, 4.0, 6.0];
        let out = rolling_correlation(&a, &a, WindowSpec::new(4));
        for &v in &out[3..] {
            assert!((v - 1.0).abs() < 1e-12, "expected 1.0, got {v}");
        }
    }

    #[test]
    fn correlation_of_inverted_series_is_minus_one() {
        let a: Vec<f64> = vec![1.0, 3.0, 2.0, 5.0, 4.0, 6.0];
        let b: Vec<f64> = a.iter().map(|v| -v).collect();
        let out = rolling_correlation(&a, &b, WindowSpec::new(4));
        for &v in &out[3..] {
            assert!((v + 1.0).abs() < 1e-12, "expected -1.0, got {v}");
        }
    }

    #[test]
    fn correlation_constant_side_is_nan() {
        let a = vec![1.0, 2.0, 3.0, 4.0];
        let b = vec![5.0; 4];
        let out = rolling_correlation(&a, &b, WindowSpec::new(4));
        assert!(out[3].is_nan());
    }

    #[test]
    fn correlation_needs_two_pairs() {
        let a = vec![1.0, 2.0];
        let b = vec![1.0, f64::NAN];
        // min_periods 1, but only one finite pair exists in any window.
        let out = rolling_correlation(&a, &b, WindowSpec::with_min_periods(2, 1));
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn correlation_is_bounded() {
        let a: Vec<f64> = (0..40).map(|i| (i as f64 * 0.7).sin()).collect();
        let b: Vec<f64> = (0..40).map(|i| (i as f64 * 0.3).cos()).collect();
        let out = rolling_correlation(&a, &b, WindowSpec::new(10));
        for &v in out.iter().filter(|v| v.is_finite()) {
            assert!((-1.0 - 1e-12..=1.0 + 1e-12).contains(&v), "corr {v} out of range");
        }
    }
}
