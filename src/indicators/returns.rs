// =============================================================================
// Daily Return & Alpha
// =============================================================================
//
// Daily return:  r_t = close_t / close_{t-1} - 1   (first row NaN).
// Alpha:         instrument return minus benchmark return at the same key;
//                meaningful only on an aligned pair, so callers align first.
//
// A zero or non-finite previous close yields NaN — a free instrument price of
// exactly zero is a corrupt print, not an infinite return.

/// Simple one-step percentage change; first element NaN.
pub fn daily_returns(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if i == 0 {
            out.push(f64::NAN);
            continue;
        }
        let prev = values[i - 1];
        let cur = values[i];
        if !prev.is_finite() || !cur.is_finite() || prev == 0.0 {
            out.push(f64::NAN);
        } else {
            out.push(cur / prev - 1.0);
        }
    }
    out
}

/// Excess return over a benchmark, element-wise on aligned slices.
pub fn alpha(instrument_returns: &[f64], benchmark_returns: &[f64]) -> Vec<f64> {
    debug_assert_eq!(instrument_returns.len(), benchmark_returns.len());
    instrument_returns
        .iter()
        .zip(benchmark_returns)
        .map(|(a, b)| a - b)
        .collect()
}
