// =============================================================================
// Relative Strength Index (RSI) — rolling-mean variant
// =============================================================================
//
// Step 1 — One-step close deltas (first delta NaN: no previous close).
// Step 2 — Split into gains (delta > 0, else 0) and losses (|delta| when
//          delta < 0, else 0); a NaN delta stays NaN on both sides.
// Step 3 — Full-window rolling MEANS of gains and losses (not Wilder's
//          exponential smoothing — this variant re-averages each window).
// Step 4 — RS = gain / loss,  RSI = 100 - 100 / (1 + RS).
//
// Division edges are part of the contract, not incidental float behavior:
//   loss = 0, gain > 0   =>  RSI = 100   (pure up-moves)
//   loss = 0, gain = 0   =>  RSI = NaN   (undefined — a flat window has no
//                                        relative strength; never 50)
//
// With the first delta NaN and a full window of `period` observations
// required, the first `period` outputs are NaN.

use crate::rolling::{rolling_mean, WindowSpec};
use crate::series::Series;

/// RSI over `period` using rolling-mean gain/loss averages.
pub fn relative_strength_index(series: &Series, period: usize) -> Series {
    let values = series.values();

    let mut gains = Vec::with_capacity(values.len());
    let mut losses = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if i == 0 || !values[i].is_finite() || !values[i - 1].is_finite() {
            gains.push(f64::NAN);
            losses.push(f64::NAN);
            continue;
        }
        let delta = values[i] - values[i - 1];
        gains.push(if delta > 0.0 { delta } else { 0.0 });
        losses.push(if delta < 0.0 { delta.abs() } else { 0.0 });
    }

    let spec = WindowSpec::new(period);
    let avg_gain = rolling_mean(&gains, spec);
    let avg_loss = rolling_mean(&losses, spec);

    let rsi = avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(&gain, &loss)| rsi_from_averages(gain, loss))
        .collect();

    series.with_values(rsi)
}

/// Convert average gain / average loss into an RSI value.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain.is_nan() || avg_loss.is_nan() {
        return f64::NAN;
    }
    if avg_loss == 0.0 {
        if avg_gain > 0.0 {
            100.0
        } else {
            f64::NAN
        }
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}
