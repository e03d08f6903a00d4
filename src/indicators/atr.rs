// =============================================================================
// Average True Range (ATR)
// =============================================================================
//
// True Range for each bar:
//   TR = max(H - L, |H - prevClose|, |L - prevClose|)
//
// The first bar has no previous close, so its TR degenerates to H - L (the
// prev-close candidates drop out instead of poisoning the value). ATR is the
// plain rolling mean of TR over the window, so ATR(14) has 13 leading NaNs.

use crate::rolling::{rolling_mean, WindowSpec};
use crate::series::{bar_column, OhlcvBar, Series};

/// Per-bar True Range series.
///
/// Each candidate term involving a NaN field drops out; a bar whose every
/// candidate is NaN yields NaN.
pub fn true_range(bars: &[OhlcvBar]) -> Series {
    let values: Vec<f64> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let prev_close = if i > 0 { bars[i - 1].close } else { f64::NAN };
            let candidates = [
                bar.high - bar.low,
                (bar.high - prev_close).abs(),
                (bar.low - prev_close).abs(),
            ];
            candidates
                .iter()
                .copied()
                .filter(|c| c.is_finite())
                .fold(f64::NAN, f64::max)
        })
        .collect();

    bar_column(bars, |b| b.close).with_values(values)
}

/// ATR(window): rolling mean of True Range over a full window.
pub fn average_true_range(bars: &[OhlcvBar], window: usize) -> Series {
    let tr = true_range(bars);
    tr.with_values(rolling_mean(tr.values(), WindowSpec::new(window)))
}
