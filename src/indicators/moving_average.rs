// =============================================================================
// Moving Average (MA)
// =============================================================================
//
// Rolling arithmetic mean of the close, the plainest trend smoother. A full
// window is required, so the first `window - 1` outputs are NaN.

use crate::rolling::{rolling_mean, WindowSpec};
use crate::series::Series;

/// MA(n): rolling mean of `series` over a full `window`.
pub fn moving_average(series: &Series, window: usize) -> Series {
    series.with_values(rolling_mean(series.values(), WindowSpec::new(window)))
}
