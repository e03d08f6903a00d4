// =============================================================================
// Rolling Volatility (STD)
// =============================================================================
//
// Rolling sample standard deviation of the close (n - 1 denominator), the
// classic realized-volatility proxy. Full window required.

use crate::rolling::{rolling_std, WindowSpec};
use crate::series::Series;

/// STD(n): rolling sample standard deviation over a full `window`.
pub fn rolling_std_dev(series: &Series, window: usize) -> Series {
    series.with_values(rolling_std(series.values(), WindowSpec::new(window)))
}
