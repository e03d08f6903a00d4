// =============================================================================
// Indicator Library
// =============================================================================
//
// Pure, side-effect-free indicator transforms built on the series model and
// the rolling window engine. Every function is explicit about its window
// parameters; insufficient history surfaces as leading NaN rows, never as a
// silent default or an error.

pub mod atr;
pub mod flow;
pub mod moving_average;
pub mod pivots;
pub mod returns;
pub mod rsi;
pub mod volatility;

pub use atr::{average_true_range, true_range};
pub use flow::{flow_shares, hourly_flow, total_net_inflow};
pub use moving_average::moving_average;
pub use pivots::{fibonacci_pivots, PivotLevels};
pub use returns::{alpha, daily_returns};
pub use rsi::relative_strength_index;
pub use volatility::rolling_std_dev;
