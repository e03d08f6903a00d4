// =============================================================================
// Vega Indicators — deterministic market-series computation engine
// =============================================================================
//
// Turns raw daily or intraday price/volume series into derived indicator
// tables: moving averages, ATR, rolling volatility, returns/alpha, rolling
// correlation, RSI, Fibonacci pivot levels, and fund-flow aggregates.
//
// The engine owns no I/O. The acquisition collaborator hands in raw rows
// (unsorted, possibly dirty); the engine normalizes, computes, and hands back
// ordered flat records for the serialization collaborator to encode. Row
// anomalies recover locally as NaN; series-level failures (empty input, empty
// alignment) come back as a typed `EngineError`. One input in, one table or
// error out — no shared state, safe to run per-instrument in parallel.

pub mod align;
pub mod analysis;
pub mod assemble;
pub mod errors;
pub mod indicators;
pub mod rolling;
pub mod series;
pub mod table;
pub mod timepoint;

pub use align::{align, Aligned};
pub use analysis::{
    flow_breakdown_table, hourly_flow_table, pivot_table, relevance_table, trend_table,
};
pub use assemble::{assemble, ColumnSpec, Record};
pub use errors::EngineError;
pub use series::{normalize_bars, OhlcvBar, RawBarRow, Series};
pub use table::IndicatorTable;
pub use timepoint::{DayParser, MinuteParser, TimeParser, TimePoint};
pub use rolling::WindowSpec;
