// =============================================================================
// Top-level analysis operations
// =============================================================================
//
// One function per published table. Control flow is always the same: raw
// rows -> normalization -> indicator columns -> assembled records. Each
// operation returns either a full record sequence or an `EngineError`; a
// valid-but-short result (insufficient history trimming every row) is an
// empty Vec, which is distinguishable from the error cases.

use tracing::debug;

use crate::align::align;
use crate::assemble::{assemble, ColumnSpec, Record};
use crate::errors::EngineError;
use crate::indicators::{
    alpha, average_true_range, daily_returns, fibonacci_pivots, flow_shares, hourly_flow,
    moving_average, relative_strength_index, rolling_std_dev, total_net_inflow,
};
use crate::indicators::flow::{
    normalize_daily_flow, normalize_intraday_flow, RawDailyFlowRow, RawIntradayFlowRow,
    DAILY_TIER_NAMES,
};
use crate::rolling::{rolling_correlation, WindowSpec};
use crate::series::{bar_column, normalize_bars, RawBarRow, Series};
use crate::table::IndicatorTable;
use crate::timepoint::TimeParser;

/// Standard windows for the trend table.
const MA_WINDOWS: [usize; 3] = [5, 10, 20];
const ATR_WINDOW: usize = 14;
const STD_WINDOW: usize = 20;

/// Windows for the relevance table.
const CORRELATION_WINDOW: usize = 30;
const RSI_WINDOW: usize = 14;

// ---------------------------------------------------------------------------
// Trend table: MA5/MA10/MA20 + ATR(14) + STD(20)
// ---------------------------------------------------------------------------

/// Daily trend/volatility indicators for one instrument.
///
/// Rows are emitted only once every window has filled (the longest is the
/// 20-day STD), matching the consumer contract for multi-window tables.
pub fn trend_table(rows: &[RawBarRow], parser: &dyn TimeParser) -> Result<Vec<Record>, EngineError> {
    let bars = normalize_bars(rows, parser);
    if bars.is_empty() {
        return Err(EngineError::EmptyInput("ohlcv"));
    }
    debug!(rows = bars.len(), "computing trend table");

    let closes = bar_column(&bars, |b| b.close);
    let mut table = IndicatorTable::new(closes.index().to_vec());
    for window in MA_WINDOWS {
        table.push_column(
            format!("MA{window}"),
            moving_average(&closes, window).values().to_vec(),
        );
    }
    table.push_column("ATR", average_true_range(&bars, ATR_WINDOW).values().to_vec());
    table.push_column("STD", rolling_std_dev(&closes, STD_WINDOW).values().to_vec());

    let columns: Vec<ColumnSpec> = table.column_names().map(ColumnSpec::raw).collect();
    Ok(assemble(&table, &columns, true))
}

// ---------------------------------------------------------------------------
// Relevance table: instrument vs benchmark
// ---------------------------------------------------------------------------

/// Comparative indicators for an instrument against a benchmark index:
/// daily returns, alpha, 30-day rolling correlation, and side-by-side
/// RSI(14), all computed on the aligned overlap only.
pub fn relevance_table(
    instrument_rows: &[RawBarRow],
    benchmark_rows: &[RawBarRow],
    parser: &dyn TimeParser,
) -> Result<Vec<Record>, EngineError> {
    let instrument = normalize_bars(instrument_rows, parser);
    if instrument.is_empty() {
        return Err(EngineError::EmptyInput("instrument"));
    }
    let benchmark = normalize_bars(benchmark_rows, parser);
    if benchmark.is_empty() {
        return Err(EngineError::EmptyInput("benchmark"));
    }

    let joined = align(
        &bar_column(&instrument, |b| b.close),
        &bar_column(&benchmark, |b| b.close),
    )?;
    debug!(overlap = joined.len(), "computing relevance table");

    // Returns and everything downstream run on the ALIGNED closes: an
    // instrument trading day the benchmark skipped must not leak a return
    // computed across the gap.
    let instrument_returns = daily_returns(&joined.left);
    let benchmark_returns = daily_returns(&joined.right);

    let aligned_closes = Series::from_parts(joined.index.clone(), joined.left.clone());
    let benchmark_closes = aligned_closes.with_values(joined.right.clone());

    let mut table = IndicatorTable::new(joined.index.clone());
    table.push_column("instrument_close", joined.left.clone());
    table.push_column("benchmark_close", joined.right.clone());
    table.push_column("alpha", alpha(&instrument_returns, &benchmark_returns));
    table.push_column(
        "correlation",
        rolling_correlation(
            &instrument_returns,
            &benchmark_returns,
            WindowSpec::new(CORRELATION_WINDOW),
        ),
    );
    table.push_column(
        "rsi_instrument",
        relative_strength_index(&aligned_closes, RSI_WINDOW)
            .values()
            .to_vec(),
    );
    table.push_column(
        "rsi_benchmark",
        relative_strength_index(&benchmark_closes, RSI_WINDOW)
            .values()
            .to_vec(),
    );

    let columns = [
        ColumnSpec::raw("instrument_close"),
        ColumnSpec::raw("benchmark_close"),
        ColumnSpec::rounded("alpha", 4),
        ColumnSpec::rounded("correlation", 4),
        ColumnSpec::rounded("rsi_instrument", 2),
        ColumnSpec::rounded("rsi_benchmark", 2),
    ];
    Ok(assemble(&table, &columns, true))
}

// ---------------------------------------------------------------------------
// Pivot table: per-bar Fibonacci levels
// ---------------------------------------------------------------------------

/// Per-bar Fibonacci pivot levels plus the bar's close/high/low.
///
/// A per-bar table: no window, no dropped rows. A corrupt bar shows up as a
/// row of nulls, not a missing date.
pub fn pivot_table(rows: &[RawBarRow], parser: &dyn TimeParser) -> Result<Vec<Record>, EngineError> {
    let bars = normalize_bars(rows, parser);
    if bars.is_empty() {
        return Err(EngineError::EmptyInput("ohlcv"));
    }
    debug!(rows = bars.len(), "computing pivot table");

    let mut table = IndicatorTable::new(bars.iter().map(|b| b.time).collect());
    let n = bars.len();
    let mut columns: Vec<(&'static str, Vec<f64>)> = vec![
        ("close", Vec::with_capacity(n)),
        ("high", Vec::with_capacity(n)),
        ("low", Vec::with_capacity(n)),
        ("pivot", Vec::with_capacity(n)),
        ("s1", Vec::with_capacity(n)),
        ("s2", Vec::with_capacity(n)),
        ("s3", Vec::with_capacity(n)),
        ("s4", Vec::with_capacity(n)),
        ("s5", Vec::with_capacity(n)),
        ("r1", Vec::with_capacity(n)),
        ("r2", Vec::with_capacity(n)),
        ("r3", Vec::with_capacity(n)),
        ("r4", Vec::with_capacity(n)),
        ("r5", Vec::with_capacity(n)),
        ("distance_to_support", Vec::with_capacity(n)),
        ("distance_to_resistance", Vec::with_capacity(n)),
    ];

    for bar in &bars {
        let levels = fibonacci_pivots(bar.high, bar.low, bar.close);
        let row = [
            bar.close,
            bar.high,
            bar.low,
            levels.pivot,
            levels.supports[0],
            levels.supports[1],
            levels.supports[2],
            levels.supports[3],
            levels.supports[4],
            levels.resistances[0],
            levels.resistances[1],
            levels.resistances[2],
            levels.resistances[3],
            levels.resistances[4],
            levels.distance_to_support,
            levels.distance_to_resistance,
        ];
        for (slot, value) in columns.iter_mut().zip(row) {
            slot.1.push(value);
        }
    }
    for (name, values) in columns {
        table.push_column(name, values);
    }

    let specs: Vec<ColumnSpec> = table.column_names().map(ColumnSpec::raw).collect();
    Ok(assemble(&table, &specs, false))
}

// ---------------------------------------------------------------------------
// Daily flow breakdown: tiers, total, proportional shares
// ---------------------------------------------------------------------------

/// Per-day net inflow by order-size tier, the signed total, and each tier's
/// proportional share of the day's absolute flow.
pub fn flow_breakdown_table(
    rows: &[RawDailyFlowRow],
    parser: &dyn TimeParser,
) -> Result<Vec<Record>, EngineError> {
    let bars = normalize_daily_flow(rows, parser);
    if bars.is_empty() {
        return Err(EngineError::EmptyInput("daily flow"));
    }
    debug!(rows = bars.len(), "computing flow breakdown table");

    let mut table = IndicatorTable::new(bars.iter().map(|b| b.time).collect());
    for (k, name) in DAILY_TIER_NAMES.iter().enumerate() {
        table.push_column(format!("{name}_net_inflow"), bars.iter().map(|b| b.tiers[k]).collect());
    }
    table.push_column(
        "total_net_inflow",
        bars.iter().map(|b| total_net_inflow(&b.tiers)).collect(),
    );

    let per_bar_shares: Vec<Vec<f64>> = bars.iter().map(|b| flow_shares(&b.tiers)).collect();
    for (k, name) in DAILY_TIER_NAMES.iter().enumerate() {
        table.push_column(
            format!("{name}_share"),
            per_bar_shares.iter().map(|s| s[k]).collect(),
        );
    }

    // Shares are rounded at computation time; everything emits raw.
    let specs: Vec<ColumnSpec> = table.column_names().map(ColumnSpec::raw).collect();
    Ok(assemble(&table, &specs, false))
}

// ---------------------------------------------------------------------------
// Hourly intraday flow
// ---------------------------------------------------------------------------

/// Hour-bucket aggregation of the session's minute-level flow.
///
/// Record keys are the bucket hour (the 15:00 auction folds into "14"); a
/// bucket too short for the volatility window keeps null volatility columns.
pub fn hourly_flow_table(
    rows: &[RawIntradayFlowRow],
    parser: &dyn TimeParser,
) -> Result<Vec<Record>, EngineError> {
    let bars = normalize_intraday_flow(rows, parser);
    if bars.is_empty() {
        return Err(EngineError::EmptyInput("intraday flow"));
    }
    debug!(rows = bars.len(), "computing hourly flow table");

    let records = hourly_flow(&bars)
        .into_iter()
        .map(|row| {
            let pairs = [
                ("super_large_max", row.super_large_max),
                ("super_large_min", row.super_large_min),
                ("super_large_mean", row.super_large_mean),
                ("main_force_max", row.main_force_max),
                ("main_force_min", row.main_force_min),
                ("main_force_mean", row.main_force_mean),
                ("super_large_volatility", row.super_large_volatility),
                ("main_force_volatility", row.main_force_volatility),
            ];
            Record {
                time: row.hour.to_string(),
                values: pairs
                    .into_iter()
                    .map(|(name, v)| {
                        (name.to_string(), if v.is_nan() { None } else { Some(v) })
                    })
                    .collect(),
            }
        })
        .collect();
    Ok(records)
}
