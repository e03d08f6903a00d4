// =============================================================================
// Fund-flow aggregates
// =============================================================================
//
// Two flow products:
//
// 1. Proportional shares per bar — each size tier divided by the bar's sum of
//    ABSOLUTE tier values, times 100. The denominator is shared across tiers
//    but the shares are signed, so they do not sum to 100; that is the
//    published definition and is preserved as-is.
//
// 2. Hourly intraday aggregation — minute-level flow rows grouped by hour
//    bucket (15:00 folds into 14:00): per bucket max/min/mean of each tier,
//    plus the bucket mean of a 10-point trailing standard deviation computed
//    over the RAW minute series. The volatility side is merged by LEFT join:
//    a bucket whose every volatility point is NaN keeps NaN instead of being
//    dropped. Every numeric output except the bucket key rounds to 2 decimals.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assemble::round_to;
use crate::rolling::{rolling_std, WindowSpec};
use crate::timepoint::{TimeParser, TimePoint};

/// Trailing window for the minute-level flow volatility measure.
const VOLATILITY_WINDOW: usize = 10;

// ---------------------------------------------------------------------------
// Raw rows and normalized bars
// ---------------------------------------------------------------------------

/// One intraday (minute-level) flow row from the acquisition layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawIntradayFlowRow {
    pub time: String,
    /// Super-large-order net inflow.
    pub super_large: Option<f64>,
    /// Main-force net inflow.
    pub main_force: Option<f64>,
}

/// A normalized minute-level flow observation.
#[derive(Debug, Clone, Copy)]
pub struct IntradayFlowBar {
    pub time: TimePoint,
    pub super_large: f64,
    pub main_force: f64,
}

/// Normalize raw intraday flow rows: parse keys, sort ascending, keep the
/// last duplicate, NaN for missing fields. Same policy as the OHLCV path.
pub fn normalize_intraday_flow(
    rows: &[RawIntradayFlowRow],
    parser: &dyn TimeParser,
) -> Vec<IntradayFlowBar> {
    let mut bars: Vec<IntradayFlowBar> = rows
        .iter()
        .filter_map(|row| {
            let Some(time) = parser.parse(&row.time) else {
                debug!(raw = %row.time, "dropping flow row with unparsable timestamp");
                return None;
            };
            Some(IntradayFlowBar {
                time,
                super_large: row.super_large.unwrap_or(f64::NAN),
                main_force: row.main_force.unwrap_or(f64::NAN),
            })
        })
        .collect();

    bars.sort_by_key(|b| b.time);
    bars.dedup_by(|next, prev| {
        if next.time == prev.time {
            *prev = *next;
            true
        } else {
            false
        }
    });
    bars
}

/// One daily flow row: net inflow per order-size tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDailyFlowRow {
    pub time: String,
    pub main_force: Option<f64>,
    pub small: Option<f64>,
    pub medium: Option<f64>,
    pub large: Option<f64>,
    pub super_large: Option<f64>,
}

/// A normalized daily flow observation; tier order is fixed as
/// [main_force, small, medium, large, super_large].
#[derive(Debug, Clone, Copy)]
pub struct DailyFlowBar {
    pub time: TimePoint,
    pub tiers: [f64; 5],
}

/// Tier column names, aligned with [`DailyFlowBar::tiers`].
pub const DAILY_TIER_NAMES: [&str; 5] = ["main_force", "small", "medium", "large", "super_large"];

/// Normalize raw daily flow rows under the usual row-recovery policy.
pub fn normalize_daily_flow(
    rows: &[RawDailyFlowRow],
    parser: &dyn TimeParser,
) -> Vec<DailyFlowBar> {
    let mut bars: Vec<DailyFlowBar> = rows
        .iter()
        .filter_map(|row| {
            let Some(time) = parser.parse(&row.time) else {
                debug!(raw = %row.time, "dropping flow row with unparsable timestamp");
                return None;
            };
            Some(DailyFlowBar {
                time,
                tiers: [
                    row.main_force.unwrap_or(f64::NAN),
                    row.small.unwrap_or(f64::NAN),
                    row.medium.unwrap_or(f64::NAN),
                    row.large.unwrap_or(f64::NAN),
                    row.super_large.unwrap_or(f64::NAN),
                ],
            })
        })
        .collect();

    bars.sort_by_key(|b| b.time);
    bars.dedup_by(|next, prev| {
        if next.time == prev.time {
            *prev = *next;
            true
        } else {
            false
        }
    });
    bars
}

/// Signed total of all tiers for one bar; NaN if any tier is NaN, so an
/// incomplete bar never masquerades as a small total.
pub fn total_net_inflow(tiers: &[f64; 5]) -> f64 {
    tiers.iter().sum()
}

// ---------------------------------------------------------------------------
// Proportional shares
// ---------------------------------------------------------------------------

/// Signed percentage share of each tier against the bar's absolute-sum
/// denominator, rounded to 2 decimals.
///
/// NaN tiers drop out of the denominator but stay NaN in the output. A zero
/// denominator (no flow at all) makes every share NaN, never a division
/// fault.
pub fn flow_shares(tiers: &[f64]) -> Vec<f64> {
    let denom: f64 = tiers.iter().filter(|v| v.is_finite()).map(|v| v.abs()).sum();
    tiers
        .iter()
        .map(|&v| {
            if !v.is_finite() || denom == 0.0 {
                f64::NAN
            } else {
                round_to(v / denom * 100.0, 2)
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Hourly aggregation
// ---------------------------------------------------------------------------

/// Aggregated flow statistics for one hour bucket.
#[derive(Debug, Clone, Serialize)]
pub struct HourlyFlowRow {
    pub hour: u32,
    pub super_large_max: f64,
    pub super_large_min: f64,
    pub super_large_mean: f64,
    pub main_force_max: f64,
    pub main_force_min: f64,
    pub main_force_mean: f64,
    pub super_large_volatility: f64,
    pub main_force_volatility: f64,
}

/// Group minute-level flow into hour buckets and attach the averaged
/// 10-point trailing volatility of each tier.
///
/// `bars` must be normalized (ascending); buckets come out ascending by hour.
pub fn hourly_flow(bars: &[IntradayFlowBar]) -> Vec<HourlyFlowRow> {
    // Trailing std runs over the raw ungrouped series first; grouping after
    // would reset the window at each bucket boundary.
    let super_large: Vec<f64> = bars.iter().map(|b| b.super_large).collect();
    let main_force: Vec<f64> = bars.iter().map(|b| b.main_force).collect();
    let spec = WindowSpec::new(VOLATILITY_WINDOW);
    let super_vol = rolling_std(&super_large, spec);
    let main_vol = rolling_std(&main_force, spec);

    let mut hours: Vec<u32> = bars.iter().filter_map(|b| b.time.hour_bucket()).collect();
    hours.sort_unstable();
    hours.dedup();

    hours
        .into_iter()
        .map(|hour| {
            let in_bucket = |i: &usize| bars[*i].time.hour_bucket() == Some(hour);
            let idx: Vec<usize> = (0..bars.len()).filter(in_bucket).collect();

            let sl: Vec<f64> = idx.iter().map(|&i| super_large[i]).collect();
            let mf: Vec<f64> = idx.iter().map(|&i| main_force[i]).collect();
            let sl_vol: Vec<f64> = idx.iter().map(|&i| super_vol[i]).collect();
            let mf_vol: Vec<f64> = idx.iter().map(|&i| main_vol[i]).collect();

            HourlyFlowRow {
                hour,
                super_large_max: round_to(finite_max(&sl), 2),
                super_large_min: round_to(finite_min(&sl), 2),
                super_large_mean: round_to(finite_mean(&sl), 2),
                main_force_max: round_to(finite_max(&mf), 2),
                main_force_min: round_to(finite_min(&mf), 2),
                main_force_mean: round_to(finite_mean(&mf), 2),
                super_large_volatility: round_to(finite_mean(&sl_vol), 2),
                main_force_volatility: round_to(finite_mean(&mf_vol), 2),
            }
        })
        .collect()
}

fn finite_max(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NAN, f64::max)
}

fn finite_min(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NAN, f64::min)
}

fn finite_mean(values: &[f64]) -> f64 {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        f64::NAN
    } else {
        finite.iter().sum::<f64>() / finite.len() as f64
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::timepoint::MinuteParser;

    fn raw(time: &str, super_large: f64, main_force: f64) -> RawIntradayFlowRow {
        RawIntradayFlowRow {
            time: time.to_string(),
            super_large: Some(super_large),
            main_force: Some(main_force),
        }
    }

    // ---- flow_shares -----------------------------------------------------

    #[test]
    fn shares_use_shared_absolute_denominator() {
        let shares = flow_shares(&[5.0, -3.0, 2.0]);
        assert_eq!(shares, vec![50.0, -30.0, 20.0]);
    }

    #[test]
    fn shares_of_zero_flow_are_undefined() {
        let shares = flow_shares(&[0.0, 0.0]);
        assert!(shares.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn nan_tier_drops_from_denominator_but_stays_nan() {
        let shares = flow_shares(&[6.0, f64::NAN, -2.0]);
        assert_eq!(shares[0], 75.0);
        assert!(shares[1].is_nan());
        assert_eq!(shares[2], -25.0);
    }

    #[test]
    fn signed_shares_need_not_sum_to_100() {
        let shares = flow_shares(&[5.0, -3.0, 2.0]);
        let total: f64 = shares.iter().sum();
        assert!((total - 40.0).abs() < 1e-9);
    }

    // ---- daily flow ------------------------------------------------------

    #[test]
    fn daily_flow_normalizes_and_totals() {
        use crate::timepoint::DayParser;
        let rows = vec![
            RawDailyFlowRow {
                time: "2024-01-02".into(),
                main_force: Some(5.0),
                small: Some(-3.0),
                medium: Some(2.0),
                large: Some(1.0),
                super_large: Some(-1.0),
            },
            RawDailyFlowRow {
                time: "2024-01-01".into(),
                main_force: Some(1.0),
                small: Some(1.0),
                medium: Some(1.0),
                large: Some(1.0),
                super_large: None,
            },
        ];
        let bars = normalize_daily_flow(&rows, &DayParser);
        assert_eq!(bars.len(), 2);
        // Sorted ascending: the Jan 1 row with a missing tier comes first.
        assert!(total_net_inflow(&bars[0].tiers).is_nan());
        assert!((total_net_inflow(&bars[1].tiers) - 4.0).abs() < 1e-12);
    }

    // ---- hourly_flow -----------------------------------------------------

    fn minute_rows() -> Vec<IntradayFlowBar> {
        // 12 minutes in the 09:00 bucket, 3 in 10:00, 1 auction print at 15:00.
        let mut raw_rows = Vec::new();
        for m in 0..12 {
            raw_rows.push(raw(
                &format!("2024-03-15 09:{:02}", 30 + m),
                (m as f64) * 10.0,
                (m as f64) * -5.0,
            ));
        }
        for m in 0..3 {
            raw_rows.push(raw(&format!("2024-03-15 10:{:02}", m), 200.0, 300.0));
        }
        raw_rows.push(raw("2024-03-15 15:00", 999.0, -999.0));
        normalize_intraday_flow(&raw_rows, &MinuteParser)
    }

    #[test]
    fn buckets_come_out_ascending_with_auction_folded() {
        let rows = hourly_flow(&minute_rows());
        let hours: Vec<u32> = rows.iter().map(|r| r.hour).collect();
        assert_eq!(hours, vec![9, 10, 14]);
    }

    #[test]
    fn per_bucket_extremes_and_mean() {
        let rows = hourly_flow(&minute_rows());
        let nine = &rows[0];
        assert_eq!(nine.super_large_max, 110.0);
        assert_eq!(nine.super_large_min, 0.0);
        assert_eq!(nine.super_large_mean, 55.0);
        assert_eq!(nine.main_force_min, -55.0);
    }

    #[test]
    fn volatility_window_spans_bucket_boundaries() {
        let rows = hourly_flow(&minute_rows());
        // The 10:00 bucket has only 3 rows, but the 10-point window reaches
        // back into 09:xx, so its volatility mean is defined.
        assert!(rows[1].super_large_volatility.is_finite());
    }

    #[test]
    fn short_bucket_keeps_nan_volatility_instead_of_dropping() {
        // Only 5 minutes of data: no 10-point window ever fills, so every
        // bucket keeps a NaN volatility but still reports extremes.
        let raw_rows: Vec<RawIntradayFlowRow> = (0..5)
            .map(|m| raw(&format!("2024-03-15 09:{:02}", 30 + m), 10.0, 20.0))
            .collect();
        let rows = hourly_flow(&normalize_intraday_flow(&raw_rows, &MinuteParser));
        assert_eq!(rows.len(), 1);
        assert!(rows[0].super_large_volatility.is_nan());
        assert_eq!(rows[0].super_large_max, 10.0);
    }

    #[test]
    fn outputs_round_to_two_decimals() {
        let raw_rows: Vec<RawIntradayFlowRow> = (0..3)
            .map(|m| raw(&format!("2024-03-15 09:{:02}", m), 1.0 / 3.0, 2.0 / 3.0))
            .collect();
        let rows = hourly_flow(&normalize_intraday_flow(&raw_rows, &MinuteParser));
        assert_eq!(rows[0].super_large_mean, 0.33);
        assert_eq!(rows[0].main_force_mean, 0.67);
    }

    #[test]
    fn normalize_drops_bad_timestamps_and_keeps_last_duplicate() {
        let raw_rows = vec![
            raw("2024-03-15 09:31", 1.0, 1.0),
            raw("bogus", 2.0, 2.0),
            raw("2024-03-15 09:31", 3.0, 3.0),
        ];
        let bars = normalize_intraday_flow(&raw_rows, &MinuteParser);
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].super_large, 3.0);
    }
}
