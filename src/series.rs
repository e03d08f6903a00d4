// =============================================================================
// Series model
// =============================================================================
//
// A `Series` is an ordered `(TimePoint, f64)` sequence: strictly ascending
// keys, no duplicates, with NaN as a first-class missing value. Raw rows from
// the acquisition layer may arrive unsorted and dirty; normalization sorts,
// resolves duplicate keys, and downgrades bad fields to NaN instead of
// aborting.
//
// Row-level recovery policy:
//   - unparsable timestamp        => row dropped (no key, nothing to order by)
//   - unparsable numeric field    => field becomes NaN, row kept
//   - duplicate key               => the LAST occurrence wins
//   - corrupt OHLC bar            => the violated field becomes NaN

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::timepoint::{TimeParser, TimePoint};

/// Missing-value placeholder used throughout the engine.
const NAN: f64 = f64::NAN;

// ---------------------------------------------------------------------------
// Raw input rows
// ---------------------------------------------------------------------------

/// One OHLCV row as delivered by the acquisition layer.
///
/// Fields are `Option<f64>` so the collaborator can hand over rows whose
/// numeric fields failed to parse upstream; `None` becomes NaN here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBarRow {
    pub time: String,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

// ---------------------------------------------------------------------------
// OHLCV bars
// ---------------------------------------------------------------------------

/// A normalized OHLCV bar. Any field may be NaN.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OhlcvBar {
    pub time: TimePoint,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    /// Enforce the OHLC invariant: high >= max(open, close, low) and
    /// low <= min(open, close, high). A violated field is a corrupt upstream
    /// print; it becomes NaN so only indicators that depend on it go NaN,
    /// while the rest of the bar stays usable.
    fn sanitized(mut self) -> Self {
        let high_floor = self.open.max(self.close).max(self.low);
        if self.high.is_finite() && high_floor.is_finite() && self.high < high_floor {
            debug!(time = %self.time, high = self.high, floor = high_floor, "corrupt bar: high below floor");
            self.high = NAN;
        }
        let low_ceiling = self.open.min(self.close).min(self.high);
        if self.low.is_finite() && low_ceiling.is_finite() && self.low > low_ceiling {
            debug!(time = %self.time, low = self.low, ceiling = low_ceiling, "corrupt bar: low above ceiling");
            self.low = NAN;
        }
        self
    }
}

/// Normalize raw OHLCV rows: parse keys, sort ascending, keep the last
/// occurrence of each duplicate key, and sanitize each bar.
pub fn normalize_bars(rows: &[RawBarRow], parser: &dyn TimeParser) -> Vec<OhlcvBar> {
    let mut bars: Vec<OhlcvBar> = rows
        .iter()
        .filter_map(|row| {
            let Some(time) = parser.parse(&row.time) else {
                debug!(raw = %row.time, "dropping row with unparsable timestamp");
                return None;
            };
            Some(
                OhlcvBar {
                    time,
                    open: row.open.unwrap_or(NAN),
                    high: row.high.unwrap_or(NAN),
                    low: row.low.unwrap_or(NAN),
                    close: row.close.unwrap_or(NAN),
                    volume: row.volume.unwrap_or(NAN),
                }
                .sanitized(),
            )
        })
        .collect();

    sort_and_dedup_by_key(&mut bars, |b| b.time);
    bars
}

/// Extract one field of a bar sequence as a `Series`.
pub fn bar_column(bars: &[OhlcvBar], field: impl Fn(&OhlcvBar) -> f64) -> Series {
    Series {
        index: bars.iter().map(|b| b.time).collect(),
        values: bars.iter().map(field).collect(),
    }
}

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

/// Ordered time-indexed numeric series; values may be NaN.
#[derive(Debug, Clone)]
pub struct Series {
    index: Vec<TimePoint>,
    values: Vec<f64>,
}

impl Series {
    /// Build a series from already-normalized parts.
    ///
    /// Callers must pass an ascending, duplicate-free index; this is the
    /// cheap constructor used by indicator code that derives a new column on
    /// an existing index.
    pub fn from_parts(index: Vec<TimePoint>, values: Vec<f64>) -> Self {
        debug_assert_eq!(index.len(), values.len());
        Self { index, values }
    }

    /// Normalize raw `(timestamp, value)` rows into a series.
    ///
    /// Same policy as [`normalize_bars`]: unparsable timestamps drop the row,
    /// unparsable values become NaN, duplicate keys keep the last occurrence,
    /// result is ascending.
    pub fn normalize(rows: &[(String, Option<f64>)], parser: &dyn TimeParser) -> Self {
        let mut pairs: Vec<(TimePoint, f64)> = rows
            .iter()
            .filter_map(|(raw, value)| {
                let Some(time) = parser.parse(raw) else {
                    debug!(raw = %raw, "dropping row with unparsable timestamp");
                    return None;
                };
                Some((time, value.unwrap_or(NAN)))
            })
            .collect();

        sort_and_dedup_by_key(&mut pairs, |p| p.0);

        Self {
            index: pairs.iter().map(|p| p.0).collect(),
            values: pairs.iter().map(|p| p.1).collect(),
        }
    }

    /// Derive a new column on the same index.
    pub fn with_values(&self, values: Vec<f64>) -> Self {
        debug_assert_eq!(self.index.len(), values.len());
        Self {
            index: self.index.clone(),
            values,
        }
    }

    pub fn index(&self) -> &[TimePoint] {
        &self.index
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Stable-sort by key, then keep only the LAST occurrence of each key run.
///
/// Stable sorting preserves arrival order within equal keys, so "last
/// occurrence" means last as delivered by the upstream feed — a documented
/// policy, not an accident of sort order.
fn sort_and_dedup_by_key<T, K: Ord + Copy>(items: &mut Vec<T>, key: impl Fn(&T) -> K) {
    items.sort_by_key(&key);

    let mut deduped: Vec<T> = Vec::with_capacity(items.len());
    for item in items.drain(..) {
        match deduped.last_mut() {
            Some(last) if key(last) == key(&item) => {
                debug!("duplicate key resolved: keeping last occurrence");
                *last = item;
            }
            _ => deduped.push(item),
        }
    }
    *items = deduped;
}
