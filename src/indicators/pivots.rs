// =============================================================================
// Fibonacci Pivot Levels
// =============================================================================
//
// Per-bar level set, no history needed:
//   pivot = (H + L + C) / 3,   range = H - L
//   s_k = pivot - range * ratio_k,   r_k = pivot + range * ratio_k
// with ratios {0.382, 0.618, 1.000, 1.618, 2.618}.
//
// Nearest support    = the largest support STRICTLY below the close; when the
//                      close sits at or below every support, fall back to the
//                      MINIMUM (most extreme, ratio 2.618) support.
// Nearest resistance = the smallest resistance STRICTLY above the close; when
//                      none exists, fall back to the MAXIMUM resistance.
//
// The fallback is asymmetric on purpose (min of all vs max of all) and must
// not be "simplified": both sides fall back to the ratio-2.618 extreme.
//
// Levels round to 3 decimals; distances to the close round to 2, expressed as
// a percentage of the close.

use serde::Serialize;

use crate::assemble::round_to;

/// Level ratios applied to the bar range on both sides of the pivot.
const RATIOS: [f64; 5] = [0.382, 0.618, 1.000, 1.618, 2.618];

/// Full pivot set for one bar.
#[derive(Debug, Clone, Serialize)]
pub struct PivotLevels {
    pub pivot: f64,
    /// s1 (ratio 0.382) through s5 (ratio 2.618), descending in price.
    pub supports: [f64; 5],
    /// r1 (ratio 0.382) through r5 (ratio 2.618), ascending in price.
    pub resistances: [f64; 5],
    pub distance_to_support: f64,
    pub distance_to_resistance: f64,
}

/// Compute the Fibonacci pivot set for a single bar.
///
/// Any NaN among high/low/close makes every output NaN — a bar with a corrupt
/// extreme has no meaningful level geometry.
pub fn fibonacci_pivots(high: f64, low: f64, close: f64) -> PivotLevels {
    if !high.is_finite() || !low.is_finite() || !close.is_finite() {
        return PivotLevels {
            pivot: f64::NAN,
            supports: [f64::NAN; 5],
            resistances: [f64::NAN; 5],
            distance_to_support: f64::NAN,
            distance_to_resistance: f64::NAN,
        };
    }

    let pivot = (high + low + close) / 3.0;
    let range = high - low;

    let mut supports = [0.0; 5];
    let mut resistances = [0.0; 5];
    for (k, ratio) in RATIOS.iter().enumerate() {
        supports[k] = pivot - range * ratio;
        resistances[k] = pivot + range * ratio;
    }

    let nearest_support = supports
        .iter()
        .copied()
        .filter(|s| *s < close)
        .fold(f64::NEG_INFINITY, f64::max);
    let nearest_support = if nearest_support.is_finite() {
        nearest_support
    } else {
        // Close at or below every support: use the most extreme one.
        supports.iter().copied().fold(f64::INFINITY, f64::min)
    };

    let nearest_resistance = resistances
        .iter()
        .copied()
        .filter(|r| *r > close)
        .fold(f64::INFINITY, f64::min);
    let nearest_resistance = if nearest_resistance.is_finite() {
        nearest_resistance
    } else {
        resistances.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    };

    let (distance_to_support, distance_to_resistance) = if close == 0.0 {
        // Distance is a percentage of the close; a zero close has no scale.
        (f64::NAN, f64::NAN)
    } else {
        (
            round_to((close - nearest_support).abs() / close * 100.0, 2),
            round_to((nearest_resistance - close).abs() / close * 100.0, 2),
        )
    };

    PivotLevels {
        pivot: round_to(pivot, 3),
        supports: supports.map(|s| round_to(s, 3)),
        resistances: resistances.map(|r| round_to(r, 3)),
        distance_to_support,
        distance_to_resistance,
    }
}
