// =============================================================================
// Result assembler
// =============================================================================
//
// Turns a finished `IndicatorTable` into the flat, ordered records the
// serialization collaborator encodes. Each record is the canonical time
// string plus a name -> value map; NaN becomes `None` so the encoder renders
// it as null instead of failing on a non-finite float.
//
// Rounding is part of the requested-column description: every column carries
// its own decimal policy, because the upstream consumers expect e.g. alpha at
// 4 decimals but RSI at 2.

use indexmap::IndexMap;
use serde::Serialize;

use crate::table::IndicatorTable;

/// One requested output column: table column name + decimal policy.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub name: String,
    pub decimals: Option<u32>,
}

impl ColumnSpec {
    /// Emit the column at full precision.
    pub fn raw(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            decimals: None,
        }
    }

    /// Emit the column rounded to `decimals` places.
    pub fn rounded(name: impl Into<String>, decimals: u32) -> Self {
        Self {
            name: name.into(),
            decimals: Some(decimals),
        }
    }
}

/// One output row: a time key plus the requested columns in request order.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub time: String,
    #[serde(flatten)]
    pub values: IndexMap<String, Option<f64>>,
}

/// Half-away-from-zero rounding to a fixed number of decimals.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Assemble the requested columns of `table` into ordered records.
///
/// With `drop_incomplete`, any row holding NaN in a REQUESTED column is
/// dropped — used by multi-window tables once every window must have filled.
/// Per-bar outputs pass `false` and keep every row, rendering NaN as null.
pub fn assemble(table: &IndicatorTable, columns: &[ColumnSpec], drop_incomplete: bool) -> Vec<Record> {
    let mut records = Vec::with_capacity(table.len());

    for (row, time) in table.index().iter().enumerate() {
        let mut values: IndexMap<String, Option<f64>> = IndexMap::with_capacity(columns.len());
        let mut complete = true;

        for spec in columns {
            let raw = table
                .column(&spec.name)
                .map(|col| col[row])
                .unwrap_or(f64::NAN);
            if raw.is_nan() {
                complete = false;
                values.insert(spec.name.clone(), None);
            } else {
                let rendered = match spec.decimals {
                    Some(d) => round_to(raw, d),
                    None => raw,
                };
                values.insert(spec.name.clone(), Some(rendered));
            }
        }

        if drop_incomplete && !complete {
            continue;
        }
        records.push(Record {
            time: time.day_string(),
            values,
        });
    }

    records
}
