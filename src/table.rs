// =============================================================================
// Indicator table
// =============================================================================
//
// A `Series` extended with named derived columns on a shared TimePoint index.
// Built once per request, handed to the assembler, then discarded — there is
// no mutable state across invocations.

use indexmap::IndexMap;

use crate::timepoint::TimePoint;

/// Shared time index plus named f64 columns (NaN = missing).
///
/// Column order is insertion order and is preserved through assembly into
/// the output records.
#[derive(Debug, Clone)]
pub struct IndicatorTable {
    index: Vec<TimePoint>,
    columns: IndexMap<String, Vec<f64>>,
}

impl IndicatorTable {
    pub fn new(index: Vec<TimePoint>) -> Self {
        Self {
            index,
            columns: IndexMap::new(),
        }
    }

    /// Add a derived column. The column must be as long as the index; a
    /// mismatch is a programming error in the indicator that produced it.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<f64>) {
        assert_eq!(
            values.len(),
            self.index.len(),
            "column length must match table index"
        );
        self.columns.insert(name.into(), values);
    }

    pub fn index(&self) -> &[TimePoint] {
        &self.index
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timepoint::{DayParser, TimeParser};

    fn index(days: &[&str]) -> Vec<TimePoint> {
        days.iter().map(|d| DayParser.parse(d).unwrap()).collect()
    }

    #[test]
    fn columns_keep_insertion_order() {
        let mut table = IndicatorTable::new(index(&["2024-01-01", "2024-01-02"]));
        table.push_column("b", vec![1.0, 2.0]);
        table.push_column("a", vec![3.0, 4.0]);
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    #[should_panic(expected = "column length must match")]
    fn length_mismatch_panics() {
        let mut table = IndicatorTable::new(index(&["2024-01-01", "2024-01-02"]));
        table.push_column("short", vec![1.0]);
    }

    #[test]
    fn replacing_a_column_keeps_its_slot() {
        let mut table = IndicatorTable::new(index(&["2024-01-01"]));
        table.push_column("x", vec![1.0]);
        table.push_column("x", vec![2.0]);
        assert_eq!(table.column("x").unwrap(), &[2.0]);
        assert_eq!(table.column_names().count(), 1);
    }
}
