// =============================================================================
// Series aligner
// =============================================================================
//
// Joins two normalized series on their TimePoint keys with a strict INNER
// join: only keys present in both inputs survive. Comparative indicators
// (alpha, rolling correlation, side-by-side RSI) are undefined outside the
// overlapping range, so dropping non-overlapping rows is policy, not loss.

use tracing::debug;

use crate::errors::EngineError;
use crate::series::Series;
use crate::timepoint::TimePoint;

/// Two series joined onto a shared ascending index.
#[derive(Debug, Clone)]
pub struct Aligned {
    pub index: Vec<TimePoint>,
    pub left: Vec<f64>,
    pub right: Vec<f64>,
}

impl Aligned {
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Inner-join two normalized series on TimePoint.
///
/// Both inputs are ascending and duplicate-free (normalization guarantees
/// this), so a single merge walk suffices. An empty overlap is surfaced as
/// [`EngineError::AlignmentEmpty`] rather than an empty table.
pub fn align(a: &Series, b: &Series) -> Result<Aligned, EngineError> {
    let mut index = Vec::new();
    let mut left = Vec::new();
    let mut right = Vec::new();

    let (ai, av) = (a.index(), a.values());
    let (bi, bv) = (b.index(), b.values());

    let mut i = 0;
    let mut j = 0;
    while i < ai.len() && j < bi.len() {
        match ai[i].cmp(&bi[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                index.push(ai[i]);
                left.push(av[i]);
                right.push(bv[j]);
                i += 1;
                j += 1;
            }
        }
    }

    if index.is_empty() {
        debug!(left_len = ai.len(), right_len = bi.len(), "alignment produced no overlap");
        return Err(EngineError::AlignmentEmpty);
    }

    Ok(Aligned { index, left, right })
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::timepoint::DayParser;

    fn series(rows: &[(&str, f64)]) -> Series {
        let raw: Vec<(String, Option<f64>)> = rows
            .iter()
            .map(|(t, v)| (t.to_string(), Some(*v)))
            .collect();
        Series::normalize(&raw, &DayParser)
    }

    #[test]
    fn inner_join_keeps_only_shared_keys() {
        let a = series(&[("2024-01-01", 1.0), ("2024-01-02", 2.0)]);
        let b = series(&[("2024-01-02", 20.0), ("2024-01-03", 30.0)]);
        let joined = align(&a, &b).unwrap();
        assert_eq!(joined.len(), 1);
        assert_eq!(joined.index[0], DayParser.parse_day("2024-01-02"));
        assert_eq!(joined.left, vec![2.0]);
        assert_eq!(joined.right, vec![20.0]);
    }

    #[test]
    fn full_overlap_keeps_everything_in_order() {
        let a = series(&[("2024-01-01", 1.0), ("2024-01-02", 2.0), ("2024-01-03", 3.0)]);
        let b = series(&[("2024-01-01", 4.0), ("2024-01-02", 5.0), ("2024-01-03", 6.0)]);
        let joined = align(&a, &b).unwrap();
        assert_eq!(joined.left, vec![1.0, 2.0, 3.0]);
        assert_eq!(joined.right, vec![4.0, 5.0, 6.0]);
        assert!(joined.index.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn disjoint_ranges_surface_alignment_empty() {
        let a = series(&[("2024-01-01", 1.0)]);
        let b = series(&[("2024-02-01", 2.0)]);
        assert_eq!(align(&a, &b).unwrap_err(), EngineError::AlignmentEmpty);
    }

    #[test]
    fn nan_values_survive_the_join() {
        let a = series(&[("2024-01-01", 1.0)]);
        let raw = vec![("2024-01-01".to_string(), None)];
        let b = Series::normalize(&raw, &DayParser);
        let joined = align(&a, &b).unwrap();
        assert!(joined.right[0].is_nan());
    }

    // Small helper so tests read cleanly.
    trait ParseDay {
        fn parse_day(&self, raw: &str) -> TimePoint;
    }
    impl ParseDay for DayParser {
        fn parse_day(&self, raw: &str) -> TimePoint {
            use crate::timepoint::TimeParser;
            self.parse(raw).unwrap()
        }
    }
}
