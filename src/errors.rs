// =============================================================================
// Engine error surface
// =============================================================================
//
// Only series-level failures become errors: an empty acquisition result, or
// two series with no overlapping time points. Row-level anomalies (malformed
// fields, corrupt bars, arithmetic edge cases) are recovered locally as NaN
// and never abort a computation — see the series and indicator modules.
//
// An operation returns either a full table or one of these errors, never a
// partial table alongside an error.

use thiserror::Error;

/// Series-level failures surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The acquired series had zero rows, or no row survived normalization.
    /// Distinct from a valid-but-empty result so callers can report it.
    #[error("input series '{0}' is empty")]
    EmptyInput(&'static str),

    /// Two series share no common time point; comparative indicators
    /// (alpha, correlation) are undefined everywhere.
    #[error("series share no common time points")]
    AlignmentEmpty,
}
