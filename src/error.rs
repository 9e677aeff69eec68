//! Error types for the puzzle-to-SAT pipeline

use thiserror::Error;

/// Faults that can arise while building or decoding a puzzle encoding.
///
/// An unsatisfiable instance is *not* an error: solving surfaces it as an
/// empty solution set.
#[derive(Debug, Error)]
pub enum PuzzleError {
    /// A required theory component was disabled, or the supplied target-cell
    /// set does not have the size the instance contract expects.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The board/piece data violates a structural invariant (disconnected
    /// shape, target cell outside the usable area, duplicate piece name, ...).
    #[error("invalid instance: {0}")]
    Instance(String),

    /// A model returned by the oracle does not correspond to any generated
    /// placement. Unreachable for a correctly built theory; kept as a
    /// runtime assertion.
    #[error("decode inconsistency: {0}")]
    DecodeInconsistency(String),

    /// The external solver failed or returned an indeterminate verdict.
    /// Propagated fatally; solving is deterministic, so there is no retry.
    #[error("oracle failure: {0}")]
    Oracle(String),
}
