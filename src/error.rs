// Error taxonomy for timeline operations

use crate::timeline::note::NoteId;

/// Result type for timeline operations
pub type TimelineResult<T> = Result<T, TimelineError>;

/// Errors produced by timeline model operations and record import.
///
/// All operations returning one of these are atomic: on error, nothing
/// about the song has changed. Near-duplicate note placement is NOT an
/// error (see `AddOutcome::Duplicate`) and storage failures live in
/// `store::StoreError`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimelineError {
    #[error("key {0} is outside the playable range 1-15")]
    KeyOutOfRange(i64),

    #[error("velocity {0} is outside the range 1-127")]
    VelocityOutOfRange(i64),

    #[error("note duration must be positive, got {0}")]
    NonPositiveDuration(f64),

    #[error("start position must be non-negative, got {0}")]
    NegativeStart(f64),

    #[error("bpm must be positive, got {0}")]
    InvalidBpm(u32),

    #[error("note {0} not found")]
    NoteNotFound(NoteId),

    #[error("malformed song record: {0}")]
    MalformedRecord(String),
}
