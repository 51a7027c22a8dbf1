//! Error types for series extension
//!
//! Failures from ordering and synthesis pass through unchanged; this layer
//! only adds the checks that belong to the orchestrator itself:
//! - Request size, identifier override length and reuse
//! - Final consistency of the extended series
//! - Configuration

use ct_series::{InvariantViolation, SeriesError};
use ct_uid::{Uid, UidError};

/// Main extension error type
#[derive(Debug, thiserror::Error)]
pub enum ExtendError {
    /// Ordering or synthesis failed
    #[error(transparent)]
    Series(#[from] SeriesError),

    /// UID generation failed
    #[error(transparent)]
    Uid(#[from] UidError),

    /// Head and tail counts overflow when added together
    #[error("cannot add {head} head and {tail} tail slices in one request")]
    RequestTooLarge { head: usize, tail: usize },

    /// Supplied UID count differs from the number of new slices
    #[error("{expected} new slices need {expected} uids, {supplied} supplied")]
    UidCountMismatch { expected: usize, supplied: usize },

    /// UID of a slice repeats another UID in the extended series
    #[error("uid {uid} is already in use")]
    UidInUse { uid: Uid },

    /// Extended series failed its final consistency check
    #[error("extended series is inconsistent: {0}")]
    Inconsistent(#[from] InvariantViolation),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ExtendError {
    /// Check if the caller's input or arguments caused the failure
    #[inline]
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        match self {
            Self::Series(e) => e.is_input_error(),
            Self::Uid(e) => e.is_capacity_error(),
            Self::RequestTooLarge { .. }
            | Self::UidCountMismatch { .. }
            | Self::UidInUse { .. }
            | Self::Config(_) => true,
            Self::Inconsistent(_) => false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML could not be parsed
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// UID root is not a valid UID
    #[error("invalid uid root {root:?}: {source}")]
    InvalidUidRoot { root: String, source: UidError },

    /// Random width is out of range
    #[error("invalid random width: {0}")]
    InvalidRandomWidth(#[source] UidError),
}
