//! Error types for series handling

use ct_uid::Uid;

/// Failures while ordering a series or synthesizing slices
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    /// A slice has no usable numeric location
    #[error("slice {index} has no usable slice location")]
    MissingPosition { index: usize },

    /// Spacing needs at least two slices
    #[error("at least 2 slices are needed to derive spacing, found {available}")]
    InsufficientSlices { available: usize },

    /// Boundary index is neither the first nor the last slice
    #[error("index {index} is not a boundary of a series of {len} slices")]
    InvalidBoundary { index: usize, len: usize },

    /// Two slices share a location
    #[error("duplicate slice location {position}")]
    DuplicatePosition { position: f64 },
}

impl SeriesError {
    /// Check if the error comes from caller data rather than a programming error
    #[inline]
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Self::InvalidBoundary { .. })
    }
}

/// A broken series invariant found by [`crate::Series::verify`]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    /// Location does not strictly increase at `index`
    #[error("slice location does not increase at index {index}")]
    NotAscending { index: usize },

    /// Instance number differs from the slice's rank
    #[error("slice {index} has instance number {found}")]
    InstanceNumberMismatch { index: usize, found: usize },

    /// UID appears more than once
    #[error("uid {uid} appears more than once")]
    DuplicateUid { uid: Uid },

    /// Location missing on a slice in an ordered series
    #[error("slice {index} lost its slice location")]
    MissingPosition { index: usize },
}
