//! Validated unique identifiers
//!
//! Provides [`Uid`], a dotted-decimal identifier in the DICOM UID alphabet.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maximum length of a UID in characters
pub const MAX_UID_LEN: usize = 64;

/// A dotted-decimal unique identifier
///
/// Only digits and `.` are allowed, components are non-empty, and the whole
/// value is at most [`MAX_UID_LEN`] characters. Zero-padded components such as
/// `0042` are accepted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Uid(String);

impl Uid {
    /// Parse and validate a UID
    ///
    /// # Errors
    /// Returns error if the value is empty, too long, contains a character
    /// other than a digit or `.`, or has an empty component
    pub fn new(value: impl Into<String>) -> Result<Self, UidError> {
        let value = value.into();
        validate(&value)?;
        Ok(Self(value))
    }

    /// Wrap a value already known to be valid
    pub(crate) fn from_static(value: &'static str) -> Self {
        debug_assert!(validate(value).is_ok());
        Self(value.to_string())
    }

    /// Get the UID as a string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of dot-separated components
    #[inline]
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.0.split('.').count()
    }

    /// Check whether `root` is a component-wise prefix of this UID
    #[must_use]
    pub fn is_under(&self, root: &Uid) -> bool {
        self.0
            .strip_prefix(root.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    }

    /// Join extra components onto this UID
    ///
    /// # Errors
    /// Returns error if any component is invalid or the result is too long
    pub fn join<I, S>(&self, components: I) -> Result<Self, UidError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut value = self.0.clone();
        for component in components {
            value.push('.');
            value.push_str(component.as_ref());
        }
        Self::new(value)
    }
}

fn validate(value: &str) -> Result<(), UidError> {
    if value.is_empty() {
        return Err(UidError::Empty);
    }
    if value.len() > MAX_UID_LEN {
        return Err(UidError::TooLong { len: value.len() });
    }
    if let Some((position, ch)) = value
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit() && *c != '.')
    {
        return Err(UidError::InvalidCharacter { ch, position });
    }
    let mut offset = 0;
    for component in value.split('.') {
        if component.is_empty() {
            return Err(UidError::EmptyComponent { position: offset });
        }
        offset += component.len() + 1;
    }
    Ok(())
}

impl Display for Uid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Uid {
    type Err = UidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Uid {
    type Error = UidError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Uid> for String {
    fn from(uid: Uid) -> Self {
        uid.0
    }
}

impl AsRef<str> for Uid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors related to UIDs and their generation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UidError {
    /// Empty UID
    #[error("uid is empty")]
    Empty,

    /// UID longer than the allowed maximum
    #[error("uid is {len} characters long (max {max})", max = MAX_UID_LEN)]
    TooLong { len: usize },

    /// Character outside the digit/dot alphabet
    #[error("invalid character {ch:?} at position {position}")]
    InvalidCharacter { ch: char, position: usize },

    /// Two consecutive dots, or a leading/trailing dot
    #[error("empty component at position {position}")]
    EmptyComponent { position: usize },

    /// Random component width out of range
    #[error("random component width {width} must be between 1 and 18 digits")]
    InvalidRandomWidth { width: u32 },

    /// Root and random component leave no room for timestamp and ordinal
    #[error("a {root_len}-character root with a {width}-digit random component leaves no room for timestamp and ordinal (max {max})", max = MAX_UID_LEN)]
    LayoutTooLong { root_len: usize, width: u32 },

    /// Batch too large for its ordinal to fit in a UID
    #[error("cannot generate {count} uids in one batch, at most {max} fit")]
    BatchTooLarge { count: usize, max: usize },
}

impl UidError {
    /// Check if the generator was asked for something it can never produce
    #[inline]
    #[must_use]
    pub fn is_capacity_error(&self) -> bool {
        matches!(self, Self::LayoutTooLong { .. } | Self::BatchTooLarge { .. })
    }
}
