//! Extension configuration
//!
//! Loaded from TOML; every key is optional:
//!
//! ```toml
//! uid_root = "1.2.826.0.1.3680043.10.188"
//! random_width = 10
//! head_slices = 5
//! tail_slices = 5
//! verify_output = true
//! ```

use crate::error::ConfigError;
use crate::extender::ExtensionRequest;
use ct_uid::{Uid, UidGenerator, DEFAULT_RANDOM_WIDTH, DEFAULT_UID_ROOT};
use serde::{Deserialize, Serialize};

/// Extension configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtendConfig {
    /// Root under which new UIDs are generated
    pub uid_root: String,
    /// Digits in the random UID component
    pub random_width: u32,
    /// Slices to add below the first slice
    pub head_slices: usize,
    /// Slices to add above the last slice
    pub tail_slices: usize,
    /// Check every series invariant before returning
    pub verify_output: bool,
}

impl ExtendConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML
    ///
    /// # Errors
    /// Returns error if the document is not valid TOML or has mistyped keys
    pub fn from_toml_str(document: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(document)?)
    }

    /// With UID root
    #[inline]
    #[must_use]
    pub fn with_uid_root(mut self, root: impl Into<String>) -> Self {
        self.uid_root = root.into();
        self
    }

    /// With random component width
    #[inline]
    #[must_use]
    pub fn with_random_width(mut self, width: u32) -> Self {
        self.random_width = width;
        self
    }

    /// With the same slice count on both ends
    #[inline]
    #[must_use]
    pub fn with_slices(mut self, count: usize) -> Self {
        self.head_slices = count;
        self.tail_slices = count;
        self
    }

    /// With head slice count
    #[inline]
    #[must_use]
    pub fn with_head_slices(mut self, count: usize) -> Self {
        self.head_slices = count;
        self
    }

    /// With tail slice count
    #[inline]
    #[must_use]
    pub fn with_tail_slices(mut self, count: usize) -> Self {
        self.tail_slices = count;
        self
    }

    /// With output verification
    #[inline]
    #[must_use]
    pub fn with_verify_output(mut self, verify: bool) -> Self {
        self.verify_output = verify;
        self
    }

    /// Requested slice counts
    #[inline]
    #[must_use]
    pub fn request(&self) -> ExtensionRequest {
        ExtensionRequest::new(self.head_slices, self.tail_slices)
    }

    /// Validated UID root
    ///
    /// # Errors
    /// Returns error if `uid_root` is not a valid UID
    pub fn uid_root(&self) -> Result<Uid, ConfigError> {
        Uid::new(self.uid_root.as_str()).map_err(|source| ConfigError::InvalidUidRoot {
            root: self.uid_root.clone(),
            source,
        })
    }

    /// UID generator for this configuration
    ///
    /// # Errors
    /// Returns error if the root or random width is invalid
    pub fn generator(&self) -> Result<UidGenerator, ConfigError> {
        UidGenerator::new(self.uid_root()?)
            .with_random_width(self.random_width)
            .map_err(ConfigError::InvalidRandomWidth)
    }
}

impl Default for ExtendConfig {
    fn default() -> Self {
        Self {
            uid_root: DEFAULT_UID_ROOT.to_string(),
            random_width: DEFAULT_RANDOM_WIDTH,
            head_slices: 0,
            tail_slices: 0,
            verify_output: true,
        }
    }
}
