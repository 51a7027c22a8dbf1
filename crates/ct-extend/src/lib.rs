//! CT Series Extension
//!
//! Adds slices at either end of a CT series by extrapolating the boundary
//! spacing and cloning the boundary slice, then renumbers the series and
//! gives each new slice a fresh UID.
//!
//! # Example
//!
//! ```rust
//! use ct_extend::prelude::*;
//!
//! let slices: Vec<CtSlice> = [0.0, 10.0, 20.0]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &loc)| CtSlice::new(loc, Uid::new(format!("1.2.{i}")).unwrap()))
//!     .collect();
//!
//! let mut extender = SeriesExtender::new(ExtendConfig::new()).unwrap();
//! let series = extender.extend(&slices, ExtensionRequest::head_only(2)).unwrap();
//!
//! let locations: Vec<_> = series.iter().filter_map(SliceRecord::slice_location).collect();
//! assert_eq!(locations, vec![-20.0, -10.0, 0.0, 10.0, 20.0]);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod error;
mod extender;

// Re-exports
pub use config::ExtendConfig;
pub use error::{ConfigError, ExtendError};
pub use extender::{extend, ExtensionRequest, SeriesExtender};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for extending series
    pub use crate::{extend, ExtendConfig, ExtendError, ExtensionRequest, SeriesExtender};
    pub use ct_series::{CtSlice, Series, SliceRecord};
    pub use ct_uid::{Uid, UidSource};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
