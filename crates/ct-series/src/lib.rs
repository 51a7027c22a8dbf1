//! CT Series System
//!
//! Ordered axial slice series with extrapolating slice synthesis.
//!
//! # Core Concepts
//!
//! - [`SliceRecord`]: Seam to the caller's slice type (location, patient
//!   position, instance number, UID, opaque clone)
//! - [`CtSlice`]: Concrete serde-friendly slice record
//! - [`Series`]: Slices sorted ascending by location, double-ended
//! - [`order_slices`]: Build a [`Series`] from unordered slices
//! - [`synthesize`]: Clone a boundary slice at extrapolated locations
//! - [`renumber`]: Reassign zero-based instance numbers
//!
//! # Example
//!
//! ```rust
//! use ct_series::{order_slices, renumber, synthesize, Boundary, CtSlice, SliceRecord};
//! use ct_uid::Uid;
//!
//! let slices = [20.0, 0.0, 10.0]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &loc)| CtSlice::new(loc, Uid::new(format!("1.2.{i}")).unwrap()));
//! let mut series = order_slices(slices).unwrap();
//!
//! let below = synthesize(&series, Boundary::Head, 2).unwrap();
//! series.prepend_outward(below);
//! renumber(&mut series);
//!
//! let locations: Vec<_> = series.iter().filter_map(SliceRecord::slice_location).collect();
//! assert_eq!(locations, vec![-20.0, -10.0, 0.0, 10.0, 20.0]);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod ordering;
mod renumber;
mod series;
mod slice;
mod synthesis;

// Re-exports
pub use error::{InvariantViolation, SeriesError};
pub use ordering::order_slices;
pub use renumber::renumber;
pub use series::{Series, SeriesSummary};
pub use slice::{format_decimal_string, parse_decimal_string, CtSlice, SliceRecord, SLICE_AXIS};
pub use synthesis::{boundary_spacing, extrapolate, synthesize, synthesize_at, Boundary};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
