//! CT UID System
//!
//! Validated identifiers and batch generation for synthesized image instances.
//!
//! # Core Concepts
//!
//! - [`Uid`]: Dotted-decimal identifier, validated on construction
//! - [`UidSource`]: Anything that hands out a batch of fresh UIDs
//! - [`UidGenerator`]: Root + random + timestamp + ordinal generator
//! - [`Clock`]: Injected time source ([`SystemClock`], [`FixedClock`])
//!
//! # Example
//!
//! ```rust
//! use ct_uid::{Uid, UidGenerator, UidSource};
//! use chrono::{TimeZone, Utc};
//!
//! let root = Uid::new("1.2.3").unwrap();
//! let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
//! let mut generator = UidGenerator::deterministic(root.clone(), 42, at);
//!
//! let uids = generator.generate(3).unwrap();
//! assert_eq!(uids.len(), 3);
//! assert!(uids.iter().all(|uid| uid.is_under(&root)));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod clock;
mod generator;
mod uid;

// Re-exports
pub use clock::{Clock, FixedClock, SystemClock};
pub use generator::{UidGenerator, UidSource, DEFAULT_RANDOM_WIDTH, DEFAULT_UID_ROOT};
pub use uid::{Uid, UidError, MAX_UID_LEN};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
