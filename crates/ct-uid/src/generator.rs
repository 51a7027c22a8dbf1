//! Batch UID generation
//!
//! A batch of UIDs has the form `<root>.<random>.<timestamp>.<ordinal>`:
//! - `random` is drawn once per batch, zero-padded to a fixed width
//! - `timestamp` is the batch capture time with microsecond resolution
//! - `ordinal` counts `0..n`, zero-padded to the decimal width of `n`
//!
//! Uniqueness across batches is probabilistic. Callers that need a hard
//! guarantee should supply their own identifiers instead.

use crate::clock::{Clock, FixedClock, SystemClock};
use crate::uid::{Uid, UidError, MAX_UID_LEN};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Root used when no organisation root is configured
pub const DEFAULT_UID_ROOT: &str = "1.2.826.0.1.3680043.10.188";

/// Default number of digits in the random component
pub const DEFAULT_RANDOM_WIDTH: u32 = 10;

const MAX_RANDOM_WIDTH: u32 = 18;

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S%6f";

/// Characters produced by [`TIMESTAMP_FORMAT`]
const TIMESTAMP_LEN: usize = 20;

/// Anything that can hand out a batch of fresh UIDs
pub trait UidSource {
    /// Produce `count` mutually distinct UIDs
    ///
    /// # Errors
    /// Returns error if a well-formed UID cannot be produced
    fn generate(&mut self, count: usize) -> Result<Vec<Uid>, UidError>;
}

impl<G: UidSource + ?Sized> UidSource for &mut G {
    fn generate(&mut self, count: usize) -> Result<Vec<Uid>, UidError> {
        (**self).generate(count)
    }
}

/// UID generator with injected randomness and clock
#[derive(Debug, Clone)]
pub struct UidGenerator<R = StdRng, C = SystemClock> {
    root: Uid,
    random_width: u32,
    rng: R,
    clock: C,
}

impl UidGenerator {
    /// Generator under `root` seeded from OS entropy and the system clock
    #[must_use]
    pub fn new(root: Uid) -> Self {
        Self {
            root,
            random_width: DEFAULT_RANDOM_WIDTH,
            rng: StdRng::from_entropy(),
            clock: SystemClock,
        }
    }
}

impl Default for UidGenerator {
    fn default() -> Self {
        Self::new(Uid::from_static(DEFAULT_UID_ROOT))
    }
}

impl UidGenerator<StdRng, FixedClock> {
    /// Reproducible generator for tests and dry runs
    #[must_use]
    pub fn deterministic(root: Uid, seed: u64, at: DateTime<Utc>) -> Self {
        Self {
            root,
            random_width: DEFAULT_RANDOM_WIDTH,
            rng: StdRng::seed_from_u64(seed),
            clock: FixedClock(at),
        }
    }
}

impl<R: RngCore, C: Clock> UidGenerator<R, C> {
    /// Build a generator from explicit parts
    ///
    /// # Errors
    /// Returns error if `random_width` is outside `1..=18` or leaves no room
    /// under `root` for the timestamp and ordinal
    pub fn from_parts(root: Uid, random_width: u32, rng: R, clock: C) -> Result<Self, UidError> {
        check_layout(&root, random_width)?;
        Ok(Self {
            root,
            random_width,
            rng,
            clock,
        })
    }

    /// Change the width of the random component
    ///
    /// # Errors
    /// Returns error if `width` is outside `1..=18` or leaves no room under the
    /// root for the timestamp and ordinal
    pub fn with_random_width(mut self, width: u32) -> Result<Self, UidError> {
        check_layout(&self.root, width)?;
        self.random_width = width;
        Ok(self)
    }

    /// Namespace root
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Uid {
        &self.root
    }

    /// Width of the random component
    #[inline]
    #[must_use]
    pub fn random_width(&self) -> u32 {
        self.random_width
    }

    /// Largest batch whose UIDs all fit in [`MAX_UID_LEN`] characters
    ///
    /// Zero when the root and random width leave no room at all.
    #[must_use]
    pub fn max_batch(&self) -> usize {
        ordinal_room(self.root.as_str().len(), self.random_width).map_or(0, batch_limit)
    }

    fn random_component(&mut self) -> String {
        let width = self.random_width as usize;
        let value = self.rng.gen_range(0..10u64.pow(self.random_width));
        format!("{value:0width$}")
    }
}

impl<R: RngCore, C: Clock> UidSource for UidGenerator<R, C> {
    fn generate(&mut self, count: usize) -> Result<Vec<Uid>, UidError> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let max = batch_limit(ordinal_room(self.root.as_str().len(), self.random_width)?);
        if count > max {
            return Err(UidError::BatchTooLarge { count, max });
        }

        let random = self.random_component();
        let timestamp = self.clock.now().format(TIMESTAMP_FORMAT).to_string();
        let ordinal_width = count.to_string().len();

        (0..count)
            .map(|i| {
                let ordinal = format!("{i:0ordinal_width$}");
                self.root.join([random.as_str(), timestamp.as_str(), ordinal.as_str()])
            })
            .collect()
    }
}

fn check_layout(root: &Uid, width: u32) -> Result<(), UidError> {
    if !(1..=MAX_RANDOM_WIDTH).contains(&width) {
        return Err(UidError::InvalidRandomWidth { width });
    }
    ordinal_room(root.as_str().len(), width).map(|_| ())
}

/// Characters left for the ordinal after `<root>.<random>.<timestamp>.`
fn ordinal_room(root_len: usize, width: u32) -> Result<usize, UidError> {
    let prefix = root_len + width as usize + TIMESTAMP_LEN + 3;
    match MAX_UID_LEN.checked_sub(prefix) {
        Some(room) if room > 0 => Ok(room),
        _ => Err(UidError::LayoutTooLong { root_len, width }),
    }
}

/// Largest count whose decimal width is at most `room` digits
fn batch_limit(room: usize) -> usize {
    u32::try_from(room)
        .ok()
        .and_then(|digits| 10usize.checked_pow(digits))
        .map_or(usize::MAX, |limit| limit - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 12, 31, 23, 59, 59).unwrap()
            + chrono::Duration::microseconds(123_456)
    }

    fn test_root() -> Uid {
        Uid::new("1.2.3").unwrap()
    }

    #[test]
    fn zero_count_is_empty() {
        let mut generator = UidGenerator::deterministic(test_root(), 1, fixed_time());
        assert!(generator.generate(0).unwrap().is_empty());
    }

    #[test]
    fn batch_layout() {
        let mut generator = UidGenerator::deterministic(test_root(), 7, fixed_time());
        let uids = generator.generate(3).unwrap();
        assert_eq!(uids.len(), 3);

        for (i, uid) in uids.iter().enumerate() {
            let parts: Vec<&str> = uid.as_str().split('.').collect();
            assert_eq!(&parts[..3], &["1", "2", "3"]);
            assert_eq!(parts[3].len(), 10);
            assert_eq!(parts[4], "20191231235959123456");
            assert_eq!(parts[5], i.to_string());
            assert!(uid.is_under(&test_root()));
        }
    }

    #[test]
    fn batch_shares_random_and_timestamp() {
        let mut generator = UidGenerator::deterministic(test_root(), 11, fixed_time());
        let uids = generator.generate(4).unwrap();
        let prefixes: HashSet<String> = uids
            .iter()
            .map(|uid| uid.as_str().rsplit_once('.').unwrap().0.to_string())
            .collect();
        assert_eq!(prefixes.len(), 1);
    }

    #[test]
    fn ordinal_padded_to_count_width() {
        let mut generator = UidGenerator::deterministic(test_root(), 3, fixed_time());
        let uids = generator.generate(10).unwrap();
        let ordinals: Vec<&str> = uids
            .iter()
            .map(|uid| uid.as_str().rsplit('.').next().unwrap())
            .collect();
        assert_eq!(ordinals.first(), Some(&"00"));
        assert_eq!(ordinals.last(), Some(&"09"));
    }

    #[test]
    fn same_seed_same_batch() {
        let mut a = UidGenerator::deterministic(test_root(), 42, fixed_time());
        let mut b = UidGenerator::deterministic(test_root(), 42, fixed_time());
        assert_eq!(a.generate(5).unwrap(), b.generate(5).unwrap());
    }

    #[test]
    fn consecutive_batches_differ() {
        let mut generator = UidGenerator::deterministic(test_root(), 42, fixed_time());
        let first = generator.generate(2).unwrap();
        let second = generator.generate(2).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn custom_random_width() {
        let mut generator = UidGenerator::deterministic(test_root(), 5, fixed_time())
            .with_random_width(4)
            .unwrap();
        let uid = generator.generate(1).unwrap().remove(0);
        assert_eq!(uid.as_str().split('.').nth(3).unwrap().len(), 4);
    }

    #[test]
    fn rejects_bad_random_width() {
        let generator = UidGenerator::deterministic(test_root(), 5, fixed_time());
        assert_eq!(
            generator.clone().with_random_width(0).unwrap_err(),
            UidError::InvalidRandomWidth { width: 0 }
        );
        assert!(generator.with_random_width(19).is_err());
    }

    #[test]
    fn overlong_root_fails() {
        let root = Uid::new(format!("1.{}", "2".repeat(40))).unwrap();
        let mut generator = UidGenerator::deterministic(root, 5, fixed_time());
        assert_eq!(generator.max_batch(), 0);
        assert_eq!(
            generator.generate(1),
            Err(UidError::LayoutTooLong {
                root_len: 42,
                width: 10
            })
        );
    }

    #[test]
    fn random_width_must_fit_under_root() {
        let root = Uid::new(DEFAULT_UID_ROOT).unwrap();
        let generator = UidGenerator::deterministic(root, 5, fixed_time());

        let err = generator.clone().with_random_width(15).unwrap_err();
        assert_eq!(
            err,
            UidError::LayoutTooLong {
                root_len: 26,
                width: 15
            }
        );
        assert!(err.is_capacity_error());

        let narrow = generator.with_random_width(14).unwrap();
        assert_eq!(narrow.max_batch(), 9);
    }

    #[test]
    fn from_parts_checks_layout() {
        let root = Uid::new(format!("1.{}", "2".repeat(40))).unwrap();
        let result = UidGenerator::from_parts(
            root,
            10,
            StdRng::seed_from_u64(1),
            FixedClock(fixed_time()),
        );
        assert!(matches!(result, Err(UidError::LayoutTooLong { .. })));
    }

    #[test]
    fn default_root_batch_limit() {
        let mut generator =
            UidGenerator::deterministic(Uid::new(DEFAULT_UID_ROOT).unwrap(), 9, fixed_time());
        assert_eq!(generator.max_batch(), 99_999);
        assert_eq!(
            generator.generate(100_000),
            Err(UidError::BatchTooLarge {
                count: 100_000,
                max: 99_999
            })
        );
    }

    #[test]
    fn full_batch_fills_max_length() {
        // 30 + 1 + 10 + 1 + 20 + 1 leaves a single ordinal digit
        let root = Uid::new(format!("1.{}", "2".repeat(28))).unwrap();
        let mut generator = UidGenerator::deterministic(root, 2, fixed_time());
        assert_eq!(generator.max_batch(), 9);

        let uids = generator.generate(9).unwrap();
        assert!(uids.iter().all(|uid| uid.as_str().len() == crate::MAX_UID_LEN));
        assert!(matches!(
            generator.generate(10),
            Err(UidError::BatchTooLarge { count: 10, max: 9 })
        ));
    }

    #[test]
    fn default_generator_uses_default_root() {
        let mut generator = UidGenerator::default();
        assert_eq!(generator.root().as_str(), DEFAULT_UID_ROOT);
        let uids = generator.generate(2).unwrap();
        assert!(uids.iter().all(|uid| uid.as_str().len() <= crate::MAX_UID_LEN));
    }

    proptest! {
        #[test]
        fn prop_batch_is_distinct(count in 0..500usize, seed in any::<u64>()) {
            let mut generator = UidGenerator::deterministic(test_root(), seed, fixed_time());
            let uids = generator.generate(count).unwrap();
            let distinct: HashSet<&Uid> = uids.iter().collect();
            prop_assert_eq!(uids.len(), count);
            prop_assert_eq!(distinct.len(), count);
        }
    }
}
