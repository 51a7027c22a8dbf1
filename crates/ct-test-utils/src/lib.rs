//! Testing utilities for the CT extension workspace
//!
//! Shared slice fixtures and a reproducible extender.

#![allow(missing_docs)]

use chrono::{DateTime, TimeZone, Utc};
use ct_extend::{ExtendConfig, SeriesExtender};
use ct_series::{CtSlice, Series, SliceRecord};
use ct_uid::{FixedClock, Uid, UidGenerator};
use rand::rngs::StdRng;

pub type DeterministicExtender = SeriesExtender<UidGenerator<StdRng, FixedClock>>;

pub const TEST_ROOT: &str = "1.2.3.4";

pub fn test_root() -> Uid {
    Uid::new(TEST_ROOT).unwrap()
}

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap()
}

/// Slice at `location` with recognisable opaque content
pub fn slice_at(location: f64, tag: usize) -> CtSlice {
    CtSlice::new(location, Uid::new(format!("9.8.7.{tag}")).unwrap())
        .with_image_position([-249.5, -180.25, location])
        .with_attribute("Modality", serde_json::json!("CT"))
        .with_attribute("SeriesTag", serde_json::json!(tag))
        .with_pixel_data((0..16u8).map(|b| b.wrapping_add(tag.to_le_bytes()[0])).collect())
}

pub fn slices_at(locations: &[f64]) -> Vec<CtSlice> {
    locations
        .iter()
        .enumerate()
        .map(|(tag, &location)| slice_at(location, tag))
        .collect()
}

pub fn deterministic_extender(seed: u64) -> DeterministicExtender {
    deterministic_extender_with(ExtendConfig::new().with_uid_root(TEST_ROOT), seed)
}

pub fn deterministic_extender_with(config: ExtendConfig, seed: u64) -> DeterministicExtender {
    let generator = UidGenerator::deterministic(config.uid_root().unwrap(), seed, fixed_time())
        .with_random_width(config.random_width)
        .unwrap();
    SeriesExtender::with_uid_source(config, generator)
}

pub fn locations<S: SliceRecord>(series: &Series<S>) -> Vec<f64> {
    series.iter().filter_map(SliceRecord::slice_location).collect()
}

pub fn instance_numbers<S: SliceRecord>(series: &Series<S>) -> Vec<usize> {
    series.iter().map(SliceRecord::instance_number).collect()
}

pub fn uids<S: SliceRecord>(series: &Series<S>) -> Vec<String> {
    series
        .iter()
        .map(|slice| slice.sop_instance_uid().to_string())
        .collect()
}

pub fn supplied_uids(count: usize) -> Vec<Uid> {
    (0..count)
        .map(|i| Uid::new(format!("5.5.5.{i}")).unwrap())
        .collect()
}
