//! Slice records
//!
//! [`SliceRecord`] is the seam between this crate and whatever image container
//! the caller uses. Only the location, patient position, instance number and
//! SOP instance UID are ever read or written; everything else travels through
//! `Clone` untouched.

use ct_uid::Uid;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Patient-coordinate component that tracks the slice location
pub const SLICE_AXIS: usize = 2;

/// One axial image in a series
pub trait SliceRecord: Clone {
    /// Location along the series axis, `None` if absent or not a finite number
    fn slice_location(&self) -> Option<f64>;

    /// Overwrite the location along the series axis
    fn set_slice_location(&mut self, location: f64);

    /// Patient coordinate of the slice origin
    fn image_position(&self) -> [f64; 3];

    /// Overwrite the patient coordinate of the slice origin
    fn set_image_position(&mut self, position: [f64; 3]);

    /// Zero-based position within the series
    fn instance_number(&self) -> usize;

    /// Overwrite the instance number
    fn set_instance_number(&mut self, number: usize);

    /// Instance identifier
    fn sop_instance_uid(&self) -> &Uid;

    /// Overwrite the instance identifier
    fn set_sop_instance_uid(&mut self, uid: Uid);

    /// Move the slice to `location`, keeping the patient position in step
    fn relocate(&mut self, location: f64) {
        self.set_slice_location(location);
        let mut position = self.image_position();
        position[SLICE_AXIS] = location;
        self.set_image_position(position);
    }
}

/// Concrete CT slice record
///
/// `slice_location` is kept as a DICOM decimal string so values round-trip
/// exactly as the source wrote them. JSON numbers are accepted on input and
/// stored in their shortest decimal spelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtSlice {
    /// Decimal string location along the series axis
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_location"
    )]
    pub slice_location: Option<String>,
    /// Patient coordinate of the slice origin
    pub image_position_patient: [f64; 3],
    /// Zero-based instance number
    #[serde(default)]
    pub instance_number: usize,
    /// Instance identifier
    pub sop_instance_uid: Uid,
    /// Opaque attributes copied verbatim
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, serde_json::Value>,
    /// Opaque pixel payload copied verbatim
    #[serde(default, with = "hex::serde")]
    pub pixel_data: Vec<u8>,
}

impl CtSlice {
    /// Slice at `location` with the patient position on the slice axis
    #[must_use]
    pub fn new(location: f64, sop_instance_uid: Uid) -> Self {
        let mut image_position_patient = [0.0; 3];
        image_position_patient[SLICE_AXIS] = location;
        Self {
            slice_location: Some(format_decimal_string(location)),
            image_position_patient,
            instance_number: 0,
            sop_instance_uid,
            attributes: BTreeMap::new(),
            pixel_data: Vec::new(),
        }
    }

    /// With opaque attribute
    #[inline]
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// With pixel payload
    #[inline]
    #[must_use]
    pub fn with_pixel_data(mut self, pixel_data: Vec<u8>) -> Self {
        self.pixel_data = pixel_data;
        self
    }

    /// With patient position
    #[inline]
    #[must_use]
    pub fn with_image_position(mut self, position: [f64; 3]) -> Self {
        self.image_position_patient = position;
        self
    }
}

impl SliceRecord for CtSlice {
    fn slice_location(&self) -> Option<f64> {
        self.slice_location.as_deref().and_then(parse_decimal_string)
    }

    fn set_slice_location(&mut self, location: f64) {
        self.slice_location = Some(format_decimal_string(location));
    }

    fn image_position(&self) -> [f64; 3] {
        self.image_position_patient
    }

    fn set_image_position(&mut self, position: [f64; 3]) {
        self.image_position_patient = position;
    }

    fn instance_number(&self) -> usize {
        self.instance_number
    }

    fn set_instance_number(&mut self, number: usize) {
        self.instance_number = number;
    }

    fn sop_instance_uid(&self) -> &Uid {
        &self.sop_instance_uid
    }

    fn set_sop_instance_uid(&mut self, uid: Uid) {
        self.sop_instance_uid = uid;
    }
}

fn deserialize_location<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Location {
        Text(String),
        Number(f64),
    }

    Ok(Option::<Location>::deserialize(deserializer)?.map(|location| match location {
        Location::Text(text) => text,
        Location::Number(value) => format_decimal_string(value),
    }))
}

/// Parse a decimal string, ignoring surrounding padding
///
/// Returns `None` for empty, non-numeric or non-finite values.
#[must_use]
pub fn parse_decimal_string(value: &str) -> Option<f64> {
    value
        .trim_matches(|c: char| c.is_whitespace() || c == '\0')
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Shortest decimal string that parses back to `value`
#[must_use]
pub fn format_decimal_string(value: f64) -> String {
    // `-0` would otherwise survive as a distinct spelling of zero
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}
