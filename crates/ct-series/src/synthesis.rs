//! Slice synthesis by linear extrapolation
//!
//! New slices continue the spacing observed between a boundary slice and its
//! neighbour, chaining outward one step at a time. Each new slice is a clone of
//! the boundary slice with only its location (and the matching patient
//! position component) rewritten.

use crate::error::SeriesError;
use crate::series::Series;
use crate::slice::SliceRecord;
use std::fmt;

/// End of a series that is being extended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boundary {
    /// First (lowest) slice
    Head,
    /// Last (highest) slice
    Tail,
}

impl Boundary {
    /// Resolve a slice index to a boundary
    ///
    /// Only `0` and `len - 1` are boundaries.
    ///
    /// # Errors
    /// - [`SeriesError::InsufficientSlices`] if `len < 2`
    /// - [`SeriesError::InvalidBoundary`] for any interior or out-of-range index
    pub fn resolve(index: usize, len: usize) -> Result<Self, SeriesError> {
        if len < 2 {
            return Err(SeriesError::InsufficientSlices { available: len });
        }
        match index {
            0 => Ok(Self::Head),
            i if i == len - 1 => Ok(Self::Tail),
            _ => Err(SeriesError::InvalidBoundary { index, len }),
        }
    }

    /// Index of the boundary slice in a series of `len >= 2` slices
    #[inline]
    #[must_use]
    pub fn index(self, len: usize) -> usize {
        match self {
            Self::Head => 0,
            Self::Tail => len - 1,
        }
    }

    /// Index of the slice next to the boundary in a series of `len >= 2` slices
    #[inline]
    #[must_use]
    pub fn neighbour_index(self, len: usize) -> usize {
        match self {
            Self::Head => 1,
            Self::Tail => len - 2,
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Head => f.write_str("head"),
            Self::Tail => f.write_str("tail"),
        }
    }
}

/// Signed step from the neighbour to the boundary slice
///
/// Negative at the head of an ascending series, positive at the tail.
///
/// # Errors
/// - [`SeriesError::InsufficientSlices`] if the series has fewer than 2 slices
/// - [`SeriesError::MissingPosition`] if either slice has lost its location
pub fn boundary_spacing<S: SliceRecord>(
    series: &Series<S>,
    boundary: Boundary,
) -> Result<f64, SeriesError> {
    let len = series.len();
    if len < 2 {
        return Err(SeriesError::InsufficientSlices { available: len });
    }
    let edge = location_at(series, boundary.index(len))?;
    let neighbour = location_at(series, boundary.neighbour_index(len))?;
    Ok(edge - neighbour)
}

/// Chain `count` locations outward from `start` in steps of `spacing`
///
/// The first location is `start + spacing`; each later one adds `spacing` to
/// the previous.
#[must_use]
pub fn extrapolate(start: f64, spacing: f64, count: usize) -> Vec<f64> {
    std::iter::successors(Some(start + spacing), |previous| Some(previous + spacing))
        .take(count)
        .collect()
}

/// Clone the boundary slice `count` times at extrapolated locations
///
/// The returned slices are ordered outward: nearest the boundary first.
/// Instance numbers and UIDs are still the template's; callers renumber and
/// re-identify after splicing.
///
/// # Errors
/// - [`SeriesError::InsufficientSlices`] if the series has fewer than 2 slices
/// - [`SeriesError::MissingPosition`] if a boundary slice has lost its location
pub fn synthesize<S: SliceRecord>(
    series: &Series<S>,
    boundary: Boundary,
    count: usize,
) -> Result<Vec<S>, SeriesError> {
    let spacing = boundary_spacing(series, boundary)?;
    let len = series.len();
    let index = boundary.index(len);
    let template = series
        .get(index)
        .ok_or(SeriesError::InvalidBoundary { index, len })?;
    let start = location_at(series, index)?;

    let locations = extrapolate(start, spacing, count);
    tracing::debug!(
        "Synthesizing {} slices at {}: spacing {}, locations {:?}",
        count,
        boundary,
        spacing,
        locations
    );

    Ok(locations
        .into_iter()
        .map(|location| {
            let mut slice = template.clone();
            slice.relocate(location);
            slice
        })
        .collect())
}

/// [`synthesize`] with the boundary given as a slice index
///
/// # Errors
/// Same as [`Boundary::resolve`] and [`synthesize`]
pub fn synthesize_at<S: SliceRecord>(
    series: &Series<S>,
    index: usize,
    count: usize,
) -> Result<Vec<S>, SeriesError> {
    let boundary = Boundary::resolve(index, series.len())?;
    synthesize(series, boundary, count)
}

fn location_at<S: SliceRecord>(series: &Series<S>, index: usize) -> Result<f64, SeriesError> {
    series
        .get(index)
        .and_then(SliceRecord::slice_location)
        .ok_or(SeriesError::MissingPosition { index })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::order_slices;
    use crate::slice::{CtSlice, SLICE_AXIS};
    use ct_uid::Uid;
    use pretty_assertions::assert_eq;

    fn series_at(locations: &[f64]) -> Series<CtSlice> {
        let slices = locations.iter().enumerate().map(|(i, &loc)| {
            CtSlice::new(loc, Uid::new(format!("1.2.{i}")).unwrap())
                .with_image_position([-100.0, -120.0, loc])
                .with_attribute("Index", serde_json::json!(i))
                .with_pixel_data(vec![u8::try_from(i).unwrap(); 4])
        });
        order_slices(slices).unwrap()
    }

    fn locations(slices: &[CtSlice]) -> Vec<Option<f64>> {
        slices.iter().map(SliceRecord::slice_location).collect()
    }

    #[test]
    fn resolve_boundaries() {
        assert_eq!(Boundary::resolve(0, 3), Ok(Boundary::Head));
        assert_eq!(Boundary::resolve(2, 3), Ok(Boundary::Tail));
        assert_eq!(Boundary::resolve(1, 2), Ok(Boundary::Tail));
    }

    #[test]
    fn resolve_rejects_interior_and_past_end() {
        assert_eq!(
            Boundary::resolve(1, 3),
            Err(SeriesError::InvalidBoundary { index: 1, len: 3 })
        );
        assert_eq!(
            Boundary::resolve(3, 3),
            Err(SeriesError::InvalidBoundary { index: 3, len: 3 })
        );
    }

    #[test]
    fn resolve_needs_two_slices() {
        assert_eq!(
            Boundary::resolve(0, 1),
            Err(SeriesError::InsufficientSlices { available: 1 })
        );
    }

    #[test]
    fn spacing_is_local_to_boundary() {
        let series = series_at(&[0.0, 1.0, 5.0, 15.0]);
        assert_eq!(boundary_spacing(&series, Boundary::Head), Ok(-1.0));
        assert_eq!(boundary_spacing(&series, Boundary::Tail), Ok(10.0));
    }

    #[test]
    fn extrapolation_chains() {
        assert_eq!(extrapolate(0.0, -10.0, 3), vec![-10.0, -20.0, -30.0]);
        assert!(extrapolate(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn head_synthesis_goes_outward() {
        let series = series_at(&[0.0, 10.0, 20.0]);
        let new = synthesize(&series, Boundary::Head, 2).unwrap();
        assert_eq!(locations(&new), vec![Some(-10.0), Some(-20.0)]);
    }

    #[test]
    fn tail_synthesis_goes_outward() {
        let series = series_at(&[5.0, 15.0]);
        let new = synthesize(&series, Boundary::Tail, 1).unwrap();
        assert_eq!(locations(&new), vec![Some(25.0)]);
    }

    #[test]
    fn clones_match_template_except_location() {
        let series = series_at(&[0.0, 10.0, 20.0]);
        let template = series.last().unwrap().clone();
        let new = synthesize(&series, Boundary::Tail, 2).unwrap();

        for slice in &new {
            assert_eq!(slice.attributes, template.attributes);
            assert_eq!(slice.pixel_data, template.pixel_data);
            assert_eq!(slice.sop_instance_uid, template.sop_instance_uid);
            assert_eq!(
                &slice.image_position_patient[..SLICE_AXIS],
                &template.image_position_patient[..SLICE_AXIS]
            );
            assert_eq!(
                Some(slice.image_position_patient[SLICE_AXIS]),
                slice.slice_location()
            );
        }
    }

    #[test]
    fn clones_do_not_share_state() {
        let series = series_at(&[0.0, 10.0]);
        let mut new = synthesize(&series, Boundary::Head, 2).unwrap();
        new[0].pixel_data[0] = 99;
        new[0].attributes.insert("Edited".into(), serde_json::json!(true));
        assert_eq!(new[1].pixel_data[0], 0);
        assert!(!new[1].attributes.contains_key("Edited"));
        assert_eq!(series.first().unwrap().pixel_data[0], 0);
    }

    #[test]
    fn single_slice_fails() {
        let series = series_at(&[3.0]);
        assert_eq!(
            synthesize(&series, Boundary::Head, 1),
            Err(SeriesError::InsufficientSlices { available: 1 })
        );
        assert_eq!(
            synthesize(&series, Boundary::Tail, 1),
            Err(SeriesError::InsufficientSlices { available: 1 })
        );
    }

    #[test]
    fn synthesize_at_index() {
        let series = series_at(&[0.0, 2.0, 4.0]);
        let new = synthesize_at(&series, 2, 1).unwrap();
        assert_eq!(locations(&new), vec![Some(6.0)]);
        assert_eq!(
            synthesize_at(&series, 1, 1),
            Err(SeriesError::InvalidBoundary { index: 1, len: 3 })
        );
    }

    #[test]
    fn zero_count_is_empty() {
        let series = series_at(&[0.0, 2.0]);
        assert!(synthesize(&series, Boundary::Tail, 0).unwrap().is_empty());
    }
}
