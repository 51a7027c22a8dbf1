//! Ordered slice series
//!
//! [`Series`] is a double-ended container so slices can be spliced onto either
//! end in O(1). It is only ever built through [`crate::order_slices`], which
//! guarantees ascending, duplicate-free locations on construction.

use crate::error::InvariantViolation;
use crate::slice::SliceRecord;
use std::collections::{HashSet, VecDeque};

/// Slices sorted ascending by location
#[derive(Debug, Clone, PartialEq)]
pub struct Series<S> {
    slices: VecDeque<S>,
}

impl<S: SliceRecord> Series<S> {
    pub(crate) fn from_sorted(slices: VecDeque<S>) -> Self {
        Self { slices }
    }

    /// Number of slices
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Check if the series has no slices
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Slice at `index`
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&S> {
        self.slices.get(index)
    }

    /// Lowest slice
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&S> {
        self.slices.front()
    }

    /// Highest slice
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&S> {
        self.slices.back()
    }

    /// Iterate slices in spatial order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &S> + ExactSizeIterator {
        self.slices.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut S> {
        self.slices.iter_mut()
    }

    /// Locations in spatial order (`None` where a slice has lost its location)
    #[must_use]
    pub fn positions(&self) -> Vec<Option<f64>> {
        self.slices.iter().map(SliceRecord::slice_location).collect()
    }

    /// Splice slices below the head
    ///
    /// `outward` is ordered from the slice nearest the current head to the
    /// farthest, so the last element becomes the new first slice.
    pub fn prepend_outward(&mut self, outward: impl IntoIterator<Item = S>) {
        for slice in outward {
            self.slices.push_front(slice);
        }
    }

    /// Splice slices above the tail
    ///
    /// `outward` is ordered from the slice nearest the current tail to the
    /// farthest, so the last element becomes the new last slice.
    pub fn append_outward(&mut self, outward: impl IntoIterator<Item = S>) {
        self.slices.extend(outward);
    }

    /// Check every series invariant
    ///
    /// # Errors
    /// Returns the first violation found: a missing or non-increasing
    /// location, an instance number that is not the slice's rank, or a
    /// repeated UID
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        let mut previous: Option<f64> = None;
        let mut seen = HashSet::with_capacity(self.slices.len());

        for (index, slice) in self.slices.iter().enumerate() {
            let location = slice
                .slice_location()
                .ok_or(InvariantViolation::MissingPosition { index })?;
            if previous.is_some_and(|p| location <= p) {
                return Err(InvariantViolation::NotAscending { index });
            }
            previous = Some(location);

            let found = slice.instance_number();
            if found != index {
                return Err(InvariantViolation::InstanceNumberMismatch { index, found });
            }

            if !seen.insert(slice.sop_instance_uid()) {
                return Err(InvariantViolation::DuplicateUid {
                    uid: slice.sop_instance_uid().clone(),
                });
            }
        }

        Ok(())
    }

    /// Extent and boundary spacing of the series
    #[must_use]
    pub fn summary(&self) -> SeriesSummary {
        let at = |i: usize| self.slices.get(i).and_then(SliceRecord::slice_location);
        let n = self.slices.len();
        let spacing = |outer: Option<f64>, inner: Option<f64>| match (outer, inner) {
            (Some(o), Some(i)) if n >= 2 => Some(o - i),
            _ => None,
        };
        let first = at(0);
        let last = n.checked_sub(1).and_then(at);

        SeriesSummary {
            slices: n,
            first,
            last,
            head_spacing: spacing(first, at(1)),
            tail_spacing: spacing(last, n.checked_sub(2).and_then(at)),
        }
    }

    /// Consume into a vector in spatial order
    #[must_use]
    pub fn into_vec(self) -> Vec<S> {
        self.slices.into()
    }
}

impl<S> IntoIterator for Series<S> {
    type Item = S;
    type IntoIter = std::collections::vec_deque::IntoIter<S>;

    fn into_iter(self) -> Self::IntoIter {
        self.slices.into_iter()
    }
}

impl<'a, S> IntoIterator for &'a Series<S> {
    type Item = &'a S;
    type IntoIter = std::collections::vec_deque::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.slices.iter()
    }
}

/// Extent and boundary spacing of a series
///
/// Spacings are signed differences `boundary - neighbour`, so the head
/// spacing of an ascending series is negative.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SeriesSummary {
    /// Number of slices
    pub slices: usize,
    /// Location of the first slice
    pub first: Option<f64>,
    /// Location of the last slice
    pub last: Option<f64>,
    /// First minus second location
    pub head_spacing: Option<f64>,
    /// Last minus second-to-last location
    pub tail_spacing: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::order_slices;
    use crate::slice::CtSlice;
    use ct_uid::Uid;

    fn series_at(locations: &[f64]) -> Series<CtSlice> {
        let slices = locations.iter().enumerate().map(|(i, &loc)| {
            let mut slice = CtSlice::new(loc, Uid::new(format!("1.2.{i}")).unwrap());
            slice.instance_number = i;
            slice
        });
        order_slices(slices).unwrap()
    }

    #[test]
    fn prepend_outward_reverses_into_place() {
        let mut series = series_at(&[0.0, 10.0]);
        let below = [-10.0, -20.0]
            .iter()
            .map(|&loc| CtSlice::new(loc, Uid::new("9.9").unwrap()));
        series.prepend_outward(below);
        assert_eq!(
            series.positions(),
            vec![Some(-20.0), Some(-10.0), Some(0.0), Some(10.0)]
        );
    }

    #[test]
    fn append_outward_keeps_order() {
        let mut series = series_at(&[0.0, 10.0]);
        let above = [20.0, 30.0]
            .iter()
            .map(|&loc| CtSlice::new(loc, Uid::new("9.9").unwrap()));
        series.append_outward(above);
        assert_eq!(
            series.positions(),
            vec![Some(0.0), Some(10.0), Some(20.0), Some(30.0)]
        );
    }

    #[test]
    fn verify_accepts_valid_series() {
        assert!(series_at(&[1.0, 2.0, 4.0]).verify().is_ok());
    }

    #[test]
    fn verify_flags_numbering() {
        let mut series = series_at(&[1.0, 2.0, 4.0]);
        series.slices[1].instance_number = 5;
        assert_eq!(
            series.verify(),
            Err(InvariantViolation::InstanceNumberMismatch { index: 1, found: 5 })
        );
    }

    #[test]
    fn verify_flags_duplicate_uid() {
        let mut series = series_at(&[1.0, 2.0]);
        series.slices[1].sop_instance_uid = Uid::new("1.2.0").unwrap();
        assert!(matches!(
            series.verify(),
            Err(InvariantViolation::DuplicateUid { .. })
        ));
    }

    #[test]
    fn verify_flags_order() {
        let mut series = series_at(&[1.0, 2.0]);
        series.slices[1].slice_location = Some("0.5".to_string());
        assert_eq!(
            series.verify(),
            Err(InvariantViolation::NotAscending { index: 1 })
        );
    }

    #[test]
    fn summary_reports_boundary_spacing() {
        let summary = series_at(&[0.0, 2.5, 5.0, 9.0]).summary();
        assert_eq!(summary.slices, 4);
        assert_eq!(summary.first, Some(0.0));
        assert_eq!(summary.last, Some(9.0));
        assert_eq!(summary.head_spacing, Some(-2.5));
        assert_eq!(summary.tail_spacing, Some(4.0));
    }

    #[test]
    fn summary_single_slice_has_no_spacing() {
        let summary = series_at(&[3.0]).summary();
        assert_eq!(summary.first, Some(3.0));
        assert_eq!(summary.last, Some(3.0));
        assert_eq!(summary.head_spacing, None);
        assert_eq!(summary.tail_spacing, None);
    }
}
