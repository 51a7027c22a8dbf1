//! Series ordering

use crate::error::SeriesError;
use crate::series::Series;
use crate::slice::SliceRecord;
use std::collections::VecDeque;

/// Sort slices ascending by location into a [`Series`]
///
/// Instance numbers and UIDs are left as they are.
///
/// # Errors
/// - [`SeriesError::MissingPosition`] if a slice has no usable location
///   (`index` is its position in the input)
/// - [`SeriesError::DuplicatePosition`] if two slices share a location
pub fn order_slices<S, I>(slices: I) -> Result<Series<S>, SeriesError>
where
    S: SliceRecord,
    I: IntoIterator<Item = S>,
{
    let mut keyed = slices
        .into_iter()
        .enumerate()
        .map(|(index, slice)| {
            slice
                .slice_location()
                .map(|location| (location, slice))
                .ok_or(SeriesError::MissingPosition { index })
        })
        .collect::<Result<Vec<_>, _>>()?;

    keyed.sort_by(|(a, _), (b, _)| a.total_cmp(b));

    if let Some(pair) = keyed.windows(2).find(|pair| pair[0].0 == pair[1].0) {
        return Err(SeriesError::DuplicatePosition { position: pair[0].0 });
    }

    Ok(Series::from_sorted(
        keyed.into_iter().map(|(_, slice)| slice).collect::<VecDeque<_>>(),
    ))
}
