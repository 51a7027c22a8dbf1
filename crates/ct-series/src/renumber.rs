//! Instance renumbering

use crate::series::Series;
use crate::slice::SliceRecord;

/// Set each slice's instance number to its zero-based rank in the series
///
/// Run after every splice; the series is not consistent until this has run.
pub fn renumber<S: SliceRecord>(series: &mut Series<S>) {
    for (rank, slice) in series.iter_mut().enumerate() {
        slice.set_instance_number(rank);
    }
}
