//! Series extension orchestrator
//!
//! Extension runs on a working copy of the caller's slices:
//! 1. Size the request and obtain one UID per new slice
//! 2. Order the copy by location
//! 3. Synthesize head and tail slices from the ordered input
//! 4. Check every UID is distinct, then splice, renumber and verify
//!
//! The caller's slices are never touched, so a failure at any step leaves
//! nothing half-extended.

use crate::config::ExtendConfig;
use crate::error::ExtendError;
use ct_series::{order_slices, renumber, synthesize, Boundary, Series, SliceRecord};
use ct_uid::{Uid, UidGenerator, UidSource};
use std::collections::HashSet;

/// Number of slices to add at each end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ExtensionRequest {
    /// Slices below the first slice
    pub head: usize,
    /// Slices above the last slice
    pub tail: usize,
}

impl ExtensionRequest {
    /// Create request with explicit counts
    #[inline]
    #[must_use]
    pub fn new(head: usize, tail: usize) -> Self {
        Self { head, tail }
    }

    /// Same count at both ends
    #[inline]
    #[must_use]
    pub fn both(count: usize) -> Self {
        Self::new(count, count)
    }

    /// Head only
    #[inline]
    #[must_use]
    pub fn head_only(count: usize) -> Self {
        Self::new(count, 0)
    }

    /// Tail only
    #[inline]
    #[must_use]
    pub fn tail_only(count: usize) -> Self {
        Self::new(0, count)
    }

    /// Count requested at `boundary`
    #[inline]
    #[must_use]
    pub fn count(&self, boundary: Boundary) -> usize {
        match boundary {
            Boundary::Head => self.head,
            Boundary::Tail => self.tail,
        }
    }

    /// Total new slices, saturating at `usize::MAX`
    #[inline]
    #[must_use]
    pub fn total(&self) -> usize {
        self.head.saturating_add(self.tail)
    }

    /// Total new slices, `None` on overflow
    #[inline]
    #[must_use]
    pub fn checked_total(&self) -> Option<usize> {
        self.head.checked_add(self.tail)
    }

    /// Check if nothing is requested
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Extends series using a UID source for new slices
#[derive(Debug, Clone)]
pub struct SeriesExtender<G = UidGenerator> {
    config: ExtendConfig,
    uids: G,
}

impl SeriesExtender {
    /// Create extender with the generator described by `config`
    ///
    /// # Errors
    /// Returns error if the configured UID root or random width is invalid
    pub fn new(config: ExtendConfig) -> Result<Self, ExtendError> {
        let uids = config.generator()?;
        Ok(Self { config, uids })
    }
}

impl<G: UidSource> SeriesExtender<G> {
    /// Create extender with an explicit UID source
    #[inline]
    #[must_use]
    pub fn with_uid_source(config: ExtendConfig, uids: G) -> Self {
        Self { config, uids }
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ExtendConfig {
        &self.config
    }

    /// Extend by the counts in the configuration
    ///
    /// # Errors
    /// See [`SeriesExtender::extend`]
    pub fn extend_configured<S: SliceRecord>(
        &mut self,
        slices: &[S],
    ) -> Result<Series<S>, ExtendError> {
        let request = self.config.request();
        self.extend(slices, request)
    }

    /// Extend a series, generating UIDs for the new slices
    ///
    /// Existing slices keep their UIDs; every slice is renumbered.
    ///
    /// # Errors
    /// - [`ExtendError::RequestTooLarge`] if the head and tail counts overflow
    /// - [`ExtendError::Uid`] if the generator cannot produce the batch
    /// - [`ExtendError::Series`] if a slice has no usable location, two
    ///   slices share a location, or fewer than 2 slices are given for a
    ///   non-empty request
    /// - [`ExtendError::UidInUse`] if the input repeats a UID or a generated
    ///   UID is already taken
    /// - [`ExtendError::Inconsistent`] if verification is on and the result
    ///   breaks a series invariant
    pub fn extend<S: SliceRecord>(
        &mut self,
        slices: &[S],
        request: ExtensionRequest,
    ) -> Result<Series<S>, ExtendError> {
        let total = new_slice_count(request)?;
        let uids = self.uids.generate(total)?;
        check_count(total, &uids)?;
        let (series, head, tail) = prepare(slices, request)?;
        self.assemble(series, head, tail, uids)
    }

    /// Extend a series using caller-supplied UIDs for the new slices
    ///
    /// `uids` are assigned to the new slices in ascending location order.
    ///
    /// # Errors
    /// - [`ExtendError::RequestTooLarge`] if the head and tail counts overflow
    /// - [`ExtendError::UidCountMismatch`] if `uids.len()` differs from
    ///   `request.total()`; checked before the slices are looked at
    /// - [`ExtendError::UidInUse`] if a supplied UID repeats another or one
    ///   already in the series
    /// - Everything [`SeriesExtender::extend`] returns
    pub fn extend_with_uids<S: SliceRecord>(
        &self,
        slices: &[S],
        request: ExtensionRequest,
        uids: Vec<Uid>,
    ) -> Result<Series<S>, ExtendError> {
        check_count(new_slice_count(request)?, &uids)?;
        let (series, head, tail) = prepare(slices, request)?;
        self.assemble(series, head, tail, uids)
    }

    fn assemble<S: SliceRecord>(
        &self,
        mut series: Series<S>,
        mut head: Vec<S>,
        mut tail: Vec<S>,
        uids: Vec<Uid>,
    ) -> Result<Series<S>, ExtendError> {
        check_unused(&series, &uids)?;
        let original = series.len();

        // head is ordered outward, so reversed it runs in ascending location
        for (slice, uid) in head.iter_mut().rev().chain(tail.iter_mut()).zip(uids) {
            slice.set_sop_instance_uid(uid);
        }

        let (added_head, added_tail) = (head.len(), tail.len());
        series.prepend_outward(head);
        series.append_outward(tail);
        renumber(&mut series);

        if self.config.verify_output {
            series.verify()?;
        }

        tracing::info!(
            "Extended series from {} to {} slices ({} head, {} tail)",
            original,
            series.len(),
            added_head,
            added_tail
        );
        Ok(series)
    }
}

/// Extend both ends of a series by `count` slices with default settings
///
/// # Errors
/// See [`SeriesExtender::extend`]
pub fn extend<S: SliceRecord>(slices: &[S], count: usize) -> Result<Series<S>, ExtendError> {
    SeriesExtender::new(ExtendConfig::default())?.extend(slices, ExtensionRequest::both(count))
}

type Prepared<S> = (Series<S>, Vec<S>, Vec<S>);

fn prepare<S: SliceRecord>(
    slices: &[S],
    request: ExtensionRequest,
) -> Result<Prepared<S>, ExtendError> {
    let series = order_slices(slices.iter().cloned())?;

    if request.is_empty() {
        tracing::warn!("Extension requested with no slices on either end");
    }

    let synthesize_side = |boundary| match request.count(boundary) {
        0 => Ok(Vec::new()),
        count => synthesize(&series, boundary, count),
    };
    let head = synthesize_side(Boundary::Head)?;
    let tail = synthesize_side(Boundary::Tail)?;

    Ok((series, head, tail))
}

fn new_slice_count(request: ExtensionRequest) -> Result<usize, ExtendError> {
    request.checked_total().ok_or(ExtendError::RequestTooLarge {
        head: request.head,
        tail: request.tail,
    })
}

fn check_count(expected: usize, uids: &[Uid]) -> Result<(), ExtendError> {
    if uids.len() == expected {
        Ok(())
    } else {
        Err(ExtendError::UidCountMismatch {
            expected,
            supplied: uids.len(),
        })
    }
}

/// Existing and new UIDs together must all be distinct
fn check_unused<S: SliceRecord>(series: &Series<S>, uids: &[Uid]) -> Result<(), ExtendError> {
    let mut in_use = HashSet::with_capacity(series.len() + uids.len());
    match series
        .iter()
        .map(SliceRecord::sop_instance_uid)
        .chain(uids)
        .find(|uid| !in_use.insert(*uid))
    {
        Some(uid) => Err(ExtendError::UidInUse { uid: uid.clone() }),
        None => Ok(()),
    }
}
