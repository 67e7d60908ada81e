//! Accumulated collection state
//!
//! [`CollectionState`] is exclusively owned by one synchronizer instance
//! and mutated only between suspension points, under its lock. Consumers
//! read through [`CollectionSnapshot`], a cheap detached copy.

use crate::page::{Cursor, PageResult};
use crate::phase::{validate_transition, PhaseError, SyncPhase};

/// Mutable accumulation state, private to the synchronizer
#[derive(Debug)]
pub(crate) struct CollectionState<T> {
    /// Append-only item accumulation, in page arrival order
    pub(crate) accumulated: Vec<T>,
    /// Continuation token; only meaningful alongside `has_more`
    cursor: Option<Cursor>,
    /// Authoritative continuation flag from the last page
    has_more: bool,
    /// Server-reported total, for progress display only
    total_count: Option<u64>,
    /// Single-flight guard
    phase: SyncPhase,
}

impl<T> CollectionState<T> {
    pub(crate) fn new() -> Self {
        Self {
            accumulated: Vec::new(),
            cursor: None,
            has_more: false,
            total_count: None,
            phase: SyncPhase::Idle,
        }
    }

    pub(crate) fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub(crate) fn has_more(&self) -> bool {
        self.has_more
    }

    pub(crate) fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    /// Move the phase machine, rejecting illegal transitions.
    pub(crate) fn enter(&mut self, to: SyncPhase) -> Result<(), PhaseError> {
        validate_transition(self.phase, to)?;
        self.phase = to;
        Ok(())
    }

    /// Clear everything accumulated, ahead of a first-page load.
    pub(crate) fn reset(&mut self) {
        self.accumulated.clear();
        self.cursor = None;
        self.has_more = false;
        self.total_count = None;
    }

    /// Adopt a fetched page's continuation state.
    ///
    /// `cursor` and `has_more` move together as one unit. A page reporting
    /// `has_more == false` may still carry a stale cursor; it is dropped
    /// here so it can never be replayed.
    pub(crate) fn commit_page_mark(&mut self, page: &PageResult<T>) {
        if page.has_more {
            self.cursor = page.next_cursor.clone();
        } else {
            self.cursor = None;
        }
        self.has_more = page.has_more;
        if page.total_count.is_some() {
            self.total_count = page.total_count;
        }
    }

    pub(crate) fn snapshot(&self) -> CollectionSnapshot<T>
    where
        T: Clone,
    {
        CollectionSnapshot {
            items: self.accumulated.clone(),
            phase: self.phase,
            has_more: self.has_more,
            total_count: self.total_count,
        }
    }
}

/// Detached read-model of the synchronizer's state
///
/// Handed to the UI and export collaborators; recomputing a projection over
/// `items` on every snapshot is the intended usage.
#[derive(Debug, Clone)]
pub struct CollectionSnapshot<T> {
    /// Accumulated items, in page arrival order
    pub items: Vec<T>,
    /// Phase at snapshot time
    pub phase: SyncPhase,
    /// Whether the server reports further pages
    pub has_more: bool,
    /// Server-reported total, for progress display only
    pub total_count: Option<u64>,
}

impl<T> CollectionSnapshot<T> {
    /// Number of items loaded so far
    #[inline]
    #[must_use]
    pub fn loaded(&self) -> usize {
        self.items.len()
    }

    /// Check if a first-page load is in flight
    #[inline]
    #[must_use]
    pub fn is_fetching_first(&self) -> bool {
        matches!(self.phase, SyncPhase::FetchingFirst)
    }

    /// Check if a continuation fetch is in flight
    #[inline]
    #[must_use]
    pub fn is_fetching_more(&self) -> bool {
        matches!(self.phase, SyncPhase::FetchingMore)
    }

    /// Check if a full materialization is in flight
    #[inline]
    #[must_use]
    pub fn is_draining(&self) -> bool {
        matches!(self.phase, SyncPhase::Draining)
    }

    /// Loaded fraction against the server-reported total, if known
    #[must_use]
    pub fn progress(&self) -> Option<f64> {
        let total = self.total_count?;
        if total == 0 {
            return Some(1.0);
        }
        Some(self.items.len() as f64 / total as f64)
    }
}

impl<T> Default for CollectionSnapshot<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            phase: SyncPhase::Idle,
            has_more: false,
            total_count: None,
        }
    }
}
