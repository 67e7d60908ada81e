//! Search materialization policy
//!
//! While a search term is active over a partially-loaded collection, the
//! projection covers only what has arrived; [`coverage`] tells the caller
//! when to surface that. [`CollectionSync::materialize_all`] is the
//! explicit, user-confirmed escape hatch that drains the source to
//! exhaustion so search becomes complete.

use crate::error::SyncError;
use crate::fetch::PageFetcher;
use crate::phase::SyncPhase;
use crate::state::CollectionSnapshot;
use crate::sync::{CollectionSync, SkipReason};
use crate::view::FilterState;

/// How much of the collection a search result covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchCoverage {
    /// Every matching item is present in the results
    Complete,
    /// The collection is partially loaded; results may be incomplete
    Partial {
        /// Items loaded so far
        loaded: usize,
        /// Server-reported total, if known
        total: Option<u64>,
    },
}

impl SearchCoverage {
    /// Check if results may be incomplete
    #[inline]
    #[must_use]
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Partial { .. })
    }

    /// Warning line the caller must surface alongside partial results
    #[must_use]
    pub fn warning(&self) -> Option<String> {
        match self {
            Self::Complete => None,
            Self::Partial {
                loaded,
                total: Some(total),
            } => Some(format!(
                "{loaded} of {total} items loaded; results may be incomplete"
            )),
            Self::Partial {
                loaded,
                total: None,
            } => Some(format!(
                "{loaded} items loaded; more are available on the server"
            )),
        }
    }
}

/// Coverage of a projection computed over `snapshot` under `filter`.
///
/// Search over a fully-loaded collection is always complete; so is any
/// projection with an empty search term, because browsing a partial list
/// is the normal incremental-loading experience and needs no warning.
#[must_use]
pub fn coverage<T>(snapshot: &CollectionSnapshot<T>, filter: &FilterState) -> SearchCoverage {
    if filter.search_term().is_empty() || !snapshot.has_more {
        SearchCoverage::Complete
    } else {
        SearchCoverage::Partial {
            loaded: snapshot.loaded(),
            total: snapshot.total_count,
        }
    }
}

/// Result of a completed drain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrainReport {
    /// Continuation pages fetched by the drain
    pub pages: usize,
    /// Items appended by the drain
    pub appended: usize,
}

/// Outcome of a materialization request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// The collection is fully materialized
    Drained(DrainReport),
    /// The request was rejected; another fetch holds the guard
    Skipped(SkipReason),
}

impl<T, F> CollectionSync<T, F>
where
    T: Clone + Send + Sync + 'static,
    F: PageFetcher<T>,
{
    /// Drain the collection to exhaustion with sequential continuation
    /// fetches.
    ///
    /// An explicit, user-triggered operation: it may issue many requests.
    /// Pages are fetched strictly one after another with a short yield in
    /// between; there is never parallel fan-out. Calling this while any
    /// fetch (including another drain) is in flight is a no-op.
    ///
    /// If a page fetch fails after retries, the drain aborts: everything
    /// accumulated so far is preserved, the guard is released, and the
    /// error is surfaced. It does not auto-resume.
    pub async fn materialize_all(&self) -> Result<DrainOutcome, SyncError> {
        {
            let mut state = self.state.lock();
            if state.phase().is_busy() {
                tracing::debug!(phase = ?state.phase(), "materialization skipped; fetch in flight");
                return Ok(DrainOutcome::Skipped(SkipReason::InFlight));
            }
            if !state.has_more() {
                tracing::debug!("materialization requested but collection is already exhausted");
                return Ok(DrainOutcome::Drained(DrainReport::default()));
            }
            state.enter(SyncPhase::Draining)?;
        }
        self.publish();
        tracing::info!("draining collection to exhaustion");

        let mut report = DrainReport::default();
        loop {
            let cursor = self.state.lock().cursor().cloned();
            match self.fetch_with_retry(cursor).await {
                Ok(page) => {
                    let exhausted = {
                        let mut state = self.state.lock();
                        report.pages += 1;
                        report.appended += page.len();
                        state.commit_page_mark(&page);
                        state.accumulated.extend(page.items);
                        !state.has_more()
                    };
                    self.publish();
                    if exhausted {
                        break;
                    }
                }
                Err(err) => {
                    {
                        let mut state = self.state.lock();
                        state.enter(SyncPhase::Idle)?;
                    }
                    self.publish();
                    tracing::error!(
                        error = %err,
                        pages = report.pages,
                        "drain aborted; accumulated items preserved"
                    );
                    return Err(SyncError::Fetch(err));
                }
            }
            tokio::time::sleep(self.config.drain_yield).await;
        }

        {
            let mut state = self.state.lock();
            state.enter(SyncPhase::Idle)?;
        }
        self.publish();
        tracing::info!(
            pages = report.pages,
            appended = report.appended,
            "collection fully materialized"
        );
        Ok(DrainOutcome::Drained(report))
    }
}
