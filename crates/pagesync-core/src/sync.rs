//! Collection synchronizer
//!
//! Owns accumulated state across pages and enforces single-flight
//! semantics: at most one fetch is in flight per collection at any
//! instant. Overlapping operations lose the phase transition and return a
//! typed skip outcome instead of fetching.
//!
//! Concurrency model: all mutation happens synchronously under the state
//! lock, which is never held across an `.await`. The phase is claimed
//! before the first suspension point and released after the last one, so
//! the guard is sufficient without any further locking.

use crate::error::{FetchError, SyncError};
use crate::fetch::PageFetcher;
use crate::page::{Cursor, PageResult};
use crate::phase::SyncPhase;
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::state::{CollectionSnapshot, CollectionState};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Synchronizer configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Items requested per page
    pub page_size: usize,
    /// Backoff policy wrapped around every page fetch
    pub retry: RetryPolicy,
    /// Pause between pages while draining, to avoid starving the host
    /// event loop and hammering the backend
    pub drain_yield: Duration,
}

impl SyncConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With page size
    #[inline]
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// With retry policy
    #[inline]
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// With inter-page drain yield
    #[inline]
    #[must_use]
    pub fn with_drain_yield(mut self, drain_yield: Duration) -> Self {
        self.drain_yield = drain_yield;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            retry: RetryPolicy::default(),
            drain_yield: Duration::from_millis(25),
        }
    }
}

/// Outcome of a load operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was fetched and committed
    Loaded {
        /// Items added to the accumulation by this load
        appended: usize,
    },
    /// The operation was rejected without touching the network
    Skipped(SkipReason),
}

impl LoadOutcome {
    /// Check if the operation was rejected
    #[inline]
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

/// Why a load operation was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another fetch already holds the single-flight guard
    InFlight,
    /// The server reported no further pages; a first-page reload is
    /// required before continuing
    Exhausted,
}

/// Hook fired when a fetch attempt failed and a retry is about to be
/// scheduled; drives the UI's retry-in-progress indicator.
pub(crate) type RetryHook = Arc<dyn Fn(u32, Duration) + Send + Sync>;

/// Cursor-paginated collection synchronizer
///
/// Exclusively owns its collection state; consumers read through
/// [`snapshot`](Self::snapshot) or subscribe to change notifications.
pub struct CollectionSync<T, F> {
    pub(crate) fetcher: F,
    pub(crate) config: SyncConfig,
    pub(crate) state: Mutex<CollectionState<T>>,
    pub(crate) changes: watch::Sender<CollectionSnapshot<T>>,
    pub(crate) retry_hook: Option<RetryHook>,
}

impl<T, F> CollectionSync<T, F>
where
    T: Clone + Send + Sync + 'static,
    F: PageFetcher<T>,
{
    /// Create a synchronizer over the given fetcher
    #[must_use]
    pub fn new(fetcher: F, config: SyncConfig) -> Self {
        let (changes, _) = watch::channel(CollectionSnapshot::default());
        Self {
            fetcher,
            config,
            state: Mutex::new(CollectionState::new()),
            changes,
            retry_hook: None,
        }
    }

    /// With a retry-in-progress hook
    #[must_use]
    pub fn with_retry_hook(mut self, hook: impl Fn(u32, Duration) + Send + Sync + 'static) -> Self {
        self.retry_hook = Some(Arc::new(hook));
        self
    }

    /// Current state, detached
    #[must_use]
    pub fn snapshot(&self) -> CollectionSnapshot<T> {
        self.state.lock().snapshot()
    }

    /// The underlying page fetcher
    #[inline]
    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Subscribe to state-change notifications
    ///
    /// The receiver yields a fresh snapshot after every committed page,
    /// phase change, or reset.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CollectionSnapshot<T>> {
        self.changes.subscribe()
    }

    /// Load (or reload) the first page, replacing all accumulated state.
    ///
    /// Skips without touching the network when any fetch is already in
    /// flight. On failure the collection is left empty and the error is
    /// surfaced unchanged.
    pub async fn load_first_page(&self) -> Result<LoadOutcome, SyncError> {
        {
            let mut state = self.state.lock();
            if state.phase().is_busy() {
                tracing::debug!(phase = ?state.phase(), "first-page load skipped; fetch in flight");
                return Ok(LoadOutcome::Skipped(SkipReason::InFlight));
            }
            state.enter(SyncPhase::FetchingFirst)?;
            state.reset();
        }
        self.publish();

        let fetched = self.fetch_with_retry(None).await;
        let outcome = {
            let mut state = self.state.lock();
            state.enter(SyncPhase::Idle)?;
            match fetched {
                Ok(page) => {
                    let appended = page.len();
                    state.commit_page_mark(&page);
                    state.accumulated = page.items;
                    tracing::info!(
                        items = appended,
                        has_more = state.has_more(),
                        "first page loaded"
                    );
                    Ok(LoadOutcome::Loaded { appended })
                }
                Err(err) => {
                    tracing::error!(error = %err, "first-page load failed");
                    Err(SyncError::Fetch(err))
                }
            }
        };
        self.publish();
        outcome
    }

    /// Fetch the next page and append it to the accumulation.
    ///
    /// Skips when a fetch is in flight or the server reported no further
    /// pages. On failure nothing changes: accumulated items, cursor and
    /// has-more state are exactly as before the call.
    pub async fn load_next_page(&self) -> Result<LoadOutcome, SyncError> {
        let cursor = {
            let mut state = self.state.lock();
            if state.phase().is_busy() {
                tracing::debug!(phase = ?state.phase(), "continuation skipped; fetch in flight");
                return Ok(LoadOutcome::Skipped(SkipReason::InFlight));
            }
            if !state.has_more() {
                tracing::debug!("continuation skipped; collection exhausted");
                return Ok(LoadOutcome::Skipped(SkipReason::Exhausted));
            }
            state.enter(SyncPhase::FetchingMore)?;
            state.cursor().cloned()
        };
        self.publish();

        let fetched = self.fetch_with_retry(cursor).await;
        let outcome = {
            let mut state = self.state.lock();
            state.enter(SyncPhase::Idle)?;
            match fetched {
                Ok(page) => {
                    let appended = page.len();
                    state.commit_page_mark(&page);
                    state.accumulated.extend(page.items);
                    tracing::debug!(
                        appended,
                        loaded = state.accumulated.len(),
                        has_more = state.has_more(),
                        "continuation page appended"
                    );
                    Ok(LoadOutcome::Loaded { appended })
                }
                Err(err) => {
                    tracing::error!(error = %err, "continuation fetch failed; state unchanged");
                    Err(SyncError::Fetch(err))
                }
            }
        };
        self.publish();
        outcome
    }

    /// One page fetch wrapped in the configured backoff policy.
    pub(crate) async fn fetch_with_retry(
        &self,
        cursor: Option<Cursor>,
    ) -> Result<PageResult<T>, FetchError> {
        let fetcher = &self.fetcher;
        let page_size = self.config.page_size;
        let cursor_ref = cursor.as_ref();
        retry_with_backoff(
            self.config.retry,
            |attempt, delay| {
                tracing::warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "page fetch failed; backing off before retry"
                );
                if let Some(hook) = &self.retry_hook {
                    hook(attempt, delay);
                }
            },
            move || fetcher.fetch_page(cursor_ref, page_size),
        )
        .await
    }

    /// Push a fresh snapshot to subscribers.
    pub(crate) fn publish(&self) {
        let snapshot = self.state.lock().snapshot();
        let _ = self.changes.send_replace(snapshot);
    }
}
