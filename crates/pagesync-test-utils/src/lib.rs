//! Testing utilities for the Pagesync workspace
//!
//! Scripted fetchers, record fixtures, and page builders shared across
//! unit and integration tests.

#![allow(missing_docs)]

use async_trait::async_trait;
use pagesync_core::{Cursor, FetchError, PageFetcher, PageResult, SortValue, ViewAdapter};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// A record shaped like the console's list-view rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRecord {
    pub id: u64,
    pub name: String,
    pub created_at: i64,
}

impl TestRecord {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            created_at: id as i64,
        }
    }
}

/// Sequential records `[start, end)`, named `record-<id>`.
pub fn records(start: u64, end: u64) -> Vec<TestRecord> {
    (start..end)
        .map(|id| TestRecord::new(id, format!("record-{id}")))
        .collect()
}

/// A continuation page carrying `items` and pointing at `cursor`.
pub fn page_with_more(items: Vec<TestRecord>, cursor: &str, total: u64) -> PageResult<TestRecord> {
    PageResult::new(items)
        .with_next_cursor(cursor)
        .with_has_more(true)
        .with_total_count(total)
}

/// The terminal page of a collection.
pub fn last_page(items: Vec<TestRecord>, total: u64) -> PageResult<TestRecord> {
    PageResult::new(items)
        .with_has_more(false)
        .with_total_count(total)
}

/// View adapter for [`TestRecord`]: search over `name`, sort keys `id`,
/// `name` and `created_at`, default ordering by creation time.
pub struct TestRecordAdapter;

impl ViewAdapter<TestRecord> for TestRecordAdapter {
    fn search_text(&self, item: &TestRecord) -> Vec<String> {
        vec![item.name.clone()]
    }

    fn sort_value(&self, item: &TestRecord, key: &str) -> Option<SortValue> {
        match key {
            "id" => Some(SortValue::Int(item.id as i64)),
            "name" => Some(SortValue::Text(item.name.clone())),
            "created_at" => Some(SortValue::Int(item.created_at)),
            _ => None,
        }
    }

    fn default_sort_value(&self, item: &TestRecord) -> SortValue {
        SortValue::Int(item.created_at)
    }
}

/// A fetcher that replays a script of page results and failures.
///
/// Records every call's cursor so tests can assert on the exact request
/// sequence. With a gate attached, each fetch parks until the test grants
/// a permit, which is how the single-flight tests hold a fetch in flight.
pub struct ScriptedFetcher<T> {
    script: Mutex<VecDeque<Result<PageResult<T>, FetchError>>>,
    requests: Mutex<Vec<Option<Cursor>>>,
    calls: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
}

impl<T> ScriptedFetcher<T> {
    pub fn new(script: Vec<Result<PageResult<T>, FetchError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    /// A fetcher whose every call parks until the returned gate gets a
    /// permit via [`Semaphore::add_permits`].
    pub fn gated(script: Vec<Result<PageResult<T>, FetchError>>) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let mut fetcher = Self::new(script);
        fetcher.gate = Some(Arc::clone(&gate));
        (fetcher, gate)
    }

    /// Network calls issued so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Cursor of every call, in order.
    pub fn requests(&self) -> Vec<Option<Cursor>> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl<T> PageFetcher<T> for ScriptedFetcher<T>
where
    T: Send + Sync,
{
    async fn fetch_page(
        &self,
        cursor: Option<&Cursor>,
        _page_size: usize,
    ) -> Result<PageResult<T>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(cursor.cloned());

        if let Some(gate) = &self.gate {
            match gate.acquire().await {
                Ok(permit) => permit.forget(),
                Err(_) => return Err(FetchError::network("fetch gate closed")),
            }
        }

        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::validation("scripted fetcher exhausted")))
    }
}
