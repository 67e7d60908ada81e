//! Full materialization: termination, abort-on-failure, re-entrancy.

use pagesync_core::{
    CollectionSync, DrainOutcome, DrainReport, FetchError, LoadOutcome, RetryPolicy, SkipReason,
    SyncConfig, SyncError, SyncPhase,
};
use pagesync_test_utils::{last_page, page_with_more, records, ScriptedFetcher};
use std::sync::Arc;
use std::time::Duration;

fn drain_config() -> SyncConfig {
    SyncConfig::new()
        .with_retry(RetryPolicy::new().with_max_retries(0))
        .with_drain_yield(Duration::from_millis(1))
}

#[tokio::test]
async fn materialize_drains_to_exhaustion() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(page_with_more(records(0, 4), "c1", 12)),
        Ok(page_with_more(records(4, 8), "c2", 12)),
        Ok(last_page(records(8, 12), 12)),
    ]);
    let sync = CollectionSync::new(fetcher, drain_config());

    sync.load_first_page().await.unwrap();
    let outcome = sync.materialize_all().await.unwrap();

    assert_eq!(
        outcome,
        DrainOutcome::Drained(DrainReport {
            pages: 2,
            appended: 8
        })
    );

    let snap = sync.snapshot();
    assert_eq!(snap.loaded() as u64, snap.total_count.unwrap());
    assert!(!snap.has_more);
    assert_eq!(snap.phase, SyncPhase::Idle);

    // Nothing further to fetch
    let next = sync.load_next_page().await.unwrap();
    assert_eq!(next, LoadOutcome::Skipped(SkipReason::Exhausted));
}

#[tokio::test]
async fn materialize_aborts_on_failure_and_keeps_items() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(page_with_more(records(0, 4), "c1", 12)),
        Ok(page_with_more(records(4, 8), "c2", 12)),
        Err(FetchError::server(500, "internal")),
    ]);
    let sync = CollectionSync::new(fetcher, drain_config());

    sync.load_first_page().await.unwrap();
    let err = sync.materialize_all().await.unwrap_err();
    assert!(matches!(err, SyncError::Fetch(FetchError::Server { .. })));

    // Everything fetched before the failure survives; guard is released
    let snap = sync.snapshot();
    assert_eq!(snap.loaded(), 8);
    assert_eq!(snap.phase, SyncPhase::Idle);
    assert!(snap.has_more);

    // No auto-resume happened: exactly first + two drain fetches
    assert_eq!(sync.fetcher().calls(), 3);
}

#[tokio::test]
async fn materialize_is_reentrant_noop() {
    let (fetcher, gate) = ScriptedFetcher::gated(vec![
        Ok(page_with_more(records(0, 2), "c1", 4)),
        Ok(last_page(records(2, 4), 4)),
    ]);
    let sync = Arc::new(CollectionSync::new(fetcher, drain_config()));

    gate.add_permits(1);
    sync.load_first_page().await.unwrap();

    // Hold the drain's first continuation fetch behind the gate
    let draining = {
        let sync = Arc::clone(&sync);
        tokio::spawn(async move { sync.materialize_all().await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(sync.snapshot().phase, SyncPhase::Draining);

    // A second drain and a manual continuation both skip
    let second = sync.materialize_all().await.unwrap();
    assert_eq!(second, DrainOutcome::Skipped(SkipReason::InFlight));
    let manual = sync.load_next_page().await.unwrap();
    assert_eq!(manual, LoadOutcome::Skipped(SkipReason::InFlight));

    gate.add_permits(10);
    let outcome = draining.await.unwrap().unwrap();
    assert_eq!(
        outcome,
        DrainOutcome::Drained(DrainReport {
            pages: 1,
            appended: 2
        })
    );
    assert_eq!(sync.snapshot().loaded(), 4);
}

#[tokio::test]
async fn materialize_on_exhausted_collection_fetches_nothing() {
    let fetcher = ScriptedFetcher::new(vec![Ok(last_page(records(0, 3), 3))]);
    let sync = CollectionSync::new(fetcher, drain_config());

    sync.load_first_page().await.unwrap();
    let outcome = sync.materialize_all().await.unwrap();

    assert_eq!(outcome, DrainOutcome::Drained(DrainReport::default()));
    assert_eq!(sync.fetcher().calls(), 1);
}

#[tokio::test]
async fn materialize_before_first_load_fetches_nothing() {
    let fetcher: ScriptedFetcher<pagesync_test_utils::TestRecord> = ScriptedFetcher::new(vec![]);
    let sync = CollectionSync::new(fetcher, drain_config());

    let outcome = sync.materialize_all().await.unwrap();
    assert_eq!(outcome, DrainOutcome::Drained(DrainReport::default()));
    assert_eq!(sync.fetcher().calls(), 0);
}

#[tokio::test]
async fn drain_requests_follow_the_cursor_chain() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(page_with_more(records(0, 2), "c1", 6)),
        Ok(page_with_more(records(2, 4), "c2", 6)),
        Ok(last_page(records(4, 6), 6)),
    ]);
    let sync = CollectionSync::new(fetcher, drain_config());

    sync.load_first_page().await.unwrap();
    sync.materialize_all().await.unwrap();

    let cursors: Vec<Option<String>> = sync
        .fetcher()
        .requests()
        .into_iter()
        .map(|c| c.map(|c| c.as_str().to_string()))
        .collect();
    assert_eq!(
        cursors,
        vec![None, Some("c1".to_string()), Some("c2".to_string())]
    );
}
