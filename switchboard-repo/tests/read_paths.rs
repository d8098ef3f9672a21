//! End-to-end tests for the repository read paths and refresh operations,
//! driven through the in-memory store and the scripted directory source.

use futures_util::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use switchboard_core::{Channel, NetworkError, OrderHint, SwitchboardError, Zone};
use switchboard_repo::{ChannelRepository, IntervalRefreshGate, ReadStrategy, RepositoryConfig};
use switchboard_storage::{ChannelStore, LiveChannels, MemoryChannelStore, StaticDirectorySource};
use tokio::time::timeout;

fn channel(id: &str, name: &str, zone: i64) -> Channel {
    Channel::new(id, name, Zone(zone))
}

fn repo_with(
    store: &Arc<MemoryChannelStore>,
    source: &Arc<StaticDirectorySource>,
    strategy: ReadStrategy,
) -> ChannelRepository<MemoryChannelStore, StaticDirectorySource> {
    ChannelRepository::new(
        Arc::clone(store),
        Arc::clone(source),
        RepositoryConfig::new().with_read_strategy(strategy),
    )
}

/// Poll `view` until it emits a snapshot with `expected_len` channels.
async fn snapshot_of_len(view: &mut LiveChannels, expected_len: usize) -> Vec<Channel> {
    timeout(Duration::from_secs(5), async {
        loop {
            let snapshot = view.next().await.expect("view ended unexpectedly");
            if snapshot.len() == expected_len {
                return snapshot;
            }
        }
    })
    .await
    .expect("timed out waiting for snapshot")
}

fn ids(snapshot: &[Channel]) -> Vec<&str> {
    snapshot.iter().map(|c| c.id.as_str()).collect()
}

#[tokio::test]
async fn strategies_converge_to_identical_sorted_content() {
    let store = Arc::new(MemoryChannelStore::new());
    let source = Arc::new(StaticDirectorySource::new());
    source.set_order_hint(OrderHint::from_ids(["c", "a"]));
    store
        .insert_all(vec![
            channel("a", "Apple", 1),
            channel("b", "Banana", 1),
            channel("c", "Cherry", 1),
        ])
        .await
        .unwrap();

    let sequential = repo_with(&store, &source, ReadStrategy::Sequential);
    let combined = repo_with(&store, &source, ReadStrategy::CombineLatest);

    let mut seq_view = sequential.observe_all();
    let mut com_view = combined.observe_all();

    let seq = snapshot_of_len(&mut seq_view, 3).await;
    let com = snapshot_of_len(&mut com_view, 3).await;
    assert_eq!(seq, com);
    assert_eq!(ids(&seq), vec!["c", "a", "b"]);

    // Both views track a later write to the same final content.
    store
        .insert_all(vec![channel("d", "Aardvark", 1)])
        .await
        .unwrap();
    let seq = snapshot_of_len(&mut seq_view, 4).await;
    let com = snapshot_of_len(&mut com_view, 4).await;
    assert_eq!(seq, com);
    assert_eq!(ids(&seq), vec!["c", "a", "d", "b"]);
}

#[tokio::test]
async fn combined_view_conflates_rapid_updates() {
    let store = Arc::new(MemoryChannelStore::new());
    let source = Arc::new(StaticDirectorySource::new());
    let repo = repo_with(&store, &source, ReadStrategy::CombineLatest);

    let mut view = repo.observe_all();
    assert!(snapshot_of_len(&mut view, 0).await.is_empty());

    // Rapid writes while the consumer is not polling.
    for i in 0..50 {
        store
            .insert_all(vec![channel(&format!("c{i}"), &format!("Chan {i:02}"), 1)])
            .await
            .unwrap();
    }

    // The consumer sees the final state; intermediate snapshots were
    // conflated away rather than buffered.
    let mut emissions = 0;
    let last = timeout(Duration::from_secs(5), async {
        loop {
            let snapshot = view.next().await.expect("view ended unexpectedly");
            emissions += 1;
            if snapshot.len() == 50 {
                return snapshot;
            }
        }
    })
    .await
    .expect("final snapshot never delivered");

    assert_eq!(last.len(), 50);
    assert!(emissions < 50, "expected conflation, saw {emissions} emissions");
}

#[tokio::test]
async fn zone_views_never_leak_foreign_channels() {
    let store = Arc::new(MemoryChannelStore::new());
    let source = Arc::new(StaticDirectorySource::new());
    store
        .insert_all(vec![
            channel("a", "Apple", 1),
            channel("b", "Banana", 2),
            channel("c", "Cherry", 1),
        ])
        .await
        .unwrap();

    for strategy in [ReadStrategy::Sequential, ReadStrategy::CombineLatest] {
        let repo = repo_with(&store, &source, strategy);
        let mut view = repo.observe_zone(Zone(1));
        let snapshot = snapshot_of_len(&mut view, 2).await;
        assert!(snapshot.iter().all(|c| c.zone == Zone(1)));
        assert_eq!(ids(&snapshot), vec!["a", "c"]);
    }
}

#[tokio::test]
async fn hint_failure_falls_back_to_alphabetical_then_retries() {
    let store = Arc::new(MemoryChannelStore::new());
    let source = Arc::new(StaticDirectorySource::new());
    source.set_order_hint(OrderHint::from_ids(["b", "a"]));
    source.set_hint_error(Some(NetworkError::Unavailable {
        reason: "directory offline".to_string(),
    }));
    store
        .insert_all(vec![channel("a", "Apple", 1), channel("b", "Banana", 1)])
        .await
        .unwrap();

    let repo = repo_with(&store, &source, ReadStrategy::Sequential);

    // Failed hint fetch: waiters get the empty-hint fallback, alphabetical.
    let mut degraded = repo.observe_all();
    assert_eq!(ids(&snapshot_of_len(&mut degraded, 2).await), vec!["a", "b"]);
    assert_eq!(source.hint_fetches(), 1);

    // The failure was not cached: a later view retries and gets the hint.
    source.set_hint_error(None);
    let mut recovered = repo.observe_all();
    assert_eq!(
        ids(&snapshot_of_len(&mut recovered, 2).await),
        vec!["b", "a"]
    );
    assert_eq!(source.hint_fetches(), 2);
}

#[tokio::test]
async fn refresh_all_pulls_directory_into_store_and_reemits() {
    let store = Arc::new(MemoryChannelStore::new());
    let source = Arc::new(StaticDirectorySource::with_channels(vec![
        channel("a", "Apple", 1),
        channel("b", "Banana", 2),
    ]));
    source.set_order_hint(OrderHint::from_ids(["b"]));

    let repo = repo_with(&store, &source, ReadStrategy::CombineLatest);
    let mut view = repo.observe_all();
    assert!(snapshot_of_len(&mut view, 0).await.is_empty());

    repo.refresh_all().await.unwrap();

    let snapshot = snapshot_of_len(&mut view, 2).await;
    assert_eq!(ids(&snapshot), vec!["b", "a"]);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn refresh_zone_only_pulls_that_zone() {
    let store = Arc::new(MemoryChannelStore::new());
    let source = Arc::new(StaticDirectorySource::with_channels(vec![
        channel("a", "Apple", 1),
        channel("b", "Banana", 2),
    ]));

    let repo = repo_with(&store, &source, ReadStrategy::Sequential);
    repo.refresh_zone(Zone(2)).await.unwrap();

    assert_eq!(store.len(), 1);
    let mut view = repo.observe_all();
    assert_eq!(ids(&snapshot_of_len(&mut view, 1).await), vec!["b"]);
}

#[tokio::test]
async fn failed_refresh_leaves_store_untouched_and_surfaces_error() {
    let store = Arc::new(MemoryChannelStore::new());
    let source = Arc::new(StaticDirectorySource::new());
    source.set_channels_error(Some(NetworkError::RequestFailed {
        status: 502,
        message: "bad gateway".to_string(),
    }));

    let repo = repo_with(&store, &source, ReadStrategy::Sequential);
    let error = repo.refresh_all().await.unwrap_err();
    assert!(matches!(error, SwitchboardError::Network(_)));
    assert!(store.is_empty());
}

#[tokio::test]
async fn refresh_gate_bounds_network_fetches() {
    let store = Arc::new(MemoryChannelStore::new());
    let source = Arc::new(StaticDirectorySource::with_channels(vec![channel(
        "a", "Apple", 1,
    )]));

    let repo = repo_with(&store, &source, ReadStrategy::Sequential)
        .with_refresh_gate(Arc::new(IntervalRefreshGate::new(Duration::from_secs(
            3600,
        ))));

    repo.refresh_all().await.unwrap();
    repo.refresh_all().await.unwrap();
    assert_eq!(source.channel_fetches(), 1);
}
