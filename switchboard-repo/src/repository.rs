//! Channel repository: live sorted views plus gated directory refreshes.
//!
//! The repository is constructed once by the application entry point and
//! passed by reference to consumers; there is no hidden global instance.
//! It owns the single-flight order-hint cache shared by every view.

use crate::refresh::{AlwaysRefresh, RefreshGate};
use crate::single_flight::SingleFlight;
use crate::sort::sort_by_hint_background;
use futures_util::StreamExt;
use std::sync::Arc;
use switchboard_core::{Channel, OrderHint, SwitchboardError, SwitchboardResult, Zone};
use switchboard_storage::{ChannelStore, DirectorySource, LiveChannels};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, warn};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// How a live view combines the store's query with the cached order hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadStrategy {
    /// Re-await the (memoized) hint cache on every upstream change and sort
    /// sequentially. Simple, FIFO, no conflation.
    Sequential,
    /// Observe store and hint concurrently, recombine when either changes,
    /// and conflate: a slow consumer sees only the latest sorted snapshot.
    #[default]
    CombineLatest,
}

/// Configuration for a [`ChannelRepository`].
#[derive(Debug, Clone, Default)]
pub struct RepositoryConfig {
    /// Strategy used by `observe_all`/`observe_zone`.
    pub read_strategy: ReadStrategy,
}

impl RepositoryConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the read strategy.
    pub fn with_read_strategy(mut self, strategy: ReadStrategy) -> Self {
        self.read_strategy = strategy;
        self
    }
}

// ============================================================================
// REPOSITORY
// ============================================================================

/// Cache-coordinating repository over a channel store and a directory
/// source.
///
/// # Type Parameters
///
/// - `S`: the persisted channel store (live queries + writes)
/// - `N`: the remote directory source (order hint + channel listings)
pub struct ChannelRepository<S, N>
where
    S: ChannelStore + 'static,
    N: DirectorySource + 'static,
{
    store: Arc<S>,
    source: Arc<N>,
    order_cache: SingleFlight<OrderHint>,
    gate: Arc<dyn RefreshGate>,
    config: RepositoryConfig,
}

impl<S, N> ChannelRepository<S, N>
where
    S: ChannelStore + 'static,
    N: DirectorySource + 'static,
{
    /// Create a repository with the given configuration.
    ///
    /// The order-hint cache is wired to the source's `fetch_order_hint`; a
    /// fetch failure serves the current waiters an empty hint (pure
    /// alphabetical ordering) without caching, so the next read retries.
    pub fn new(store: Arc<S>, source: Arc<N>, config: RepositoryConfig) -> Self {
        let hint_source = Arc::clone(&source);
        let order_cache = SingleFlight::new(
            move || {
                let source = Arc::clone(&hint_source);
                async move {
                    source
                        .fetch_order_hint()
                        .await
                        .map_err(SwitchboardError::from)
                }
            },
            |error| {
                warn!(%error, "order hint unavailable, using alphabetical ordering");
                OrderHint::empty()
            },
        );
        Self {
            store,
            source,
            order_cache,
            gate: Arc::new(AlwaysRefresh),
            config,
        }
    }

    /// Create a repository with default configuration.
    pub fn with_defaults(store: Arc<S>, source: Arc<N>) -> Self {
        Self::new(store, source, RepositoryConfig::default())
    }

    /// Replace the refresh gate (defaults to [`AlwaysRefresh`]).
    pub fn with_refresh_gate(mut self, gate: Arc<dyn RefreshGate>) -> Self {
        self.gate = gate;
        self
    }

    /// Get the repository configuration.
    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Get a reference to the channel store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a reference to the directory source.
    pub fn source(&self) -> &N {
        &self.source
    }

    // === Live views ===

    /// Live sorted view over every channel, using the configured strategy.
    pub fn observe_all(&self) -> LiveChannels {
        self.observe_all_with(self.config.read_strategy)
    }

    /// Live sorted view over every channel, with an explicit strategy.
    pub fn observe_all_with(&self, strategy: ReadStrategy) -> LiveChannels {
        self.sorted_view(self.store.watch_all(), strategy)
    }

    /// Live sorted view over one zone's channels, using the configured
    /// strategy.
    pub fn observe_zone(&self, zone: Zone) -> LiveChannels {
        self.observe_zone_with(zone, self.config.read_strategy)
    }

    /// Live sorted view over one zone's channels, with an explicit strategy.
    pub fn observe_zone_with(&self, zone: Zone, strategy: ReadStrategy) -> LiveChannels {
        self.sorted_view(self.store.watch_zone(zone), strategy)
    }

    fn sorted_view(&self, upstream: LiveChannels, strategy: ReadStrategy) -> LiveChannels {
        match strategy {
            ReadStrategy::Sequential => sequential_view(upstream, self.order_cache.clone()),
            ReadStrategy::CombineLatest => combined_view(upstream, self.order_cache.clone()),
        }
    }

    // === Refresh operations ===

    /// Pull the full directory from the source into the store.
    ///
    /// Skipped when the refresh gate is closed. A network failure surfaces
    /// to the caller and leaves the store unmodified; on success the write
    /// re-triggers every live view.
    pub async fn refresh_all(&self) -> SwitchboardResult<()> {
        if !self.gate.should_refresh().await {
            debug!("refresh gate closed, skipping directory fetch");
            return Ok(());
        }
        let channels = self.source.fetch_all_channels().await?;
        info!(count = channels.len(), "refreshing channel directory");
        self.store.insert_all(channels).await
    }

    /// Pull one zone's channels from the source into the store.
    pub async fn refresh_zone(&self, zone: Zone) -> SwitchboardResult<()> {
        if !self.gate.should_refresh().await {
            debug!(%zone, "refresh gate closed, skipping zone fetch");
            return Ok(());
        }
        let channels = self.source.fetch_zone_channels(zone).await?;
        info!(%zone, count = channels.len(), "refreshing zone channels");
        self.store.insert_all(channels).await
    }
}

// ============================================================================
// READ PATHS
// ============================================================================

/// Sequential strategy: one sorted emission per upstream snapshot, awaiting
/// the hint cache each time (cheap after first resolution).
fn sequential_view(upstream: LiveChannels, cache: SingleFlight<OrderHint>) -> LiveChannels {
    upstream
        .then(move |snapshot| {
            let cache = cache.clone();
            async move {
                let hint = cache.get().await;
                sort_by_hint_background(snapshot, hint).await
            }
        })
        .boxed()
}

/// Combine-latest strategy: a combiner task observes the store and the hint
/// cache concurrently, re-sorts whenever either side changes, and publishes
/// through a watch channel. Watch semantics conflate for slow consumers:
/// intermediate snapshots may be skipped, the latest is always delivered,
/// and delivery order follows pairing order.
fn combined_view(upstream: LiveChannels, cache: SingleFlight<OrderHint>) -> LiveChannels {
    let (tx, rx) = watch::channel(None::<Vec<Channel>>);
    tokio::spawn(async move {
        let mut upstream = upstream;
        let mut hint_view = cache.stream().boxed();
        let mut latest: Option<Vec<Channel>> = None;
        let mut hint: Option<OrderHint> = None;
        loop {
            tokio::select! {
                snapshot = upstream.next() => match snapshot {
                    Some(snapshot) => latest = Some(snapshot),
                    None => break,
                },
                Some(resolved) = hint_view.next(), if hint.is_none() => {
                    hint = Some(resolved);
                }
            }
            let (Some(snapshot), Some(hint)) = (&latest, &hint) else {
                continue;
            };
            let sorted = sort_by_hint_background(snapshot.clone(), hint.clone()).await;
            if tx.send(Some(sorted)).is_err() {
                // Observer dropped its stream; stop combining.
                break;
            }
        }
    });
    WatchStream::new(rx)
        .filter_map(futures_util::future::ready)
        .boxed()
}

// =============================================================================
// TESTS
// =============================================================================
