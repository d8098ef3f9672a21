//! In-memory channel store with live-query fan-out.
//!
//! Snapshots are kept in a `BTreeMap` keyed by channel id, giving
//! deterministic (id-ordered) snapshot order. Live queries are built from a
//! `tokio::sync::watch` version counter: every effective write bumps the
//! version, and each subscriber maps version changes to fresh snapshots.

use crate::{ChannelStore, LiveChannels};
use async_trait::async_trait;
use futures_util::StreamExt;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use switchboard_core::{Channel, ChannelId, StorageError, SwitchboardResult, Zone};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

type Channels = Arc<RwLock<BTreeMap<ChannelId, Channel>>>;

/// In-memory [`ChannelStore`] implementation.
///
/// Cheap to clone; clones share the same underlying store and version
/// counter, so a write through any clone reaches every subscriber.
#[derive(Clone)]
pub struct MemoryChannelStore {
    channels: Channels,
    version: Arc<watch::Sender<u64>>,
}

impl MemoryChannelStore {
    /// Create an empty store.
    pub fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        Self {
            channels: Arc::new(RwLock::new(BTreeMap::new())),
            version: Arc::new(version),
        }
    }

    /// Number of channels currently stored.
    pub fn len(&self) -> usize {
        self.channels.read().unwrap().len()
    }

    /// Whether the store holds no channels.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot_all(channels: &Channels) -> Vec<Channel> {
        channels.read().unwrap().values().cloned().collect()
    }

    fn snapshot_zone(channels: &Channels, zone: Zone) -> Vec<Channel> {
        channels
            .read()
            .unwrap()
            .values()
            .filter(|c| c.zone == zone)
            .cloned()
            .collect()
    }
}

impl Default for MemoryChannelStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelStore for MemoryChannelStore {
    fn watch_all(&self) -> LiveChannels {
        let channels = Arc::clone(&self.channels);
        WatchStream::new(self.version.subscribe())
            .map(move |_| Self::snapshot_all(&channels))
            .boxed()
    }

    fn watch_zone(&self, zone: Zone) -> LiveChannels {
        let channels = Arc::clone(&self.channels);
        let mut last: Option<Vec<Channel>> = None;
        WatchStream::new(self.version.subscribe())
            .filter_map(move |_| {
                let snapshot = Self::snapshot_zone(&channels, zone);
                let changed = last.as_ref() != Some(&snapshot);
                if changed {
                    last = Some(snapshot.clone());
                }
                futures_util::future::ready(changed.then_some(snapshot))
            })
            .boxed()
    }

    async fn insert_all(&self, batch: Vec<Channel>) -> SwitchboardResult<()> {
        let mut changed = false;
        {
            let mut channels = self
                .channels
                .write()
                .map_err(|_| StorageError::LockPoisoned)?;
            for channel in batch {
                let previous = channels.insert(channel.id.clone(), channel.clone());
                changed |= previous.as_ref() != Some(&channel);
            }
        }
        if changed {
            self.version.send_modify(|v| *v = v.wrapping_add(1));
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
