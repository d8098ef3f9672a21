//! Scripted directory source for tests and embedders.
//!
//! Serves fixed channel listings and order hints, with per-endpoint failure
//! injection, an optional artificial hint latency, and invocation counters
//! for asserting fetch behavior.

use crate::DirectorySource;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use switchboard_core::{Channel, NetworkError, OrderHint, Zone};

/// Scripted [`DirectorySource`] with deterministic responses.
#[derive(Clone, Default)]
pub struct StaticDirectorySource {
    state: Arc<Mutex<SourceState>>,
}

#[derive(Default)]
struct SourceState {
    channels: Vec<Channel>,
    hint: OrderHint,
    hint_error: Option<NetworkError>,
    channels_error: Option<NetworkError>,
    hint_delay: Option<Duration>,
    hint_fetches: u64,
    channel_fetches: u64,
}

impl StaticDirectorySource {
    /// Create a source with no channels and an empty hint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source serving the given channels.
    pub fn with_channels(channels: Vec<Channel>) -> Self {
        let source = Self::new();
        source.set_channels(channels);
        source
    }

    /// Replace the served channel listing.
    pub fn set_channels(&self, channels: Vec<Channel>) {
        self.state.lock().unwrap().channels = channels;
    }

    /// Replace the served order hint.
    pub fn set_order_hint(&self, hint: OrderHint) {
        self.state.lock().unwrap().hint = hint;
    }

    /// Fail every hint fetch with `error` until cleared with `None`.
    pub fn set_hint_error(&self, error: Option<NetworkError>) {
        self.state.lock().unwrap().hint_error = error;
    }

    /// Fail every channel fetch with `error` until cleared with `None`.
    pub fn set_channels_error(&self, error: Option<NetworkError>) {
        self.state.lock().unwrap().channels_error = error;
    }

    /// Delay hint responses, keeping concurrent fetches in flight together.
    pub fn set_hint_delay(&self, delay: Option<Duration>) {
        self.state.lock().unwrap().hint_delay = delay;
    }

    /// Number of `fetch_order_hint` invocations so far.
    pub fn hint_fetches(&self) -> u64 {
        self.state.lock().unwrap().hint_fetches
    }

    /// Number of channel-listing invocations so far.
    pub fn channel_fetches(&self) -> u64 {
        self.state.lock().unwrap().channel_fetches
    }
}

#[async_trait]
impl DirectorySource for StaticDirectorySource {
    async fn fetch_order_hint(&self) -> Result<OrderHint, NetworkError> {
        let (delay, outcome) = {
            let mut state = self.state.lock().unwrap();
            state.hint_fetches += 1;
            let outcome = match &state.hint_error {
                Some(error) => Err(error.clone()),
                None => Ok(state.hint.clone()),
            };
            (state.hint_delay, outcome)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        outcome
    }

    async fn fetch_all_channels(&self) -> Result<Vec<Channel>, NetworkError> {
        let mut state = self.state.lock().unwrap();
        state.channel_fetches += 1;
        match &state.channels_error {
            Some(error) => Err(error.clone()),
            None => Ok(state.channels.clone()),
        }
    }

    async fn fetch_zone_channels(&self, zone: Zone) -> Result<Vec<Channel>, NetworkError> {
        let mut state = self.state.lock().unwrap();
        state.channel_fetches += 1;
        match &state.channels_error {
            Some(error) => Err(error.clone()),
            None => Ok(state
                .channels
                .iter()
                .filter(|c| c.zone == zone)
                .cloned()
                .collect()),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
