//! Refresh gating for directory pulls.
//!
//! A [`RefreshGate`] decides whether a `refresh_all`/`refresh_zone` call
//! actually hits the network. The default gate always passes; the interval
//! gate bounds refresh frequency with a staleness timestamp.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use std::time::Duration;

/// Gate consulted before every directory refresh.
#[async_trait]
pub trait RefreshGate: Send + Sync {
    /// Whether the pending refresh should proceed.
    async fn should_refresh(&self) -> bool;
}

/// Gate that always passes.
#[derive(Debug, Default)]
pub struct AlwaysRefresh;

#[async_trait]
impl RefreshGate for AlwaysRefresh {
    async fn should_refresh(&self) -> bool {
        true
    }
}

/// Gate that passes at most once per interval.
///
/// The first call always passes; later calls pass only once the configured
/// interval has elapsed since the last passing call.
#[derive(Debug)]
pub struct IntervalRefreshGate {
    interval: chrono::Duration,
    last_pass: Mutex<Option<DateTime<Utc>>>,
}

impl IntervalRefreshGate {
    /// Create a gate with the given minimum interval between refreshes.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: chrono::Duration::from_std(interval).unwrap_or(chrono::Duration::MAX),
            last_pass: Mutex::new(None),
        }
    }
}

#[async_trait]
impl RefreshGate for IntervalRefreshGate {
    async fn should_refresh(&self) -> bool {
        let now = Utc::now();
        let mut last_pass = self.last_pass.lock().unwrap();
        match *last_pass {
            Some(at) if now.signed_duration_since(at) < self.interval => false,
            _ => {
                *last_pass = Some(now);
                true
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_refresh_passes() {
        let gate = AlwaysRefresh;
        assert!(gate.should_refresh().await);
        assert!(gate.should_refresh().await);
    }

    #[tokio::test]
    async fn test_interval_gate_blocks_within_interval() {
        let gate = IntervalRefreshGate::new(Duration::from_secs(3600));
        assert!(gate.should_refresh().await);
        assert!(!gate.should_refresh().await);
        assert!(!gate.should_refresh().await);
    }

    #[tokio::test]
    async fn test_interval_gate_passes_after_interval() {
        let gate = IntervalRefreshGate::new(Duration::from_millis(20));
        assert!(gate.should_refresh().await);
        assert!(!gate.should_refresh().await);
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(gate.should_refresh().await);
    }
}
