//! Single-flight memoizing cache for fallible async producers.
//!
//! Computes a value at most once per successful outcome, no matter how many
//! concurrent callers ask for it. A failed attempt serves every waiter one
//! shared fallback value and leaves the cache unresolved, so the next call
//! retries the producer from scratch. Failures are never cached.

use futures_util::future::{BoxFuture, FutureExt};
use futures_util::stream::Stream;
use std::future::Future;
use std::sync::{Arc, Mutex};
use switchboard_core::{SwitchboardError, SwitchboardResult};
use tokio::sync::broadcast;
use tracing::{debug, warn};

type Producer<T> = dyn Fn() -> BoxFuture<'static, SwitchboardResult<T>> + Send + Sync;
type Fallback<T> = dyn Fn(&SwitchboardError) -> T + Send + Sync;

/// Cache lifecycle. The mutex around it is never held across an await.
enum FlightState<T> {
    /// No value, no attempt running. `attempt` numbers the next attempt.
    Idle { attempt: u64 },
    /// An attempt is running; waiters subscribe to its outcome.
    InFlight {
        attempt: u64,
        outcome: broadcast::Sender<T>,
    },
    /// A successful value, cached for the cache's lifetime.
    Ready(T),
}

/// Once-computed, success-only memoizing cache with concurrent-call
/// de-duplication.
///
/// Clones share the same cache state. The producer runs as a spawned task,
/// so a caller dropping its `get` future never cancels the attempt other
/// waiters are joined on.
pub struct SingleFlight<T> {
    producer: Arc<Producer<T>>,
    fallback: Arc<Fallback<T>>,
    state: Arc<Mutex<FlightState<T>>>,
}

impl<T> Clone for SingleFlight<T> {
    fn clone(&self) -> Self {
        Self {
            producer: Arc::clone(&self.producer),
            fallback: Arc::clone(&self.fallback),
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + 'static,
{
    /// Create a cache around `producer`, with `fallback` supplying the value
    /// served to an attempt's waiters when the producer fails.
    pub fn new<P, Fut, F>(producer: P, fallback: F) -> Self
    where
        P: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = SwitchboardResult<T>> + Send + 'static,
        F: Fn(&SwitchboardError) -> T + Send + Sync + 'static,
    {
        Self {
            producer: Arc::new(move || producer().boxed()),
            fallback: Arc::new(fallback),
            state: Arc::new(Mutex::new(FlightState::Idle { attempt: 0 })),
        }
    }

    /// Get the cached value, joining or starting a production attempt as
    /// needed.
    ///
    /// - Resolved: returns the cached value without touching the producer.
    /// - In flight: suspends until that attempt completes and returns its
    ///   outcome (success value or shared fallback).
    /// - Idle: starts the producer (exactly one invocation for all callers
    ///   arriving during the attempt) and awaits it.
    pub async fn get(&self) -> T {
        loop {
            let (mut rx, attempt) = {
                let mut state = self.state.lock().unwrap();
                match &*state {
                    FlightState::Ready(value) => return value.clone(),
                    FlightState::InFlight { attempt, outcome } => {
                        (outcome.subscribe(), *attempt)
                    }
                    FlightState::Idle { attempt } => {
                        let attempt = *attempt;
                        let (tx, rx) = broadcast::channel(1);
                        *state = FlightState::InFlight {
                            attempt,
                            outcome: tx.clone(),
                        };
                        self.spawn_attempt(attempt, tx);
                        (rx, attempt)
                    }
                }
            };
            match rx.recv().await {
                Ok(value) => return value,
                Err(_) => {
                    // The attempt task died without publishing (aborted at
                    // runtime teardown, or the producer panicked). Reset so
                    // the next iteration starts a fresh attempt.
                    let mut state = self.state.lock().unwrap();
                    if matches!(&*state, FlightState::InFlight { attempt: a, .. } if *a == attempt)
                    {
                        *state = FlightState::Idle {
                            attempt: attempt + 1,
                        };
                    }
                }
            }
        }
    }

    /// Degenerate single-element stream view: yields the cached-or-freshly-
    /// produced value once. Exists so the cache can participate in stream
    /// composition.
    pub fn stream(&self) -> impl Stream<Item = T> + Send + 'static {
        let cache = self.clone();
        futures_util::stream::once(async move { cache.get().await })
    }

    fn spawn_attempt(&self, attempt: u64, outcome: broadcast::Sender<T>) {
        let future = (self.producer)();
        let fallback = Arc::clone(&self.fallback);
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            debug!(attempt, "single-flight producer starting");
            let result = future.await;
            // State transition and outcome publication happen under one
            // lock acquisition: every waiter subscribed to this attempt
            // observes its outcome before any later caller can start a
            // new attempt.
            let mut guard = state.lock().unwrap();
            let value = match result {
                Ok(value) => {
                    debug!(attempt, "single-flight producer resolved");
                    *guard = FlightState::Ready(value.clone());
                    value
                }
                Err(error) => {
                    warn!(attempt, %error, "single-flight producer failed, serving fallback");
                    let value = fallback(&error);
                    *guard = FlightState::Idle {
                        attempt: attempt + 1,
                    };
                    value
                }
            };
            let _ = outcome.send(value);
        });
    }
}

// =============================================================================
// TESTS
// =============================================================================
