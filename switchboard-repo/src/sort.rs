//! Hint-driven channel sorting.
//!
//! Applies the server order hint to a channel collection: hinted channels
//! first, in hint order, then unhinted channels alphabetically by display
//! name. The output is always a permutation of the input; filtering happens
//! strictly upstream in the store's query.

use switchboard_core::{Channel, OrderHint, RankKey};
use tracing::warn;

/// Stable-sort `channels` ascending by their [`RankKey`] under `hint`.
///
/// With an empty hint every channel gets the sentinel rank, so ordering
/// falls back to display names alone.
pub fn sort_by_hint(mut channels: Vec<Channel>, hint: &OrderHint) -> Vec<Channel> {
    channels.sort_by_cached_key(|channel| RankKey::for_channel(channel, hint));
    channels
}

/// [`sort_by_hint`] with the CPU work dispatched to the blocking pool.
///
/// Identical output; exists so large collections are never sorted on a
/// latency-sensitive task. The caller suspends until the sort completes.
pub async fn sort_by_hint_background(channels: Vec<Channel>, hint: OrderHint) -> Vec<Channel> {
    let unsorted = channels.clone();
    match tokio::task::spawn_blocking(move || sort_by_hint(channels, &hint)).await {
        Ok(sorted) => sorted,
        Err(error) => {
            // Join only fails when the runtime is tearing down.
            warn!(%error, "background sort did not complete, emitting unsorted snapshot");
            unsorted
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
