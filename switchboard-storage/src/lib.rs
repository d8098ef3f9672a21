//! Switchboard Storage - Collaborator Traits and In-Memory Implementations
//!
//! Defines the two collaborator seams the repository layer builds on:
//! the persisted channel store (live queries + writes) and the remote
//! directory source (order hint + channel fetches). Ships an in-memory
//! store and a scripted source so downstream crates can test against
//! real live-query semantics without a database or network.

pub mod memory;
pub mod scripted;

pub use memory::MemoryChannelStore;
pub use scripted::StaticDirectorySource;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use switchboard_core::{Channel, NetworkError, OrderHint, SwitchboardResult, Zone};

// ============================================================================
// CHANNEL STORE
// ============================================================================

/// A live snapshot stream: yields the current query result immediately, then
/// an updated result after every write that changes it.
pub type LiveChannels = BoxStream<'static, Vec<Channel>>;

/// Persisted channel store.
///
/// Implementations must be thread-safe and support multiple independent
/// subscribers per live query.
#[async_trait]
pub trait ChannelStore: Send + Sync {
    /// Live query over every channel in the store.
    fn watch_all(&self) -> LiveChannels;

    /// Live query over the channels of a single zone.
    ///
    /// Never yields a channel from another zone, and does not re-emit when
    /// a write leaves the filtered result set unchanged.
    fn watch_zone(&self, zone: Zone) -> LiveChannels;

    /// Upsert a batch of channels by id. All-or-nothing: on error the store
    /// is left unmodified.
    async fn insert_all(&self, channels: Vec<Channel>) -> SwitchboardResult<()>;
}

// ============================================================================
// DIRECTORY SOURCE
// ============================================================================

/// Remote directory source.
///
/// Owns the server-defined preferred ordering and the authoritative channel
/// listings. Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait DirectorySource: Send + Sync {
    /// Fetch the server-defined preferred channel ordering.
    async fn fetch_order_hint(&self) -> Result<OrderHint, NetworkError>;

    /// Fetch every channel in the directory.
    async fn fetch_all_channels(&self) -> Result<Vec<Channel>, NetworkError>;

    /// Fetch the channels of a single zone.
    async fn fetch_zone_channels(&self, zone: Zone) -> Result<Vec<Channel>, NetworkError>;
}
