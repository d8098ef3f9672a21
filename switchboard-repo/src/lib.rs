//! Switchboard Repo - Reactive Channel Directory Repository
//!
//! Mediates between the persisted channel store and the remote directory
//! source, exposing live, sorted channel views without redundant network
//! fetches.
//!
//! # Architecture
//!
//! ```text
//! DirectorySource ──fetch hint──▶ SingleFlight ──┐
//!                                                ├─▶ sorted live views
//! ChannelStore ─────live query──────────────────┘
//!        ▲
//!        └──insert_all── refresh ops ◀──fetch channels── DirectorySource
//! ```
//!
//! # Key pieces
//!
//! - [`SingleFlight`]: once-computed, success-only memoizing cache for the
//!   server order hint; concurrent readers share one in-flight fetch.
//! - [`sort_by_hint`] / [`sort_by_hint_background`]: hint-driven stable
//!   sort, with the CPU work dispatched off latency-sensitive tasks.
//! - [`ChannelRepository`]: live sorted views over the store, via either a
//!   sequential re-fetch-per-change pipeline or a conflating combine-latest
//!   pipeline ([`ReadStrategy`]).
//! - [`RefreshGate`] + `refresh_all`/`refresh_zone`: gated pulls from the
//!   directory source into the store.

pub mod refresh;
pub mod repository;
pub mod single_flight;
pub mod sort;

pub use refresh::{AlwaysRefresh, IntervalRefreshGate, RefreshGate};
pub use repository::{ChannelRepository, ReadStrategy, RepositoryConfig};
pub use single_flight::SingleFlight;
pub use sort::{sort_by_hint, sort_by_hint_background};
