//! Switchboard Core - Entity Types
//!
//! Pure data structures with no behavior. All other crates depend on this.
//! This crate contains ONLY data types and the error taxonomy - no business
//! logic and no I/O.

pub mod entities;
pub mod error;
pub mod ordering;

pub use entities::{Channel, ChannelId, Zone};
pub use error::{NetworkError, StorageError, SwitchboardError, SwitchboardResult};
pub use ordering::{OrderHint, RankKey, MAX_RANK};
