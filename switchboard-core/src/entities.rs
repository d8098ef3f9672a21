//! Channel directory entities.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// Channel identifier. Opaque, caller-supplied, unique within a directory.
pub type ChannelId = String;

/// Partition key identifying the zone (workspace/space) a channel belongs to.
///
/// Value type: compared and hashed by the wrapped integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Zone(pub i64);

impl Zone {
    /// Get the raw zone number.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zone:{}", self.0)
    }
}

impl From<i64> for Zone {
    fn from(value: i64) -> Self {
        Zone(value)
    }
}

// ============================================================================
// CHANNEL
// ============================================================================

/// A directory entry for a single channel.
///
/// Channels are owned by the store; the read layer only reorders and filters
/// views over them, never mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Unique channel identifier.
    pub id: ChannelId,
    /// Human-readable name, used as the sort tiebreak.
    pub display_name: String,
    /// Zone this channel belongs to.
    pub zone: Zone,
}

impl Channel {
    /// Create a new channel entry.
    pub fn new(id: impl Into<ChannelId>, display_name: impl Into<String>, zone: Zone) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            zone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_equality_by_value() {
        assert_eq!(Zone(7), Zone(7));
        assert_ne!(Zone(7), Zone(8));
        assert_eq!(Zone::from(3).value(), 3);
    }

    #[test]
    fn test_zone_display() {
        assert_eq!(Zone(42).to_string(), "zone:42");
    }

    #[test]
    fn test_channel_serde_round_trip() {
        let channel = Channel::new("ch-1", "General", Zone(1));
        let json = serde_json::to_string(&channel).unwrap();
        let back: Channel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, channel);
    }

    #[test]
    fn test_zone_serde_transparent() {
        let json = serde_json::to_string(&Zone(5)).unwrap();
        assert_eq!(json, "5");
    }
}
