//! Order hints and rank keys for custom channel ordering.
//!
//! The directory server publishes a preferred channel ordering as a plain
//! sequence of channel ids. Locally, each channel is assigned a [`RankKey`]
//! derived from its position in that sequence; channels absent from the hint
//! sort after all present ones, alphabetically by display name.

use crate::entities::Channel;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sentinel rank for channels absent from the order hint.
/// Larger than any real hint index.
pub const MAX_RANK: usize = usize::MAX;

// ============================================================================
// ORDER HINT
// ============================================================================

/// Server-defined preferred ordering: channel ids, most-preferred first.
///
/// May be empty, in which case ordering falls back to display names alone.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderHint(Vec<String>);

impl OrderHint {
    /// Create an empty hint (alphabetical fallback ordering).
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Create a hint from an id sequence, most-preferred first.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(ids.into_iter().map(Into::into).collect())
    }

    /// Zero-based position of `id` in the hint, or None if absent.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.0.iter().position(|hinted| hinted == id)
    }

    /// Number of ids in the hint.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the hint carries no ids.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the hinted ids in preference order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

// ============================================================================
// RANK KEY
// ============================================================================

/// Sort key for a channel under a given order hint.
///
/// Totally ordered: primary comparison by `rank` ascending, secondary by
/// `tiebreak` ascending (case-sensitive, code-point order). Intermediate
/// value only; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankKey {
    /// Position in the order hint, or [`MAX_RANK`] if absent.
    pub rank: usize,
    /// Display name, breaking ties between equally-ranked channels.
    pub tiebreak: String,
}

impl RankKey {
    /// Create a rank key from explicit parts.
    pub fn new(rank: usize, tiebreak: impl Into<String>) -> Self {
        Self {
            rank,
            tiebreak: tiebreak.into(),
        }
    }

    /// Compute the rank key for a channel under the given hint.
    pub fn for_channel(channel: &Channel, hint: &OrderHint) -> Self {
        Self {
            rank: hint.position_of(&channel.id).unwrap_or(MAX_RANK),
            tiebreak: channel.display_name.clone(),
        }
    }
}

impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank
            .cmp(&other.rank)
            .then_with(|| self.tiebreak.cmp(&other.tiebreak))
    }
}

impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// =============================================================================
// TESTS
// =============================================================================
