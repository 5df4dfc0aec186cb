//! External vertex identifier to dense index translation.
//!
//! Most mesh files number their vertices contiguously, so an external ID
//! (after the format's own offset correction) already equals the dense
//! position of the vertex. Only IDs that differ from their dense position are
//! stored, which keeps the map empty for dense files.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of [`VertexIdMap::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The external ID equals the dense index; nothing was stored.
    Identity,
    /// A new `external ID -> dense index` entry was stored.
    Mapped,
    /// The external ID was already mapped. The existing entry is kept and the
    /// new occurrence is discarded.
    Duplicate {
        /// Dense index the ID was already mapped to.
        existing: usize,
    },
}

/// Ordered map from external vertex ID to dense vertex index.
///
/// Keys are unique: the first registration of an ID wins.
///
/// # Example
///
/// ```
/// use hydromesh_types::{Registration, VertexIdMap};
///
/// let mut ids = VertexIdMap::new();
/// assert_eq!(ids.register(0, 0), Registration::Identity);
/// assert_eq!(ids.register(1, 2), Registration::Mapped);
/// assert_eq!(ids.register(3, 2), Registration::Duplicate { existing: 1 });
///
/// assert_eq!(ids.get(2), Some(1));
/// assert_eq!(ids.resolve(0), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VertexIdMap {
    entries: BTreeMap<usize, usize>,
}

impl VertexIdMap {
    /// Create an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Record that the vertex stored at `dense_index` carries `external_id`.
    pub fn register(&mut self, dense_index: usize, external_id: usize) -> Registration {
        if dense_index == external_id {
            return Registration::Identity;
        }
        if let Some(&existing) = self.entries.get(&external_id) {
            return Registration::Duplicate { existing };
        }
        self.entries.insert(external_id, dense_index);
        Registration::Mapped
    }

    /// Dense index stored for `external_id`, if any.
    #[must_use]
    pub fn get(&self, external_id: usize) -> Option<usize> {
        self.entries.get(&external_id).copied()
    }

    /// Dense index for `external_id`, falling back to the ID itself when it
    /// has no entry.
    ///
    /// The fallback treats unmapped IDs as already dense. A file that mixes
    /// sparse and dense numbering can therefore resolve to a valid-looking but
    /// wrong vertex.
    #[must_use]
    pub fn resolve(&self, external_id: usize) -> usize {
        self.get(external_id).unwrap_or(external_id)
    }

    /// Largest external ID with an entry.
    #[must_use]
    pub fn max_external_id(&self) -> Option<usize> {
        self.entries.keys().next_back().copied()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no ID needed remapping.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(external ID, dense index)` pairs in ascending ID order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.entries.iter().map(|(&id, &index)| (id, index))
    }
}
