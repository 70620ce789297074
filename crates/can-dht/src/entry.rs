//! Key-value entries and the per-node store.

use std::collections::BTreeMap;

use can_topology::{Point, Zone};

/// A stored key-value pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// The key.
    pub key: String,
    /// The value.
    pub value: String,
    /// Coordinate the key hashed to, cached so splits need not rehash.
    pub point: Point,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: impl Into<String>, point: Point) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            point,
        }
    }
}

/// Entries held by a single node.
///
/// Entries move between stores during splits and merges; they are never
/// copied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyStore {
    entries: BTreeMap<String, Entry>,
}

impl KeyStore {
    /// Create empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an entry by key.
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// Insert an entry, returning the one it replaced.
    pub fn insert(&mut self, entry: Entry) -> Option<Entry> {
        self.entries.insert(entry.key.clone(), entry)
    }

    /// Remove an entry.
    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        self.entries.remove(key)
    }

    /// Move out every entry whose coordinate lies inside `zone`.
    pub fn take_within(&mut self, zone: &Zone) -> KeyStore {
        let (taken, kept): (BTreeMap<_, _>, BTreeMap<_, _>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|(_, entry)| zone.contains(entry.point));
        self.entries = kept;
        KeyStore { entries: taken }
    }

    /// Move every entry of `other` into this store.
    /// Returns number of entries moved.
    pub fn absorb(&mut self, other: KeyStore) -> usize {
        let moved = other.entries.len();
        self.entries.extend(other.entries);
        moved
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }
}
