use serde::{Deserialize, Serialize};

use crate::MushroomType;

/// Integer weights keyed by category or type.
pub type ChanceTable<K> = Table<K, i32>;

/// Floating-point values keyed by mushroom type.
pub type TypeFloatTable = Table<MushroomType, f32>;

/// Single key/value pair stored in a [`Table`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableEntry<K, V> {
    /// Lookup key.
    pub key: K,
    /// Value associated with the key.
    pub value: V,
}

/// Ordered key/value list that preserves declaration order.
///
/// Serialized as a plain list of `{ key, value }` entries. Lookups return the
/// first entry with a matching key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table<K, V> {
    entries: Vec<TableEntry<K, V>>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq, V> Table<K, V> {
    /// Builds a table from `(key, value)` pairs, keeping their order.
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut table = Self::default();
        for (key, value) in pairs {
            table.insert(key, value);
        }
        table
    }

    /// Value stored for `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries
            .iter()
            .find(|entry| entry.key == *key)
            .map(|entry| &entry.value)
    }

    /// Mutable access to the value stored for `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|entry| entry.key == *key)
            .map(|entry| &mut entry.value)
    }

    /// Replaces the value for `key`, appending a new entry when absent.
    pub fn insert(&mut self, key: K, value: V) {
        match self.get_mut(&key) {
            Some(existing) => *existing = value,
            None => self.entries.push(TableEntry { key, value }),
        }
    }

    /// Keeps only the entries for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&K, &V) -> bool) {
        self.entries.retain(|entry| keep(&entry.key, &entry.value));
    }

    /// Iterates over the entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|entry| (&entry.key, &entry.value))
    }

    /// Number of entries stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the table holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: PartialEq + Clone, V: Clone> Table<K, V> {
    /// Merges two tables: entries of `self` win, missing keys come from `fallback`.
    #[must_use]
    pub fn overlay(&self, fallback: &Self) -> Self {
        let mut merged = self.clone();
        for (key, value) in fallback.iter() {
            if merged.get(key).is_none() {
                merged.insert(key.clone(), value.clone());
            }
        }
        merged
    }
}
