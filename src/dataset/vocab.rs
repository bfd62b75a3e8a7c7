#![forbid(unsafe_code)]

use std::borrow::Borrow;
use std::hash::Hash;

use indexmap::IndexMap;

/// Ordered dictionary assigning dense ids in first-seen order.
///
/// Backs the label dictionary, the raw tag dictionary, and the tag
/// vocabulary. Iteration order is insertion order, so id assignment is
/// reproducible across runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vocabulary<K: Hash + Eq> {
    ids: IndexMap<K, usize>,
}

impl<K: Hash + Eq> Default for Vocabulary<K> {
    fn default() -> Self {
        Self {
            ids: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq> Vocabulary<K> {
    /// Creates an empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `key`, assigning the next dense id if unseen.
    pub fn intern(&mut self, key: K) -> usize {
        let next = self.ids.len();
        *self.ids.entry(key).or_insert(next)
    }

    /// Looks up the id of `key` without inserting.
    pub fn get<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.ids.get(key).copied()
    }

    /// Returns the key holding dense id `id`.
    pub fn key(&self, id: usize) -> Option<&K> {
        self.ids.get_index(id).map(|(key, _)| key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true when no key has been interned.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Keys in id order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.ids.keys()
    }

    /// `(key, id)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> {
        self.ids.iter().map(|(key, id)| (key, *id))
    }
}

impl<K: Hash + Eq> FromIterator<K> for Vocabulary<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut vocab = Self::new();
        for key in iter {
            vocab.intern(key);
        }
        vocab
    }
}
