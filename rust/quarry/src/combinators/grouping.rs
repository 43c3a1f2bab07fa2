use std::hash::Hash;

use ahash::AHashMap;
use tracing::debug;

use crate::Sequence;

/// The result of [`Sequence::group_by`]: groups in the order their keys were
/// first seen, each holding its elements in source order.
pub struct Grouping<'a, K, T> {
    groups: Vec<(K, Sequence<'a, T>)>,
    index: AHashMap<K, usize>,
}

impl<'a, K, T> Grouping<'a, K, T>
where
    K: Eq + Hash,
{
    /// The group for `key`, if any element produced it.
    pub fn get(&self, key: &K) -> Option<&Sequence<'a, T>> {
        self.index.get(key).map(|&i| &self.groups[i].1)
    }

    /// Returns `true` if some element produced `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.groups.iter().map(|(key, _)| key)
    }

    /// Key and group pairs in first-seen key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Sequence<'a, T>)> {
        self.groups.iter().map(|(key, group)| (key, group))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<'a, K, T> IntoIterator for Grouping<'a, K, T> {
    type Item = (K, Sequence<'a, T>);
    type IntoIter = std::vec::IntoIter<(K, Sequence<'a, T>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl<K: std::fmt::Debug, T> std::fmt::Debug for Grouping<'_, K, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.groups.iter().map(|(key, _)| key))
            .finish()
    }
}

impl<'a, T: Clone + Send + Sync + 'a> Sequence<'a, T> {
    /// Groups elements by key. Drains the sequence immediately.
    ///
    /// Keys are compared by value. Groups appear in the order their key was
    /// first produced, and each group keeps the relative order of its elements.
    pub fn group_by<K, F>(&self, key: F) -> Grouping<'a, K, T>
    where
        K: Eq + Hash + Clone,
        F: Fn(&T) -> K,
    {
        let mut index: AHashMap<K, usize> = AHashMap::new();
        let mut buckets: Vec<(K, Vec<T>)> = Vec::new();
        for item in self.iter() {
            let k = key(&item);
            match index.get(&k) {
                Some(&i) => buckets[i].1.push(item),
                None => {
                    index.insert(k.clone(), buckets.len());
                    buckets.push((k, vec![item]));
                }
            }
        }
        debug!(groups = buckets.len(), "grouped sequence");

        let groups = buckets
            .into_iter()
            .map(|(k, items)| (k, Sequence::from_vec(items)))
            .collect();
        Grouping { groups, index }
    }

    /// Splits the elements into `(matching, rest)` in a single pass. Drains the
    /// sequence immediately; both halves keep source order.
    pub fn partition<P>(&self, predicate: P) -> (Sequence<'a, T>, Sequence<'a, T>)
    where
        P: Fn(&T) -> bool,
    {
        let (matching, rest): (Vec<T>, Vec<T>) = self.iter().partition(|item| predicate(item));
        (Sequence::from_vec(matching), Sequence::from_vec(rest))
    }
}
