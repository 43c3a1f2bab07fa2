//! Set algebra over sequences.
//!
//! Two flavors are provided. The plain operators compare elements with a
//! caller-supplied equality function and therefore scan pairwise, O(n·m). The
//! `_by_key` operators hash a key extracted from every element and run in linear
//! time; use them whenever such a key exists.
//!
//! The right-hand side of `intersect`/`except` is buffered once per pass, the first
//! time a left element needs to be checked. None of the operators removes
//! duplicates from the left-hand side except `union`.

use std::hash::Hash;
use std::sync::Arc;

use ahash::AHashSet;
use tracing::debug;

use crate::Sequence;

impl<'a, T: Send + 'a> Sequence<'a, T> {
    /// Concatenation followed by [`distinct`](Self::distinct).
    pub fn union<E>(&self, other: &Sequence<'a, T>, equals: E) -> Sequence<'a, T>
    where
        T: Clone,
        E: Fn(&T, &T) -> bool + Send + Sync + 'a,
    {
        self.concat(other).distinct(equals)
    }

    /// Elements of `self` equal to some element of `other`.
    pub fn intersect<E>(&self, other: &Sequence<'a, T>, equals: E) -> Sequence<'a, T>
    where
        E: Fn(&T, &T) -> bool + Send + Sync + 'a,
    {
        self.retain_by_membership(other, equals, true)
    }

    /// Elements of `self` not equal to any element of `other`.
    pub fn except<E>(&self, other: &Sequence<'a, T>, equals: E) -> Sequence<'a, T>
    where
        E: Fn(&T, &T) -> bool + Send + Sync + 'a,
    {
        self.retain_by_membership(other, equals, false)
    }

    pub fn union_by_key<K, F>(&self, other: &Sequence<'a, T>, key: F) -> Sequence<'a, T>
    where
        K: Eq + Hash + Send + 'a,
        F: Fn(&T) -> K + Send + Sync + 'a,
    {
        self.concat(other).distinct_by_key(key)
    }

    pub fn intersect_by_key<K, F>(&self, other: &Sequence<'a, T>, key: F) -> Sequence<'a, T>
    where
        K: Eq + Hash + Send + 'a,
        F: Fn(&T) -> K + Send + Sync + 'a,
    {
        self.retain_by_key(other, key, true)
    }

    pub fn except_by_key<K, F>(&self, other: &Sequence<'a, T>, key: F) -> Sequence<'a, T>
    where
        K: Eq + Hash + Send + 'a,
        F: Fn(&T) -> K + Send + Sync + 'a,
    {
        self.retain_by_key(other, key, false)
    }

    fn retain_by_membership<E>(
        &self,
        other: &Sequence<'a, T>,
        equals: E,
        present: bool,
    ) -> Sequence<'a, T>
    where
        E: Fn(&T, &T) -> bool + Send + Sync + 'a,
    {
        let source = self.clone();
        let other = other.clone();
        let equals = Arc::new(equals);
        Sequence::from_fn(move || {
            let other = other.clone();
            let equals = equals.clone();
            let mut right: Option<Vec<T>> = None;
            source.iter().filter(move |item| {
                let right = right.get_or_insert_with(|| {
                    let buffered: Vec<T> = other.iter().collect();
                    debug!(count = buffered.len(), "materialized set operand");
                    buffered
                });
                right.iter().any(|candidate| equals(item, candidate)) == present
            })
        })
    }

    fn retain_by_key<K, F>(&self, other: &Sequence<'a, T>, key: F, present: bool) -> Sequence<'a, T>
    where
        K: Eq + Hash + Send + 'a,
        F: Fn(&T) -> K + Send + Sync + 'a,
    {
        let source = self.clone();
        let other = other.clone();
        let key = Arc::new(key);
        Sequence::from_fn(move || {
            let other = other.clone();
            let key = key.clone();
            let mut keys: Option<AHashSet<K>> = None;
            source.iter().filter(move |item| {
                let keys = keys.get_or_insert_with(|| {
                    let hashed: AHashSet<K> = other.iter().map(|r| key(&r)).collect();
                    debug!(count = hashed.len(), "hashed set operand keys");
                    hashed
                });
                keys.contains(&key(item)) == present
            })
        })
    }
}
