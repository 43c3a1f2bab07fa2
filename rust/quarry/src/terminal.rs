//! Operations that drain a sequence into a value or a side effect.
//!
//! Accessors that may find nothing return [`Result`]; call `.ok()` where an
//! [`Option`] reads better.

use std::collections::HashMap;
use std::hash::Hash;

use quarry_common::{Cardinality, Error, Result};
use rand::seq::index;
use rand::{CryptoRng, Rng};

use crate::Sequence;

impl<'a, T: 'a> Sequence<'a, T> {
    /// The first element. Pulls at most one element.
    pub fn first(&self) -> Result<T> {
        self.iter().next().ok_or_else(Error::no_element)
    }

    /// The last element. Drains the whole sequence.
    pub fn last(&self) -> Result<T> {
        self.iter().last().ok_or_else(Error::no_element)
    }

    /// The only element. Pulls at most two elements.
    pub fn single(&self) -> Result<T> {
        let mut iter = self.iter();
        match (iter.next(), iter.next()) {
            (Some(item), None) => Ok(item),
            (None, _) => Err(Error::not_exactly_one(Cardinality::Zero)),
            (Some(_), Some(_)) => Err(Error::not_exactly_one(Cardinality::Many)),
        }
    }

    /// The element at zero-based `index`. Stops pulling once it is reached.
    pub fn element_at(&self, index: usize) -> Result<T> {
        self.iter()
            .nth(index)
            .ok_or_else(|| Error::index_out_of_range(index))
    }

    #[doc(alias = "len")]
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Returns `true` when the sequence yields nothing. Pulls at most one
    /// element.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Returns `true` if some element equals `value`. Stops at the first match.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|item| &item == value)
    }

    /// Returns `true` if some element satisfies `predicate`. Stops at the first
    /// match.
    pub fn any<P>(&self, predicate: P) -> bool
    where
        P: Fn(&T) -> bool,
    {
        self.iter().any(|item| predicate(&item))
    }

    /// Returns `true` if every element satisfies `predicate`. Stops at the first
    /// element that does not.
    pub fn all<P>(&self, predicate: P) -> bool
    where
        P: Fn(&T) -> bool,
    {
        self.iter().all(|item| predicate(&item))
    }

    pub fn none<P>(&self, predicate: P) -> bool
    where
        P: Fn(&T) -> bool,
    {
        !self.any(predicate)
    }

    /// Strict left fold. On an empty sequence `seed` is returned and
    /// `accumulator` is never called.
    #[doc(alias = "fold")]
    pub fn aggregate<A, F>(&self, seed: A, accumulator: F) -> A
    where
        F: FnMut(A, T) -> A,
    {
        self.iter().fold(seed, accumulator)
    }

    pub fn for_each<F>(&self, action: F)
    where
        F: FnMut(T),
    {
        self.iter().for_each(action)
    }

    /// Compares two sequences element by element. Sequences of different length
    /// are never equal.
    pub fn sequence_equal<U, E>(&self, other: &Sequence<'a, U>, equals: E) -> bool
    where
        U: 'a,
        E: Fn(&T, &U) -> bool,
    {
        let mut left = self.iter();
        let mut right = other.iter();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if equals(&a, &b) => continue,
                _ => return false,
            }
        }
    }

    #[doc(alias = "to_slice")]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Builds a map from extracted keys and values. On key collisions the later
    /// element wins.
    pub fn to_map<K, V, FK, FV>(&self, key: FK, value: FV) -> HashMap<K, V>
    where
        K: Eq + Hash,
        FK: Fn(&T) -> K,
        FV: Fn(T) -> V,
    {
        self.iter()
            .map(|item| (key(&item), value(item)))
            .collect()
    }

    /// Indexes elements by an extracted key. On key collisions the later element
    /// wins.
    pub fn to_keyed_map<K, F>(&self, key: F) -> HashMap<K, T>
    where
        K: Eq + Hash,
        F: Fn(&T) -> K,
    {
        self.to_map(key, |item| item)
    }

    /// A uniformly chosen element, selected with the thread-local
    /// cryptographically secure generator.
    pub fn random(&self) -> Result<T> {
        self.random_with(&mut rand::rng())
    }

    /// A uniformly chosen element, selected with `rng`.
    pub fn random_with<R>(&self, rng: &mut R) -> Result<T>
    where
        R: Rng + CryptoRng + ?Sized,
    {
        let mut items = self.to_vec();
        if items.is_empty() {
            return Err(Error::empty_collection("random"));
        }
        let position = rng.random_range(0..items.len());
        Ok(items.swap_remove(position))
    }

    /// Up to `n` elements from distinct positions, in the order they were drawn.
    pub fn random_n(&self, n: usize) -> Result<Vec<T>> {
        self.random_n_with(n, &mut rand::rng())
    }

    /// Up to `n` elements from distinct positions drawn with `rng`.
    ///
    /// Returns all elements in random order when `n` exceeds the length.
    pub fn random_n_with<R>(&self, n: usize, rng: &mut R) -> Result<Vec<T>>
    where
        R: Rng + CryptoRng + ?Sized,
    {
        let mut items: Vec<Option<T>> = self.iter().map(Some).collect();
        if items.is_empty() {
            return Err(Error::empty_collection("random_n"));
        }
        let amount = n.min(items.len());
        Ok(index::sample(rng, items.len(), amount)
            .into_iter()
            .filter_map(|position| items[position].take())
            .collect())
    }
}
