use std::cmp::Ordering;

use quarry_common::{Result, verify_arg};
use tracing::debug;

use crate::Sequence;

/// Direction of a key-based ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl<'a, T: Send + 'a> Sequence<'a, T> {
    /// Derives a sequence whose every pass first drains `self` into a buffer
    /// and then yields whatever `rebuild` makes of it.
    fn buffered<U, F>(&self, operation: &'static str, rebuild: F) -> Sequence<'a, U>
    where
        U: Send + 'a,
        F: Fn(Vec<T>) -> Vec<U> + Send + Sync + 'a,
    {
        let source = self.clone();
        Sequence::from_fn(move || {
            let items: Vec<T> = source.iter().collect();
            debug!(operation, count = items.len(), "materialized sequence");
            rebuild(items)
        })
    }

    /// Stable sort with a caller-supplied comparison.
    pub fn order_by<C>(&self, compare: C) -> Sequence<'a, T>
    where
        C: Fn(&T, &T) -> Ordering + Send + Sync + 'a,
    {
        self.buffered("order_by", move |mut items| {
            items.sort_by(|a, b| compare(a, b));
            items
        })
    }

    /// Stable sort by an extracted key.
    ///
    /// Elements with equal keys keep their relative order in both directions.
    /// For float keys use `ordered_float::OrderedFloat` or sort with
    /// [`order_by`](Self::order_by) and `f64::total_cmp`.
    ///
    /// ```
    /// use quarry::{Sequence, SortOrder};
    ///
    /// let words = quarry::seq!["pear", "fig", "banana"];
    /// let by_len = words.order_by_key(|w| w.len(), SortOrder::Descending);
    /// assert_eq!(by_len.to_vec(), vec!["banana", "pear", "fig"]);
    /// ```
    pub fn order_by_key<K, F>(&self, key: F, order: SortOrder) -> Sequence<'a, T>
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'a,
    {
        self.buffered("order_by_key", move |mut items| {
            items.sort_by(|a, b| {
                let ord = key(a).cmp(&key(b));
                match order {
                    SortOrder::Ascending => ord,
                    SortOrder::Descending => ord.reverse(),
                }
            });
            items
        })
    }

    pub fn reverse(&self) -> Sequence<'a, T> {
        self.buffered("reverse", |mut items| {
            items.reverse();
            items
        })
    }

    /// Uniformly permutes the elements, drawing a fresh seed on every pass.
    pub fn shuffle(&self) -> Sequence<'a, T> {
        self.buffered("shuffle", |mut items| {
            fastrand::Rng::new().shuffle(&mut items);
            items
        })
    }

    /// Uniformly permutes the elements with `rng`.
    ///
    /// Every pass starts from a copy of `rng`, so repeated passes yield the same
    /// permutation.
    pub fn shuffle_with(&self, rng: fastrand::Rng) -> Sequence<'a, T> {
        self.buffered("shuffle", move |mut items| {
            rng.clone().shuffle(&mut items);
            items
        })
    }

    /// Drops the last `n` elements. Empty when `n` is at least the length.
    pub fn skip_last(&self, n: usize) -> Sequence<'a, T> {
        self.buffered("skip_last", move |mut items| {
            items.truncate(items.len().saturating_sub(n));
            items
        })
    }

    /// Keeps the last `n` elements. Everything when `n` is at least the length.
    pub fn take_last(&self, n: usize) -> Sequence<'a, T> {
        self.buffered("take_last", move |mut items| {
            let start = items.len().saturating_sub(n);
            items.split_off(start)
        })
    }

    /// Splits the sequence into consecutive chunks of `size` elements; the last
    /// chunk may be shorter.
    ///
    /// Fails with `InvalidArgument` when `size` is zero.
    pub fn chunk(&self, size: usize) -> Result<Sequence<'a, Sequence<'a, T>>>
    where
        T: Clone + Sync,
    {
        verify_arg!(size, size > 0);
        Ok(self.buffered("chunk", move |items| {
            let mut items = items.into_iter();
            std::iter::from_fn(|| {
                let chunk: Vec<T> = items.by_ref().take(size).collect();
                (!chunk.is_empty()).then(|| Sequence::from_vec(chunk))
            })
            .collect()
        }))
    }
}
