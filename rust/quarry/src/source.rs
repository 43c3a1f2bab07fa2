//! Sequence factories.

use std::collections::HashMap;
use std::io::Read;
use std::sync::{Arc, Mutex};

use quarry_common::{Error, Result};
use quarry_workflow::channel::Receiver;
use quarry_workflow::pull::PullIter;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::Sequence;

impl<'a, T: 'a> Sequence<'a, T> {
    /// A sequence with no elements.
    pub fn empty() -> Sequence<'a, T> {
        Self::from_fn(std::iter::empty::<T>)
    }

    /// Views a borrowed slice without copying it. Elements are cloned as they
    /// are yielded.
    pub fn from_slice(items: &'a [T]) -> Sequence<'a, T>
    where
        T: Clone + Sync,
    {
        Self::from_fn(move || items.iter().cloned())
    }

    /// Takes ownership of `items`. The buffer is shared by every pass and by
    /// every clone of the sequence.
    pub fn from_vec(items: Vec<T>) -> Sequence<'a, T>
    where
        T: Clone + Send + Sync,
    {
        let items: Arc<[T]> = items.into();
        Self::from_fn(move || {
            let items = items.clone();
            (0..items.len()).map(move |i| items[i].clone())
        })
    }

    /// Collects `items` into an owned, restartable sequence.
    ///
    /// The [`seq!`](crate::seq) macro is shorthand for this.
    pub fn from_items<I>(items: I) -> Sequence<'a, T>
    where
        I: IntoIterator<Item = T>,
        T: Clone + Send + Sync,
    {
        Self::from_vec(items.into_iter().collect())
    }

    /// A sequence containing `item` once.
    pub fn once(item: T) -> Sequence<'a, T>
    where
        T: Clone + Send + Sync,
    {
        Self::from_fn(move || std::iter::once(item.clone()))
    }

    /// Wraps an iterator that can only be consumed once.
    ///
    /// The first pass drains `iter`; every later pass is empty.
    pub fn from_iter_once<I>(iter: I) -> Sequence<'a, T>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'a,
    {
        let slot = Mutex::new(Some(iter.into_iter()));
        Self::from_fn(move || {
            let iter = slot.lock().unwrap().take();
            if iter.is_none() {
                trace!("one-shot sequence opened again, yielding nothing");
            }
            iter.into_iter().flatten()
        })
    }

    /// Adapts a push-style production function.
    ///
    /// `producer` is called once per pass with an `emit` callback and must return
    /// as soon as `emit` returns `false`. It runs on a helper thread and is resumed
    /// only when the consumer asks for the next element, so no element is
    /// produced ahead of demand. Restartability is up to `producer`.
    ///
    /// ```
    /// use quarry::Sequence;
    ///
    /// let naturals = Sequence::from_producer(|emit: &mut dyn FnMut(u64) -> bool| {
    ///     let mut n = 0;
    ///     while emit(n) {
    ///         n += 1;
    ///     }
    /// });
    /// assert_eq!(naturals.take(3).to_vec(), vec![0, 1, 2]);
    /// ```
    pub fn from_producer<P>(producer: P) -> Sequence<'a, T>
    where
        P: Fn(&mut dyn FnMut(T) -> bool) + Send + Sync + 'static,
        T: Send + 'static,
    {
        let producer = Arc::new(producer);
        Self::from_fn(move || PullIter::new(producer.clone()))
    }

    /// Yields the values of a map, in the map's iteration order.
    pub fn from_map_values<K, S>(map: &'a HashMap<K, T, S>) -> Sequence<'a, T>
    where
        K: Sync,
        S: Sync,
        T: Clone + Sync,
    {
        Self::from_fn(move || map.values().cloned())
    }

    /// Yields values received from `receiver` until every sender is dropped.
    ///
    /// Received values are consumed, so the sequence is not restartable. The
    /// channel's lifetime belongs to its senders; draining blocks while the channel
    /// is empty but still open.
    pub fn from_channel(receiver: Receiver<T>) -> Sequence<'a, T>
    where
        T: Send,
    {
        Self::from_fn(move || receiver.clone().into_iter())
    }

    /// Decodes a JSON array into an owned sequence.
    pub fn from_json(bytes: &[u8]) -> Result<Sequence<'a, T>>
    where
        T: DeserializeOwned + Clone + Send + Sync,
    {
        let items: Vec<T> = serde_json::from_slice(bytes).map_err(Error::decode)?;
        Ok(Self::from_vec(items))
    }

    /// Decodes a JSON array read from `reader` into an owned sequence.
    pub fn from_json_reader<R>(reader: R) -> Result<Sequence<'a, T>>
    where
        R: Read,
        T: DeserializeOwned + Clone + Send + Sync,
    {
        let items: Vec<T> = serde_json::from_reader(reader).map_err(Error::decode)?;
        Ok(Self::from_vec(items))
    }
}

impl<'a> Sequence<'a, i64> {
    /// `count` consecutive integers starting at `start`.
    ///
    /// A negative `count` yields an empty sequence. The sequence ends early
    /// rather than overflow `i64`.
    pub fn range(start: i64, count: i64) -> Sequence<'a, i64> {
        let count = count.max(0);
        Self::from_fn(move || (0..count).map_while(move |i| start.checked_add(i)))
    }
}

impl<'a, T> FromIterator<T> for Sequence<'a, T>
where
    T: Clone + Send + Sync + 'a,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Sequence::from_items(iter)
    }
}
