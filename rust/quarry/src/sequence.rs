//! The lazy sequence handle and the producer abstraction it is built on.

use std::sync::Arc;

/// A boxed, sendable pull iterator produced by one pass over a sequence.
pub type BoxIter<'a, T> = Box<dyn Iterator<Item = T> + Send + 'a>;

/// A source of elements that can be opened for iteration.
///
/// Every call to [`open`](Producer::open) starts an independent pass. Whether two
/// passes observe the same elements is the producer's contract: producers over
/// in-memory data are restartable, producers over channels or one-shot iterators
/// are not.
///
/// Any `Fn() -> impl IntoIterator` closure is a producer, which is how every
/// combinator in this crate is expressed.
pub trait Producer<'a, T>: Send + Sync + 'a {
    fn open(&self) -> BoxIter<'a, T>;
}

impl<'a, T, F, I> Producer<'a, T> for F
where
    F: Fn() -> I + Send + Sync + 'a,
    I: IntoIterator<Item = T>,
    I::IntoIter: Send + 'a,
{
    fn open(&self) -> BoxIter<'a, T> {
        Box::new(self().into_iter())
    }
}

/// A lazily evaluated, composable sequence of `T`.
///
/// A `Sequence` is a cheaply clonable handle to a [`Producer`]. Combinators such as
/// [`filter`](Sequence::filter) or [`map`](Sequence::map) never touch the source;
/// they return a new sequence that captures the upstream handle together with the
/// transformation. Work happens only when the sequence is drained, either by
/// iterating it or by a terminal operation like [`count`](Sequence::count).
///
/// Draining pulls one element at a time from the outermost combinator inwards.
/// Stopping early (dropping the iterator, or returning `false` from the
/// [`drain`](Sequence::drain) callback) leaves the upstream producers exactly where
/// they were: no element is computed ahead of demand.
///
/// ```
/// use quarry::Sequence;
///
/// let squares = Sequence::range(1, 10)
///     .filter(|x| x % 2 == 0)
///     .map(|x| x * x);
/// assert_eq!(squares.to_vec(), vec![4, 16, 36, 64, 100]);
/// ```
pub struct Sequence<'a, T> {
    producer: Arc<dyn Producer<'a, T> + 'a>,
}

impl<'a, T: 'a> Sequence<'a, T> {
    /// Wraps an arbitrary producer.
    pub fn new<P>(producer: P) -> Sequence<'a, T>
    where
        P: Producer<'a, T>,
    {
        Sequence {
            producer: Arc::new(producer),
        }
    }

    /// Creates a sequence whose every pass calls `factory` for a fresh iterator.
    ///
    /// The sequence is restartable exactly when `factory` returns equivalent
    /// iterators on every call.
    pub fn from_fn<F, I>(factory: F) -> Sequence<'a, T>
    where
        F: Fn() -> I + Send + Sync + 'a,
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'a,
    {
        Self::new(factory)
    }

    /// Starts a new pass over the sequence.
    pub fn iter(&self) -> Iter<'a, T> {
        Iter {
            inner: self.producer.open(),
        }
    }

    /// Pushes elements into `consumer` until it returns `false` or the sequence
    /// is exhausted.
    ///
    /// Once `consumer` returns `false` no further element is pulled from the
    /// source.
    pub fn drain<C>(&self, mut consumer: C)
    where
        C: FnMut(T) -> bool,
    {
        for item in self.iter() {
            if !consumer(item) {
                return;
            }
        }
    }
}

impl<T> Clone for Sequence<'_, T> {
    fn clone(&self) -> Self {
        Sequence {
            producer: self.producer.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Sequence<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequence").finish_non_exhaustive()
    }
}

/// A single pass over a [`Sequence`].
pub struct Iter<'a, T> {
    inner: BoxIter<'a, T>,
}

impl<T> Iterator for Iter<'_, T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T: 'a> IntoIterator for Sequence<'a, T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T: 'a> IntoIterator for &Sequence<'a, T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
