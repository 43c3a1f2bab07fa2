use std::hash::Hash;
use std::sync::Arc;

use ahash::AHashSet;

use crate::Sequence;

impl<'a, T: 'a> Sequence<'a, T> {
    /// Forwards the elements that satisfy `predicate`.
    #[doc(alias = "where")]
    pub fn filter<P>(&self, predicate: P) -> Sequence<'a, T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'a,
    {
        let source = self.clone();
        let predicate = Arc::new(predicate);
        Sequence::from_fn(move || {
            let predicate = predicate.clone();
            source.iter().filter(move |item| predicate(item))
        })
    }

    /// Transforms every element.
    #[doc(alias = "select")]
    pub fn map<U, F>(&self, transform: F) -> Sequence<'a, U>
    where
        U: 'a,
        F: Fn(T) -> U + Send + Sync + 'a,
    {
        let source = self.clone();
        let transform = Arc::new(transform);
        Sequence::from_fn(move || {
            let transform = transform.clone();
            source.iter().map(move |item| transform(item))
        })
    }

    /// Maps every element to a sub-sequence and drains each sub-sequence in full
    /// before moving on to the next source element.
    #[doc(alias = "select_many")]
    pub fn flat_map<U, F>(&self, transform: F) -> Sequence<'a, U>
    where
        U: 'a,
        F: Fn(T) -> Sequence<'a, U> + Send + Sync + 'a,
    {
        let source = self.clone();
        let transform = Arc::new(transform);
        Sequence::from_fn(move || {
            let transform = transform.clone();
            source.iter().flat_map(move |item| transform(item))
        })
    }

    /// Drains `self`, then `other`. `other` is not opened until `self` is
    /// exhausted.
    pub fn concat(&self, other: &Sequence<'a, T>) -> Sequence<'a, T> {
        let first = self.clone();
        let second = other.clone();
        Sequence::from_fn(move || first.iter().chain(std::iter::once(second.clone()).flatten()))
    }

    pub fn append(&self, item: T) -> Sequence<'a, T>
    where
        T: Clone + Send + Sync,
    {
        self.concat(&Sequence::once(item))
    }

    pub fn prepend(&self, item: T) -> Sequence<'a, T>
    where
        T: Clone + Send + Sync,
    {
        Sequence::once(item).concat(self)
    }

    /// Forwards at most `n` elements. The source is not pulled again once `n`
    /// elements have been forwarded.
    pub fn take(&self, n: usize) -> Sequence<'a, T> {
        let source = self.clone();
        Sequence::from_fn(move || source.iter().take(n))
    }

    /// Forwards elements while `predicate` holds. The first failing element is
    /// not forwarded and ends the sequence.
    pub fn take_while<P>(&self, predicate: P) -> Sequence<'a, T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'a,
    {
        let source = self.clone();
        let predicate = Arc::new(predicate);
        Sequence::from_fn(move || {
            let predicate = predicate.clone();
            source.iter().take_while(move |item| predicate(item))
        })
    }

    /// Forwards elements until `predicate` holds. The triggering element is not
    /// forwarded.
    pub fn take_until<P>(&self, predicate: P) -> Sequence<'a, T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'a,
    {
        self.take_while(move |item| !predicate(item))
    }

    /// Suppresses the first `n` elements.
    pub fn skip(&self, n: usize) -> Sequence<'a, T> {
        let source = self.clone();
        Sequence::from_fn(move || source.iter().skip(n))
    }

    /// Suppresses elements while `predicate` holds. After the first element that
    /// fails it, everything is forwarded without consulting `predicate` again.
    pub fn skip_while<P>(&self, predicate: P) -> Sequence<'a, T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'a,
    {
        let source = self.clone();
        let predicate = Arc::new(predicate);
        Sequence::from_fn(move || {
            let predicate = predicate.clone();
            source.iter().skip_while(move |item| predicate(item))
        })
    }

    /// Suppresses elements until `predicate` holds. The triggering element and
    /// everything after it is forwarded.
    pub fn skip_until<P>(&self, predicate: P) -> Sequence<'a, T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'a,
    {
        self.skip_while(move |item| !predicate(item))
    }

    /// Forwards elements not equal, per `equals`, to any element forwarded
    /// before.
    ///
    /// Every pass keeps the forwarded elements and compares each new element
    /// against all of them, which is quadratic. Prefer
    /// [`distinct_by_key`](Self::distinct_by_key) when a hashable key exists.
    pub fn distinct<E>(&self, equals: E) -> Sequence<'a, T>
    where
        T: Clone + Send,
        E: Fn(&T, &T) -> bool + Send + Sync + 'a,
    {
        let source = self.clone();
        let equals = Arc::new(equals);
        Sequence::from_fn(move || {
            let equals = equals.clone();
            let mut seen: Vec<T> = Vec::new();
            source.iter().filter(move |item| {
                if seen.iter().any(|prev| equals(prev, item)) {
                    false
                } else {
                    seen.push(item.clone());
                    true
                }
            })
        })
    }

    /// Forwards the first element for every distinct key.
    pub fn distinct_by_key<K, F>(&self, key: F) -> Sequence<'a, T>
    where
        K: Eq + Hash + Send + 'a,
        F: Fn(&T) -> K + Send + Sync + 'a,
    {
        let source = self.clone();
        let key = Arc::new(key);
        Sequence::from_fn(move || {
            let key = key.clone();
            let mut seen = AHashSet::new();
            source.iter().filter(move |item| seen.insert(key(item)))
        })
    }
}

impl<'a, T: 'a> Sequence<'a, Sequence<'a, T>> {
    /// Concatenates the inner sequences in order.
    pub fn flatten(&self) -> Sequence<'a, T> {
        self.flat_map(|inner| inner)
    }
}
