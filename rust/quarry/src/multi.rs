//! Operators over two independently typed sequences.

use std::sync::Arc;

use tracing::debug;

use crate::Sequence;

impl<'a, T: 'a> Sequence<'a, T> {
    /// Pairs elements positionally and combines each pair. Ends as soon as
    /// either side is exhausted.
    ///
    /// Both sides are pulled in lockstep on the draining thread.
    pub fn zip<U, R, F>(&self, other: &Sequence<'a, U>, combine: F) -> Sequence<'a, R>
    where
        U: 'a,
        R: 'a,
        F: Fn(T, U) -> R + Send + Sync + 'a,
    {
        let left = self.clone();
        let right = other.clone();
        let combine = Arc::new(combine);
        Sequence::from_fn(move || {
            let combine = combine.clone();
            left.iter()
                .zip(right.iter())
                .map(move |(a, b)| combine(a, b))
        })
    }

    /// Inner equi-join.
    ///
    /// Every pass buffers `inner` once, then for each element of `self` in order
    /// scans the buffer and combines every inner element whose key matches.
    /// Output follows outer order first, inner order second.
    pub fn join<I, K, R, FO, FI, FR>(
        &self,
        inner: &Sequence<'a, I>,
        outer_key: FO,
        inner_key: FI,
        combine: FR,
    ) -> Sequence<'a, R>
    where
        T: Send,
        I: Send + Sync + 'a,
        K: PartialEq + Send + Sync + 'a,
        R: 'a,
        FO: Fn(&T) -> K + Send + Sync + 'a,
        FI: Fn(&I) -> K + Send + Sync + 'a,
        FR: Fn(&T, &I) -> R + Send + Sync + 'a,
    {
        let outer = self.clone();
        let inner = inner.clone();
        let outer_key = Arc::new(outer_key);
        let inner_key = Arc::new(inner_key);
        let combine = Arc::new(combine);
        Sequence::from_fn(move || {
            let keyed: Arc<Vec<(K, I)>> = Arc::new(
                inner
                    .iter()
                    .map(|item| (inner_key(&item), item))
                    .collect(),
            );
            debug!(count = keyed.len(), "materialized join inner side");
            let outer_key = outer_key.clone();
            let combine = combine.clone();
            outer.iter().flat_map(move |o| {
                let key = outer_key(&o);
                let keyed = keyed.clone();
                let combine = combine.clone();
                (0..keyed.len()).filter_map(move |i| {
                    let (k, item) = &keyed[i];
                    (*k == key).then(|| combine(&o, item))
                })
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::Sequence;

    #[test]
    fn test_zip_stops_at_shorter() {
        let numbers = crate::seq![1, 2, 3];
        let letters = crate::seq!["a", "b"];
        let zipped = numbers.zip(&letters, |n, l| format!("{n}{l}"));
        assert_eq!(zipped.to_vec(), vec!["1a", "2b"]);
        assert_eq!(letters.zip(&numbers, |l, n| (l, n)).count(), 2);
    }

    #[test]
    fn test_join_preserves_outer_then_inner_order() {
        let customers = crate::seq![(1, "ann"), (2, "ben"), (3, "cy")];
        let orders = crate::seq![(2, "pen"), (1, "ink"), (2, "pad"), (4, "cap")];
        let joined = customers.join(
            &orders,
            |c| c.0,
            |o| o.0,
            |c, o| format!("{}:{}", c.1, o.1),
        );
        assert_eq!(joined.to_vec(), vec!["ann:ink", "ben:pen", "ben:pad"]);
    }

    #[test]
    fn test_join_with_empty_inner() {
        let outer = Sequence::range(0, 5);
        let inner: Sequence<'_, i64> = Sequence::empty();
        assert!(outer.join(&inner, |x| *x, |y| *y, |x, y| x + y).is_empty());
    }
}
