use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::Sequence;

mod grouping_tests;
mod materialize_tests;
mod parallel_tests;

/// `0..len` as a sequence that counts every element pulled from it.
pub(crate) fn counted(len: i64) -> (Sequence<'static, i64>, Arc<AtomicUsize>) {
    let pulled = Arc::new(AtomicUsize::new(0));
    let counter = pulled.clone();
    let seq = Sequence::from_fn(move || {
        let counter = counter.clone();
        (0..len).inspect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    });
    (seq, pulled)
}

pub(crate) fn pulls(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}
