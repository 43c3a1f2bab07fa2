//! Lazy, composable query operators over Rust sequences.
//!
//! A [`Sequence`] describes how to produce elements without producing them.
//! Operators like [`filter`](Sequence::filter), [`order_by_key`](Sequence::order_by_key)
//! or [`join`](Sequence::join) return new sequences that remember their upstream and
//! their transformation; nothing runs until a terminal operation such as
//! [`to_vec`](Sequence::to_vec), [`count`](Sequence::count) or
//! [`first`](Sequence::first) drains the chain. Draining pulls elements one at a
//! time from the outermost operator inwards and never computes an element nobody
//! asked for.
//!
//! # Key Components
//!
//! - [`sequence`] - the [`Sequence`] handle, the [`Producer`] trait and the pull
//!   iterator.
//! - [`source`] - factories: slices, vectors, ranges, one-shot iterators, push
//!   producers, maps, channels and JSON.
//! - [`combinators`] - stateless, materializing, set and grouping operators.
//! - [`terminal`] - element access, predicates, folds and conversions.
//! - [`numeric`] - sum, average, min, max, median and mode over primitive numbers.
//! - [`parallel`] - bounded-concurrency traversal with cancellation.
//! - [`multi`] - zip and join.
//! - [`channel`] and [`codec`] - channel and JSON bridges.
//! - [`config`] - process-wide defaults.
//!
//! ```
//! use quarry::{Sequence, SortOrder};
//!
//! let words = quarry::seq!["apple", "banana", "cherry", "apricot", "blueberry"];
//! let groups = words.group_by(|w| w.chars().next());
//! let a: Vec<_> = groups.get(&Some('a')).unwrap().to_vec();
//! assert_eq!(a, vec!["apple", "apricot"]);
//!
//! let longest_first = words.order_by_key(|w| w.len(), SortOrder::Descending).first();
//! assert_eq!(longest_first.unwrap(), "blueberry");
//! ```

pub mod channel;
pub mod codec;
pub mod combinators;
pub mod config;
pub mod multi;
pub mod numeric;
pub mod parallel;
pub mod sequence;
pub mod source;
pub mod terminal;

#[cfg(test)]
mod tests;

pub use combinators::{Grouping, SortOrder};
pub use config::Config;
pub use numeric::{Numeric, NumericKind};
pub use quarry_common::{Cardinality, Error, ErrorKind, Result};
pub use quarry_workflow::{Context, ContextError};
pub use sequence::{BoxIter, Iter, Producer, Sequence};

/// Builds an owned, restartable [`Sequence`] from a list of items.
///
/// ```
/// let s = quarry::seq![1, 2, 3];
/// assert_eq!(s.count(), 3);
/// ```
#[macro_export]
macro_rules! seq {
    () => {
        $crate::Sequence::empty()
    };
    ($($item:expr),+ $(,)?) => {
        $crate::Sequence::from_vec(::std::vec![$($item),+])
    };
}
