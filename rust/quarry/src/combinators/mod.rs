//! Operators that derive new sequences from existing ones.
//!
//! - [`stateless`] - per-element transformations that never buffer more than the
//!   elements they have already forwarded.
//! - [`materialize`] - operators that need the whole source before producing output.
//!   They buffer when the derived sequence is drained, not when it is built.
//! - [`set_ops`] - union, intersection and difference, with a pairwise-equality path
//!   and a hashed-key path.
//! - [`grouping`] - eager grouping and partitioning.

pub mod grouping;
pub mod materialize;
pub mod set_ops;
pub mod stateless;

pub use grouping::Grouping;
pub use materialize::SortOrder;
