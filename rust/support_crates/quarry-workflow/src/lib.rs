//! Concurrency plumbing for lazily evaluated sequences.
//!
//! The sequence engine itself is single-threaded and pull-driven. The few operators
//! that cross a thread boundary are built on the primitives in this crate.
//!
//! # Key Components
//!
//! - [`channel`] - Blocking multi-producer, multi-consumer channels whose producers
//!   observe the consumer side going away, so a background producer never outlives
//!   the interest in its output.
//! - [`context`] - Hierarchical, cooperative cancellation with optional deadlines.
//! - [`data_parallel`] - Bounded-concurrency traversal that stops dispatching on the
//!   first error or on cancellation.
//! - [`pull`] - Adapts a push-style producer (one that calls a callback per element)
//!   into a demand-driven pull iterator running on a helper thread.

pub mod channel;
pub mod context;
pub mod data_parallel;
pub mod pull;

pub use context::{Context, ContextError};
