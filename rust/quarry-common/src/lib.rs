//! Shared error types and argument verification helpers for the quarry crates.

pub mod error;
pub mod result;

pub use error::{Cardinality, Error, ErrorKind};
pub use result::Result;
