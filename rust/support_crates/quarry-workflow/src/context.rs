//! Cooperative cancellation with optional deadlines.
//!
//! A [`Context`] is a cheaply clonable handle to a node in a tree of contexts.
//! A child created with [`Context::spawn`] is cancelled whenever any of its
//! ancestors is cancelled or passes its deadline; cancelling the child leaves the
//! parent untouched. This lets an operation cancel the work it started without
//! affecting the caller's context.
//!
//! Nothing is interrupted forcibly. Work polls [`Context::check`] (or
//! [`Context::is_cancelled`]) before each unit and winds down on its own.
//!
//! # Example
//!
//! ```
//! use quarry_workflow::context::{Context, ContextError};
//!
//! let root = Context::new();
//! let child = root.spawn();
//! assert!(child.check().is_ok());
//!
//! root.cancel();
//! assert_eq!(child.check(), Err(ContextError::Cancelled));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

struct ContextCore {
    cancelled: AtomicBool,
    deadline: Option<Instant>,
    parent: Option<Context>,
}

/// A cancellation token that can be shared across threads.
#[derive(Clone)]
pub struct Context(Arc<ContextCore>);

impl Context {
    /// Creates a root context that is cancelled only by an explicit
    /// [`cancel`](Self::cancel).
    pub fn new() -> Context {
        Self::with_parts(None, None)
    }

    /// Creates a root context that expires at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Context {
        Self::with_parts(Some(deadline), None)
    }

    /// Creates a root context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Context {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Creates a child of this context.
    ///
    /// The child observes this context's cancellation and deadline, but
    /// cancelling the child does not propagate upwards.
    pub fn spawn(&self) -> Context {
        Self::with_parts(None, Some(self.clone()))
    }

    /// Creates a child that additionally expires `timeout` from now.
    pub fn spawn_with_timeout(&self, timeout: Duration) -> Context {
        Self::with_parts(Some(Instant::now() + timeout), Some(self.clone()))
    }

    /// Cancels this context and, transitively, all of its descendants.
    ///
    /// Cancelling an already cancelled context has no effect.
    pub fn cancel(&self) {
        self.0.cancelled.store(true, Ordering::Release);
    }

    /// Returns `Ok(())` while neither this context nor any ancestor has been
    /// cancelled or reached its deadline.
    ///
    /// Explicit cancellation is reported in preference to an expired deadline
    /// when both apply to the same context.
    pub fn check(&self) -> Result<(), ContextError> {
        let now = Instant::now();
        let mut current = Some(self);
        while let Some(ctx) = current {
            if ctx.0.cancelled.load(Ordering::Acquire) {
                return Err(ContextError::Cancelled);
            }
            if ctx.0.deadline.is_some_and(|deadline| now >= deadline) {
                return Err(ContextError::DeadlineExceeded);
            }
            current = ctx.0.parent.as_ref();
        }
        Ok(())
    }

    pub fn is_cancelled(&self) -> bool {
        self.check().is_err()
    }

    /// Returns the earliest deadline along the ancestor chain, if any.
    pub fn deadline(&self) -> Option<Instant> {
        let mut earliest: Option<Instant> = None;
        let mut current = Some(self);
        while let Some(ctx) = current {
            earliest = match (earliest, ctx.0.deadline) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            };
            current = ctx.0.parent.as_ref();
        }
        earliest
    }

    fn with_parts(deadline: Option<Instant>, parent: Option<Context>) -> Context {
        Context(Arc::new(ContextCore {
            cancelled: AtomicBool::new(false),
            deadline,
            parent,
        }))
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("cancelled", &self.is_cancelled())
            .field("deadline", &self.deadline())
            .finish()
    }
}

/// Why a [`Context`] stopped accepting work.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ContextError {
    /// [`Context::cancel`] was called on the context or one of its ancestors.
    Cancelled,
    /// The deadline of the context or one of its ancestors has passed.
    DeadlineExceeded,
}

impl std::fmt::Display for ContextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextError::Cancelled => write!(f, "context cancelled"),
            ContextError::DeadlineExceeded => write!(f, "context deadline exceeded"),
        }
    }
}

impl std::error::Error for ContextError {}
