//! Bounded-concurrency traversal.
//!
//! [`try_for_each`] applies a fallible function to every item using at most a given
//! number of concurrently running invocations. Items are handed out through a shared
//! queue, so fast workers pick up more items than slow ones. The traversal falls
//! back to the caller's thread when only one worker is needed.
//!
//! Failure and cancellation follow a "finish what is running, start nothing new"
//! policy:
//!
//! - The first error returned by `f` is recorded and returned unchanged. Workers
//!   stop taking new items, but invocations already in flight run to completion.
//! - Cancellation of the caller's [`Context`] (or its deadline passing) makes
//!   workers skip the items they have not started yet. In-flight invocations see the
//!   cancellation through the context they are handed.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use tracing::debug;

use crate::channel::{self, Receiver};
use crate::context::{Context, ContextError};

/// Executes `f` for each item with at most `max_degree` concurrent invocations.
///
/// `max_degree` is clamped to `1..=item_count`. Every invocation receives a child
/// of `ctx` that is cancelled as soon as any invocation fails, so long-running work
/// can bail out early.
///
/// # Returns
///
/// - `Ok(())` if every item was processed successfully.
/// - `Err(e)` with the first error returned by `f`.
/// - `Err(E::from(ContextError))` if `ctx` was cancelled or expired before all items
///   were started.
pub fn try_for_each<T, F, E>(
    ctx: &Context,
    max_degree: usize,
    items: impl IntoIterator<Item = T>,
    f: F,
) -> Result<(), E>
where
    T: Send,
    F: Fn(&Context, T) -> Result<(), E> + Send + Sync,
    E: From<ContextError> + Send,
{
    ctx.check()?;

    let (tx, rx) = channel::unbounded();
    let mut count = 0usize;
    for item in items {
        if tx.send(item).is_err() {
            unreachable!("receiver is held locally");
        }
        count += 1;
    }
    drop(tx);
    if count == 0 {
        return Ok(());
    }

    let degree = max_degree.clamp(1, count);
    debug!(items = count, degree, "starting bounded parallel traversal");

    let traversal = Traversal {
        ctx: ctx.spawn(),
        first_error: Mutex::new(None),
        interrupted: AtomicBool::new(false),
    };

    if degree == 1 {
        traversal.run_worker(&rx, &f);
    } else {
        thread::scope(|scope| {
            for _ in 0..degree {
                let rx = rx.clone();
                let traversal = &traversal;
                let f = &f;
                scope.spawn(move || traversal.run_worker(&rx, f));
            }
        });
    }

    if let Some(err) = traversal.first_error.into_inner().unwrap() {
        return Err(err);
    }
    if traversal.interrupted.load(Ordering::Acquire) {
        let reason = traversal.ctx.check().err().unwrap_or(ContextError::Cancelled);
        debug!(%reason, "parallel traversal interrupted");
        return Err(reason.into());
    }
    Ok(())
}

struct Traversal<E> {
    ctx: Context,
    first_error: Mutex<Option<E>>,
    interrupted: AtomicBool,
}

impl<E> Traversal<E> {
    fn run_worker<T, F>(&self, rx: &Receiver<T>, f: &F)
    where
        F: Fn(&Context, T) -> Result<(), E>,
    {
        while let Ok(item) = rx.recv() {
            if self.ctx.is_cancelled() {
                self.interrupted.store(true, Ordering::Release);
                return;
            }
            if let Err(err) = f(&self.ctx, item) {
                let mut slot = self.first_error.lock().unwrap();
                if slot.is_none() {
                    debug!("parallel action failed, no further items will be started");
                    *slot = Some(err);
                }
                drop(slot);
                self.ctx.cancel();
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::{Duration, Instant};

    #[derive(Debug, PartialEq)]
    enum TestError {
        Failed(usize),
        Context(ContextError),
    }

    impl From<ContextError> for TestError {
        fn from(e: ContextError) -> Self {
            TestError::Context(e)
        }
    }

    #[test]
    fn test_every_item_visited_once() {
        let seen = Mutex::new(Vec::new());
        let res: Result<(), TestError> = try_for_each(&Context::new(), 4, 0..100, |_, i| {
            seen.lock().unwrap().push(i);
            Ok(())
        });
        assert!(res.is_ok());
        let mut seen = seen.into_inner().unwrap();
        seen.sort();
        assert_eq!(seen, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_input() {
        let res: Result<(), TestError> =
            try_for_each(&Context::new(), 4, Vec::<u8>::new(), |_, _| unreachable!());
        assert!(res.is_ok());
    }

    #[test]
    fn test_concurrency_is_bounded() {
        let running = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);
        let res: Result<(), TestError> = try_for_each(&Context::new(), 3, 0..12, |_, _| {
            let now = running.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            running.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        });
        assert!(res.is_ok());
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(peak.load(Ordering::SeqCst) >= 2);
    }

    #[test]
    fn test_first_error_stops_dispatch() {
        let started = AtomicUsize::new(0);
        let res = try_for_each(&Context::new(), 2, 0..50, |_, i| {
            started.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(5));
            if i == 3 { Err(TestError::Failed(i)) } else { Ok(()) }
        });
        assert_eq!(res, Err(TestError::Failed(3)));
        assert!(started.load(Ordering::SeqCst) < 50);
    }

    #[test]
    fn test_in_flight_observes_failure_cancellation() {
        let res = try_for_each(&Context::new(), 2, 0..2, |ctx, i| {
            if i == 0 {
                return Err(TestError::Failed(0));
            }
            let start = Instant::now();
            while !ctx.is_cancelled() {
                if start.elapsed() > Duration::from_secs(5) {
                    return Ok(());
                }
                thread::sleep(Duration::from_millis(1));
            }
            Ok(())
        });
        assert_eq!(res, Err(TestError::Failed(0)));
    }

    #[test]
    fn test_precancelled_context() {
        let ctx = Context::new();
        ctx.cancel();
        let res = try_for_each(&ctx, 2, 0..10, |_, _| -> Result<(), TestError> {
            unreachable!()
        });
        assert_eq!(res, Err(TestError::Context(ContextError::Cancelled)));
    }

    #[test]
    fn test_cancellation_mid_traversal() {
        let ctx = Context::new();
        let processed = AtomicUsize::new(0);
        let res = try_for_each(&ctx, 2, 0..100, |_, i| -> Result<(), TestError> {
            if i == 10 {
                ctx.cancel();
            }
            processed.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(1));
            Ok(())
        });
        assert_eq!(res, Err(TestError::Context(ContextError::Cancelled)));
        assert!(processed.load(Ordering::SeqCst) < 100);
    }

    #[test]
    fn test_sequential_fallback_runs_on_caller_thread() {
        let caller = thread::current().id();
        let res: Result<(), TestError> = try_for_each(&Context::new(), 1, 0..5, |_, _| {
            assert_eq!(thread::current().id(), caller);
            Ok(())
        });
        assert!(res.is_ok());
    }
}
