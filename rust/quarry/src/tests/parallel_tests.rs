use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::{Context, ContextError, Error, ErrorKind, Sequence};

#[derive(Debug, PartialEq)]
enum ActionError {
    Rejected(i64),
    Interrupted(ContextError),
}

impl From<ContextError> for ActionError {
    fn from(e: ContextError) -> Self {
        ActionError::Interrupted(e)
    }
}

#[test]
fn test_every_element_visited_once() {
    let seen = Mutex::new(Vec::new());
    let result: Result<(), Error> = Sequence::range(0, 64).par_for_each(&Context::new(), 8, |_, x| {
        seen.lock().unwrap().push(x);
        Ok(())
    });
    assert!(result.is_ok());
    let mut seen = seen.into_inner().unwrap();
    seen.sort();
    assert_eq!(seen, (0..64).collect::<Vec<_>>());
}

#[test]
fn test_single_worker_is_sequential() {
    let start = Instant::now();
    let result: Result<(), Error> = Sequence::range(0, 2).par_for_each(&Context::new(), 1, |_, _| {
        thread::sleep(Duration::from_millis(100));
        Ok(())
    });
    assert!(result.is_ok());
    assert!(start.elapsed() >= Duration::from_millis(200));
}

#[test]
fn test_first_error_is_returned_verbatim() {
    let result = Sequence::range(1, 5).par_for_each(&Context::new(), 1, |_, x| {
        if x == 3 { Err(ActionError::Rejected(x)) } else { Ok(()) }
    });
    assert_eq!(result, Err(ActionError::Rejected(3)));
}

#[test]
fn test_error_with_many_workers_does_not_hang() {
    let started = AtomicUsize::new(0);
    let result = Sequence::range(0, 200).par_for_each(&Context::new(), 4, |_, x| {
        started.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(2));
        if x == 10 { Err(ActionError::Rejected(x)) } else { Ok(()) }
    });
    assert_eq!(result, Err(ActionError::Rejected(10)));
    assert!(started.load(Ordering::SeqCst) < 200);
}

#[test]
fn test_external_cancellation() {
    let ctx = Context::new();
    let canceller = ctx.clone();
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        canceller.cancel();
    });

    let processed = AtomicUsize::new(0);
    let result = Sequence::range(1, 6).par_for_each(&ctx, 1, |_, _| -> Result<(), ActionError> {
        thread::sleep(Duration::from_millis(60));
        processed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    handle.join().unwrap();

    assert_eq!(result, Err(ActionError::Interrupted(ContextError::Cancelled)));
    assert!(processed.load(Ordering::SeqCst) < 6);
}

#[test]
fn test_deadline_reported_as_library_error() {
    let ctx = Context::with_timeout(Duration::from_millis(50));
    let result: Result<(), Error> = Sequence::range(0, 20).par_for_each(&ctx, 2, |ctx, _| {
        thread::sleep(Duration::from_millis(30));
        ctx.check()?;
        Ok(())
    });
    let err = result.unwrap_err();
    assert!(err.is_interrupted());
    assert!(matches!(
        err.kind(),
        ErrorKind::Interrupted(ContextError::DeadlineExceeded)
    ));
}

#[test]
fn test_zero_concurrency_uses_default() {
    let result: Result<(), Error> =
        Sequence::range(0, 10).par_for_each(&Context::new(), 0, |_, _| Ok(()));
    assert!(result.is_ok());
}

#[test]
fn test_in_flight_work_sees_cancellation_after_failure() {
    let result = Sequence::range(0, 2).par_for_each(&Context::new(), 2, |ctx, x| {
        if x == 0 {
            thread::sleep(Duration::from_millis(10));
            return Err(ActionError::Rejected(0));
        }
        let start = Instant::now();
        while ctx.check().is_ok() {
            assert!(start.elapsed() < Duration::from_secs(5));
            thread::sleep(Duration::from_millis(1));
        }
        Ok(())
    });
    assert_eq!(result, Err(ActionError::Rejected(0)));
}
