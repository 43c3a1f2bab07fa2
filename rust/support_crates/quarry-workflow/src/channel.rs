//! Blocking multi-producer, multi-consumer channels.
//!
//! Elements handed to a [`Sender`] come out of the [`Receiver`] side in the order
//! they were sent. Both halves may be cloned; the channel tracks how many of each
//! are alive:
//!
//! - When the last [`Sender`] is dropped the channel is *half-closed*. Receivers
//!   still drain whatever is buffered, then observe [`RecvError`].
//! - When the last [`Receiver`] is dropped the channel is *closed*. Buffered items
//!   are discarded and every pending or future [`Sender::send`] fails with
//!   [`SendError`], handing the element back.
//!
//! The second rule is what lets a background producer notice that nobody is
//! reading any more and stop, instead of blocking forever on a full buffer.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};

/// Creates a channel that buffers at most `capacity` elements.
///
/// [`Sender::send`] blocks while the buffer is full.
///
/// # Panics
///
/// Panics if `capacity` is 0; rendezvous channels are not supported.
pub fn bounded<T>(capacity: usize) -> (Sender<T>, Receiver<T>) {
    assert_ne!(capacity, 0, "bounded channel requires a non-zero capacity");
    let shared = Shared::new(Some(capacity));
    (Sender(shared.clone()), Receiver(shared))
}

/// Creates a channel with an unlimited buffer. [`Sender::send`] never blocks.
pub fn unbounded<T>() -> (Sender<T>, Receiver<T>) {
    let shared = Shared::new(None);
    (Sender(shared.clone()), Receiver(shared))
}

/// The sending half of a channel.
pub struct Sender<T>(Arc<Shared<T>>);

impl<T> Sender<T> {
    /// Sends `value`, blocking while a bounded channel is full.
    ///
    /// Fails, returning the value, once every [`Receiver`] has been dropped. A
    /// successful send does not guarantee the value will be received: the last
    /// receiver may go away right after this call returns.
    pub fn send(&self, value: T) -> Result<(), SendError<T>> {
        let mut state = self.0.state.lock().unwrap();
        loop {
            if state.receivers == 0 {
                return Err(SendError(value));
            }
            match state.capacity {
                Some(cap) if state.queue.len() >= cap => {
                    state = self.0.not_full.wait(state).unwrap();
                }
                _ => break,
            }
        }
        state.queue.push_back(value);
        drop(state);
        self.0.not_empty.notify_one();
        Ok(())
    }
}

impl<T> Clone for Sender<T> {
    fn clone(&self) -> Self {
        self.0.state.lock().unwrap().senders += 1;
        Sender(self.0.clone())
    }
}

impl<T> Drop for Sender<T> {
    fn drop(&mut self) {
        let mut state = self.0.state.lock().unwrap();
        state.senders -= 1;
        if state.senders == 0 {
            drop(state);
            self.0.not_empty.notify_all();
        }
    }
}

/// The receiving half of a channel.
///
/// Cloned receivers compete for elements: each element is delivered to exactly
/// one of them.
pub struct Receiver<T>(Arc<Shared<T>>);

impl<T> Receiver<T> {
    /// Blocks until an element is available.
    ///
    /// Returns [`RecvError`] once the buffer is empty and every sender has been
    /// dropped.
    pub fn recv(&self) -> Result<T, RecvError> {
        let mut state = self.0.state.lock().unwrap();
        loop {
            if let Some(value) = state.queue.pop_front() {
                drop(state);
                self.0.not_full.notify_one();
                return Ok(value);
            }
            if state.senders == 0 {
                return Err(RecvError);
            }
            state = self.0.not_empty.wait(state).unwrap();
        }
    }

    /// Returns a blocking iterator that ends when the channel is drained and all
    /// senders are gone.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { receiver: self }
    }
}

impl<T> Clone for Receiver<T> {
    fn clone(&self) -> Self {
        self.0.state.lock().unwrap().receivers += 1;
        Receiver(self.0.clone())
    }
}

impl<T> Drop for Receiver<T> {
    fn drop(&mut self) {
        let mut state = self.0.state.lock().unwrap();
        state.receivers -= 1;
        if state.receivers == 0 {
            // Nobody can observe the buffered elements any more.
            let discarded = std::mem::take(&mut state.queue);
            drop(state);
            self.0.not_full.notify_all();
            drop(discarded);
        }
    }
}

/// Borrowing iterator over a [`Receiver`].
pub struct Iter<'r, T> {
    receiver: &'r Receiver<T>,
}

impl<T> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.receiver.recv().ok()
    }
}

/// Owning iterator over a [`Receiver`].
pub struct IntoIter<T> {
    receiver: Receiver<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.receiver.recv().ok()
    }
}

impl<T> IntoIterator for Receiver<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { receiver: self }
    }
}

impl<'r, T> IntoIterator for &'r Receiver<T> {
    type Item = T;
    type IntoIter = Iter<'r, T>;

    fn into_iter(self) -> Iter<'r, T> {
        self.iter()
    }
}

/// Returned by [`Sender::send`] when the channel is closed. Carries the
/// undelivered element.
#[derive(PartialEq, Eq, Clone, Copy)]
pub struct SendError<T>(pub T);

impl<T> std::fmt::Debug for SendError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SendError(..)")
    }
}

impl<T> std::fmt::Display for SendError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sending on a closed channel")
    }
}

impl<T> std::error::Error for SendError<T> {}

/// Returned by [`Receiver::recv`] when the channel is empty and disconnected.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct RecvError;

impl std::fmt::Display for RecvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "receiving on an empty and disconnected channel")
    }
}

impl std::error::Error for RecvError {}

struct State<T> {
    queue: VecDeque<T>,
    capacity: Option<usize>,
    senders: usize,
    receivers: usize,
}

struct Shared<T> {
    state: Mutex<State<T>>,
    not_empty: Condvar,
    not_full: Condvar,
}

impl<T> Shared<T> {
    fn new(capacity: Option<usize>) -> Arc<Self> {
        Arc::new(Shared {
            state: Mutex::new(State {
                queue: VecDeque::new(),
                capacity,
                senders: 1,
                receivers: 1,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        })
    }
}
