//! Push-to-pull adaptation.
//!
//! Some sources are naturally written as a loop that hands each element to a
//! callback. [`PullIter`] turns such a producer into an ordinary [`Iterator`] by
//! running it on a helper thread and handing elements over one at a time.
//!
//! The handoff is demand-driven: the producer is only allowed to compute the next
//! element after the consumer asked for it, so no element is produced ahead of
//! need. When the iterator is dropped, the callback starts returning `false` and the
//! helper thread winds down at its next emission.

use std::sync::Arc;
use std::thread;

use tracing::{debug, trace};

use crate::channel::{self, Receiver, Sender};

/// Pull iterator over the elements emitted by a push-style producer.
///
/// The producer is invoked once with an `emit` callback and must return as soon as
/// `emit` returns `false`. The helper thread is started lazily on the first call to [`Iterator::next`].
pub struct PullIter<T, P> {
    producer: Arc<P>,
    state: State<T>,
}

enum State<T> {
    Idle,
    Running {
        demand: Sender<()>,
        values: Receiver<T>,
    },
    Done,
}

impl<T, P> PullIter<T, P>
where
    T: Send + 'static,
    P: Fn(&mut dyn FnMut(T) -> bool) + Send + Sync + 'static,
{
    pub fn new(producer: Arc<P>) -> PullIter<T, P> {
        PullIter {
            producer,
            state: State::Idle,
        }
    }

    fn start(&self) -> State<T> {
        let (demand_tx, demand_rx) = channel::bounded::<()>(1);
        let (values_tx, values_rx) = channel::bounded::<T>(1);
        let producer = self.producer.clone();

        thread::Builder::new()
            .name("quarry-pull".to_string())
            .spawn(move || {
                if demand_rx.recv().is_err() {
                    return;
                }
                let mut stopped = false;
                (*producer)(&mut |value| {
                    let delivered = values_tx.send(value).is_ok() && demand_rx.recv().is_ok();
                    stopped |= !delivered;
                    delivered
                });
                if stopped {
                    debug!("pull consumer went away, producer stopped early");
                } else {
                    trace!("pull producer exhausted");
                }
            })
            .expect("spawn producer thread");

        State::Running {
            demand: demand_tx,
            values: values_rx,
        }
    }
}

impl<T, P> Iterator for PullIter<T, P>
where
    T: Send + 'static,
    P: Fn(&mut dyn FnMut(T) -> bool) + Send + Sync + 'static,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if matches!(self.state, State::Idle) {
            self.state = self.start();
        }
        let State::Running { demand, values } = &self.state else {
            return None;
        };
        let next = demand.send(()).ok().and_then(|()| values.recv().ok());
        if next.is_none() {
            self.state = State::Done;
        }
        next
    }
}
