//! Bridging sequences onto channels.

use std::thread;

use quarry_common::{Error, Result, verify_arg};
use quarry_workflow::channel::{self, Receiver};
use tracing::{debug, trace};

use crate::Sequence;
use crate::config::Config;

impl<T: Send + 'static> Sequence<'static, T> {
    /// Drains the sequence on a background thread into a bounded channel sized by
    /// [`Config::channel_capacity`].
    pub fn to_channel(&self) -> Result<Receiver<T>> {
        self.to_channel_with_capacity(Config::global().channel_capacity)
    }

    /// Drains the sequence on a background thread into a channel holding at most
    /// `capacity` undelivered elements.
    ///
    /// Elements are sent in order and the channel closes after the last one. The
    /// producer blocks while the channel is full and stops as soon as every
    /// receiver has been dropped, so abandoning the receiver never leaks the
    /// thread beyond the element it is currently producing.
    pub fn to_channel_with_capacity(&self, capacity: usize) -> Result<Receiver<T>> {
        verify_arg!(capacity, capacity > 0);
        let (tx, rx) = channel::bounded(capacity);
        let source = self.clone();
        thread::Builder::new()
            .name("quarry-to-channel".to_string())
            .spawn(move || {
                let mut sent = 0usize;
                for item in source.iter() {
                    if tx.send(item).is_err() {
                        debug!(sent, "channel receivers dropped, producer stopped early");
                        return;
                    }
                    sent += 1;
                }
                trace!(sent, "channel producer finished");
            })
            .map_err(|e| Error::io("spawn channel producer", e))?;
        Ok(rx)
    }
}
