use quarry_workflow::data_parallel;
use quarry_workflow::{Context, ContextError};

use crate::Sequence;
use crate::config::Config;

impl<'a, T: Send + 'a> Sequence<'a, T> {
    /// Drains the sequence, then runs `action` on every element with at most
    /// `concurrency` invocations in flight. A `concurrency` of zero uses
    /// [`Config::effective_parallelism`].
    ///
    /// Each element is handed to `action` exactly once, in no particular order.
    /// `action` also receives a child of `ctx` to poll during long-running work.
    ///
    /// - When an invocation fails, no new invocations start, the ones already
    ///   running finish, and the first error is returned unchanged.
    /// - When `ctx` is cancelled or its deadline passes, elements not yet started
    ///   are skipped and the [`ContextError`] is returned through `E::from`.
    ///
    /// ```
    /// use std::sync::atomic::{AtomicU64, Ordering};
    /// use quarry::{Context, Sequence};
    ///
    /// let total = AtomicU64::new(0);
    /// let result: quarry::Result<()> = Sequence::range(1, 100).par_for_each(
    ///     &Context::new(),
    ///     4,
    ///     |_, n| {
    ///         total.fetch_add(n as u64, Ordering::Relaxed);
    ///         Ok(())
    ///     },
    /// );
    /// assert!(result.is_ok());
    /// assert_eq!(total.into_inner(), 5050);
    /// ```
    pub fn par_for_each<F, E>(
        &self,
        ctx: &Context,
        concurrency: usize,
        action: F,
    ) -> std::result::Result<(), E>
    where
        F: Fn(&Context, T) -> std::result::Result<(), E> + Send + Sync,
        E: From<ContextError> + Send,
    {
        ctx.check()?;
        let degree = match concurrency {
            0 => Config::global().effective_parallelism(),
            n => n,
        };
        let items = self.to_vec();
        data_parallel::try_for_each(ctx, degree, items, action)
    }
}
