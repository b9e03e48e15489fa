//! The log query service.
//!
//! [`LogQueryService`] normalizes caller options and delegates one query per
//! call to its [`LoggerAdapter`], handing back a [`PendingQuery`] that resolves
//! to whatever the adapter produced.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::{AdapterOptions, QueryDefaults};
use crate::error::{LogQueryError, Result};
use crate::normalize::normalize_options_with;
use crate::traits::{ConfigurableAdapter, LoggerAdapter, QueryCallback};
use crate::types::{NormalizedQueryOptions, RawQueryOptions};

/// Query façade over a log storage adapter.
///
/// The service holds no per-call state; concurrent calls share only the
/// adapter handle, the clock and the defaults.
pub struct LogQueryService<A: ?Sized> {
    adapter: Option<Arc<A>>,
    clock: Arc<dyn Clock>,
    defaults: QueryDefaults,
}

impl<A: LoggerAdapter + ?Sized> LogQueryService<A> {
    /// Creates a service over an optional adapter.
    ///
    /// A service without an adapter can be constructed, but every call to
    /// [`get_logs`](Self::get_logs) fails with
    /// [`LogQueryError::AdapterUnavailable`].
    #[must_use]
    pub fn new(adapter: Option<Arc<A>>) -> Self {
        Self {
            adapter,
            clock: Arc::new(SystemClock),
            defaults: QueryDefaults::default(),
        }
    }

    /// Creates a service over the given adapter.
    #[must_use]
    pub fn with_adapter(adapter: Arc<A>) -> Self {
        Self::new(Some(adapter))
    }

    /// Replaces the clock used to compute default windows.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the defaults used for missing or malformed options.
    #[must_use]
    pub fn with_defaults(mut self, defaults: QueryDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Returns the configured adapter, if any.
    #[must_use]
    pub fn adapter(&self) -> Option<&Arc<A>> {
        self.adapter.as_ref()
    }

    /// Returns true if an adapter is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.adapter.is_some()
    }

    /// Returns the defaults in use.
    #[must_use]
    pub const fn defaults(&self) -> &QueryDefaults {
        &self.defaults
    }

    /// Normalizes raw options against this service's clock and defaults.
    #[must_use]
    pub fn normalize(&self, raw: &RawQueryOptions) -> NormalizedQueryOptions {
        normalize_options_with(raw, self.clock.now(), &self.defaults)
    }

    /// Queries the adapter for logs.
    ///
    /// The adapter is invoked before this returns; the returned future resolves
    /// once the adapter completes its callback. No timeout is applied. Pass
    /// [`RawQueryOptions::default()`] when the caller supplied no options.
    ///
    /// # Errors
    ///
    /// Returns [`LogQueryError::AdapterUnavailable`] if no adapter is
    /// configured. The adapter is never touched in that case.
    pub fn get_logs(&self, options: RawQueryOptions) -> Result<PendingQuery<A::Response>> {
        let Some(adapter) = self.adapter.as_ref() else {
            warn!("log query rejected: no logger adapter configured");
            return Err(LogQueryError::AdapterUnavailable);
        };

        let options = self.normalize(&options);
        debug!(
            level = %options.level,
            order = %options.order,
            size = options.size,
            from = %options.from,
            until = %options.until,
            "delegating log query to adapter"
        );

        let (sender, receiver) = oneshot::channel();
        adapter.query(options, QueryCallback::new(sender));

        Ok(PendingQuery::new(receiver))
    }
}

impl<A: ConfigurableAdapter> LogQueryService<A> {
    /// Builds the adapter from an opaque configuration block and wraps it.
    ///
    /// The block is passed to [`ConfigurableAdapter::from_options`] untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the adapter rejects its options.
    pub fn from_options(options: Option<&AdapterOptions>) -> Result<Self> {
        let adapter = A::from_options(options)?;
        Ok(Self::with_adapter(Arc::new(adapter)))
    }
}

impl<A: ?Sized> fmt::Debug for LogQueryService<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogQueryService")
            .field("configured", &self.adapter.is_some())
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

/// A log query awaiting its adapter's result.
///
/// Resolves to exactly the value the adapter passed to its callback. If the
/// adapter drops the callback without completing it, the query stays pending
/// forever; wrap it in a timeout if that matters. Dropping a `PendingQuery`
/// abandons the result but does not stop the adapter.
#[must_use = "a pending query does nothing useful unless awaited"]
pub struct PendingQuery<R> {
    receiver: oneshot::Receiver<R>,
    orphaned: bool,
}

impl<R> PendingQuery<R> {
    const fn new(receiver: oneshot::Receiver<R>) -> Self {
        Self {
            receiver,
            orphaned: false,
        }
    }

    /// Returns true if the adapter dropped its callback without completing.
    ///
    /// Only observable after the query has been polled.
    #[must_use]
    pub const fn is_orphaned(&self) -> bool {
        self.orphaned
    }
}

impl<R> Future for PendingQuery<R> {
    type Output = R;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.orphaned {
            return Poll::Pending;
        }

        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => {
                warn!("logger adapter dropped its completion callback; query will never resolve");
                self.orphaned = true;
                Poll::Pending
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<R> fmt::Debug for PendingQuery<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingQuery")
            .field("orphaned", &self.orphaned)
            .finish_non_exhaustive()
    }
}
