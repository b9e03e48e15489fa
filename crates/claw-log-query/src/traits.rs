//! Traits for log storage adapters.
//!
//! This module provides the [`LoggerAdapter`] trait the query service delegates
//! to, and the [`QueryCallback`] handle adapters use to deliver results.

use std::fmt;

use tokio::sync::oneshot;

use crate::config::AdapterOptions;
use crate::error::Result;
use crate::types::NormalizedQueryOptions;

/// Completion handle for a single adapter query.
///
/// Calling [`QueryCallback::complete`] consumes the handle, so a result can be
/// delivered at most once. Dropping it without completing leaves the caller's
/// query pending.
pub struct QueryCallback<R> {
    sender: oneshot::Sender<R>,
}

impl<R> QueryCallback<R> {
    pub(crate) const fn new(sender: oneshot::Sender<R>) -> Self {
        Self { sender }
    }

    /// Delivers the query result to the waiting caller.
    ///
    /// If the caller has already gone away the result is discarded.
    pub fn complete(self, result: R) {
        if self.sender.send(result).is_err() {
            tracing::trace!("log query result discarded, caller dropped the query");
        }
    }

    /// Returns true if the caller is no longer waiting for the result.
    #[must_use]
    pub fn is_abandoned(&self) -> bool {
        self.sender.is_closed()
    }
}

impl<R> fmt::Debug for QueryCallback<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCallback")
            .field("abandoned", &self.is_abandoned())
            .finish()
    }
}

/// Trait for log storage backends that can answer queries.
///
/// Implementors may complete the callback inline, from a spawned task, or from
/// another thread. The result type is adapter-defined and reaches the caller
/// unmodified.
pub trait LoggerAdapter: Send + Sync {
    /// Value delivered to the caller when a query finishes.
    type Response: Send + 'static;

    /// Runs a query and reports its result through `on_complete`.
    fn query(&self, options: NormalizedQueryOptions, on_complete: QueryCallback<Self::Response>);
}

/// Adapters that can be built from an opaque configuration block.
pub trait ConfigurableAdapter: LoggerAdapter + Sized {
    /// Builds the adapter. `None` means no configuration was supplied.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LogQueryError::InvalidAdapterOptions`] if the block is
    /// malformed, or [`crate::LogQueryError::InvalidAdapterConfig`] if it holds
    /// an unusable value.
    fn from_options(options: Option<&AdapterOptions>) -> Result<Self>;
}
