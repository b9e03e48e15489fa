//! Configuration for the log query service.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{LogLevel, LogOrder};

/// Page size used when the caller supplies none.
pub const DEFAULT_SIZE: usize = 10;

/// Length of the default search window, ending now.
pub const DEFAULT_LOOKBACK: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Opaque adapter configuration block.
///
/// The service hands this to the adapter's constructor and never reads it.
pub type AdapterOptions = serde_json::Map<String, serde_json::Value>;

/// Values substituted for options the caller left out or got wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryDefaults {
    /// How far back the default window reaches.
    pub lookback: Duration,
    /// Default maximum number of entries.
    pub size: usize,
    /// Default severity class.
    pub level: LogLevel,
    /// Default sort direction.
    pub order: LogOrder,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            lookback: DEFAULT_LOOKBACK,
            size: DEFAULT_SIZE,
            level: LogLevel::Info,
            order: LogOrder::Desc,
        }
    }
}

impl QueryDefaults {
    /// Sets the default lookback window.
    #[must_use]
    pub const fn with_lookback(mut self, lookback: Duration) -> Self {
        self.lookback = lookback;
        self
    }

    /// Sets the default page size.
    #[must_use]
    pub const fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Sets the default level.
    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the default order.
    #[must_use]
    pub fn with_order(mut self, order: LogOrder) -> Self {
        self.order = order;
        self
    }

    /// Returns the page size, never zero.
    #[must_use]
    pub const fn effective_size(&self) -> usize {
        if self.size == 0 { DEFAULT_SIZE } else { self.size }
    }

    /// Returns the lookback as a signed duration, never zero.
    ///
    /// Lookbacks too large for `chrono::Duration` saturate at its maximum.
    #[must_use]
    pub fn effective_lookback(&self) -> chrono::Duration {
        let lookback = if self.lookback.is_zero() {
            DEFAULT_LOOKBACK
        } else {
            self.lookback
        };
        chrono::Duration::from_std(lookback).unwrap_or(chrono::Duration::MAX)
    }
}
