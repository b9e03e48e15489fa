//! In-memory log adapter.
//!
//! This module provides:
//! - [`MemoryLogAdapter`] — Thread-safe bounded log buffer that answers queries
//! - [`MemoryAdapterConfig`] — Its configuration, readable from [`AdapterOptions`]
//! - Implementations of [`LoggerAdapter`] and [`ConfigurableAdapter`]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::AdapterOptions;
use crate::error::{LogQueryError, Result};
use crate::traits::{ConfigurableAdapter, LoggerAdapter, QueryCallback};
use crate::types::{LogEntry, LogId, LogOrder, NormalizedQueryOptions};

/// Configuration for the in-memory adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct MemoryAdapterConfig {
    /// Maximum number of log entries to keep.
    pub max_entries: usize,
}

impl Default for MemoryAdapterConfig {
    fn default() -> Self {
        Self {
            max_entries: 100_000,
        }
    }
}

impl MemoryAdapterConfig {
    /// Reads the configuration from an opaque options block.
    ///
    /// # Errors
    ///
    /// Returns [`LogQueryError::InvalidAdapterOptions`] for unknown keys or
    /// mistyped values, and [`LogQueryError::InvalidAdapterConfig`] for a zero
    /// capacity.
    pub fn from_options(options: Option<&AdapterOptions>) -> Result<Self> {
        let Some(options) = options else {
            return Ok(Self::default());
        };
        let config: Self = serde_json::from_value(serde_json::Value::Object(options.clone()))?;
        if config.max_entries == 0 {
            return Err(LogQueryError::InvalidAdapterConfig(
                "maxEntries must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }
}

/// Thread-safe in-memory log buffer implementing [`LoggerAdapter`].
///
/// Oldest entries are evicted once `max_entries` is reached. Queries complete
/// inline with the matching entries.
pub struct MemoryLogAdapter {
    config: MemoryAdapterConfig,
    /// All log entries, ordered by insertion
    entries: parking_lot::RwLock<VecDeque<LogEntry>>,
    next_id: AtomicU64,
}

impl MemoryLogAdapter {
    /// Creates an adapter holding at most `max_entries` entries.
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self::with_config(MemoryAdapterConfig { max_entries })
    }

    /// Creates an adapter with full configuration.
    #[must_use]
    pub fn with_config(config: MemoryAdapterConfig) -> Self {
        Self {
            config,
            entries: parking_lot::RwLock::new(VecDeque::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Appends an entry, assigning it an ID.
    #[allow(clippy::significant_drop_tightening)]
    pub fn append(&self, mut entry: LogEntry) -> LogId {
        let id = LogId(self.next_id.fetch_add(1, Ordering::Relaxed));
        entry.id = id;

        let mut entries = self.entries.write();
        entries.push_back(entry);
        while entries.len() > self.config.max_entries {
            entries.pop_front();
        }
        id
    }

    /// Returns entries matching the options, sorted and truncated.
    ///
    /// `asc` sorts oldest first; `desc` and unrecognized orders sort newest
    /// first. Entries with equal timestamps keep insertion order.
    #[must_use]
    pub fn search(&self, options: &NormalizedQueryOptions) -> Vec<LogEntry> {
        let mut matched: Vec<LogEntry> = self
            .entries
            .read()
            .iter()
            .filter(|e| e.matches(options))
            .cloned()
            .collect();

        match options.order {
            LogOrder::Asc => matched.sort_by_key(|e| e.timestamp),
            LogOrder::Desc | LogOrder::Other(_) => {
                matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            }
        }
        matched.truncate(options.size);
        matched
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the adapter holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Clears all entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &MemoryAdapterConfig {
        &self.config
    }
}

impl LoggerAdapter for MemoryLogAdapter {
    type Response = Vec<LogEntry>;

    fn query(&self, options: NormalizedQueryOptions, on_complete: QueryCallback<Vec<LogEntry>>) {
        let results = self.search(&options);
        trace!(
            matched = results.len(),
            stored = self.len(),
            "memory adapter answered query"
        );
        on_complete.complete(results);
    }
}

impl ConfigurableAdapter for MemoryLogAdapter {
    fn from_options(options: Option<&AdapterOptions>) -> Result<Self> {
        MemoryAdapterConfig::from_options(options).map(Self::with_config)
    }
}

/// Shared in-memory adapter handle.
pub type SharedMemoryAdapter = Arc<MemoryLogAdapter>;
