//! Core types for log queries.
//!
//! This module provides:
//! - [`LogLevel`] — Severity class a query filters on
//! - [`LogOrder`] — Sort direction of returned entries
//! - [`RawQueryOptions`] — Loosely-typed options as supplied by a caller
//! - [`NormalizedQueryOptions`] — Fully populated options handed to adapters
//! - [`LogEntry`] — A stored log record, as served by the in-memory adapter

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Log severity class to query for.
///
/// Known levels are `info` and `error`. Any other string supplied by a caller
/// is carried verbatim in [`LogLevel::Other`] so the adapter sees exactly what
/// was asked for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogLevel {
    /// Informational entries
    #[default]
    Info,
    /// Error entries
    Error,
    /// Unrecognized level, passed through unchanged
    Other(String),
}

/// Sort direction for returned entries.
///
/// Unrecognized strings are carried verbatim in [`LogOrder::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogOrder {
    /// Oldest first
    Asc,
    /// Newest first
    #[default]
    Desc,
    /// Unrecognized order, passed through unchanged
    Other(String),
}

impl LogLevel {
    /// Returns the string representation of this level.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Info => "info",
            Self::Error => "error",
            Self::Other(s) => s,
        }
    }

    /// Returns true if this is one of the known levels.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for LogLevel {
    fn from(s: &str) -> Self {
        match s {
            "info" => Self::Info,
            "error" => Self::Error,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for LogLevel {
    fn from(s: String) -> Self {
        match s.as_str() {
            "info" => Self::Info,
            "error" => Self::Error,
            _ => Self::Other(s),
        }
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LogOrder {
    /// Returns the string representation of this order.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
            Self::Other(s) => s,
        }
    }

    /// Returns true if this is one of the known orders.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for LogOrder {
    fn from(s: &str) -> Self {
        match s {
            "asc" => Self::Asc,
            "desc" => Self::Desc,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for LogOrder {
    fn from(s: String) -> Self {
        match s.as_str() {
            "asc" => Self::Asc,
            "desc" => Self::Desc,
            _ => Self::Other(s),
        }
    }
}

impl From<LogOrder> for String {
    fn from(order: LogOrder) -> Self {
        match order {
            LogOrder::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LogOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query options exactly as a caller supplied them.
///
/// Every field is optional and untyped: values typically come straight from a
/// query string or a JSON body. [`crate::normalize::normalize_options`] turns
/// this into a [`NormalizedQueryOptions`] without ever failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawQueryOptions {
    /// Requested severity class
    pub level: Option<Value>,
    /// Start of the search window
    pub from: Option<Value>,
    /// End of the search window
    pub until: Option<Value>,
    /// Sort direction
    pub order: Option<Value>,
    /// Maximum number of entries
    pub size: Option<Value>,
}

impl RawQueryOptions {
    /// Creates an empty options bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds options from an arbitrary JSON value.
    ///
    /// Keys other than the five known ones are ignored. A value that is not an
    /// object yields an empty options bag.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };
        Self {
            level: map.get("level").cloned(),
            from: map.get("from").cloned(),
            until: map.get("until").cloned(),
            order: map.get("order").cloned(),
            size: map.get("size").cloned(),
        }
    }

    /// Builds options from decoded query-string pairs.
    ///
    /// Later occurrences of a key replace earlier ones.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut options = Self::default();
        for (key, value) in pairs {
            let value = Some(Value::String(value.into()));
            match key.as_ref() {
                "level" => options.level = value,
                "from" => options.from = value,
                "until" => options.until = value,
                "order" => options.order = value,
                "size" => options.size = value,
                _ => {}
            }
        }
        options
    }

    /// Sets the level.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<Value>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Sets the window start.
    #[must_use]
    pub fn with_from(mut self, from: impl Into<Value>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Sets the window end.
    #[must_use]
    pub fn with_until(mut self, until: impl Into<Value>) -> Self {
        self.until = Some(until.into());
        self
    }

    /// Sets the window start from a typed timestamp.
    #[must_use]
    pub fn with_from_time(self, from: DateTime<Utc>) -> Self {
        self.with_from(from.to_rfc3339())
    }

    /// Sets the window end from a typed timestamp.
    #[must_use]
    pub fn with_until_time(self, until: DateTime<Utc>) -> Self {
        self.with_until(until.to_rfc3339())
    }

    /// Sets the order.
    #[must_use]
    pub fn with_order(mut self, order: impl Into<Value>) -> Self {
        self.order = Some(order.into());
        self
    }

    /// Sets the size.
    #[must_use]
    pub fn with_size(mut self, size: impl Into<Value>) -> Self {
        self.size = Some(size.into());
        self
    }
}

/// Fully populated query options, as passed to a [`crate::LoggerAdapter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedQueryOptions {
    /// Severity class to filter on
    pub level: LogLevel,
    /// Start of the search window
    pub from: DateTime<Utc>,
    /// End of the search window
    pub until: DateTime<Utc>,
    /// Sort direction
    pub order: LogOrder,
    /// Maximum number of entries, always at least 1
    pub size: usize,
}

impl NormalizedQueryOptions {
    /// Returns true if the window starts after it ends.
    ///
    /// Such windows are forwarded unchanged; adapters decide what they mean.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.from > self.until
    }

    /// Checks if a timestamp falls inside the window (both ends inclusive).
    #[must_use]
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.from && timestamp <= self.until
    }
}

/// Unique identifier for a stored log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LogId(pub u64);

/// A stored log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Identifier assigned by the store
    pub id: LogId,
    /// When the log was created
    pub timestamp: DateTime<Utc>,
    /// Severity level
    pub level: LogLevel,
    /// The log message
    pub message: String,
    /// Additional structured fields
    #[serde(default)]
    pub fields: HashMap<String, Value>,
}

impl LogEntry {
    /// Creates an entry; the store assigns the real ID on append.
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            id: LogId(0),
            timestamp,
            level,
            message: message.into(),
            fields: HashMap::new(),
        }
    }

    /// Adds a structured field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Checks if this entry matches the level and window of the query.
    #[must_use]
    pub fn matches(&self, options: &NormalizedQueryOptions) -> bool {
        self.level == options.level && options.contains(self.timestamp)
    }
}
