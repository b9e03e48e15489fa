//! # claw-log-query
//!
//! Log query façade for Clawbernetes workloads.
//!
//! This crate provides:
//!
//! - [`LogQueryService`] — Normalizes query options and delegates to an adapter
//! - [`RawQueryOptions`] / [`NormalizedQueryOptions`] — Query options before and after normalization
//! - [`LoggerAdapter`] — Abstract trait for log backends that answer queries
//! - [`PendingQuery`] — Future resolving to the adapter's result
//! - [`Clock`] — Injectable time source for default windows
//! - [`MemoryLogAdapter`] — Bounded in-memory adapter
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use chrono::Utc;
//! use claw_log_query::{LogEntry, LogLevel, LogQueryService, MemoryLogAdapter, RawQueryOptions};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), claw_log_query::LogQueryError> {
//! let adapter = Arc::new(MemoryLogAdapter::new(1_000));
//! adapter.append(LogEntry::new(Utc::now(), LogLevel::Error, "disk full"));
//!
//! let service = LogQueryService::with_adapter(adapter);
//! let entries = service
//!     .get_logs(RawQueryOptions::new().with_level("error").with_size("5"))?
//!     .await;
//! assert_eq!(entries.len(), 1);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod config;
pub mod error;
pub mod normalize;
pub mod service;
pub mod store;
pub mod traits;
pub mod types;

// Re-export main types
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AdapterOptions, QueryDefaults, DEFAULT_LOOKBACK, DEFAULT_SIZE};
pub use error::{LogQueryError, Result};
pub use normalize::{coerce_size, normalize_options, normalize_options_with, validate_timestamp};
pub use service::{LogQueryService, PendingQuery};
pub use store::{MemoryAdapterConfig, MemoryLogAdapter, SharedMemoryAdapter};
pub use traits::{ConfigurableAdapter, LoggerAdapter, QueryCallback};
pub use types::{LogEntry, LogId, LogLevel, LogOrder, NormalizedQueryOptions, RawQueryOptions};
