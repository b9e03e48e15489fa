//! End-to-end tests for the log query service.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use claw_log_query::{
    ConfigurableAdapter, FixedClock, LogEntry, LogLevel, LogOrder, LogQueryError, LogQueryService,
    LoggerAdapter, MemoryLogAdapter, NormalizedQueryOptions, QueryCallback, RawQueryOptions,
};
use parking_lot::Mutex;
use serde_json::json;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("claw_log_query=trace")
        .with_test_writer()
        .try_init();
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0)
        .single()
        .expect("valid date")
}

/// Stub adapter that records each call and completes from a spawned task
/// with a caller-chosen delay keyed on the requested size.
#[derive(Default)]
struct StubAdapter {
    calls: Mutex<Vec<NormalizedQueryOptions>>,
}

impl LoggerAdapter for StubAdapter {
    type Response = serde_json::Value;

    fn query(&self, options: NormalizedQueryOptions, on_complete: QueryCallback<Self::Response>) {
        self.calls.lock().push(options.clone());
        // Larger requests finish first so completion order differs from call order.
        let delay = Duration::from_millis(50u64.saturating_sub(options.size as u64));
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_complete.complete(json!({ "level": options.level, "size": options.size }));
        });
    }
}

#[tokio::test]
async fn missing_adapter_is_a_configuration_error() {
    init_tracing();
    let service: LogQueryService<StubAdapter> = LogQueryService::new(None);

    let result = service.get_logs(RawQueryOptions::default());
    assert!(matches!(result, Err(LogQueryError::AdapterUnavailable)));
    if let Err(err) = result {
        assert!(!err.is_recoverable());
    }
}

#[tokio::test]
async fn stub_adapter_sees_normalized_options_and_result_passes_through() {
    init_tracing();
    let adapter = Arc::new(StubAdapter::default());
    let service = LogQueryService::with_adapter(Arc::clone(&adapter))
        .with_clock(Arc::new(FixedClock::new(now())));

    let result = service
        .get_logs(RawQueryOptions::from_value(&json!({"level": "error", "size": 5})))
        .expect("adapter configured")
        .await;

    assert_eq!(result, json!({"level": "error", "size": 5}));

    let calls = adapter.calls.lock();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].level, LogLevel::Error);
    assert_eq!(calls[0].size, 5);
    assert_eq!(calls[0].order, LogOrder::Desc);
    assert_eq!(calls[0].from, now() - chrono::Duration::days(7));
    assert_eq!(calls[0].until, now());
}

#[tokio::test]
async fn concurrent_calls_do_not_cross_contaminate() {
    init_tracing();
    let adapter = Arc::new(StubAdapter::default());
    let service = LogQueryService::with_adapter(Arc::clone(&adapter));

    let pending: Vec<_> = (1..=8)
        .map(|size| {
            let level = if size % 2 == 0 { "error" } else { "info" };
            service
                .get_logs(RawQueryOptions::new().with_level(level).with_size(size))
                .expect("adapter configured")
        })
        .collect();

    let results = futures::future::join_all(pending).await;

    for (i, result) in results.iter().enumerate() {
        let size = i + 1;
        let level = if size % 2 == 0 { "error" } else { "info" };
        assert_eq!(result, &json!({ "level": level, "size": size }));
    }
    assert_eq!(adapter.calls.lock().len(), 8);
}

#[tokio::test]
async fn query_string_options_against_memory_adapter() {
    init_tracing();
    let adapter = Arc::new(MemoryLogAdapter::new(100));
    for hours_ago in 0..20 {
        let level = if hours_ago % 4 == 0 { LogLevel::Error } else { LogLevel::Info };
        adapter.append(LogEntry::new(
            now() - chrono::Duration::hours(hours_ago),
            level,
            format!("event {hours_ago}"),
        ));
    }
    // Outside the default seven-day window
    adapter.append(LogEntry::new(now() - chrono::Duration::days(30), LogLevel::Info, "ancient"));

    let service = LogQueryService::with_adapter(Arc::clone(&adapter))
        .with_clock(Arc::new(FixedClock::new(now())));

    // Defaults: info, desc, ten entries, last seven days
    let entries = service
        .get_logs(RawQueryOptions::default())
        .expect("adapter configured")
        .await;
    assert_eq!(entries.len(), 10);
    assert_eq!(entries[0].message, "event 1");
    assert!(entries.iter().all(|e| e.level == LogLevel::Info));
    assert!(entries.iter().all(|e| e.message != "ancient"));

    let entries = service
        .get_logs(RawQueryOptions::from_query_pairs([
            ("level", "error"),
            ("order", "asc"),
            ("size", "abc"),
        ]))
        .expect("adapter configured")
        .await;
    let messages: Vec<_> = entries.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, ["event 16", "event 12", "event 8", "event 4", "event 0"]);
}

#[tokio::test]
async fn service_built_from_adapter_options() {
    init_tracing();
    let options = json!({"maxEntries": 2});
    let service: LogQueryService<MemoryLogAdapter> =
        LogQueryService::from_options(options.as_object()).expect("valid options");

    let adapter = service.adapter().expect("adapter configured");
    for i in 0..5 {
        adapter.append(LogEntry::new(Utc::now(), LogLevel::Info, format!("m{i}")));
    }
    assert_eq!(adapter.len(), 2);

    let entries = service
        .get_logs(RawQueryOptions::default())
        .expect("adapter configured")
        .await;
    assert_eq!(entries.len(), 2);

    let bad = json!({"maxEntries": -1});
    let result = MemoryLogAdapter::from_options(bad.as_object());
    assert!(matches!(result, Err(LogQueryError::InvalidAdapterOptions(_))));
}

#[tokio::test]
async fn higher_layer_can_time_out_a_query() {
    init_tracing();

    struct NeverAdapter {
        held: Mutex<Vec<QueryCallback<()>>>,
    }

    impl LoggerAdapter for NeverAdapter {
        type Response = ();

        fn query(&self, _options: NormalizedQueryOptions, on_complete: QueryCallback<()>) {
            self.held.lock().push(on_complete);
        }
    }

    let adapter = Arc::new(NeverAdapter {
        held: Mutex::new(Vec::new()),
    });
    let service = LogQueryService::with_adapter(Arc::clone(&adapter));
    let pending = service
        .get_logs(RawQueryOptions::default())
        .expect("adapter configured");

    let outcome = tokio::time::timeout(Duration::from_millis(30), pending).await;
    assert!(outcome.is_err());

    let held = adapter.held.lock();
    assert_eq!(held.len(), 1);
    assert!(held[0].is_abandoned());
}
