//! The periodic signal emitter.
//!
//! One tokio task, one timer. Every tick increments the example counter
//! and writes a console diagnostic; with the extended signal set it also
//! emits one OTLP log record and brackets one second of simulated work in
//! a span. Emission is fire-and-forget: nothing here inspects or reacts to
//! export pipeline errors, so a slow collector can never stall the loop.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use opentelemetry::logs::{AnyValue, LogRecord, Logger, LoggerProvider, Severity};
use opentelemetry::metrics::{Counter, MeterProvider};
use opentelemetry_sdk::logs::SdkLogger;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{info, info_span, Instrument};

use crate::telemetry::config::{SignalSet, TelemetryConfig};
use crate::telemetry::TelemetryHandle;

/// Instrumentation scope for the emitter's meter and logger.
pub const SCOPE_NAME: &str = "otlp-emitter";

pub const COUNTER_NAME: &str = "example.counter";
pub const COUNTER_DESCRIPTION: &str = "The example counter that is incremented every 5 seconds";
pub const LOG_MESSAGE: &str = "Example log";

/// Emits telemetry on a fixed cadence until told to stop.
pub struct Emitter {
    counter: Counter<u64>,
    logger: Option<SdkLogger>,
    tick_interval: Duration,
    work_duration: Option<Duration>,
}

impl Emitter {
    /// Construct from explicit instrumentation handles.
    /// `work_duration: Some(_)` enables the per-tick span.
    pub fn new(
        counter: Counter<u64>,
        logger: Option<SdkLogger>,
        work_duration: Option<Duration>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            counter,
            logger,
            tick_interval,
            work_duration,
        }
    }

    /// Wire the emitter to the providers owned by `telemetry`.
    pub fn from_telemetry(config: &TelemetryConfig, telemetry: &TelemetryHandle) -> Self {
        let meter = telemetry.meter_provider().meter(SCOPE_NAME);
        let counter = meter
            .u64_counter(COUNTER_NAME)
            .with_description(COUNTER_DESCRIPTION)
            .build();

        let logger = telemetry
            .logger_provider()
            .map(|provider| provider.logger(SCOPE_NAME));

        let work_duration = match config.signals {
            SignalSet::Metrics => None,
            SignalSet::All => Some(config.work_duration),
        };

        Self::new(counter, logger, work_duration, config.tick_interval)
    }

    /// Run until the shutdown channel flips to `true` (or its sender is
    /// dropped). Each cycle waits one full tick period before emitting, so
    /// the simulated work pushes every subsequent tick later: the extended
    /// cadence is tick period plus work duration, drifting off the nominal
    /// phase. Returns the number of completed ticks.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> u64 {
        let mut completed: u64 = 0;

        loop {
            tokio::select! {
                _ = sleep(self.tick_interval) => {
                    self.emit_tick().await;
                    completed += 1;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        completed
    }

    /// One tick: increment, console line, then (extended) log record and
    /// span around the simulated work. Order is fixed.
    async fn emit_tick(&self) {
        self.counter.add(1, &[]);
        info!("Counter incremented");

        if let Some(logger) = &self.logger {
            let now = SystemTime::now();
            let unix_secs = now
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_secs())
                .unwrap_or(0);

            let mut record = logger.create_log_record();
            record.set_timestamp(now);
            record.set_severity_number(Severity::Info);
            record.set_severity_text("INFO");
            record.set_body(AnyValue::String(LOG_MESSAGE.into()));
            record.add_attribute("now", unix_secs as i64);
            logger.emit(record);
        }

        if let Some(work) = self.work_duration {
            sleep(work).instrument(info_span!("example-span")).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::build_handle;
    use opentelemetry_sdk::logs::SdkLoggerProvider;
    use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};

    fn noop_counter() -> Counter<u64> {
        SdkMeterProvider::builder()
            .build()
            .meter("test")
            .u64_counter(COUNTER_NAME)
            .build()
    }

    #[test]
    fn from_telemetry_metrics_only_leaves_log_and_span_unwired() {
        let config = TelemetryConfig::new("test-service", "1.0.0");
        let telemetry = build_handle(&config).unwrap();

        let emitter = Emitter::from_telemetry(&config, &telemetry);

        assert!(emitter.logger.is_none());
        assert!(emitter.work_duration.is_none());
        assert_eq!(emitter.tick_interval, config.tick_interval);
    }

    #[test]
    fn from_telemetry_extended_wires_log_and_span() {
        let config = TelemetryConfig::new("test-service", "1.0.0")
            .with_signals(SignalSet::All)
            .with_otlp_endpoint("http://localhost:4318");
        let telemetry = build_handle(&config).unwrap();

        let emitter = Emitter::from_telemetry(&config, &telemetry);

        assert!(emitter.logger.is_some());
        assert_eq!(emitter.work_duration, Some(config.work_duration));
    }

    #[tokio::test(start_paused = true)]
    async fn twelve_seconds_yield_two_ticks() {
        let emitter = Emitter::new(noop_counter(), None, None, Duration::from_secs(5));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(emitter.run(shutdown_rx));
        tokio::time::sleep(Duration::from_secs(12)).await;
        shutdown_tx.send(true).unwrap();

        let completed = task.await.unwrap();
        assert_eq!(completed, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_before_first_tick_yields_zero() {
        let emitter = Emitter::new(noop_counter(), None, None, Duration::from_secs(5));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(emitter.run(shutdown_rx));
        tokio::time::sleep(Duration::from_secs(1)).await;
        shutdown_tx.send(true).unwrap();

        let completed = task.await.unwrap();
        assert_eq!(completed, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_shutdown_sender_stops_the_loop() {
        let emitter = Emitter::new(noop_counter(), None, None, Duration::from_secs(5));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(emitter.run(shutdown_rx));
        tokio::time::sleep(Duration::from_secs(6)).await;
        drop(shutdown_tx);

        let completed = task.await.unwrap();
        assert_eq!(completed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn extended_variant_work_delays_subsequent_ticks() {
        let logger_provider = SdkLoggerProvider::builder().build();
        let emitter = Emitter::new(
            noop_counter(),
            Some(logger_provider.logger("test")),
            Some(Duration::from_secs(1)),
            Duration::from_secs(5),
        );
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(emitter.run(shutdown_rx));
        // Each cycle is 5 s wait + 1 s work, so ticks complete at 6 s and
        // 12 s; a third would not complete until 18 s.
        tokio::time::sleep(Duration::from_secs(16)).await;
        shutdown_tx.send(true).unwrap();

        let completed = task.await.unwrap();
        assert_eq!(completed, 2);
    }

    #[tokio::test]
    async fn exported_counter_matches_completed_ticks() {
        use opentelemetry_sdk::metrics::data::{AggregatedMetrics, MetricData};
        use opentelemetry_sdk::metrics::InMemoryMetricExporter;

        let exporter = InMemoryMetricExporter::default();
        let provider = SdkMeterProvider::builder()
            .with_reader(PeriodicReader::builder(exporter.clone()).build())
            .build();
        let counter = provider
            .meter("test")
            .u64_counter(COUNTER_NAME)
            .with_description(COUNTER_DESCRIPTION)
            .build();
        let emitter = Emitter::new(counter, None, None, Duration::from_secs(5));

        for _ in 0..3 {
            emitter.emit_tick().await;
        }
        provider.force_flush().unwrap();

        let finished = exporter.get_finished_metrics().unwrap();
        let metric = finished
            .iter()
            .flat_map(|resource_metrics| resource_metrics.scope_metrics())
            .flat_map(|scope_metrics| scope_metrics.metrics())
            .find(|metric| metric.name() == COUNTER_NAME)
            .expect("counter metric exported");

        let AggregatedMetrics::U64(MetricData::Sum(sum)) = metric.data() else {
            panic!("expected a u64 sum");
        };
        assert!(sum.is_monotonic());

        let total: u64 = sum.data_points().map(|point| point.value()).sum();
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn exported_log_record_carries_message_and_timestamp() {
        use opentelemetry_sdk::logs::InMemoryLogExporter;

        let exporter = InMemoryLogExporter::default();
        let provider = SdkLoggerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let emitter = Emitter::new(
            noop_counter(),
            Some(provider.logger("test")),
            None,
            Duration::from_secs(5),
        );

        let before = SystemTime::now();
        emitter.emit_tick().await;
        emitter.emit_tick().await;
        let after = SystemTime::now();

        let logs = exporter.get_emitted_logs().unwrap();
        assert_eq!(logs.len(), 2);

        let mut stamps = Vec::new();
        for log in &logs {
            assert_eq!(
                log.record.body(),
                Some(&AnyValue::String(LOG_MESSAGE.into()))
            );
            assert_eq!(log.record.severity_number(), Some(Severity::Info));

            let (_, value) = log
                .record
                .attributes_iter()
                .find(|(key, _)| key.as_str() == "now")
                .expect("now attribute");
            let AnyValue::Int(secs) = value else {
                panic!("expected an integer now attribute");
            };
            stamps.push(*secs);
        }

        // Monotonically non-decreasing and within the wall-clock window of
        // the two ticks (1 s slack for the seconds truncation).
        assert!(stamps[0] <= stamps[1]);
        let low = before.duration_since(UNIX_EPOCH).unwrap().as_secs() as i64 - 1;
        let high = after.duration_since(UNIX_EPOCH).unwrap().as_secs() as i64 + 1;
        assert!(stamps.iter().all(|secs| (low..=high).contains(secs)));
    }

    #[tokio::test]
    async fn span_brackets_the_simulated_work() {
        use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider};
        use tracing_subscriber::layer::SubscriberExt;

        let exporter = InMemorySpanExporter::default();
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let subscriber = tracing_subscriber::registry().with(
            crate::telemetry::subscriber::build_otel_layer(&provider, "test"),
        );
        let _guard = tracing::subscriber::set_default(subscriber);

        let work = Duration::from_millis(50);
        let emitter = Emitter::new(noop_counter(), None, Some(work), Duration::from_secs(5));
        emitter.emit_tick().await;
        provider.force_flush().unwrap();

        let spans = exporter.get_finished_spans().unwrap();
        let span = spans
            .iter()
            .find(|span| span.name == "example-span")
            .expect("span exported");
        let duration = span.end_time.duration_since(span.start_time).unwrap();
        assert!(duration >= work);
    }
}
