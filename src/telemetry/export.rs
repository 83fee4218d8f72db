use opentelemetry_otlp::{LogExporter, MetricExporter, Protocol, SpanExporter, WithExportConfig};
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;

use crate::telemetry::config::TelemetryConfig;
use crate::telemetry::error::TelemetryError;

/// Join a configured base endpoint with a per-signal OTLP path.
/// `with_endpoint` takes the URL verbatim, so the path has to be appended here.
fn signal_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

/// Metric exporter over OTLP HTTP, flushed by a periodic reader.
/// Without a configured endpoint the exporter falls back to its own
/// env/default resolution (local collector).
pub fn build_meter_provider(
    config: &TelemetryConfig,
    resource: Resource,
) -> Result<SdkMeterProvider, TelemetryError> {
    let builder = MetricExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary);

    let exporter = match &config.otlp_endpoint {
        Some(base) => builder.with_endpoint(signal_url(base, "v1/metrics")).build(),
        None => builder.build(),
    }
    .map_err(TelemetryError::MetricExporter)?;

    let reader = PeriodicReader::builder(exporter)
        .with_interval(config.export_interval)
        .build();

    Ok(SdkMeterProvider::builder()
        .with_reader(reader)
        .with_resource(resource)
        .build())
}

/// Log exporter over OTLP HTTP behind the SDK's batch processor.
pub fn build_logger_provider(
    config: &TelemetryConfig,
    resource: Resource,
) -> Result<SdkLoggerProvider, TelemetryError> {
    let builder = LogExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary);

    let exporter = match &config.otlp_endpoint {
        Some(base) => builder.with_endpoint(signal_url(base, "v1/logs")).build(),
        None => builder.build(),
    }
    .map_err(TelemetryError::LogExporter)?;

    Ok(SdkLoggerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build())
}

/// Span exporter over OTLP HTTP behind the SDK's batch processor.
pub fn build_tracer_provider(
    config: &TelemetryConfig,
    resource: Resource,
) -> Result<SdkTracerProvider, TelemetryError> {
    let builder = SpanExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary);

    let exporter = match &config.otlp_endpoint {
        Some(base) => builder.with_endpoint(signal_url(base, "v1/traces")).build(),
        None => builder.build(),
    }
    .map_err(TelemetryError::TraceExporter)?;

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build())
}
