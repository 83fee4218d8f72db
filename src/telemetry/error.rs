use opentelemetry_otlp::ExporterBuildError;
use opentelemetry_sdk::error::OTelSdkError;
use thiserror::Error;

/// Errors surfaced by telemetry bootstrap and shutdown.
///
/// Any exporter construction failure is fatal at startup; the binary
/// logs it once and exits non-zero before the emitter loop starts.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to create metric exporter: {0}")]
    MetricExporter(#[source] ExporterBuildError),

    #[error("failed to create log exporter: {0}")]
    LogExporter(#[source] ExporterBuildError),

    #[error("failed to create trace exporter: {0}")]
    TraceExporter(#[source] ExporterBuildError),

    #[error("telemetry shutdown incomplete: {0}")]
    Shutdown(#[from] OTelSdkError),
}
