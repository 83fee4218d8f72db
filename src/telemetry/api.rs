use std::time::Duration;

use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;

use crate::telemetry::config::{SignalSet, TelemetryConfig};
use crate::telemetry::error::TelemetryError;
use crate::telemetry::export::{build_logger_provider, build_meter_provider, build_tracer_provider};
use crate::telemetry::resource::build_resource;
use crate::telemetry::subscriber::init_subscriber;

/// Owns the signal providers for the process lifetime.
///
/// Providers are handed to emitting components explicitly instead of being
/// registered as process-wide globals, so components can be exercised in
/// tests with plain no-op providers.
pub struct TelemetryHandle {
    meter_provider: SdkMeterProvider,
    logger_provider: Option<SdkLoggerProvider>,
    tracer_provider: Option<SdkTracerProvider>,
}

impl TelemetryHandle {
    pub fn meter_provider(&self) -> &SdkMeterProvider {
        &self.meter_provider
    }

    pub fn logger_provider(&self) -> Option<&SdkLoggerProvider> {
        self.logger_provider.as_ref()
    }

    pub fn tracer_provider(&self) -> Option<&SdkTracerProvider> {
        self.tracer_provider.as_ref()
    }

    /// Drain buffered telemetry and shut every provider down, each bounded
    /// by `timeout`. All providers are attempted even if one fails; the
    /// first failure is reported.
    pub fn shutdown(self, timeout: Duration) -> Result<(), TelemetryError> {
        let mut result = Ok(());

        if let Some(tracer_provider) = &self.tracer_provider {
            if let Err(err) = tracer_provider.shutdown_with_timeout(timeout) {
                result = result.and(Err(TelemetryError::from(err)));
            }
        }
        if let Some(logger_provider) = &self.logger_provider {
            if let Err(err) = logger_provider.shutdown_with_timeout(timeout) {
                result = result.and(Err(TelemetryError::from(err)));
            }
        }
        if let Err(err) = self.meter_provider.shutdown_with_timeout(timeout) {
            result = result.and(Err(TelemetryError::from(err)));
        }

        result
    }
}

/// Construct the providers for the configured signal set.
/// Metrics are always built; logs and traces only for [`SignalSet::All`].
pub fn build_handle(config: &TelemetryConfig) -> Result<TelemetryHandle, TelemetryError> {
    let resource = build_resource(config);

    let meter_provider = build_meter_provider(config, resource.clone())?;
    let (logger_provider, tracer_provider) = match config.signals {
        SignalSet::Metrics => (None, None),
        SignalSet::All => (
            Some(build_logger_provider(config, resource.clone())?),
            Some(build_tracer_provider(config, resource)?),
        ),
    };

    Ok(TelemetryHandle {
        meter_provider,
        logger_provider,
        tracer_provider,
    })
}

/// Build the providers and install the tracing subscriber.
pub fn init(config: &TelemetryConfig) -> Result<TelemetryHandle, TelemetryError> {
    let handle = build_handle(config)?;
    init_subscriber(handle.tracer_provider(), config);
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_only_handle_has_no_log_or_trace_providers() {
        let config = TelemetryConfig::new("test", "1.0");

        let handle = build_handle(&config).unwrap();

        assert!(handle.logger_provider().is_none());
        assert!(handle.tracer_provider().is_none());
    }

    #[test]
    fn extended_handle_has_all_providers() {
        let config = TelemetryConfig::new("test", "1.0")
            .with_signals(SignalSet::All)
            .with_otlp_endpoint("http://localhost:4318");

        let handle = build_handle(&config).unwrap();

        assert!(handle.logger_provider().is_some());
        assert!(handle.tracer_provider().is_some());
    }

    #[test]
    fn build_handle_with_malformed_endpoint_fails() {
        // Startup must fail before the emitter loop can ever run.
        let config = TelemetryConfig::new("test", "1.0").with_otlp_endpoint("not a valid url");

        let result = build_handle(&config);

        assert!(matches!(result, Err(TelemetryError::MetricExporter(_))));
    }

    #[test]
    fn shutdown_with_noop_providers_succeeds() {
        let handle = TelemetryHandle {
            meter_provider: SdkMeterProvider::builder().build(),
            logger_provider: Some(SdkLoggerProvider::builder().build()),
            tracer_provider: Some(SdkTracerProvider::builder().build()),
        };

        let result = handle.shutdown(Duration::from_secs(1));

        assert!(result.is_ok());
    }
}
