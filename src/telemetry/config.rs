use std::env;
use std::time::Duration;

/// Default service name used for the OTLP resource when none is configured.
pub const DEFAULT_SERVICE_NAME: &str = "example-service";

/// Nominal period between emitter ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(5);

/// Flush interval for the metrics periodic reader.
pub const DEFAULT_EXPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Simulated work performed inside each span in the extended signal set.
pub const DEFAULT_WORK_DURATION: Duration = Duration::from_secs(1);

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Pretty human-readable format with colors (for local dev)
    #[default]
    Pretty,
    /// JSON structured format (for cloud environments)
    Json,
}

/// Which telemetry signals the emitter produces per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignalSet {
    /// Metrics only: one counter increment per tick
    #[default]
    Metrics,
    /// Metrics plus one OTLP log record and one span per tick
    All,
}

impl SignalSet {
    /// Parse from the `EMITTER_SIGNALS` environment variable
    /// (`metrics` or `all`); anything else falls back to metrics-only.
    pub fn from_env() -> Self {
        match env::var("EMITTER_SIGNALS").as_deref() {
            Ok("all") => Self::All,
            _ => Self::Metrics,
        }
    }
}

/// Main telemetry/emitter configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub service_version: String,
    pub otlp_endpoint: Option<String>,
    pub log_level: String,
    pub log_format: LogFormat,
    pub signals: SignalSet,
    pub tick_interval: Duration,
    pub export_interval: Duration,
    pub work_duration: Duration,
}

impl TelemetryConfig {
    /// Create config from environment variables.
    /// The tick/export/work intervals are fixed; only the builder overrides them.
    pub fn from_env() -> Self {
        let log_format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Self {
            service_name: env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string()),
            service_version: env::var("OTEL_SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            otlp_endpoint: env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok(),
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            log_format,
            signals: SignalSet::from_env(),
            tick_interval: DEFAULT_TICK_INTERVAL,
            export_interval: DEFAULT_EXPORT_INTERVAL,
            work_duration: DEFAULT_WORK_DURATION,
        }
    }

    /// Create a new config with explicit values
    pub fn new(service_name: impl Into<String>, service_version: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            service_version: service_version.into(),
            otlp_endpoint: None,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            signals: SignalSet::Metrics,
            tick_interval: DEFAULT_TICK_INTERVAL,
            export_interval: DEFAULT_EXPORT_INTERVAL,
            work_duration: DEFAULT_WORK_DURATION,
        }
    }

    pub fn builder() -> TelemetryConfigBuilder {
        TelemetryConfigBuilder::default()
    }

    pub fn with_otlp_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.otlp_endpoint = Some(endpoint.into());
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    pub fn with_signals(mut self, signals: SignalSet) -> Self {
        self.signals = signals;
        self
    }
}

#[derive(Default)]
pub struct TelemetryConfigBuilder {
    service_name: Option<String>,
    service_version: Option<String>,
    otlp_endpoint: Option<String>,
    log_level: Option<String>,
    log_format: Option<LogFormat>,
    signals: Option<SignalSet>,
    tick_interval: Option<Duration>,
    export_interval: Option<Duration>,
    work_duration: Option<Duration>,
}

impl TelemetryConfigBuilder {
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    pub fn service_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = Some(version.into());
        self
    }

    pub fn otlp_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.otlp_endpoint = Some(endpoint.into());
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.log_format = Some(format);
        self
    }

    pub fn json(self) -> Self {
        self.log_format(LogFormat::Json)
    }

    pub fn pretty(self) -> Self {
        self.log_format(LogFormat::Pretty)
    }

    pub fn signals(mut self, signals: SignalSet) -> Self {
        self.signals = Some(signals);
        self
    }

    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = Some(interval);
        self
    }

    pub fn export_interval(mut self, interval: Duration) -> Self {
        self.export_interval = Some(interval);
        self
    }

    pub fn work_duration(mut self, duration: Duration) -> Self {
        self.work_duration = Some(duration);
        self
    }

    pub fn build(self) -> TelemetryConfig {
        TelemetryConfig {
            service_name: self
                .service_name
                .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),
            service_version: self
                .service_version
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            otlp_endpoint: self.otlp_endpoint,
            log_level: self.log_level.unwrap_or_else(|| "info".to_string()),
            log_format: self.log_format.unwrap_or_default(),
            signals: self.signals.unwrap_or_default(),
            tick_interval: self.tick_interval.unwrap_or(DEFAULT_TICK_INTERVAL),
            export_interval: self.export_interval.unwrap_or(DEFAULT_EXPORT_INTERVAL),
            work_duration: self.work_duration.unwrap_or(DEFAULT_WORK_DURATION),
        }
    }
}
