//! Telemetry bootstrap for the periodic signal emitter.
//!
//! Everything is built on the OpenTelemetry SDK with OTLP-over-HTTP
//! exporters. Metrics are always wired up; logs and traces only when the
//! extended signal set is selected.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! let config = TelemetryConfig::from_env();
//! let telemetry = telemetry::init(&config)?;
//! // ... run ...
//! telemetry.shutdown(Duration::from_secs(5))?;
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `OTEL_SERVICE_NAME` | Service name | `example-service` |
//! | `OTEL_SERVICE_VERSION` | Service version | `CARGO_PKG_VERSION` |
//! | `OTEL_EXPORTER_OTLP_ENDPOINT` | OTLP base endpoint | library default |
//! | `EMITTER_SIGNALS` | `metrics` or `all` | `metrics` |
//! | `RUST_LOG` | Log level filter | `info` |
//! | `LOG_FORMAT` | `pretty` or `json` | `pretty` |
//!
//! # Module Structure
//!
//! - [`api`]: provider handle and initialization
//! - [`config`]: configuration types
//! - [`error`]: error types
//! - [`export`]: OTLP exporter/provider builders
//! - [`subscriber`]: tracing subscriber layers

#![allow(dead_code)] // Public API - not all items used internally

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod resource;
pub mod subscriber;

// Re-exports
pub use api::{build_handle, init, TelemetryHandle};
pub use config::{LogFormat, SignalSet, TelemetryConfig, TelemetryConfigBuilder};
pub use error::TelemetryError;
