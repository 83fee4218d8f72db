mod emitter;
mod telemetry;

use std::process::ExitCode;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info};

use crate::emitter::Emitter;
use crate::telemetry::TelemetryConfig;

/// Bound on draining buffered telemetry at shutdown.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> ExitCode {
    let config = TelemetryConfig::from_env();

    // Exporter construction failure is the only fatal path; the subscriber
    // is not installed yet, so this goes straight to stderr.
    let telemetry = match telemetry::init(&config) {
        Ok(handle) => handle,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        signals = ?config.signals,
        tick_secs = config.tick_interval.as_secs(),
        "starting emitter"
    );

    let emitter = Emitter::from_telemetry(&config, &telemetry);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    let completed = emitter.run(shutdown_rx).await;
    info!(ticks = completed, "emitter stopped, draining telemetry");

    if let Err(err) = telemetry.shutdown(SHUTDOWN_TIMEOUT) {
        error!(error = %err, "telemetry drain failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
