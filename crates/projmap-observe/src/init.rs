use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, fmt::time::OffsetTime, layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::{config::LogConfig, error::ObserveError, format::LogFormat};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Install the global subscriber described by `cfg`.
///
/// Only the first call in a process can succeed.
pub fn init_logging(cfg: &LogConfig) -> Result<(), ObserveError> {
    let output = output_layer(cfg)?;
    let filter = env_filter(&cfg.filter)?;

    tracing_subscriber::registry()
        .with(output)
        .with(filter)
        .try_init()
        .map_err(|e| classify_init_error(&e.to_string()))
}

fn output_layer(cfg: &LogConfig) -> Result<BoxedLayer, ObserveError> {
    match cfg.format {
        LogFormat::Text => Ok(fmt::layer()
            .with_ansi(cfg.ansi)
            .with_target(cfg.with_targets)
            .with_timer(local_rfc3339())
            .boxed()),
        LogFormat::Json => Ok(fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(cfg.with_targets)
            .with_current_span(false)
            .with_timer(local_rfc3339())
            .boxed()),
        LogFormat::Journald => journald_layer(),
    }
}

fn env_filter(directives: &str) -> Result<EnvFilter, ObserveError> {
    EnvFilter::try_new(directives).map_err(|e| ObserveError::InvalidFilter {
        filter: directives.to_string(),
        reason: e.to_string(),
    })
}

/// Local offset when the platform exposes it, UTC otherwise.
fn local_rfc3339() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

// `TryInitError` displays the inner `SetGlobalDefaultError` from tracing-core:
// "a global default trace dispatcher has already been set".
fn classify_init_error(msg: &str) -> ObserveError {
    if msg.contains("global default trace dispatcher") {
        ObserveError::AlreadyInitialized
    } else {
        ObserveError::Install(msg.to_string())
    }
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn journald_layer() -> Result<BoxedLayer, ObserveError> {
    tracing_journald::layer()
        .map(|layer| layer.boxed())
        .map_err(|e| ObserveError::Install(format!("journald: {e}")))
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
fn journald_layer() -> Result<BoxedLayer, ObserveError> {
    Err(ObserveError::JournaldUnavailable)
}
