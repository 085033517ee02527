//! Logging setup for commons.
//!
//! Everything in commons logs through `tracing`. These helpers install a
//! subscriber for applications and tests that don't bring their own. A
//! subscriber that is already installed is left in place.

use commons_types::{CommonsError, LogConfig, LogFormat, LogLevel, Result};
use std::path::Path;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize the logging system with default configuration.
///
/// Writes to stderr, filtered by `RUST_LOG` (default `info`).
pub fn init_default() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let installed = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(filter))
        .try_init();
    if installed.is_err() {
        tracing::debug!("Subscriber already installed");
    }
    Ok(())
}

/// Initialize logging from configuration, one layer per output.
///
/// An empty list falls back to [`init_default`].
pub fn init_from_config(configs: &[LogConfig]) -> Result<()> {
    if configs.is_empty() {
        return init_default();
    }

    let layers = configs
        .iter()
        .map(output_layer)
        .collect::<Result<Vec<_>>>()?;

    let installed = tracing_subscriber::registry().with(layers).try_init();
    if installed.is_err() {
        tracing::debug!("Subscriber already installed");
    }
    Ok(())
}

fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::None => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}

fn output_layer(config: &LogConfig) -> Result<BoxedLayer> {
    let filter = level_filter(config.level);

    if config.is_stderr() {
        let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        return Ok(match config.format {
            LogFormat::Pretty => layer.pretty().with_filter(filter).boxed(),
            LogFormat::Json => layer.json().with_filter(filter).boxed(),
            LogFormat::Compact => layer.compact().with_filter(filter).boxed(),
        });
    }

    let path = Path::new(&config.path);
    let file_name = path
        .file_name()
        .ok_or_else(|| CommonsError::Config(format!("Invalid log path '{}'", config.path)))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    crate::util::fs::create_dir(dir)?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(appender)
        .with_ansi(false);
    Ok(match config.format {
        LogFormat::Pretty => layer.pretty().with_filter(filter).boxed(),
        LogFormat::Json => layer.json().with_filter(filter).boxed(),
        LogFormat::Compact => layer.compact().with_filter(filter).boxed(),
    })
}
