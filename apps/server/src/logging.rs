//! Logging initialization
//!
//! Console output is always enabled (plain or JSON). File output through
//! `tracing-appender` is optional and rotates according to configuration.
//! `RUST_LOG` takes precedence over `logging.level` when set.

use crate::config::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Keeps the non-blocking file writer alive; drop it last to flush buffered logs.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LoggingGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(&config.level)))?;

    let console = if config.json {
        fmt::layer()
            .json()
            .with_current_span(false)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer().with_target(true).boxed()
    };

    let (file_layer, file_guard) = if config.file_enabled {
        let appender = RollingFileAppender::new(
            rotation(&config.file_rotation),
            &config.file_directory,
            &config.file_prefix,
        );
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer()
            .json()
            .with_ansi(false)
            .with_writer(writer)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()?;

    tracing::debug!(
        service = %config.service_name,
        environment = %config.deployment_environment,
        json = config.json,
        file_enabled = config.file_enabled,
        "Logging initialized"
    );

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn default_directives(level: &str) -> String {
    format!("{level},company_registry={level},tower_http=info,sqlx=warn")
}

fn rotation(value: &str) -> Rotation {
    match value {
        "hourly" => Rotation::HOURLY,
        "minutely" => Rotation::MINUTELY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}
