//! Logging setup and configuration

use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};
use crate::config::TransportMode;

pub struct LoggingGuard {
    pub _guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Console plus hourly rolling file logging. In single-shot mode the console
/// layer writes to stderr because stdout carries the protocol stream.
pub fn setup_logging(log_dir: &str, mode: TransportMode) -> Result<Arc<LoggingGuard>> {
    std::fs::create_dir_all(log_dir)?;
    let file_appender = tracing_appender::rolling::hourly(log_dir, "sugar-pool-cache.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);
    let console = match mode {
        TransportMode::SingleShot => console
            .with_ansi(false)
            .with_writer(std::io::stderr)
            .boxed(),
        TransportMode::Persistent => console.with_ansi(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_thread_ids(false)
                .with_level(true)
                .with_ansi(false)
                .compact()
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))?
        )
        .init();

    Ok(Arc::new(LoggingGuard { _guard: guard }))
}
