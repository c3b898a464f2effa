use crate::domain::logging::{LogEntry, LogLevel, Logger, TimeProvider};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

/// Logger forwarding domain log entries to `tracing`
pub struct TracingLogger {
    min_level: LogLevel,
}

impl TracingLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    pub fn new_production() -> Self {
        Self::new(LogLevel::Info)
    }

    pub fn new_development() -> Self {
        Self::new(LogLevel::Debug)
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }
}

impl Logger for TracingLogger {
    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn log(&self, entry: LogEntry) {
        if !self.enabled(entry.level) {
            return;
        }
        let LogEntry { timestamp, level, component, message } = entry;
        let component = component.to_string();
        match level {
            LogLevel::Trace => tracing::trace!(%component, ts = timestamp, "{message}"),
            LogLevel::Debug => tracing::debug!(%component, ts = timestamp, "{message}"),
            LogLevel::Info => tracing::info!(%component, ts = timestamp, "{message}"),
            LogLevel::Warn => tracing::warn!(%component, ts = timestamp, "{message}"),
            LogLevel::Error => tracing::error!(%component, ts = timestamp, "{message}"),
        }
    }
}

/// Wall-clock milliseconds since the Unix epoch
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeProvider;

impl SystemTimeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TimeProvider for SystemTimeProvider {
    fn current_timestamp(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or_default()
    }

    fn format_timestamp(&self, timestamp: u64) -> String {
        let millis = timestamp % 1_000;
        let seconds = timestamp / 1_000;
        format!(
            "{:02}:{:02}:{:02}.{:03}",
            (seconds / 3_600) % 24,
            (seconds / 60) % 60,
            seconds % 60,
            millis
        )
    }
}

/// Install a compact `tracing` fmt subscriber filtered by `RUST_LOG`, with
/// `default_level` when the variable is unset. Returns `false` if a global
/// subscriber was already installed.
pub fn install_tracing_subscriber(default_level: LevelFilter) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .compact()
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_formats_as_clock_time() {
        let provider = SystemTimeProvider::new();
        assert_eq!(provider.format_timestamp(3_723_004), "01:02:03.004");
    }

    #[test]
    fn tracing_logger_respects_min_level() {
        use crate::domain::logging::LogComponent;

        let logger = TracingLogger::new_production();
        assert_eq!(logger.min_level(), LogLevel::Info);
        assert!(!logger.enabled(LogLevel::Debug));
        assert!(logger.enabled(LogLevel::Error));
        logger.record(LogLevel::Info, LogComponent::Infrastructure("Test"), "kept");
    }
}
