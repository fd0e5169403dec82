//! Subscriber setup for the events the query engine emits.
//!
//! `jsonquery_core` logs registrations and executed queries at `debug` and
//! every pipeline stage at `trace`. Replacing a registered source is logged
//! at `warn`. Nothing is installed unless the application calls
//! [`LogConfig::init`].

use jsonquery_core::error::{Error, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output destination
#[derive(Debug, Clone)]
pub enum LogOutput {
    /// Output to stdout
    Stdout,
    /// Output to a file with rotation
    File(std::path::PathBuf),
    /// Output to both stdout and file
    Both(std::path::PathBuf),
}

/// Log format style
#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Pretty,
    /// Compact single-line format
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level filter
    pub level: String,
    /// Output destination
    pub output: LogOutput,
    /// Format style
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            output: LogOutput::Stdout,
            format: LogFormat::Pretty,
        }
    }
}

impl LogConfig {
    /// Create config with info level and stdout output
    pub fn info() -> Self {
        Self {
            level: "info".to_string(),
            ..Default::default()
        }
    }

    /// Create config with debug level
    pub fn debug() -> Self {
        Self {
            level: "debug".to_string(),
            ..Default::default()
        }
    }

    /// A `trace` event for each pipeline stage of every query, `debug` for
    /// the provider and `info` for everything else
    pub fn pipeline_trace() -> Self {
        Self {
            level: "jsonquery_core=trace,jsonquery=debug,info".to_string(),
            ..Default::default()
        }
    }

    /// Set log output to file with rotation
    pub fn with_file<P: Into<std::path::PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::File(path.into());
        self
    }

    /// Set log output to both stdout and file
    pub fn with_both<P: Into<std::path::PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::Both(path.into());
        self
    }

    /// Set log format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set log level filter
    pub fn with_level<S: Into<String>>(mut self, level: S) -> Self {
        self.level = level.into();
        self
    }

    /// Build the level filter, preferring `RUST_LOG` when it is set
    pub fn filter(&self) -> Result<EnvFilter> {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .map_err(|e| Error::Validation(format!("Invalid log level '{}': {}", self.level, e)))
    }

    /// Initialize global logging with this configuration
    ///
    /// Returns a guard that must be kept alive for file logging to work.
    /// When the guard is dropped, the logging worker thread is shutdown.
    ///
    /// # Errors
    ///
    /// Returns Error::Validation if the level filter does not parse or a
    /// global subscriber is already installed.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use jsonquery::logging::LogConfig;
    ///
    /// // Keep the guard alive for the lifetime of your application
    /// let _guard = LogConfig::info().init()?;
    /// # Ok::<(), jsonquery::Error>(())
    /// ```
    pub fn init(self) -> Result<Option<WorkerGuard>> {
        let env_filter = self.filter()?;

        let (result, guard) = match self.output {
            LogOutput::Stdout => {
                let result = match self.format {
                    LogFormat::Pretty => tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().pretty())
                        .try_init(),
                    LogFormat::Compact => tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().compact())
                        .try_init(),
                };
                (result, None)
            }
            LogOutput::File(path) => {
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender(&path));

                let result = match self.format {
                    LogFormat::Pretty => tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().with_writer(non_blocking).with_ansi(false).pretty())
                        .try_init(),
                    LogFormat::Compact => tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().with_writer(non_blocking).with_ansi(false).compact())
                        .try_init(),
                };
                (result, Some(guard))
            }
            LogOutput::Both(path) => {
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender(&path));

                let result = tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer())
                    .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                    .try_init();
                (result, Some(guard))
            }
        };

        result.map_err(|e| Error::Validation(format!("Logging already initialized: {}", e)))?;
        Ok(guard)
    }
}

fn file_appender(path: &Path) -> RollingFileAppender {
    tracing_appender::rolling::daily(
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new(".")),
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("jsonquery.log"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_log_config_builders() {
        let config = LogConfig::debug()
            .with_file("/tmp/test.log")
            .with_format(LogFormat::Compact);
        assert_eq!(config.level, "debug");
        assert!(matches!(config.output, LogOutput::File(_)));
        assert!(matches!(config.format, LogFormat::Compact));
    }

    #[test]
    fn test_pipeline_trace_targets_core_stages() {
        std::env::remove_var("RUST_LOG");
        let config = LogConfig::pipeline_trace();
        assert!(config.level.starts_with("jsonquery_core=trace"));
        assert!(config.filter().is_ok());
    }

    #[test]
    fn test_invalid_level_is_an_error() {
        std::env::remove_var("RUST_LOG");
        let config = LogConfig::default().with_level("jsonquery=notalevel");
        let err = config.filter().unwrap_err();
        assert_eq!(err.kind(), jsonquery_core::ErrorKind::Validation);
    }

    #[test]
    fn test_level_filter_parses() {
        assert!(LogConfig::default().with_level("warn").filter().is_ok());
        assert!(LogConfig::default()
            .with_level("jsonquery_core=trace,info")
            .filter()
            .is_ok());
    }
}
