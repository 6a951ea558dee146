//! Logging configuration for Insight.
//!
//! Analysis methods emit structured `tracing` spans and events. This module
//! provides a small configuration surface so embedders can tune log volume
//! without touching their subscriber setup.

use tracing::Level;

/// Logging configuration for Insight components.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Base log level for Insight components
    pub base_level: Level,
    /// Whether to log per-analysis detail (query text, row counts)
    pub log_analysis_details: bool,
    /// Whether to log data source operations (CSV loads, coercions)
    pub log_data_operations: bool,
    /// Maximum length for logged field values (to prevent huge logs)
    pub max_field_length: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_level: Level::INFO,
            log_analysis_details: false,
            log_data_operations: true,
            max_field_length: 256,
        }
    }
}

impl LogConfig {
    /// Creates a verbose configuration suitable for debugging.
    pub fn verbose() -> Self {
        Self {
            base_level: Level::DEBUG,
            log_analysis_details: true,
            log_data_operations: true,
            max_field_length: 1024,
        }
    }

    /// Creates a minimal configuration for production with lowest overhead.
    pub fn production() -> Self {
        Self {
            base_level: Level::WARN,
            log_analysis_details: false,
            log_data_operations: false,
            max_field_length: 128,
        }
    }

    /// Truncates a field value to the configured maximum length.
    pub fn truncate_field<'a>(&self, value: &'a str) -> &'a str {
        if value.len() <= self.max_field_length {
            value
        } else {
            let mut end = self.max_field_length;
            while !value.is_char_boundary(end) {
                end -= 1;
            }
            &value[..end]
        }
    }
}

/// Macro for conditional per-analysis detail logging.
#[macro_export]
macro_rules! log_analysis {
    ($config:expr, $($arg:tt)*) => {
        if $config.log_analysis_details {
            tracing::debug!($($arg)*);
        }
    };
}

/// Macro for conditional data operation logging.
#[macro_export]
macro_rules! log_data_op {
    ($config:expr, $($arg:tt)*) => {
        if $config.log_data_operations {
            tracing::info!($($arg)*);
        }
    };
}

/// Subscriber setup for applications that embed the library.
///
/// Libraries should never install a global subscriber on their own, so this
/// lives in a separate module the embedding binary calls once at startup.
pub mod setup {
    use super::LogConfig;

    /// Installs a global `tracing` subscriber.
    ///
    /// Respects `RUST_LOG` when set; otherwise the level comes from the
    /// supplied configuration. With `json` the output is one structured
    /// event per line, suitable for log shipping.
    ///
    /// ```rust,no_run
    /// use insight_core::logging::{setup::init_logging, LogConfig};
    ///
    /// init_logging(&LogConfig::default(), false).unwrap();
    /// ```
    pub fn init_logging(
        config: &LogConfig,
        json: bool,
    ) -> Result<(), Box<dyn std::error::Error>> {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

        let default_directive = format!("insight_core={}", config.base_level);
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive));

        let fmt_layer = if json {
            tracing_subscriber::fmt::layer().json().boxed()
        } else {
            tracing_subscriber::fmt::layer().boxed()
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.base_level, Level::INFO);
        assert!(config.log_data_operations);
        assert!(!config.log_analysis_details);
    }

    #[test]
    fn test_logging_macros_accept_both_configs() {
        // Smoke check: the macros expand and evaluate their gates for any
        // configuration without requiring an installed subscriber.
        let verbose = LogConfig::verbose();
        let quiet = LogConfig::production();
        crate::log_analysis!(verbose, detail = "x", "analysis event");
        crate::log_analysis!(quiet, detail = "x", "analysis event");
        crate::log_data_op!(verbose, "data event");
        crate::log_data_op!(quiet, "data event");
    }

    #[test]
    fn test_truncate_field() {
        let config = LogConfig {
            max_field_length: 4,
            ..LogConfig::default()
        };
        assert_eq!(config.truncate_field("abc"), "abc");
        assert_eq!(config.truncate_field("abcdef"), "abcd");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let config = LogConfig {
            max_field_length: 3,
            ..LogConfig::default()
        };
        // "é" is two bytes; truncation must not split it.
        assert_eq!(config.truncate_field("ééé"), "é");
    }
}
