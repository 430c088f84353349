use crate::utils::error::{EtlError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    /// 方便匯入集中式日誌系統
    Json,
}

impl LogFormat {
    pub fn from_flag(json_logs: bool) -> Self {
        if json_logs {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }
}

/// `RUST_LOG` wins; otherwise the crate logs at info, or debug when verbose.
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "mexico_miles=debug,info"
    } else {
        "mexico_miles=info"
    }
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_logger(format: LogFormat, verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));
    let fmt = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let installed = match format {
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(fmt.compact())
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt.json())
            .try_init(),
    };

    installed.map_err(|e| EtlError::ConfigError {
        message: format!("Logger initialization failed: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flag() {
        assert_eq!(LogFormat::from_flag(true), LogFormat::Json);
        assert_eq!(LogFormat::from_flag(false), LogFormat::Compact);
    }

    #[test]
    fn test_default_directives() {
        assert_eq!(default_directives(false), "mexico_miles=info");
        assert_eq!(default_directives(true), "mexico_miles=debug,info");
    }

    // Only test in this binary that touches the global subscriber.
    #[test]
    fn test_json_logger_installs_once() {
        assert!(init_logger(LogFormat::Json, true).is_ok());
        tracing::info!(rows = 3, "json logger ready");
        assert!(matches!(
            init_logger(LogFormat::Compact, false),
            Err(EtlError::ConfigError { .. })
        ));
    }
}
