//! Tracing subscriber setup.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(config: &LoggingConfig) -> String {
    let level = config.level.as_directive();
    format!("sheets5e_client={level},sheets5e_domain={level}")
}

/// Installs the global subscriber. `RUST_LOG` overrides `LOG_LEVEL`.
pub fn init(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(config).into());

    let (plain, json) = match config.format {
        LogFormat::Plain => (Some(fmt::layer()), None),
        LogFormat::Json => (None, Some(fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;

    #[test]
    fn default_filter_targets_both_crates() {
        let config = LoggingConfig {
            level: LogLevel::Warning,
            format: LogFormat::Json,
        };
        assert_eq!(
            default_filter(&config),
            "sheets5e_client=warn,sheets5e_domain=warn"
        );
    }
}
