//! Configuration presets for common scenarios

use super::{Config, Fields, Format, PidConfig, SourceConfig};

impl Config {
    /// Create configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Parse SLOGKIT_LEVEL or RUST_LOG
        if let Ok(level) = std::env::var("SLOGKIT_LEVEL") {
            config.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            config.level = level;
        }

        if let Ok(format) = std::env::var("SLOGKIT_FORMAT") {
            config.format = match format.to_lowercase().as_str() {
                "json" => Format::Json,
                _ => Format::Text,
            };
        }

        if let Some(enabled) = env_flag("SLOGKIT_SOURCE") {
            config.source.enabled = enabled;
        }
        if let Some(enabled) = env_flag("SLOGKIT_PID") {
            config.pid.enabled = enabled;
        }

        config.fields = Fields::from_env();
        config
    }

    /// Development configuration (text, debug level, caller locations)
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            format: Format::Text,
            source: SourceConfig {
                enabled: true,
                ..SourceConfig::default()
            },
            ..Self::default()
        }
    }

    /// Production configuration (JSON, info level, process id)
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Json,
            pid: PidConfig {
                enabled: true,
                ..PidConfig::default()
            },
            ..Self::default()
        }
    }
}

impl Fields {
    /// Create fields from environment variables
    pub fn from_env() -> Self {
        Self {
            service: std::env::var("SLOGKIT_SERVICE").ok(),
            env: std::env::var("SLOGKIT_ENV").ok(),
            version: std::env::var("SLOGKIT_VERSION").ok(),
            instance: std::env::var("SLOGKIT_INSTANCE").ok(),
            region: std::env::var("SLOGKIT_REGION").ok(),
            custom: Default::default(),
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().map(|v| v != "0" && v != "false")
}
