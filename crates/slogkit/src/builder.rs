//! Global logger installation

// Standard library
use std::sync::Arc;

// External dependencies
use tracing_subscriber::{Registry, layer::SubscriberExt, util::SubscriberInitExt};

// Internal crates
use crate::{
    config::{Config, parse_level},
    core::{LogError, LogResult},
    diagnostics::StderrDiagnostics,
    extract::ContextExtractor,
    handler::ContextHandler,
    layer::HandlerLayer,
    writer::WriterGuards,
};

/// Builds a [`ContextHandler`] from a [`Config`] and installs it as the
/// global `tracing` subscriber
pub struct LoggerBuilder {
    config: Config,
    extractor: Option<Arc<dyn ContextExtractor>>,
}

/// Guard that keeps background writers alive; drop it at shutdown to flush
#[must_use = "dropping the guard stops background file writers"]
pub struct LoggerGuard {
    guards: WriterGuards,
}

impl LoggerBuilder {
    /// Create builder from config
    pub fn from_config(config: Config) -> Self {
        Self {
            config,
            extractor: None,
        }
    }

    /// Derive attributes from the ambient request context
    #[must_use]
    pub fn with_extractor(mut self, extractor: impl ContextExtractor + 'static) -> Self {
        self.extractor = Some(Arc::new(extractor));
        self
    }

    /// Build the handler without installing it
    pub fn build_handler(self) -> LogResult<(ContextHandler, LoggerGuard)> {
        let (mut options, guards) = self.config.into_options()?;
        options.extractor = self.extractor;
        // stderr, not tracing: a tracing diagnostic would reenter our own layer
        options.diagnostics = Some(Arc::new(StderrDiagnostics));

        Ok((ContextHandler::new(options), LoggerGuard { guards }))
    }

    /// Build and install as the global default subscriber
    ///
    /// Per-target directives in the level setting filter events before they
    /// reach the handler.
    pub fn build(self) -> LogResult<LoggerGuard> {
        let (_, filter) = parse_level(&self.config.level)?;
        let (handler, guard) = self.build_handler()?;

        Registry::default()
            .with(filter)
            .with(HandlerLayer::new(handler))
            .try_init()
            .map_err(|e| LogError::Config(format!("global subscriber already set: {e}")))?;

        Ok(guard)
    }
}

impl std::fmt::Debug for LoggerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerBuilder")
            .field("config", &self.config)
            .field("extractor", &self.extractor.is_some())
            .finish()
    }
}

impl std::fmt::Debug for LoggerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerGuard")
            .field("writers", &self.guards.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Format, WriterConfig};
    use crate::extract::ContextFields;
    use crate::handler::Handler;
    use crate::level::Level;

    #[test]
    fn build_handler_applies_config() {
        let config = Config {
            level: "warn".into(),
            format: Format::Json,
            writer: WriterConfig::Stderr,
            ..Config::default()
        };

        let (handler, _guard) = LoggerBuilder::from_config(config)
            .with_extractor(ContextFields)
            .build_handler()
            .unwrap();

        assert!(!handler.enabled(Level::Info));
        assert!(handler.enabled(Level::Error));
        assert!(format!("{handler:?}").contains("extractor: true"));
    }

    #[test]
    fn invalid_level_fails_before_install() {
        let config = Config {
            level: "debug,app=chatty".into(),
            ..Config::default()
        };
        assert!(matches!(
            LoggerBuilder::from_config(config).build(),
            Err(LogError::Filter(_))
        ));
    }
}
