//! Configuration types
//!
//! [`Config`] is the serializable form, loaded from files or the environment.
//! [`Config::into_options`] turns it into [`HandlerOptions`].

mod presets;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::attr::Attr;
use crate::core::{LogError, LogResult};
use crate::handler::HandlerOptions;
use crate::level::Level;
use crate::writer::{self, WriterGuards};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum level ("info", "debug") or `tracing` filter directives
    /// ("info,hyper=warn")
    pub level: String,

    /// Output format
    pub format: Format,

    /// Output writer configuration
    pub writer: WriterConfig,

    /// Caller-location injection
    pub source: SourceConfig,

    /// Process-id injection
    pub pid: PidConfig,

    /// Static fields baked into every record
    pub fields: Fields,
}

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// `key=value` pairs
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Writer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WriterConfig {
    /// Write to stdout
    #[default]
    Stdout,
    /// Write to stderr
    Stderr,
    /// Append to a file
    #[cfg(feature = "file")]
    File {
        /// File path
        path: std::path::PathBuf,
        /// Hand writes to a background thread
        #[serde(default = "default_non_blocking")]
        non_blocking: bool,
    },
}

/// Caller-location settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Inject the caller location
    pub enabled: bool,
    /// Attribute key; "source" when empty
    pub key: String,
    /// Frames to walk up; 3 when zero
    pub caller_skip: usize,
}

/// Process-id settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PidConfig {
    /// Bake the process id into every record
    pub enabled: bool,
    /// Attribute key; "pid" when empty
    pub key: String,
}

/// Global fields configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fields {
    /// Service name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Environment (dev/staging/prod)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    /// Version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Instance ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Region
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Custom fields
    #[serde(flatten)]
    pub custom: BTreeMap<String, serde_json::Value>,
}

// ============================================================================
// Implementations
// ============================================================================

impl Default for Config {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Text,
            writer: WriterConfig::Stdout,
            source: SourceConfig::default(),
            pid: PidConfig::default(),
            fields: Fields::default(),
        }
    }
}

impl Config {
    /// Validate and convert into handler options.
    ///
    /// The returned guards keep background file writers alive and must
    /// outlive the handler.
    pub fn into_options(self) -> LogResult<(HandlerOptions, WriterGuards)> {
        let (level, _) = parse_level(&self.level)?;
        let (writer, guards) = writer::make_writer(&self.writer)?;

        let options = HandlerOptions {
            format: self.format,
            level,
            writer: Some(writer),
            add_source: self.source.enabled,
            source_key: self.source.key,
            caller_skip: self.source.caller_skip,
            with_pid: self.pid.enabled,
            pid_key: self.pid.key,
            extra_attrs: self.fields.to_attrs(),
            extractor: None,
            diagnostics: None,
        };

        Ok((options, guards))
    }
}

/// Parse a level setting.
///
/// A bare level name maps to that level with no target filter. Anything else
/// is parsed as `tracing` filter directives: the handler level becomes the
/// most verbose level any directive enables, and the returned filter applies
/// the per-target limits to `tracing` events.
pub(crate) fn parse_level(spec: &str) -> LogResult<(Level, Option<EnvFilter>)> {
    if let Ok(level) = spec.parse::<Level>() {
        return Ok((level, None));
    }

    let filter = EnvFilter::try_new(spec)
        .map_err(|e| LogError::Filter(format!("invalid filter '{spec}': {e}")))?;
    let level = match filter.max_level_hint() {
        None => Level::Trace,
        // `off` everywhere: nothing passes the filter anyway
        Some(hint) => hint.into_level().map_or(Level::Error, Level::from),
    };
    Ok((level, Some(filter)))
}

impl Fields {
    /// Check if fields are empty
    pub fn is_empty(&self) -> bool {
        self.service.is_none()
            && self.env.is_none()
            && self.version.is_none()
            && self.instance.is_none()
            && self.region.is_none()
            && self.custom.is_empty()
    }

    /// Attributes in a fixed order: the named fields, then custom ones by key
    pub fn to_attrs(&self) -> Vec<Attr> {
        let named = [
            ("service", &self.service),
            ("env", &self.env),
            ("version", &self.version),
            ("instance", &self.instance),
            ("region", &self.region),
        ];

        named
            .into_iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| Attr::string(key, v.clone())))
            .chain(
                self.custom
                    .iter()
                    .map(|(key, value)| Attr::new(key.clone(), value.clone())),
            )
            .collect()
    }
}

#[cfg(feature = "file")]
fn default_non_blocking() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserializes_with_defaults() {
        let config: Config = serde_json::from_str(
            r#"{
                "level": "debug",
                "format": "json",
                "writer": { "type": "stderr" },
                "source": { "enabled": true, "key": "at" },
                "pid": { "enabled": true },
                "fields": { "service": "billing", "team": "payments" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.format, Format::Json);
        assert!(matches!(config.writer, WriterConfig::Stderr));
        assert_eq!(config.source.caller_skip, 0);
        assert_eq!(config.pid.key, "");
        assert_eq!(config.fields.service.as_deref(), Some("billing"));
        assert_eq!(config.fields.custom["team"], "payments");
    }

    #[test]
    fn converts_into_options() {
        let mut config = Config::default();
        config.level = "warn".into();
        config.pid.enabled = true;
        config.fields.service = Some("billing".into());
        config.fields.custom.insert("shard".into(), serde_json::json!(4));

        let (options, _guards) = config.into_options().unwrap();

        assert_eq!(options.level, Level::Warn);
        assert!(options.with_pid);
        assert!(options.writer.is_some());
        assert_eq!(
            options.extra_attrs,
            vec![Attr::string("service", "billing"), Attr::int("shard", 4)]
        );
    }

    #[test]
    fn rejects_bad_level() {
        let config = Config {
            level: "hyper=loud".into(),
            ..Config::default()
        };
        assert!(matches!(config.into_options(), Err(LogError::Filter(_))));
    }

    #[test]
    fn bare_level_names_need_no_filter() {
        let (level, filter) = parse_level("warning").unwrap();
        assert_eq!(level, Level::Warn);
        assert!(filter.is_none());
    }

    #[test]
    fn directives_set_the_most_verbose_level() {
        let (level, filter) = parse_level("info,hyper=warn").unwrap();
        assert_eq!(level, Level::Info);
        assert!(filter.is_some());

        let (level, _) = parse_level("warn,app::db=debug").unwrap();
        assert_eq!(level, Level::Debug);
    }

    #[test]
    fn directive_level_reaches_options() {
        let config = Config {
            level: "info,hyper=warn".into(),
            ..Config::default()
        };
        let (options, _guards) = config.into_options().unwrap();
        assert_eq!(options.level, Level::Info);
    }
}
