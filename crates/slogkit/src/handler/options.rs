//! Construction-time configuration for [`ContextHandler`](super::ContextHandler)

use std::fmt;
use std::sync::Arc;

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::attr::Attr;
use crate::config::Format;
use crate::diagnostics::Diagnostics;
use crate::extract::ContextExtractor;
use crate::level::Level;

/// Key of the caller-location attribute when none is configured
pub const DEFAULT_SOURCE_KEY: &str = "source";
/// Key of the process-id attribute when none is configured
pub const DEFAULT_PID_KEY: &str = "pid";
/// Frames walked up from the handler's emit frame when none is configured
pub const DEFAULT_CALLER_SKIP: usize = 3;

/// Options consumed once by [`ContextHandler::new`](super::ContextHandler::new).
///
/// Empty keys and a zero `caller_skip` fall back to their defaults.
///
/// ```rust
/// use slogkit::{Attr, HandlerOptions, Level};
///
/// let options = HandlerOptions::new()
///     .json()
///     .level(Level::Debug)
///     .with_pid()
///     .add_source()
///     .extra_attr(Attr::string("service", "billing"));
/// ```
#[derive(Default)]
pub struct HandlerOptions {
    /// Output encoding
    pub format: Format,
    /// Minimum level written
    pub level: Level,
    /// Output destination; standard output when `None`
    pub writer: Option<BoxMakeWriter>,
    /// Inject the caller location
    pub add_source: bool,
    /// Key of the caller-location attribute
    pub source_key: String,
    /// Frames between the handler's emit frame and the caller
    pub caller_skip: usize,
    /// Bake the process id into every record
    pub with_pid: bool,
    /// Key of the process-id attribute
    pub pid_key: String,
    /// Static attributes baked in at construction, after the pid
    pub extra_attrs: Vec<Attr>,
    /// Derives attributes from each request context
    pub extractor: Option<Arc<dyn ContextExtractor>>,
    /// Receives extraction failures; drops them when `None`
    pub diagnostics: Option<Arc<dyn Diagnostics>>,
}

impl HandlerOptions {
    /// Defaults: text, info, stdout, no enrichment
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output format
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Shorthand for `format(Format::Json)`
    pub fn json(self) -> Self {
        self.format(Format::Json)
    }

    /// Set the minimum level
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Write to `writer` instead of standard output
    pub fn writer<W>(mut self, writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        self.writer = Some(BoxMakeWriter::new(writer));
        self
    }

    /// Inject the caller location under the default key
    pub fn add_source(mut self) -> Self {
        self.add_source = true;
        self
    }

    /// Key of the caller-location attribute
    pub fn source_key(mut self, key: impl Into<String>) -> Self {
        self.source_key = key.into();
        self
    }

    /// Frames to walk up from the handler's emit frame
    pub fn caller_skip(mut self, skip: usize) -> Self {
        self.caller_skip = skip;
        self
    }

    /// Bake the process id under the default key
    pub fn with_pid(mut self) -> Self {
        self.with_pid = true;
        self
    }

    /// Key of the process-id attribute
    pub fn pid_key(mut self, key: impl Into<String>) -> Self {
        self.pid_key = key.into();
        self
    }

    /// Append one static attribute
    pub fn extra_attr(mut self, attr: Attr) -> Self {
        self.extra_attrs.push(attr);
        self
    }

    /// Append static attributes in order
    pub fn extra_attrs(mut self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        self.extra_attrs.extend(attrs);
        self
    }

    /// Derive attributes from request contexts with `extractor`
    pub fn extractor(mut self, extractor: impl ContextExtractor + 'static) -> Self {
        self.extractor = Some(Arc::new(extractor));
        self
    }

    /// Report extraction failures to `diagnostics`
    pub fn diagnostics(mut self, diagnostics: impl Diagnostics + 'static) -> Self {
        self.diagnostics = Some(Arc::new(diagnostics));
        self
    }

    pub(crate) fn resolved_source_key(&self) -> String {
        or_default(&self.source_key, DEFAULT_SOURCE_KEY)
    }

    pub(crate) fn resolved_pid_key(&self) -> String {
        or_default(&self.pid_key, DEFAULT_PID_KEY)
    }

    pub(crate) fn resolved_caller_skip(&self) -> usize {
        if self.caller_skip == 0 {
            DEFAULT_CALLER_SKIP
        } else {
            self.caller_skip
        }
    }
}

fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_owned()
    } else {
        value.to_owned()
    }
}

impl fmt::Debug for HandlerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerOptions")
            .field("format", &self.format)
            .field("level", &self.level)
            .field("add_source", &self.add_source)
            .field("source_key", &self.source_key)
            .field("caller_skip", &self.caller_skip)
            .field("with_pid", &self.with_pid)
            .field("pid_key", &self.pid_key)
            .field("extra_attrs", &self.extra_attrs)
            .field("extractor", &self.extractor.is_some())
            .finish_non_exhaustive()
    }
}
