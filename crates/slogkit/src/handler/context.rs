//! Context-enriching handler decorator

use std::sync::Arc;

use tracing_subscriber::fmt::writer::BoxMakeWriter;

use super::Handler;
use super::options::HandlerOptions;
use super::source::resolve_caller;
use crate::attr::Attr;
use crate::context::Context;
use crate::core::LogResult;
use crate::diagnostics::{Diagnostics, NoopDiagnostics};
use crate::extract::ContextExtractor;
use crate::level::Level;
use crate::record::Record;
use crate::sink::FormatSink;

/// Enrichment settings shared, unchanged, by every derived handler
struct Enrichment {
    add_source: bool,
    source_key: String,
    caller_skip: usize,
    extractor: Option<Arc<dyn ContextExtractor>>,
    diagnostics: Arc<dyn Diagnostics>,
}

/// Handler decorator that enriches records before delegating.
///
/// Per record, in order:
/// 1. with `add_source`, appends `"<file>:<line>"` of the call site (the
///    record's explicit location if it has one, otherwise `caller_skip`
///    frames up the stack); omitted when it cannot be resolved;
/// 2. for a non-background context, appends the extractor's attributes; an
///    extractor error goes to the diagnostics sink and the record is written
///    without them;
/// 3. delegates to the wrapped handler and returns its result.
///
/// The process id and extra attributes are baked into the wrapped handler
/// once, at construction. [`Handler::with_attrs`] and [`Handler::with_group`]
/// return new `ContextHandler`s, so enrichment survives any chain of
/// derivations.
///
/// ```rust
/// use slogkit::{Attr, Context, ContextFields, ContextHandler, Handler, HandlerOptions, Level, MemoryWriter, Record};
///
/// let out = MemoryWriter::new();
/// let handler = ContextHandler::new(
///     HandlerOptions::new().json().writer(out.clone()).extractor(ContextFields),
/// );
///
/// let ctx = Context::new().with_request_id("req-7");
/// handler.handle(&ctx, Record::new(Level::Info, "charged card")).unwrap();
/// assert!(out.contents().contains(r#""request_id":"req-7""#));
/// ```
#[derive(Clone)]
pub struct ContextHandler {
    inner: Arc<dyn Handler>,
    enrichment: Arc<Enrichment>,
}

impl ContextHandler {
    /// Build a [`FormatSink`] from `options` and wrap it
    pub fn new(mut options: HandlerOptions) -> Self {
        let writer = options
            .writer
            .take()
            .unwrap_or_else(|| BoxMakeWriter::new(std::io::stdout));
        let sink = FormatSink::from_boxed(options.format, options.level, writer);
        Self::wrap(sink, options)
    }

    /// Wrap an existing handler.
    ///
    /// Format, level and writer in `options` are ignored; they belong to the
    /// wrapped handler.
    pub fn wrap(inner: impl Handler + 'static, options: HandlerOptions) -> Self {
        let mut inner: Arc<dyn Handler> = Arc::new(inner);

        if options.with_pid {
            let pid = Attr::int(options.resolved_pid_key(), i64::from(std::process::id()));
            inner = inner.with_attrs(vec![pid]);
        }
        if !options.extra_attrs.is_empty() {
            inner = inner.with_attrs(options.extra_attrs.clone());
        }

        let enrichment = Enrichment {
            add_source: options.add_source,
            source_key: options.resolved_source_key(),
            caller_skip: options.resolved_caller_skip(),
            extractor: options.extractor,
            diagnostics: options
                .diagnostics
                .unwrap_or_else(|| Arc::new(NoopDiagnostics)),
        };

        Self {
            inner,
            enrichment: Arc::new(enrichment),
        }
    }

    /// New handler over `inner.with_attrs(attrs)`; enrichment unchanged
    pub fn derive_with_attrs(&self, attrs: Vec<Attr>) -> Self {
        Self {
            inner: self.inner.with_attrs(attrs),
            enrichment: Arc::clone(&self.enrichment),
        }
    }

    /// New handler over `inner.with_group(name)`; enrichment unchanged
    pub fn derive_with_group(&self, name: &str) -> Self {
        Self {
            inner: self.inner.with_group(name),
            enrichment: Arc::clone(&self.enrichment),
        }
    }

    /// The wrapped handler
    pub fn inner(&self) -> &Arc<dyn Handler> {
        &self.inner
    }

    #[inline(never)]
    fn append_source(&self, record: &mut Record) {
        let location = match record.location() {
            Some(location) => Some(location.clone()),
            // depth 0 of the walk is this frame, `handle` is depth 1
            None => resolve_caller(self.enrichment.caller_skip.saturating_add(1)),
        };

        if let Some(location) = location {
            record.add_attr(Attr::string(
                self.enrichment.source_key.clone(),
                location.to_string(),
            ));
        }
    }

    fn append_context(&self, ctx: &Context, record: &mut Record) {
        let Some(extractor) = &self.enrichment.extractor else {
            return;
        };

        match extractor.extract(ctx) {
            Ok(attrs) => record.add_attrs(attrs),
            Err(error) => self.enrichment.diagnostics.extraction_failed(&error),
        }
    }
}

impl From<ContextHandler> for Arc<dyn Handler> {
    fn from(handler: ContextHandler) -> Self {
        Arc::new(handler)
    }
}

impl Handler for ContextHandler {
    fn enabled(&self, level: Level) -> bool {
        self.inner.enabled(level)
    }

    #[inline(never)]
    fn handle(&self, ctx: &Context, mut record: Record) -> LogResult<()> {
        if !self.inner.enabled(record.level) {
            return Ok(());
        }

        if self.enrichment.add_source {
            self.append_source(&mut record);
        }

        if !ctx.is_background() {
            self.append_context(ctx, &mut record);
        }

        self.inner.handle(ctx, record)
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        Arc::new(self.derive_with_attrs(attrs))
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        Arc::new(self.derive_with_group(name))
    }
}

impl std::fmt::Debug for ContextHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextHandler")
            .field("add_source", &self.enrichment.add_source)
            .field("source_key", &self.enrichment.source_key)
            .field("caller_skip", &self.enrichment.caller_skip)
            .field("extractor", &self.enrichment.extractor.is_some())
            .finish_non_exhaustive()
    }
}
