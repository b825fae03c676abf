//! Logger front-end over a [`Handler`]

use std::fmt;
use std::sync::Arc;

use crate::attr::Attr;
use crate::context::Context;
use crate::core::LogResult;
use crate::handler::Handler;
use crate::level::Level;
use crate::record::Record;

/// Cheap-to-clone logger that builds records and hands them to a handler.
///
/// Every public logging method calls the handler at the same stack depth,
/// which is what the default caller skip of a
/// [`ContextHandler`](crate::ContextHandler) expects: the handler's emit
/// frame, this logger's internal emit frame, the public method, the caller.
#[derive(Clone)]
pub struct Logger {
    handler: Arc<dyn Handler>,
}

impl Logger {
    /// Logger over `handler`.
    ///
    /// Accepts the crate's handlers by value and shared handlers as
    /// `Arc<dyn Handler>` or `Box<dyn Handler>`. A shared handler is stored
    /// as is, never behind another forwarding layer, so the call depth seen
    /// by caller-location resolution stays fixed.
    pub fn new(handler: impl Into<Arc<dyn Handler>>) -> Self {
        Self {
            handler: handler.into(),
        }
    }

    /// The underlying handler
    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    /// Whether records at `level` would be written
    pub fn enabled(&self, level: Level) -> bool {
        self.handler.enabled(level)
    }

    /// Logger whose records always carry `attrs`
    #[must_use]
    pub fn with(&self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        Self {
            handler: self.handler.with_attrs(attrs.into_iter().collect()),
        }
    }

    /// Logger whose attributes nest under `name`
    #[must_use]
    pub fn with_group(&self, name: &str) -> Self {
        Self {
            handler: self.handler.with_group(name),
        }
    }

    /// Log with the background context
    #[inline(never)]
    pub fn log(
        &self,
        level: Level,
        message: impl Into<String>,
        attrs: impl IntoIterator<Item = Attr>,
    ) -> LogResult<()> {
        self.emit(&Context::background(), level, message.into(), attrs)
    }

    /// Log with an explicit request context
    #[inline(never)]
    pub fn log_ctx(
        &self,
        ctx: &Context,
        level: Level,
        message: impl Into<String>,
        attrs: impl IntoIterator<Item = Attr>,
    ) -> LogResult<()> {
        self.emit(ctx, level, message.into(), attrs)
    }

    /// Log at trace level
    #[inline(never)]
    pub fn trace(&self, message: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) -> LogResult<()> {
        self.emit(&Context::background(), Level::Trace, message.into(), attrs)
    }

    /// Log at debug level
    #[inline(never)]
    pub fn debug(&self, message: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) -> LogResult<()> {
        self.emit(&Context::background(), Level::Debug, message.into(), attrs)
    }

    /// Log at info level
    #[inline(never)]
    pub fn info(&self, message: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) -> LogResult<()> {
        self.emit(&Context::background(), Level::Info, message.into(), attrs)
    }

    /// Log at warn level
    #[inline(never)]
    pub fn warn(&self, message: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) -> LogResult<()> {
        self.emit(&Context::background(), Level::Warn, message.into(), attrs)
    }

    /// Log at error level
    #[inline(never)]
    pub fn error(&self, message: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) -> LogResult<()> {
        self.emit(&Context::background(), Level::Error, message.into(), attrs)
    }

    #[inline(never)]
    fn emit(
        &self,
        ctx: &Context,
        level: Level,
        message: String,
        attrs: impl IntoIterator<Item = Attr>,
    ) -> LogResult<()> {
        if !self.handler.enabled(level) {
            return Ok(());
        }
        let record = Record::new(level, message).with_attrs(attrs);
        self.handler.as_ref().handle(ctx, record)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}
