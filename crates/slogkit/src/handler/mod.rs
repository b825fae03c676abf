//! The handler contract and the context-enriching decorator
//!
//! - [`Handler`]: level check, emit, derive-with-attributes,
//!   derive-with-group. Implemented by the terminal
//!   [`FormatSink`](crate::FormatSink) and by [`ContextHandler`], so handlers
//!   nest by composition.
//! - [`ContextHandler`]: injects caller location, process id, static and
//!   context-derived attributes before delegating.
//! - [`HandlerOptions`]: construction-time configuration.

mod context;
mod options;
mod source;

pub use context::ContextHandler;
pub use options::{DEFAULT_CALLER_SKIP, DEFAULT_PID_KEY, DEFAULT_SOURCE_KEY, HandlerOptions};

use std::sync::Arc;

use crate::attr::Attr;
use crate::context::Context;
use crate::core::LogResult;
use crate::level::Level;
use crate::record::Record;

/// A structured log handler.
///
/// Handlers are immutable: the derivation methods return a new handler and
/// leave the receiver untouched, so a handler can be shared across threads
/// while others derive from it.
pub trait Handler: Send + Sync {
    /// Whether a record at `level` would be written
    fn enabled(&self, level: Level) -> bool;

    /// Process one record.
    ///
    /// Only write failures are returned.
    fn handle(&self, ctx: &Context, record: Record) -> LogResult<()>;

    /// Handler whose output always includes `attrs`
    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler>;

    /// Handler that nests all attributes added afterwards under `name`
    fn with_group(&self, name: &str) -> Arc<dyn Handler>;
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn enabled(&self, level: Level) -> bool {
        (**self).enabled(level)
    }

    fn handle(&self, ctx: &Context, record: Record) -> LogResult<()> {
        (**self).handle(ctx, record)
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        (**self).with_attrs(attrs)
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        (**self).with_group(name)
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn enabled(&self, level: Level) -> bool {
        (**self).enabled(level)
    }

    fn handle(&self, ctx: &Context, record: Record) -> LogResult<()> {
        (**self).handle(ctx, record)
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        (**self).with_attrs(attrs)
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        (**self).with_group(name)
    }
}
