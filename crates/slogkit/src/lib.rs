//! # slogkit - context-enriching structured logging
//!
//! A [`ContextHandler`] wraps any [`Handler`] and, for every record, adds the
//! caller location, the process id, static attributes and attributes derived
//! from the request [`Context`] before handing the record on. The terminal
//! [`FormatSink`] writes one JSON or `key=value` line per record.
//!
//! ## Quick Start
//!
//! ```rust
//! use slogkit::{Attr, Context, ContextFields, ContextHandler, HandlerOptions, Level, Logger, MemoryWriter};
//!
//! let out = MemoryWriter::new();
//! let handler = ContextHandler::new(
//!     HandlerOptions::new()
//!         .json()
//!         .writer(out.clone())
//!         .with_pid()
//!         .extractor(ContextFields),
//! );
//! let log = Logger::new(handler).with([Attr::string("service", "billing")]);
//!
//! let ctx = Context::new().with_request_id("req-42");
//! log.log_ctx(&ctx, Level::Info, "invoice sent", [Attr::uint("amount", 1200)])?;
//!
//! let line = out.contents();
//! assert!(line.contains(r#""service":"billing""#));
//! assert!(line.contains(r#""request_id":"req-42""#));
//! # Ok::<(), slogkit::LogError>(())
//! ```
//!
//! ## Global installation
//!
//! [`init_with`] builds the handler from a [`Config`] and installs it behind
//! the `tracing` macros, reading the request context from
//! [`Context::current()`].
//!
//! ## Features
//!
//! - `async` (default): ambient context stored in a `tokio` task-local
//! - `file`: file writers via `tracing-appender`

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod attr;
mod builder;
mod config;
mod context;
mod diagnostics;
mod extract;
mod layer;
mod level;
mod logger;
mod record;
mod sink;
mod writer;

pub mod core;
pub mod handler;

// Public API
pub use attr::{Attr, Value};
pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, Fields, Format, PidConfig, SourceConfig, WriterConfig};
pub use context::Context;
pub use crate::core::{ExtractError, LogError, LogResult};
pub use diagnostics::{Diagnostics, NoopDiagnostics, StderrDiagnostics, TracingDiagnostics};
pub use extract::{ContextExtractor, ContextFields};
pub use handler::{
    ContextHandler, DEFAULT_CALLER_SKIP, DEFAULT_PID_KEY, DEFAULT_SOURCE_KEY, Handler,
    HandlerOptions,
};
pub use layer::HandlerLayer;
pub use level::Level;
pub use logger::Logger;
pub use record::{Location, Record};
pub use sink::{FormatSink, LEVEL_KEY, MESSAGE_KEY, TIME_KEY};
pub use writer::{MemoryWriter, WriterGuards};

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Attr, Context, ContextExtractor, ContextHandler, Handler, HandlerOptions, Level, LogResult,
        Logger, Record, init, init_with,
    };

    pub use tracing::{debug, error, info, trace, warn};
}

// ============================================================================
// Initialization Functions
// ============================================================================

/// Install the global subscriber with [`Config::from_env`]
pub fn init() -> LogResult<LoggerGuard> {
    init_with(Config::from_env())
}

/// Install the global subscriber with `config`
pub fn init_with(config: Config) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}

/// Install the global subscriber with `config`, enriching records with what
/// `extractor` derives from [`Context::current()`]
pub fn init_with_extractor(
    config: Config,
    extractor: impl ContextExtractor + 'static,
) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config)
        .with_extractor(extractor)
        .build()
}
