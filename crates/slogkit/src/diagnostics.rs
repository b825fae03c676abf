//! Side channel for failures the handler recovers from
//!
//! A failing context extractor must not fail the emit call and must not be
//! logged through the handler that is in the middle of emitting. The handler
//! reports it here instead. The default is [`NoopDiagnostics`].

use std::io::Write;

use crate::core::ExtractError;

/// Receives recovered handler failures
pub trait Diagnostics: Send + Sync {
    /// A context extractor failed; the record was emitted without its attributes
    fn extraction_failed(&self, error: &ExtractError);
}

impl<F> Diagnostics for F
where
    F: Fn(&ExtractError) + Send + Sync,
{
    fn extraction_failed(&self, error: &ExtractError) {
        self(error);
    }
}

/// Drops every diagnostic
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn extraction_failed(&self, _error: &ExtractError) {}
}

/// Writes one line per diagnostic to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrDiagnostics;

impl Diagnostics for StderrDiagnostics {
    fn extraction_failed(&self, error: &ExtractError) {
        let _ = writeln!(
            std::io::stderr().lock(),
            "slogkit: failed to append attributes from context: {error}"
        );
    }
}

/// Emits diagnostics as `tracing` events.
///
/// Only safe when the handler reporting here is not itself the subscriber
/// behind the `tracing` dispatcher; use [`StderrDiagnostics`] for the handler
/// installed by [`init`](crate::init).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn extraction_failed(&self, error: &ExtractError) {
        tracing::error!(error = %error, "failed to append attributes from context");
    }
}
