//! Bridge from `tracing` events to a [`Handler`]

use std::fmt;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context as LayerContext, Layer};

use crate::attr::Attr;
use crate::context::Context;
use crate::handler::Handler;
use crate::level::Level;
use crate::record::{Location, Record};

/// Layer that turns every `tracing` event into a [`Record`].
///
/// The `message` field becomes the record message and the other fields
/// become attributes, in declaration order. The event's file and line are
/// attached as the record's explicit location, and the ambient
/// [`Context::current()`] is passed as the request context. Write errors are
/// dropped: a layer has no way to report them to the event's call site.
pub struct HandlerLayer<H> {
    handler: H,
}

impl<H: Handler> HandlerLayer<H> {
    /// Layer dispatching to `handler`
    pub fn new(handler: H) -> Self {
        Self { handler }
    }
}

impl<H> fmt::Debug for HandlerLayer<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerLayer").finish_non_exhaustive()
    }
}

impl<S, H> Layer<S> for HandlerLayer<H>
where
    S: Subscriber,
    H: Handler + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: LayerContext<'_, S>) {
        let metadata = event.metadata();
        let level = Level::from(*metadata.level());
        if !self.handler.enabled(level) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let mut record = Record::new(level, visitor.message).with_attrs(visitor.attrs);
        if let (Some(file), Some(line)) = (metadata.file(), metadata.line()) {
            record = record.with_location(Location::new(file, line));
        }

        let ctx = Context::current();
        let _ = self.handler.handle(&ctx, record);
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    attrs: Vec<Attr>,
}

impl Visit for FieldVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.attrs.push(Attr::float(field.name(), value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.attrs.push(Attr::int(field.name(), value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.attrs.push(Attr::uint(field.name(), value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.attrs.push(Attr::bool(field.name(), value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_owned();
        } else {
            self.attrs.push(Attr::string(field.name(), value));
        }
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.attrs.push(Attr::string(field.name(), value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.attrs.push(Attr::string(field.name(), format!("{value:?}")));
        }
    }
}
