//! Terminal sink: formats records as JSON or text lines and writes them
//!
//! The sink keeps everything derived via [`Handler::with_attrs`] and
//! [`Handler::with_group`] as an ordered list of segments. Attributes added
//! after a group was opened belong to that group, and so do the record's own
//! attributes.

mod json;
mod text;

use std::io::Write;
use std::sync::Arc;

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::attr::Attr;
use crate::config::Format;
use crate::context::Context;
use crate::core::LogResult;
use crate::handler::Handler;
use crate::level::Level;
use crate::record::Record;

/// Key of the timestamp entry
pub const TIME_KEY: &str = "time";
/// Key of the level entry
pub const LEVEL_KEY: &str = "level";
/// Key of the message entry
pub const MESSAGE_KEY: &str = "msg";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Segment {
    Attrs(Vec<Attr>),
    Group(String),
}

/// Formats records and writes one line per record
#[derive(Clone)]
pub struct FormatSink {
    format: Format,
    level: Level,
    writer: Arc<BoxMakeWriter>,
    segments: Arc<[Segment]>,
}

impl FormatSink {
    /// Create a sink writing `format` lines at or above `level`
    pub fn new<W>(format: Format, level: Level, writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        Self::from_boxed(format, level, BoxMakeWriter::new(writer))
    }

    pub(crate) fn from_boxed(format: Format, level: Level, writer: BoxMakeWriter) -> Self {
        Self {
            format,
            level,
            writer: Arc::new(writer),
            segments: Arc::from(Vec::new()),
        }
    }

    /// Sink with `segment` appended; the receiver is untouched
    fn derive(&self, segment: Segment) -> Self {
        let mut segments = self.segments.to_vec();
        segments.push(segment);
        Self {
            segments: segments.into(),
            ..self.clone()
        }
    }

    /// Encode one line, newline included
    pub(crate) fn encode(&self, record: &Record) -> LogResult<Vec<u8>> {
        match self.format {
            Format::Json => json::encode(record, &self.segments),
            Format::Text => text::encode(record, &self.segments),
        }
    }
}

impl std::fmt::Debug for FormatSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatSink")
            .field("format", &self.format)
            .field("level", &self.level)
            .field("segments", &self.segments)
            .finish_non_exhaustive()
    }
}

impl From<FormatSink> for Arc<dyn Handler> {
    fn from(sink: FormatSink) -> Self {
        Arc::new(sink)
    }
}

impl Handler for FormatSink {
    fn enabled(&self, level: Level) -> bool {
        level >= self.level
    }

    fn handle(&self, _ctx: &Context, record: Record) -> LogResult<()> {
        if !self.enabled(record.level) {
            return Ok(());
        }
        let line = self.encode(&record)?;
        self.writer.make_writer().write_all(&line)?;
        Ok(())
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        if attrs.is_empty() {
            return Arc::new(self.clone());
        }
        Arc::new(self.derive(Segment::Attrs(attrs)))
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        if name.is_empty() {
            return Arc::new(self.clone());
        }
        Arc::new(self.derive(Segment::Group(name.to_owned())))
    }
}

/// Whether anything below `segments` would produce output for `record_attrs`
pub(crate) fn has_content(segments: &[Segment], record_attrs: &[Attr]) -> bool {
    record_attrs.iter().any(|a| !a.is_empty())
        || segments.iter().any(|segment| match segment {
            Segment::Attrs(attrs) => attrs.iter().any(|a| !a.is_empty()),
            Segment::Group(_) => false,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::MemoryWriter;
    use pretty_assertions::assert_eq;
    use time::macros::datetime;

    fn record(level: Level) -> Record {
        Record::new(level, "hello").with_time(datetime!(2024-05-01 12:00:00 UTC))
    }

    #[test]
    fn filters_below_minimum_level() {
        let out = MemoryWriter::new();
        let sink = FormatSink::new(Format::Text, Level::Warn, out.clone());

        assert!(!sink.enabled(Level::Info));
        assert!(sink.enabled(Level::Error));
        sink.handle(&Context::background(), record(Level::Info)).unwrap();
        assert!(out.contents().is_empty());

        sink.handle(&Context::background(), record(Level::Warn)).unwrap();
        assert_eq!(out.lines().len(), 1);
    }

    #[test]
    fn derivation_leaves_receiver_untouched() {
        let out = MemoryWriter::new();
        let sink = FormatSink::new(Format::Json, Level::Info, out.clone());
        let derived = sink.with_attrs(vec![Attr::string("static", "x")]);

        sink.handle(&Context::background(), record(Level::Info)).unwrap();
        derived.handle(&Context::background(), record(Level::Info)).unwrap();

        let lines = out.lines();
        assert_eq!(
            lines[0],
            r#"{"time":"2024-05-01T12:00:00Z","level":"INFO","msg":"hello"}"#
        );
        assert_eq!(
            lines[1],
            r#"{"time":"2024-05-01T12:00:00Z","level":"INFO","msg":"hello","static":"x"}"#
        );
    }

    #[test]
    fn unformattable_time_is_returned() {
        let out = MemoryWriter::new();
        let sink = FormatSink::new(Format::Json, Level::Info, out.clone());
        // RFC 3339 offsets carry no seconds
        let offset = time::UtcOffset::from_hms(0, 0, 30).unwrap();
        let time = datetime!(2024-05-01 12:00:00 UTC).to_offset(offset);
        let record = record(Level::Info).with_time(time);

        let err = sink.handle(&Context::background(), record).unwrap_err();

        assert!(matches!(err, crate::core::LogError::Time(_)), "{err}");
        assert!(out.contents().is_empty());
    }

    #[test]
    fn empty_group_name_is_ignored() {
        let out = MemoryWriter::new();
        let sink = FormatSink::new(Format::Text, Level::Info, out.clone()).with_group("");
        sink.handle(
            &Context::background(),
            record(Level::Info).with_attrs([Attr::int("n", 1)]),
        )
        .unwrap();

        assert!(out.contents().ends_with(" n=1\n"));
    }
}
