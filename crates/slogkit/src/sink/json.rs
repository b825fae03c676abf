//! JSON line encoding

use serde::ser::{Serialize, SerializeMap, Serializer};
use time::format_description::well_known::Rfc3339;

use super::{LEVEL_KEY, MESSAGE_KEY, Segment, TIME_KEY, has_content};
use crate::attr::{Attr, write_entries};
use crate::core::LogResult;
use crate::record::Record;

pub(super) fn encode(record: &Record, segments: &[Segment]) -> LogResult<Vec<u8>> {
    let time = record.time.format(&Rfc3339)?;
    let line = Line {
        time: &time,
        record,
        segments,
    };

    let mut buf = serde_json::to_vec(&line)?;
    buf.push(b'\n');
    Ok(buf)
}

struct Line<'a> {
    time: &'a str,
    record: &'a Record,
    segments: &'a [Segment],
}

impl Serialize for Line<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(TIME_KEY, self.time)?;
        map.serialize_entry(LEVEL_KEY, self.record.level.as_str())?;
        map.serialize_entry(MESSAGE_KEY, &self.record.message)?;
        write_scope(&mut map, self.segments, self.record.attrs())?;
        map.end()
    }
}

/// Entries of one nesting level: baked attributes until the next group,
/// then that group as a nested object, then the record's own attributes at
/// the innermost level.
fn write_scope<M: SerializeMap>(
    map: &mut M,
    segments: &[Segment],
    record_attrs: &[Attr],
) -> Result<(), M::Error> {
    for (i, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Attrs(attrs) => write_entries(map, attrs)?,
            Segment::Group(name) => {
                let rest = &segments[i + 1..];
                if has_content(rest, record_attrs) {
                    map.serialize_entry(name, &Scope { segments: rest, record_attrs })?;
                }
                return Ok(());
            }
        }
    }
    write_entries(map, record_attrs)
}

struct Scope<'a> {
    segments: &'a [Segment],
    record_attrs: &'a [Attr],
}

impl Serialize for Scope<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        write_scope(&mut map, self.segments, self.record_attrs)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use pretty_assertions::assert_eq;
    use time::macros::datetime;

    fn line(record: &Record, segments: &[Segment]) -> String {
        String::from_utf8(encode(record, segments).unwrap()).unwrap()
    }

    fn record() -> Record {
        Record::new(Level::Warn, "disk \"low\"").with_time(datetime!(2024-05-01 12:00:00.5 UTC))
    }

    #[test]
    fn nests_record_attrs_under_open_groups() {
        let segments = [
            Segment::Attrs(vec![Attr::int("pid", 42)]),
            Segment::Group("http".into()),
            Segment::Attrs(vec![Attr::string("method", "GET")]),
            Segment::Group("resp".into()),
        ];
        let record = record().with_attrs([Attr::uint("status", 507)]);

        assert_eq!(
            line(&record, &segments),
            concat!(
                r#"{"time":"2024-05-01T12:00:00.5Z","level":"WARN","msg":"disk \"low\"","#,
                r#""pid":42,"http":{"method":"GET","resp":{"status":507}}}"#,
                "\n"
            )
        );
    }

    #[test]
    fn omits_groups_without_content() {
        let segments = [
            Segment::Attrs(vec![Attr::bool("static", true)]),
            Segment::Group("g".into()),
        ];

        assert_eq!(
            line(&record(), &segments),
            concat!(
                r#"{"time":"2024-05-01T12:00:00.5Z","level":"WARN","msg":"disk \"low\"","#,
                r#""static":true}"#,
                "\n"
            )
        );
    }

    #[test]
    fn keeps_duplicate_keys() {
        let record = record().with_attrs([Attr::int("k", 1), Attr::int("k", 2)]);
        assert!(line(&record, &[]).contains(r#""k":1,"k":2"#));
    }
}
