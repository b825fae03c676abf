//! `key=value` line encoding
//!
//! Grouped keys are joined with dots. Values are quoted when they are empty
//! or contain whitespace, `=`, `"` or control characters.

use time::format_description::well_known::Rfc3339;

use super::{LEVEL_KEY, MESSAGE_KEY, Segment, TIME_KEY, has_content};
use crate::attr::{Attr, Value};
use crate::core::LogResult;
use crate::record::Record;

pub(super) fn encode(record: &Record, segments: &[Segment]) -> LogResult<Vec<u8>> {
    let mut line = String::with_capacity(128);
    let time = record.time.format(&Rfc3339)?;

    write_pair(&mut line, "", TIME_KEY, &time);
    write_pair(&mut line, "", LEVEL_KEY, record.level.as_str());
    write_pair(&mut line, "", MESSAGE_KEY, &record.message);

    let mut prefix = String::new();
    for (i, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Attrs(attrs) => write_attrs(&mut line, &prefix, attrs),
            Segment::Group(name) => {
                if !has_content(&segments[i + 1..], record.attrs()) {
                    break;
                }
                prefix.push_str(name);
                prefix.push('.');
            }
        }
    }
    write_attrs(&mut line, &prefix, record.attrs());

    line.push('\n');
    Ok(line.into_bytes())
}

fn write_attrs(line: &mut String, prefix: &str, attrs: &[Attr]) {
    for attr in attrs {
        if attr.is_empty() {
            continue;
        }
        match &attr.value {
            Value::Group(members) if attr.key.is_empty() => write_attrs(line, prefix, members),
            Value::Group(members) => {
                let nested = format!("{prefix}{}.", attr.key);
                write_attrs(line, &nested, members);
            }
            Value::String(s) => write_pair(line, prefix, &attr.key, s),
            other => write_pair(line, prefix, &attr.key, &other.to_string()),
        }
    }
}

fn write_pair(line: &mut String, prefix: &str, key: &str, value: &str) {
    if !line.is_empty() {
        line.push(' ');
    }
    let key = format!("{prefix}{key}");
    write_quoted(line, &key);
    line.push('=');
    write_quoted(line, value);
}

fn write_quoted(line: &mut String, s: &str) {
    if needs_quoting(s) {
        line.push_str(&format!("{s:?}"));
    } else {
        line.push_str(s);
    }
}

fn needs_quoting(s: &str) -> bool {
    s.is_empty()
        || s.chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '=' || c == '"')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use time::macros::datetime;

    fn line(record: &Record, segments: &[Segment]) -> String {
        String::from_utf8(encode(record, segments).unwrap()).unwrap()
    }

    #[rstest]
    #[case("plain", false)]
    #[case("", true)]
    #[case("two words", true)]
    #[case("a=b", true)]
    #[case("say \"hi\"", true)]
    #[case("tab\there", true)]
    #[case("/src/main.rs:12", false)]
    fn quoting_rules(#[case] input: &str, #[case] quoted: bool) {
        assert_eq!(needs_quoting(input), quoted);
    }

    #[test]
    fn dots_grouped_keys() {
        let segments = [
            Segment::Attrs(vec![Attr::string("service", "api")]),
            Segment::Group("req".into()),
        ];
        let record = Record::new(Level::Info, "served request")
            .with_time(datetime!(2024-05-01 12:00:00 UTC))
            .with_attrs([
                Attr::uint("status", 200),
                Attr::group("client", [Attr::string("ip", "10.0.0.1")]),
            ]);

        assert_eq!(
            line(&record, &segments),
            "time=2024-05-01T12:00:00Z level=INFO msg=\"served request\" service=api \
             req.status=200 req.client.ip=10.0.0.1\n"
        );
    }

    #[test]
    fn quotes_values_and_escapes_inner_quotes() {
        let record = Record::new(Level::Warn, "")
            .with_time(datetime!(2024-05-01 12:00:00 UTC))
            .with_attrs([Attr::string("reply", "say \"hi\"")]);

        assert_eq!(
            line(&record, &[]),
            "time=2024-05-01T12:00:00Z level=WARN msg=\"\" reply=\"say \\\"hi\\\"\"\n"
        );
    }

    #[test]
    fn drops_trailing_empty_group() {
        let segments = [Segment::Group("req".into())];
        let record = Record::new(Level::Error, "boom").with_time(datetime!(2024-05-01 12:00:00 UTC));

        assert_eq!(
            line(&record, &segments),
            "time=2024-05-01T12:00:00Z level=ERROR msg=boom\n"
        );
    }
}
