//! A single log emission

use std::borrow::Cow;
use std::fmt;

use time::OffsetDateTime;

use crate::attr::Attr;
use crate::level::Level;

/// Source location of a log call site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Source file path
    pub file: Cow<'static, str>,
    /// 1-based line number
    pub line: u32,
}

impl Location {
    /// Create a location
    pub fn new(file: impl Into<Cow<'static, str>>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Location of the caller of the function this is invoked from
    #[track_caller]
    pub fn caller() -> Self {
        let location = std::panic::Location::caller();
        Self::new(location.file(), location.line())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Log record: level, message, timestamp and ordered attributes.
///
/// Built fresh for every emit call. Handlers only append to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Creation time (UTC)
    pub time: OffsetDateTime,
    /// Severity
    pub level: Level,
    /// Message text
    pub message: String,
    attrs: Vec<Attr>,
    location: Option<Location>,
}

impl Record {
    /// Create a record stamped with the current time
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            time: OffsetDateTime::now_utc(),
            level,
            message: message.into(),
            attrs: Vec::new(),
            location: None,
        }
    }

    /// Replace the timestamp
    #[must_use]
    pub fn with_time(mut self, time: OffsetDateTime) -> Self {
        self.time = time;
        self
    }

    /// Append attributes
    #[must_use]
    pub fn with_attrs(mut self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        self.attrs.extend(attrs);
        self
    }

    /// Attach an explicit call-site location.
    ///
    /// A handler that adds source information uses this instead of walking
    /// the stack.
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Append one attribute
    pub fn add_attr(&mut self, attr: Attr) {
        self.attrs.push(attr);
    }

    /// Append attributes, keeping their order
    pub fn add_attrs(&mut self, attrs: impl IntoIterator<Item = Attr>) {
        self.attrs.extend(attrs);
    }

    /// Attributes in insertion order
    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    /// Explicit call-site location, if one was attached
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_in_order() {
        let mut record = Record::new(Level::Info, "hello").with_attrs([Attr::int("a", 1)]);
        record.add_attr(Attr::int("b", 2));
        record.add_attrs([Attr::int("c", 3), Attr::int("d", 4)]);

        let keys: Vec<_> = record.attrs().iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, ["a", "b", "c", "d"]);
    }

    #[test]
    fn caller_location_points_here() {
        let location = Location::caller();
        assert!(location.file.ends_with("record.rs"));
        assert!(location.to_string().starts_with(location.file.as_ref()));
    }
}
