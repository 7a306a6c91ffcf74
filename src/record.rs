use crate::attr::Attr;
use crate::level::Severity;
use chrono::{DateTime, Utc};
use std::fmt;
use std::panic::Location;

/// Source location of a logging call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    file: &'static str,
    line: u32,
}

impl CallSite {
    pub const fn new(file: &'static str, line: u32) -> Self {
        CallSite { file, line }
    }

    /// Location of the caller of the enclosing `#[track_caller]` chain.
    #[track_caller]
    pub fn caller() -> Self {
        Location::caller().into()
    }

    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

impl From<&'static Location<'static>> for CallSite {
    fn from(location: &'static Location<'static>) -> Self {
        CallSite::new(location.file(), location.line())
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One logging event as handed to the pipeline.
///
/// Attributes can only be appended; stages never remove or reorder what
/// the caller supplied.
#[derive(Debug, Clone)]
pub struct Record {
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    pub message: String,
    pub call_site: Option<CallSite>,
    attrs: Vec<Attr>,
}

impl Record {
    pub fn new(severity: Severity, message: impl Into<String>, call_site: Option<CallSite>) -> Self {
        Record {
            timestamp: Utc::now(),
            severity,
            message: message.into(),
            call_site,
            attrs: Vec::new(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn add_attrs(&mut self, attrs: impl IntoIterator<Item = Attr>) {
        self.attrs.extend(attrs);
    }

    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    pub fn num_attrs(&self) -> usize {
        self.attrs.len()
    }
}
