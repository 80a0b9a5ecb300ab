//! Segment rules: which span of the source document goes where.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where a segment stops.
///
/// A rule without an end marker captures to the end of the document. A
/// [`EndMarker::FirstOf`] list is tried in order; the first candidate that
/// occurs after the start marker wins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EndMarker {
    /// A single literal end marker.
    Single(String),
    /// Ordered fallback candidates.
    FirstOf(Vec<String>),
}

impl EndMarker {
    /// Iterate the candidate markers in priority order.
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Self::Single(marker) => std::slice::from_ref(marker),
            Self::FirstOf(markers) => markers,
        };
        slice.iter().map(String::as_str)
    }
}

impl From<&str> for EndMarker {
    fn from(marker: &str) -> Self {
        Self::Single(marker.to_string())
    }
}

/// One segmentation rule.
///
/// `destination` is relative to the output root. Uniqueness of destinations
/// across a rule list is the caller's responsibility; a later rule writing
/// the same destination overwrites the earlier one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentRule {
    /// Stable identifier, used in logs and skip reports.
    pub id: String,
    /// Literal marker that opens the segment (included in the body).
    pub start: String,
    /// Marker(s) that close the segment (excluded from the body).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EndMarker>,
    /// Output path relative to the output root.
    pub destination: PathBuf,
    /// Text written above the separator in the output file.
    #[serde(default)]
    pub header: String,
    /// One-line description, used for default headers and the orchestrator index.
    #[serde(default)]
    pub description: String,
}

impl SegmentRule {
    /// Create a rule that captures from `start` to the end of the document.
    pub fn new(
        id: impl Into<String>,
        start: impl Into<String>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: id.into(),
            start: start.into(),
            end: None,
            destination: destination.into(),
            header: String::new(),
            description: String::new(),
        }
    }

    /// Stop the segment at `end`.
    pub fn until(mut self, end: impl Into<String>) -> Self {
        self.end = Some(EndMarker::Single(end.into()));
        self
    }

    /// Stop the segment at the first of `candidates` found after the start.
    pub fn until_first_of<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.end = Some(EndMarker::FirstOf(
            candidates.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Set the header text.
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Destination rendered with forward slashes, as it appears in headers.
    pub fn destination_display(&self) -> String {
        self.destination.to_string_lossy().replace('\\', "/")
    }
}
