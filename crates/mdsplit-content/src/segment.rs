//! Section segmentation.
//!
//! [`Segmenter`] applies an ordered list of [`SegmentRule`]s to a read-only
//! document. Each rule is independent: rules never see each other's output,
//! so their order only affects the order of the returned outcomes and of
//! the files written.

use std::ops::Range;
use std::path::{Path, PathBuf};

use mdsplit_core::util::{files, paths};
use mdsplit_core::Result;

use crate::locator::{LiteralLocator, SectionLocator};
use crate::rule::SegmentRule;

/// Separator placed between a rule's header and the segment body.
pub const SEPARATOR: &str = "\n\n---\n\n";

/// A located span of the source document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment<'a> {
    /// Rule that produced the segment.
    pub rule_id: &'a str,
    /// Raw byte range in the document, before trimming.
    pub span: Range<usize>,
    /// Whitespace-trimmed body.
    pub body: &'a str,
}

/// A rendered output file, ready to be written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputFile {
    /// Rule that produced the file.
    pub rule_id: String,
    /// Destination relative to the output root.
    pub destination: PathBuf,
    /// Full file contents: header, separator, body.
    pub contents: String,
}

/// A rule that produced no output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedRule {
    /// Rule that was skipped.
    pub rule_id: String,
    /// Start marker that was not found.
    pub missing_marker: String,
}

/// Result of applying one rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SegmentOutcome {
    /// The rule matched and produced a file.
    Emitted(OutputFile),
    /// The start marker was absent; nothing was produced.
    Skipped(SkippedRule),
}

impl SegmentOutcome {
    /// Identifier of the rule this outcome belongs to.
    pub fn rule_id(&self) -> &str {
        match self {
            Self::Emitted(file) => &file.rule_id,
            Self::Skipped(skip) => &skip.rule_id,
        }
    }

    /// The emitted file, if any.
    pub fn output(&self) -> Option<&OutputFile> {
        match self {
            Self::Emitted(file) => Some(file),
            Self::Skipped(_) => None,
        }
    }

    /// Returns true if the rule was skipped.
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

/// Render an output file's contents from a header and a body.
pub fn render_output(header: &str, body: &str) -> String {
    let mut out = String::with_capacity(header.len() + SEPARATOR.len() + body.len());
    out.push_str(header);
    out.push_str(SEPARATOR);
    out.push_str(body);
    out
}

/// Applies segment rules to documents.
#[derive(Clone, Debug, Default)]
pub struct Segmenter<L = LiteralLocator> {
    locator: L,
}

impl Segmenter {
    /// Create a segmenter using literal substring markers.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L: SectionLocator> Segmenter<L> {
    /// Create a segmenter with a custom locator.
    pub fn with_locator(locator: L) -> Self {
        Self { locator }
    }

    /// Locate the segment for a single rule.
    pub fn extract<'a>(&self, document: &'a str, rule: &'a SegmentRule) -> Option<Segment<'a>> {
        let span = self.locator.locate(document, rule)?;
        let body = document[span.clone()].trim();
        Some(Segment {
            rule_id: &rule.id,
            span,
            body,
        })
    }

    /// Apply every rule to `document`, in order, without touching the
    /// filesystem.
    pub fn segment(&self, document: &str, rules: &[SegmentRule]) -> Vec<SegmentOutcome> {
        rules
            .iter()
            .map(|rule| match self.extract(document, rule) {
                Some(segment) => {
                    log::debug!(
                        "rule '{}' matched bytes {}..{}",
                        rule.id,
                        segment.span.start,
                        segment.span.end
                    );
                    SegmentOutcome::Emitted(OutputFile {
                        rule_id: rule.id.clone(),
                        destination: rule.destination.clone(),
                        contents: render_output(&rule.header, segment.body),
                    })
                }
                None => {
                    log::warn!(
                        "skipping rule '{}': start marker {:?} not found",
                        rule.id,
                        rule.start
                    );
                    SegmentOutcome::Skipped(SkippedRule {
                        rule_id: rule.id.clone(),
                        missing_marker: rule.start.clone(),
                    })
                }
            })
            .collect()
    }

    /// Apply every rule and write each emitted file under `output_root`.
    ///
    /// Stops at the first I/O failure; files written before it stay on disk.
    pub async fn write(
        &self,
        document: &str,
        rules: &[SegmentRule],
        output_root: &Path,
    ) -> Result<Vec<SegmentOutcome>> {
        let outcomes = self.segment(document, rules);
        for outcome in &outcomes {
            if let SegmentOutcome::Emitted(file) = outcome {
                write_output(output_root, file).await?;
            }
        }
        Ok(outcomes)
    }
}

/// Write one output file under `output_root`, returning its full path.
pub async fn write_output(output_root: &Path, file: &OutputFile) -> Result<PathBuf> {
    let path = paths::resolve_destination(output_root, &file.destination)?;
    files::write_file(&path, &file.contents).await?;
    log::info!("wrote {}", path.display());
    Ok(path)
}
