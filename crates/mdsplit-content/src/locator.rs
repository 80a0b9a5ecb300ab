//! Locating segment spans inside a document.
//!
//! The segmenter never searches text itself; it asks a [`SectionLocator`]
//! for the byte range a rule covers. [`LiteralLocator`] is the default and
//! matches markers as plain substrings anywhere in the document.
//! [`HeadingLocator`] only accepts markers that open a markdown heading, so
//! a marker quoted in prose or inside a fenced code block is ignored.

use pulldown_cmark::{Event, Options, Parser, Tag};
use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::rule::SegmentRule;

/// Finds the span of a document covered by a rule.
pub trait SectionLocator {
    /// Return the raw (untrimmed) byte range for `rule`, or `None` when the
    /// start marker does not occur.
    ///
    /// The range starts at the first occurrence of the start marker and ends
    /// at the first end-marker candidate found at or after that position, or
    /// at the end of the document. An end marker that also matches at the
    /// start position yields an empty range.
    fn locate(&self, document: &str, rule: &SegmentRule) -> Option<Range<usize>>;
}

/// Which locator a split plan uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocatorKind {
    /// Plain substring search.
    #[default]
    Literal,
    /// Heading-anchored search.
    Heading,
}

/// First-occurrence literal substring search.
#[derive(Clone, Copy, Debug, Default)]
pub struct LiteralLocator;

impl SectionLocator for LiteralLocator {
    fn locate(&self, document: &str, rule: &SegmentRule) -> Option<Range<usize>> {
        let start = document.find(rule.start.as_str())?;
        let tail = &document[start..];

        let end = rule
            .end
            .as_ref()
            .and_then(|end| {
                end.candidates()
                    .find_map(|candidate| tail.find(candidate))
                    .map(|offset| start + offset)
            })
            .unwrap_or(document.len());

        Some(start..end)
    }
}

/// Marker search restricted to heading lines.
///
/// A marker matches a heading when the heading's source text (including the
/// `#` prefix) starts with it.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeadingLocator;

impl HeadingLocator {
    /// Byte offsets and source text of every heading, in document order.
    fn headings(document: &str) -> Vec<(usize, &str)> {
        Parser::new_ext(document, Options::empty())
            .into_offset_iter()
            .filter_map(|(event, range)| match event {
                Event::Start(Tag::Heading { .. }) => {
                    Some((range.start, document[range].trim_start()))
                }
                _ => None,
            })
            .collect()
    }
}

impl SectionLocator for HeadingLocator {
    fn locate(&self, document: &str, rule: &SegmentRule) -> Option<Range<usize>> {
        let headings = Self::headings(document);
        let start_pos = headings
            .iter()
            .position(|(_, text)| text.starts_with(rule.start.as_str()))?;
        let start = headings[start_pos].0;
        let later = &headings[start_pos..];

        let end = rule
            .end
            .as_ref()
            .and_then(|end| {
                end.candidates().find_map(|candidate| {
                    later
                        .iter()
                        .find(|(_, text)| text.starts_with(candidate))
                        .map(|(offset, _)| *offset)
                })
            })
            .unwrap_or(document.len());

        Some(start..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "## PHASE 2: X\nfoo\n## PHASE 3: Y\nbar";

    #[test]
    fn test_literal_start_and_end() {
        let rule = SegmentRule::new("p2", "## PHASE 2:", "p2.md").until("## PHASE 3:");
        let range = LiteralLocator.locate(DOC, &rule).unwrap();
        assert_eq!(&DOC[range], "## PHASE 2: X\nfoo\n");
    }

    #[test]
    fn test_literal_missing_start() {
        let rule = SegmentRule::new("p9", "## PHASE 9:", "p9.md");
        assert!(LiteralLocator.locate(DOC, &rule).is_none());
    }

    #[test]
    fn test_literal_missing_end_runs_to_eof() {
        let rule = SegmentRule::new("p2", "## PHASE 2:", "p2.md").until("## PHASE 9:");
        let range = LiteralLocator.locate(DOC, &rule).unwrap();
        assert_eq!(range.end, DOC.len());
    }

    #[test]
    fn test_literal_end_before_start_is_not_used() {
        let doc = "## END\n## START\nbody";
        let rule = SegmentRule::new("s", "## START", "s.md").until("## END");
        let range = LiteralLocator.locate(doc, &rule).unwrap();
        assert_eq!(&doc[range], "## START\nbody");
    }

    #[test]
    fn test_literal_end_matching_at_start_gives_empty_span() {
        let doc = "## PHASE 2: X\nfoo\n## PHASE 2b\nbar";
        let rule = SegmentRule::new("s", "## PHASE 2: X", "s.md").until("## PHASE 2");
        let range = LiteralLocator.locate(doc, &rule).unwrap();
        assert_eq!(range, 0..0);
    }

    #[test]
    fn test_literal_end_offset_is_relative_to_start() {
        let doc = "preamble\n## S\nbody\n## E\n";
        let rule = SegmentRule::new("s", "## S", "s.md").until("## E");
        let range = LiteralLocator.locate(doc, &rule).unwrap();
        assert_eq!(range, 9..19);
        assert_eq!(&doc[range], "## S\nbody\n");
    }

    #[test]
    fn test_heading_end_matching_at_start_gives_empty_span() {
        let rule = SegmentRule::new("p2", "## PHASE 2: X", "p2.md").until("## PHASE 2");
        let range = HeadingLocator.locate(DOC, &rule).unwrap();
        assert!(range.is_empty());
    }

    #[test]
    fn test_literal_first_of_prefers_list_order() {
        let doc = "## S\na\n## B\nb\n## A\nc";
        let rule = SegmentRule::new("s", "## S", "s.md").until_first_of(["## A", "## B"]);
        let range = LiteralLocator.locate(doc, &rule).unwrap();
        assert_eq!(&doc[range], "## S\na\n## B\nb\n");
    }

    #[test]
    fn test_literal_first_of_falls_back() {
        let doc = "## S\na\n## B\nb";
        let rule = SegmentRule::new("s", "## S", "s.md").until_first_of(["## A", "## B"]);
        let range = LiteralLocator.locate(doc, &rule).unwrap();
        assert_eq!(&doc[range], "## S\na\n");
    }

    #[test]
    fn test_heading_ignores_code_blocks() {
        let doc = "# Intro\n\n```\n## PHASE 2: quoted\n```\n\n## PHASE 2: Real\nbody\n\n## PHASE 3: Next\n";
        let rule = SegmentRule::new("p2", "## PHASE 2:", "p2.md").until("## PHASE 3:");

        let literal = LiteralLocator.locate(doc, &rule).unwrap();
        let heading = HeadingLocator.locate(doc, &rule).unwrap();

        assert!(doc[literal].starts_with("## PHASE 2: quoted"));
        assert_eq!(doc[heading].trim(), "## PHASE 2: Real\nbody");
    }

    #[test]
    fn test_heading_missing_start() {
        let doc = "Text mentioning ## PHASE 2: inline\n";
        let rule = SegmentRule::new("p2", "## PHASE 2:", "p2.md");
        assert!(HeadingLocator.locate(doc, &rule).is_none());
    }

    #[test]
    fn test_heading_to_end_of_document() {
        let rule = SegmentRule::new("p3", "## PHASE 3:", "p3.md");
        let range = HeadingLocator.locate(DOC, &rule).unwrap();
        assert_eq!(&DOC[range], "## PHASE 3: Y\nbar");
    }

    #[test]
    fn test_locator_kind_default() {
        assert_eq!(LocatorKind::default(), LocatorKind::Literal);
    }
}
