//! Markdown section segmentation for mdsplit.
//!
//! Splits one monolithic markdown document into smaller module files by
//! locating literal section markers, and writes the companion artifacts
//! (static modules, orchestrator index) that make up the destination tree.
//!
//! # Modules
//!
//! - [`rule`]: Segment rules and end markers
//! - [`locator`]: The [`SectionLocator`] seam and its implementations
//! - [`segment`]: The [`Segmenter`] and its outcomes
//! - [`plan`]: Split plans, built-in and TOML-loaded
//! - [`orchestrator`]: Orchestrator index rendering
//! - [`split`]: Whole-plan runs against a source file

#![doc = include_str!("../README.md")]

pub mod locator;
pub mod orchestrator;
pub mod plan;
pub mod rule;
pub mod segment;
pub mod split;

pub use locator::{HeadingLocator, LiteralLocator, LocatorKind, SectionLocator};
pub use plan::{OrchestratorSettings, SplitPlan, StaticModule};
pub use rule::{EndMarker, SegmentRule};
pub use segment::{OutputFile, Segment, SegmentOutcome, Segmenter, SkippedRule, SEPARATOR};
pub use split::{split_document, split_file, Artifact, ArtifactKind, SplitReport};
