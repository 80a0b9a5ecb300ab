//! Marker presence checking for mdsplit destination trees.
//!
//! A [`MarkerSet`] groups required strings into named [`Category`] values,
//! each scoped to one file, a set of alternative files, or every markdown
//! file under the root. The [`Checker`] scans those files through a
//! [`FileProvider`] and yields one [`CheckResult`] per category, which the
//! [`report`] module renders as a markdown validation report.
//!
//! # Modules
//!
//! - [`marker`]: Categories, scopes, and built-in marker sets
//! - [`provider`]: The [`FileProvider`] seam and [`FsProvider`]
//! - [`checker`]: The [`Checker`] and [`CheckResult`]
//! - [`report`]: Summary and report rendering

#![doc = include_str!("../README.md")]

pub mod checker;
pub mod marker;
pub mod provider;
pub mod report;

pub use checker::{CheckResult, Checker};
pub use marker::{CaseMode, Category, Implication, MarkerSet, Scope};
pub use provider::{FileProvider, FsProvider};
pub use report::{render_report, write_report, CheckSummary, DEFAULT_REPORT_PATH};
