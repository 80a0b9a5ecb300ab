//! End-to-end split runs: segments, static modules, and the index.

use std::path::{Path, PathBuf};

use mdsplit_core::util::{files, paths};
use mdsplit_core::Result;

use crate::locator::{HeadingLocator, LiteralLocator, LocatorKind, SectionLocator};
use crate::orchestrator::render_orchestrator;
use crate::plan::SplitPlan;
use crate::segment::{write_output, SegmentOutcome, Segmenter, SkippedRule};

/// Kind of file a split run produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Extracted from the source by a rule.
    Segment,
    /// Written verbatim from the plan.
    Static,
    /// The orchestrator index.
    Orchestrator,
}

/// A file written by a split run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// What produced the file.
    pub kind: ArtifactKind,
    /// Full path of the written file.
    pub path: PathBuf,
}

/// Summary of a split run.
#[derive(Clone, Debug, Default)]
pub struct SplitReport {
    /// One outcome per rule, in rule order.
    pub outcomes: Vec<SegmentOutcome>,
    /// Every file written, in write order.
    pub artifacts: Vec<Artifact>,
}

impl SplitReport {
    /// Rules that were skipped because their start marker was absent.
    pub fn skipped(&self) -> impl Iterator<Item = &SkippedRule> {
        self.outcomes.iter().filter_map(|o| match o {
            SegmentOutcome::Skipped(skip) => Some(skip),
            SegmentOutcome::Emitted(_) => None,
        })
    }

    /// Number of segments written.
    pub fn segments_written(&self) -> usize {
        self.outcomes.len() - self.skipped().count()
    }
}

/// Read `source` and run `plan` against it, writing under `output_root`.
pub async fn split_file(source: &Path, output_root: &Path, plan: &SplitPlan) -> Result<SplitReport> {
    let document = files::read_file(source).await?;
    log::info!(
        "splitting {} ({} bytes) into {}",
        source.display(),
        document.len(),
        output_root.display()
    );
    split_document(&document, output_root, plan).await
}

/// Run `plan` against an in-memory document, writing under `output_root`.
pub async fn split_document(
    document: &str,
    output_root: &Path,
    plan: &SplitPlan,
) -> Result<SplitReport> {
    match plan.locator {
        LocatorKind::Literal => {
            run(Segmenter::with_locator(LiteralLocator), document, output_root, plan).await
        }
        LocatorKind::Heading => {
            run(Segmenter::with_locator(HeadingLocator), document, output_root, plan).await
        }
    }
}

async fn run<L: SectionLocator>(
    segmenter: Segmenter<L>,
    document: &str,
    output_root: &Path,
    plan: &SplitPlan,
) -> Result<SplitReport> {
    let mut report = SplitReport {
        outcomes: segmenter.segment(document, &plan.rules),
        artifacts: Vec::new(),
    };

    for outcome in &report.outcomes {
        if let SegmentOutcome::Emitted(file) = outcome {
            let path = write_output(output_root, file).await?;
            report.artifacts.push(Artifact {
                kind: ArtifactKind::Segment,
                path,
            });
        }
    }

    for module in &plan.static_modules {
        let path = paths::resolve_destination(output_root, &module.destination)?;
        files::write_file(&path, &module.contents).await?;
        log::info!("wrote static module {}", path.display());
        report.artifacts.push(Artifact {
            kind: ArtifactKind::Static,
            path,
        });
    }

    if let Some(settings) = &plan.orchestrator {
        let written: Vec<_> = plan
            .rules
            .iter()
            .zip(&report.outcomes)
            .filter(|(_, outcome)| !outcome.is_skipped())
            .map(|(rule, _)| rule)
            .collect();
        let index = render_orchestrator(settings, &plan.rules, &written);
        let path = paths::resolve_destination(output_root, &settings.destination)?;
        files::write_file(&path, &index).await?;
        log::info!("wrote orchestrator {}", path.display());
        report.artifacts.push(Artifact {
            kind: ArtifactKind::Orchestrator,
            path,
        });
    }

    Ok(report)
}
