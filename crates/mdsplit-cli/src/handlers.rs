//! Handler functions for `mdsplit split` and `mdsplit check`.
//!
//! Skipped rules and failed categories are reported on stdout and never
//! turn into errors; only I/O and configuration problems do.

use crate::config::MdsplitConfig;
use mdsplit_check::report::{self, CheckSummary};
use mdsplit_check::{CheckResult, Checker, FsProvider, MarkerSet};
use mdsplit_content::{split_file, ArtifactKind, SegmentOutcome, SplitPlan, SplitReport};
use mdsplit_core::traits::ConfigProvider;
use mdsplit_core::util::paths::{expand_tilde, resolve_destination};
use mdsplit_core::Result;
use std::path::PathBuf;

// ============================================================================
// Option types
// ============================================================================

/// Command-line overrides for a split run.
#[derive(Debug, Clone, Default)]
pub struct SplitOptions {
    /// Source document, overriding `split.source`.
    pub source: Option<String>,
    /// Destination directory, overriding `split.output_dir`.
    pub output: Option<String>,
    /// TOML plan, overriding `split.plan`.
    pub plan: Option<String>,
}

/// Command-line overrides for a check run.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Destination directory, overriding `split.output_dir`.
    pub output: Option<String>,
    /// TOML marker set, overriding `check.markers`.
    pub markers: Option<String>,
    /// Skip writing the markdown report.
    pub no_report: bool,
}

fn output_root(config: &MdsplitConfig, output: Option<&str>) -> Result<PathBuf> {
    match output {
        Some(dir) => Ok(expand_tilde(dir)),
        None => config.output_root(),
    }
}

/// Load the split plan named on the command line or in config, falling back
/// to the built-in PD-SMIS plan under the configured framework name.
pub async fn resolve_plan(config: &MdsplitConfig, plan: Option<&str>) -> Result<SplitPlan> {
    match plan.map(expand_tilde).or_else(|| config.plan_path()) {
        Some(path) => SplitPlan::load(&path).await,
        None => Ok(SplitPlan::pd_smis().with_framework(&config.framework_name)),
    }
}

/// Load the marker set named on the command line or in config, falling back
/// to the built-in PD-SMIS set.
pub async fn resolve_markers(config: &MdsplitConfig, markers: Option<&str>) -> Result<MarkerSet> {
    match markers.map(expand_tilde).or_else(|| config.markers_path()) {
        Some(path) => MarkerSet::load(&path).await,
        None => Ok(MarkerSet::pd_smis()),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Split the source document into the destination tree.
pub async fn handle_split(config: &MdsplitConfig, options: SplitOptions) -> Result<SplitReport> {
    let source = match options.source.as_deref() {
        Some(path) => expand_tilde(path),
        None => config.source_path()?,
    };
    let root = output_root(config, options.output.as_deref())?;
    let plan = resolve_plan(config, options.plan.as_deref()).await?;

    println!("Splitting {} into {}", source.display(), root.display());

    let report = split_file(&source, &root, &plan).await?;

    for artifact in &report.artifacts {
        println!("Created: {}", artifact.path.display());
    }
    for outcome in &report.outcomes {
        if let SegmentOutcome::Skipped(skip) = outcome {
            println!(
                "Skipped: {} (start marker '{}' not found)",
                skip.rule_id, skip.missing_marker
            );
        }
    }

    let extra = report
        .artifacts
        .iter()
        .filter(|a| a.kind != ArtifactKind::Segment)
        .count();
    println!(
        "\nSplit complete: {} segment(s) written, {} skipped, {} supporting file(s)",
        report.segments_written(),
        report.skipped().count(),
        extra
    );

    Ok(report)
}

/// Check the destination tree and write the validation report.
pub async fn handle_check(config: &MdsplitConfig, options: CheckOptions) -> Result<Vec<CheckResult>> {
    let root = output_root(config, options.output.as_deref())?;
    let markers = resolve_markers(config, options.markers.as_deref()).await?;

    println!(
        "Checking {} against {} categor{}",
        root.display(),
        markers.categories.len(),
        if markers.categories.len() == 1 { "y" } else { "ies" }
    );

    let mut completed = Vec::new();
    let outcome = Checker::new(FsProvider::new(&root))
        .check_with(&markers, |result| {
            println!("{}", report::describe(result));
            for advisory in &result.warnings {
                println!("    warning: advisory marker '{advisory}' not found");
            }
            completed.push(result.clone());
        })
        .await;

    let results = match outcome {
        Ok(results) => results,
        Err(e) => {
            print_summary(&completed);
            return Err(e);
        }
    };
    print_summary(&results);

    if !options.no_report {
        let path = resolve_destination(&root, &config.check.report_path)?;
        report::write_report(&path, &config.check.report_title, &results, &markers.guarantees)
            .await?;
        println!("Report written to {}", path.display());
    }

    Ok(results)
}

fn print_summary(results: &[CheckResult]) {
    let summary = CheckSummary::from_results(results);
    println!(
        "\nSummary: {} passed, {} failed ({:.1}%)",
        summary.passed,
        summary.failed,
        summary.success_rate()
    );
}

// ============================================================================
// Tests
// ============================================================================
