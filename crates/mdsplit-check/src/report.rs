//! Validation report rendering.

use std::fmt::Write as _;
use std::path::Path;

use mdsplit_core::util::files;
use mdsplit_core::Result;

use crate::checker::CheckResult;

/// Default report location, relative to the output root.
pub const DEFAULT_REPORT_PATH: &str = "tests/validation_test_report.md";

/// Pass/fail totals for a set of results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CheckSummary {
    /// Number of categories checked.
    pub total: usize,
    /// Number that passed.
    pub passed: usize,
    /// Number that failed.
    pub failed: usize,
}

impl CheckSummary {
    /// Tally a slice of results.
    pub fn from_results(results: &[CheckResult]) -> Self {
        let passed = results.iter().filter(|r| r.passed).count();
        Self {
            total: results.len(),
            passed,
            failed: results.len() - passed,
        }
    }

    /// Percentage of categories that passed; 0.0 when nothing ran.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 / self.total as f64 * 100.0
        }
    }

    /// True when at least one category ran and none failed.
    pub fn all_passed(&self) -> bool {
        self.total > 0 && self.failed == 0
    }
}

/// Render the markdown report.
///
/// Guarantee statements are listed only when every category passed.
pub fn render_report(title: &str, results: &[CheckResult], guarantees: &[String]) -> String {
    let summary = CheckSummary::from_results(results);
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("# {title}\n"));
    lines.push("## Test Summary\n".to_string());
    lines.push(format!("- Total Tests: {}", summary.total));
    lines.push(format!("- Passed: {}", summary.passed));
    lines.push(format!("- Failed: {}", summary.failed));
    lines.push(format!("- Success Rate: {:.1}%\n", summary.success_rate()));

    lines.push("## Detailed Results\n".to_string());
    for result in results {
        let status = if result.passed { "✅ PASS" } else { "❌ FAIL" };
        lines.push(format!("- {}: {}", result.category, status));
    }

    lines.push("\n## Validation Guarantees\n".to_string());
    if summary.all_passed() {
        for guarantee in guarantees {
            lines.push(format!("✅ {guarantee}"));
        }
    }

    lines.join("\n")
}

/// Render the report and write it to `path`, creating parent directories.
pub async fn write_report(
    path: &Path,
    title: &str,
    results: &[CheckResult],
    guarantees: &[String],
) -> Result<()> {
    let report = render_report(title, results, guarantees);
    files::write_file(path, &report).await?;
    log::info!("wrote report {}", path.display());
    Ok(())
}

/// One-line console description of a result.
pub fn describe(result: &CheckResult) -> String {
    let mut line = String::new();
    if result.passed {
        let _ = write!(line, "  ✅ {}", result.category);
    } else if result.files_missing {
        let _ = write!(line, "  ❌ {}: designated file(s) not found", result.category);
    } else {
        let missing: Vec<&str> = result.missing.iter().map(String::as_str).collect();
        let _ = write!(
            line,
            "  ❌ {}: missing {}",
            result.category,
            missing.join(", ")
        );
    }
    line
}
