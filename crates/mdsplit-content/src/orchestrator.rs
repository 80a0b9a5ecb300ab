//! Orchestrator index rendering.
//!
//! The index lists every module of the plan in loading order and describes
//! the modules that were actually written in this run.

use std::fmt::Write as _;

use crate::plan::OrchestratorSettings;
use crate::rule::SegmentRule;

/// Render the orchestrator index.
///
/// `rules` is the full ordered rule list (the loading sequence);
/// `written` holds the rules whose segment was emitted, in order.
pub fn render_orchestrator(
    settings: &OrchestratorSettings,
    rules: &[SegmentRule],
    written: &[&SegmentRule],
) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "# {}\n", settings.title);
    let _ = writeln!(out, "## Overview\n{}\n", settings.overview);

    out.push_str("## Module Loading Sequence\n\n```python\n");
    out.push_str("# Load modules in dependency order\nmodules = [\n");
    let sequence: Vec<String> = rules
        .iter()
        .map(|r| format!("    '{}'", r.destination_display()))
        .collect();
    out.push_str(&sequence.join(",\n"));
    out.push_str("\n]\n```\n\n");

    if !settings.constraints.is_empty() {
        out.push_str("## Critical Constraints (NEVER COMPROMISE)\n");
        for (i, constraint) in settings.constraints.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, constraint);
        }
        out.push('\n');
    }

    out.push_str("## Module Descriptions\n");
    for rule in written {
        let _ = write!(
            out,
            "\n### {}\n{}\n",
            rule.destination_display(),
            rule.description
        );
    }

    out
}
