//! Split plans: the full description of one segmentation run.
//!
//! A [`SplitPlan`] bundles the ordered segment rules with the static
//! modules and orchestrator index written alongside them. The built-in
//! [`SplitPlan::pd_smis`] plan splits the PD-SMIS job-posting framework;
//! other plans load from TOML:
//!
//! ```toml
//! framework = "My Framework"
//! locator = "heading"
//!
//! [[rules]]
//! id = "intro"
//! start = "## INTRO"
//! end = ["## BODY", "## APPENDIX"]
//! destination = "sections/intro.md"
//! description = "Introduction"
//!
//! [[static_modules]]
//! destination = "README.md"
//! contents = "# Generated"
//!
//! [orchestrator]
//! destination = "index.md"
//! title = "My Framework Index"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use mdsplit_core::util::files;
use mdsplit_core::{Error, Result};

use crate::locator::LocatorKind;
use crate::rule::{EndMarker, SegmentRule};

/// Framework name used in generated module headers.
pub const DEFAULT_FRAMEWORK: &str = "PD-SMIS v5.1 Modular Framework";

const PRECISION_TIERS: &str = include_str!("../assets/precision_tiers.md");
const VALIDATION_TESTS: &str = include_str!("../assets/validation_tests.md");

/// A document written verbatim, independent of the source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticModule {
    /// Output path relative to the output root.
    pub destination: PathBuf,
    /// File contents.
    pub contents: String,
}

impl StaticModule {
    /// Create a static module.
    pub fn new(destination: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            contents: contents.into(),
        }
    }
}

/// Settings for the orchestrator index file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorSettings {
    /// Output path relative to the output root.
    pub destination: PathBuf,
    /// Top-level heading.
    pub title: String,
    /// Overview paragraph.
    pub overview: String,
    /// Numbered constraints listed before the module descriptions.
    pub constraints: Vec<String>,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            destination: PathBuf::from("orchestrator.md"),
            title: "PD-SMIS v5.1 - Modular Framework Orchestrator".to_string(),
            overview: "This modular version of the Performance-Driven Source Material \
                       Inventory System (PD-SMIS) v5.0\nhas been restructured for \
                       maintainability while preserving all original functionality."
                .to_string(),
            constraints: vec![
                "All 14 safeguards must remain active".to_string(),
                "Adversarial validation intensity must not be reduced".to_string(),
                "Tier boundaries must be enforced".to_string(),
                "Source segregation must be maintained".to_string(),
                "Evidence chain must be preserved".to_string(),
                "100% source-context integrity required".to_string(),
            ],
        }
    }
}

/// Everything one split run needs besides the source text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPlan {
    /// Framework name used in default headers.
    #[serde(default = "default_framework")]
    pub framework: String,
    /// Marker search strategy.
    #[serde(default)]
    pub locator: LocatorKind,
    /// Ordered segment rules.
    pub rules: Vec<SegmentRule>,
    /// Documents written verbatim after the segments.
    #[serde(default)]
    pub static_modules: Vec<StaticModule>,
    /// Orchestrator index, if one should be written.
    #[serde(default)]
    pub orchestrator: Option<OrchestratorSettings>,
}

fn default_framework() -> String {
    DEFAULT_FRAMEWORK.to_string()
}

/// Build the default header for a module.
///
/// ```
/// use mdsplit_content::plan::module_header;
///
/// let header = module_header("Fw", "Intro", "a/b.md");
/// assert_eq!(header, "# Intro\n# Module: a/b.md\n# Part of Fw");
/// ```
pub fn module_header(framework: &str, description: &str, destination: &str) -> String {
    format!("# {description}\n# Module: {destination}\n# Part of {framework}")
}

impl SplitPlan {
    /// Create a plan from rules alone, with no static modules or index.
    pub fn new(rules: Vec<SegmentRule>) -> Self {
        let mut plan = Self {
            framework: default_framework(),
            locator: LocatorKind::default(),
            rules,
            static_modules: Vec::new(),
            orchestrator: None,
        };
        plan.fill_default_headers();
        plan
    }

    /// The built-in plan for the PD-SMIS v5.0 framework document.
    pub fn pd_smis() -> Self {
        let rule = |id: &str, start: &str, end: Option<&str>, dir: &str, description: &str| {
            let r = SegmentRule::new(id, start, format!("{dir}/{id}.md")).with_description(description);
            match end {
                Some(end) => r.until(end),
                None => r,
            }
        };

        let rules = vec![
            rule(
                "phase_0_collection",
                "## PHASE 0: MANDATORY SOURCE COLLECTION",
                Some("## PHASE 0.5:"),
                "phases",
                "Source material collection and input structure",
            ),
            rule(
                "phase_0_5_iteration",
                "## PHASE 0.5: ITERATION CONTEXT MANAGEMENT",
                Some("## PHASE 1:"),
                "phases",
                "Iteration tracking and learning accumulator",
            ),
            rule(
                "phase_1_extraction",
                "## PHASE 1: COMPREHENSIVE SOURCE EXTRACTION",
                Some("## PHASE 2:"),
                "phases",
                "Source extraction with semantic fingerprinting",
            ),
            rule(
                "phase_2_hypothesis",
                "## PHASE 2:",
                Some("## PHASE 3:"),
                "phases",
                "KPI-based bottleneck analysis and hypothesis generation",
            ),
            rule(
                "phase_3_optimization",
                "## PHASE 3: STRATEGIC OPTIMIZATION",
                Some("## PHASE 4:"),
                "phases",
                "Evidence-based intervention design",
            ),
            rule(
                "phase_4_generation",
                "## PHASE 4: CONTEXTUAL GENERATION",
                Some("## PHASE 4.5:"),
                "phases",
                "Content generation with constraints",
            ),
            rule(
                "adversarial_validation",
                "## PHASE 4.5: ADVERSARIAL VALIDATION",
                Some("## PHASE 5:"),
                "validation",
                "Hostile validation agent",
            ),
            rule(
                "verification_suite",
                "## PHASE 5:",
                Some("## PHASE 6:"),
                "validation",
                "Multi-layer verification and validation suite",
            ),
            rule(
                "phase_6_learning",
                "## PHASE 6: LEARNING PROTOCOL",
                Some("## PHASE 7:"),
                "phases",
                "Measurement and learning framework",
            ),
            rule(
                "phase_7_iteration",
                "## PHASE 7: ITERATION CYCLE MANAGEMENT",
                Some("## CRITICAL SAFEGUARDS"),
                "phases",
                "Multi-iteration workflow management",
            ),
            rule(
                "critical_safeguards",
                "## CRITICAL SAFEGUARDS",
                None,
                "safeguards",
                "All 14 critical safeguards",
            )
            .until_first_of(["## FINAL EXECUTION", "## OUTPUT FORMAT"]),
            rule(
                "execution_sequence",
                "## FINAL EXECUTION SEQUENCE",
                Some("## OUTPUT FORMAT"),
                "components",
                "Pipeline execution logic",
            ),
            rule(
                "output_format",
                "## OUTPUT FORMAT",
                None,
                "components",
                "Output structure and formatting",
            ),
        ];

        let mut plan = Self::new(rules);
        plan.static_modules = vec![
            StaticModule::new("validation/precision_tiers.md", PRECISION_TIERS),
            StaticModule::new("tests/validation_tests.md", VALIDATION_TESTS),
        ];
        plan.orchestrator = Some(OrchestratorSettings::default());
        plan
    }

    /// Parse a plan from TOML and validate it.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let mut plan: Self = toml::from_str(input)
            .map_err(|e| Error::serialization(format!("invalid split plan: {e}")))?;
        plan.validate()?;
        plan.fill_default_headers();
        Ok(plan)
    }

    /// Load a plan from a TOML file.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = files::read_file(path).await?;
        let plan = Self::from_toml_str(&content)?;
        log::debug!(
            "loaded split plan from {} ({} rule(s))",
            path.display(),
            plan.rules.len()
        );
        Ok(plan)
    }

    /// Override the framework name and regenerate every default header.
    pub fn with_framework(mut self, framework: impl Into<String>) -> Self {
        let framework = framework.into();
        for rule in &mut self.rules {
            let generated = module_header(
                &self.framework,
                header_description(rule),
                &rule.destination_display(),
            );
            if rule.header == generated {
                rule.header.clear();
            }
        }
        self.framework = framework;
        self.fill_default_headers();
        self
    }

    /// Check structural soundness: non-empty ids and markers, unique ids.
    ///
    /// Destinations may repeat; the last write wins.
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        for rule in &self.rules {
            if rule.id.trim().is_empty() {
                return Err(Error::invalid_data("segment rule with empty id"));
            }
            if !ids.insert(rule.id.as_str()) {
                return Err(Error::invalid_data(format!(
                    "duplicate segment rule id '{}'",
                    rule.id
                )));
            }
            if rule.start.is_empty() {
                return Err(Error::invalid_data(format!(
                    "rule '{}' has an empty start marker",
                    rule.id
                )));
            }
            if let Some(end) = &rule.end {
                let empty_list = matches!(end, EndMarker::FirstOf(list) if list.is_empty());
                if empty_list || end.candidates().any(str::is_empty) {
                    return Err(Error::invalid_data(format!(
                        "rule '{}' has an empty end marker",
                        rule.id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Give every rule without a header the default module header.
    fn fill_default_headers(&mut self) {
        for rule in &mut self.rules {
            if rule.header.is_empty() {
                rule.header = module_header(
                    &self.framework,
                    header_description(rule),
                    &rule.destination_display(),
                );
            }
        }
    }

    /// Look up a rule by id.
    pub fn rule(&self, id: &str) -> Option<&SegmentRule> {
        self.rules.iter().find(|r| r.id == id)
    }
}

fn header_description(rule: &SegmentRule) -> &str {
    if rule.description.is_empty() {
        &rule.id
    } else {
        &rule.description
    }
}
