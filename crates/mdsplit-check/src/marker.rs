//! Marker sets: categories of required literal strings.
//!
//! Each [`Category`] has a fixed [`Scope`] (which files it reads) and a fixed
//! [`CaseMode`]. The built-in [`MarkerSet::pd_smis`] mirrors the acceptance
//! checks for the PD-SMIS framework split; other sets load from TOML:
//!
//! ```toml
//! guarantees = ["Everything is there"]
//!
//! [[categories]]
//! name = "Headings"
//! scope = { tree = "**/*.md" }
//! required = ["## INTRO", "## BODY"]
//!
//! [[categories]]
//! name = "Tone"
//! scope = { any_of = ["a.md", "b.md"] }
//! case = "insensitive"
//! required = ["hostile"]
//! advisories = ["assume bad faith"]
//!
//! [[categories.implications]]
//! when = "parallel_execution"
//! require = "independent_checks"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use mdsplit_core::util::files;
use mdsplit_core::{Error, Result};

/// How required strings are compared with file contents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    /// Exact, case-sensitive substring match.
    #[default]
    Sensitive,
    /// Case-insensitive substring match. Both sides are upper-cased, so
    /// `ß` matches `SS`.
    Insensitive,
}

impl CaseMode {
    /// Normalise text for comparison under this mode.
    pub fn normalize<'a>(&self, text: &'a str) -> std::borrow::Cow<'a, str> {
        match self {
            Self::Sensitive => std::borrow::Cow::Borrowed(text),
            Self::Insensitive => std::borrow::Cow::Owned(text.to_uppercase()),
        }
    }
}

/// Which files a category reads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Every file under the root whose relative path matches the glob.
    Tree(String),
    /// Exactly one named file.
    File(PathBuf),
    /// Whichever of the listed files exist.
    AnyOf(Vec<PathBuf>),
}

impl Scope {
    /// Scope covering every markdown file in the tree.
    pub fn all_markdown() -> Self {
        Self::Tree("**/*.md".to_string())
    }

    /// Scope covering one file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }
}

/// A string required only when another string is present.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Implication {
    /// Trigger string.
    pub when: String,
    /// String that must then also be present.
    pub require: String,
}

/// A named group of required strings checked as one pass/fail unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Display name.
    pub name: String,
    /// Files the category reads.
    pub scope: Scope,
    /// Comparison mode.
    #[serde(default)]
    pub case: CaseMode,
    /// Strings that must each appear in at least one scanned file.
    #[serde(default)]
    pub required: Vec<String>,
    /// Conditional requirements.
    #[serde(default)]
    pub implications: Vec<Implication>,
    /// Strings whose absence is only a warning.
    #[serde(default)]
    pub advisories: Vec<String>,
}

impl Category {
    /// Create a case-sensitive category.
    pub fn new<I, S>(name: impl Into<String>, scope: Scope, required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            scope,
            case: CaseMode::Sensitive,
            required: required.into_iter().map(Into::into).collect(),
            implications: Vec::new(),
            advisories: Vec::new(),
        }
    }

    /// Compare case-insensitively.
    pub fn case_insensitive(mut self) -> Self {
        self.case = CaseMode::Insensitive;
        self
    }

    /// Require `require` whenever `when` is present.
    pub fn with_implication(mut self, when: impl Into<String>, require: impl Into<String>) -> Self {
        self.implications.push(Implication {
            when: when.into(),
            require: require.into(),
        });
        self
    }

    /// Warn when `marker` is absent.
    pub fn with_advisory(mut self, marker: impl Into<String>) -> Self {
        self.advisories.push(marker.into());
        self
    }
}

/// An ordered collection of categories plus the statements a fully passing
/// run guarantees.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerSet {
    /// Categories, checked in order.
    pub categories: Vec<Category>,
    /// Statements listed in the report when every category passes.
    #[serde(default)]
    pub guarantees: Vec<String>,
}

impl MarkerSet {
    /// Create a marker set from categories.
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            categories,
            guarantees: Vec::new(),
        }
    }

    /// The built-in acceptance checks for the PD-SMIS framework split.
    pub fn pd_smis() -> Self {
        let orchestrator = "validation/validation_orchestrator.md";

        let categories = vec![
            Category::new(
                "Phases Present",
                Scope::all_markdown(),
                [
                    "PHASE 0: MANDATORY SOURCE COLLECTION",
                    "PHASE 0.5: ITERATION CONTEXT MANAGEMENT",
                    "PHASE 0.6: ERROR HANDLING PROTOCOLS",
                    "PHASE 1: COMPREHENSIVE SOURCE EXTRACTION",
                    "PHASE 2: INTELLIGENT HYPOTHESIS GENERATION",
                    "PHASE 3: STRATEGIC OPTIMIZATION",
                    "PHASE 4: CONTEXTUAL GENERATION",
                    "PHASE 4.5: ADVERSARIAL VALIDATION",
                    "PHASE 5: VERIFICATION",
                    "PHASE 6: LEARNING PROTOCOL",
                    "PHASE 7: ITERATION CYCLE MANAGEMENT",
                ],
            ),
            Category::new(
                "Core Components",
                Scope::all_markdown(),
                [
                    "SEMANTIC_FINGERPRINTS",
                    "PRECISION_TIERS",
                    "SOURCE_SEGREGATED_FACTS",
                    "BOTTLENECK_ANALYZER",
                    "HYPOTHESIS_GENERATOR",
                    "ADVERSARIAL_VALIDATOR",
                    "ITERATION_TRACKER",
                    "LEARNING_ACCUMULATOR",
                ],
            ),
            Category::new(
                "14 Safeguards",
                Scope::file("safeguards/critical_safeguards.md"),
                [
                    "Role-Project Firewall",
                    "Source Attribution Check",
                    "Phrasing Pattern Validation",
                    "Evidence-Based Decision Guard",
                    "Over-Optimization Prevention",
                    "Engagement-Accuracy Balance",
                    "Tier Boundary Enforcement",
                    "Adversarial Validation Gate",
                    "Dual-Lock Verification",
                    "Domain Boundary Enforcement",
                    "Semantic Diff Validation",
                    "Pipeline Enforcement",
                    "Engagement Enhancement Boundaries",
                    "Learning Accumulator Protection",
                ],
            ),
            Category::new(
                "Adversarial Intensity",
                Scope::AnyOf(vec![
                    PathBuf::from("validation/adversarial_validation.md"),
                    PathBuf::from(orchestrator),
                ]),
                [
                    "HOSTILE AUDITOR",
                    "assume bad faith",
                    "success_metric: \"violations_found\"",
                    "hostile",
                ],
            )
            .case_insensitive(),
            Category::new(
                "Tier System",
                Scope::file("validation/precision_tiers.md"),
                [
                    "completion",
                    "creation",
                    "participation",
                    "association",
                    "proximity",
                    "cannot_escalate",
                ],
            )
            .case_insensitive(),
            Category::new(
                "Validation Completeness",
                Scope::file(orchestrator),
                [
                    "tier_enforcement",
                    "adversarial_validation",
                    "semantic_diff_validation",
                    "domain_boundary_enforcement",
                    "source_attribution_check",
                    "all_14_safeguards_active: true",
                ],
            ),
            Category::new(
                "Error Handling",
                Scope::file("phases/phase_0_6_error_handling.md"),
                ["ABORT", "tier_violation"],
            ),
            Category::new(
                "Source Segregation",
                Scope::file("phases/phase_1_extraction.md"),
                [
                    "ROLE_SCOPE",
                    "PROJECT_ENVIRONMENT",
                    "COMPANY_ATTRIBUTES",
                    "SOURCE_SEGREGATED_FACTS",
                ],
            ),
            Category::new("Performance Safety", Scope::file(orchestrator), Vec::<String>::new())
                .with_implication("early_termination", "critical")
                .with_implication("parallel_execution", "independent_checks")
                .with_advisory("cache_validation_results: false"),
        ];

        Self {
            categories,
            guarantees: [
                "All original functionality preserved",
                "All 14 safeguards active",
                "Adversarial validation intensity maintained",
                "Tier system enforcement intact",
                "Source segregation boundaries maintained",
                "Performance optimizations safe",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }

    /// Parse a marker set from TOML and validate it.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let set: Self = toml::from_str(input)
            .map_err(|e| Error::serialization(format!("invalid marker set: {e}")))?;
        set.validate()?;
        Ok(set)
    }

    /// Load a marker set from a TOML file.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = files::read_file(path).await?;
        let set = Self::from_toml_str(&content)?;
        log::debug!(
            "loaded marker set from {} ({} categories)",
            path.display(),
            set.categories.len()
        );
        Ok(set)
    }

    /// Reject unnamed or duplicate categories, empty marker strings, and
    /// tree scopes whose glob does not compile.
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(Error::invalid_data("category with empty name"));
            }
            if !names.insert(category.name.as_str()) {
                return Err(Error::invalid_data(format!(
                    "duplicate category '{}'",
                    category.name
                )));
            }
            let has_empty = category
                .required
                .iter()
                .chain(&category.advisories)
                .chain(category.implications.iter().flat_map(|i| [&i.when, &i.require]))
                .any(|s| s.is_empty());
            if has_empty {
                return Err(Error::invalid_data(format!(
                    "category '{}' contains an empty marker",
                    category.name
                )));
            }
            if let Scope::Tree(pattern) = &category.scope {
                glob::Pattern::new(pattern).map_err(|e| {
                    Error::invalid_data(format!(
                        "category '{}' has bad glob pattern '{pattern}': {e}",
                        category.name
                    ))
                })?;
            }
        }
        Ok(())
    }
}
