//! Marker presence checking.
//!
//! Categories run in order and independently: a failing category never
//! stops the others. Only an I/O error from the provider aborts the run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

use mdsplit_core::Result;

use crate::marker::{CaseMode, Category, MarkerSet, Scope};
use crate::provider::FileProvider;

/// Outcome of checking one category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Category name.
    pub category: String,
    /// True iff every required (and implied) string was found.
    pub passed: bool,
    /// Required strings that were not found.
    pub missing: BTreeSet<String>,
    /// True when none of the category's designated files existed.
    pub files_missing: bool,
    /// Files that were scanned, relative to the root.
    pub scanned: Vec<PathBuf>,
    /// Advisory strings that were not found.
    pub warnings: Vec<String>,
}

impl CheckResult {
    fn files_missing(category: &Category) -> Self {
        Self {
            category: category.name.clone(),
            passed: false,
            missing: category.required.iter().cloned().collect(),
            files_missing: true,
            scanned: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Runs marker sets against a [`FileProvider`].
pub struct Checker<P> {
    provider: P,
}

impl<P: FileProvider> Checker<P> {
    /// Create a checker over `provider`.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Check every category, returning one result per category in order.
    pub async fn check(&self, markers: &MarkerSet) -> Result<Vec<CheckResult>> {
        self.check_with(markers, |_| {}).await
    }

    /// Like [`check`](Self::check), calling `on_result` as each category
    /// finishes so callers can report progress before a later I/O error.
    pub async fn check_with<F>(&self, markers: &MarkerSet, mut on_result: F) -> Result<Vec<CheckResult>>
    where
        F: FnMut(&CheckResult),
    {
        let mut results = Vec::with_capacity(markers.categories.len());
        for category in &markers.categories {
            let result = self.check_category(category).await?;
            if result.passed {
                log::debug!("category '{}' passed", result.category);
            } else if result.files_missing {
                log::info!(
                    "category '{}' failed: no designated files found",
                    result.category
                );
            } else {
                log::info!(
                    "category '{}' failed: {} missing",
                    result.category,
                    result.missing.len()
                );
            }
            on_result(&result);
            results.push(result);
        }
        Ok(results)
    }

    /// Check a single category.
    pub async fn check_category(&self, category: &Category) -> Result<CheckResult> {
        let candidates = match &category.scope {
            Scope::Tree(pattern) => self.provider.list(pattern).await?,
            Scope::File(path) => vec![path.clone()],
            Scope::AnyOf(paths) => paths.clone(),
        };

        let mut scanned = Vec::new();
        let mut contents = Vec::new();
        for path in candidates {
            if let Some(text) = self.provider.read(&path).await? {
                contents.push(category.case.normalize(&text).into_owned());
                scanned.push(path);
            }
        }

        if contents.is_empty() {
            return Ok(CheckResult::files_missing(category));
        }

        let found = |needle: &str| contains_any(&contents, category.case, needle);

        let mut missing: BTreeSet<String> = category
            .required
            .iter()
            .filter(|s| !found(s.as_str()))
            .cloned()
            .collect();

        for implication in &category.implications {
            if found(&implication.when) && !found(&implication.require) {
                missing.insert(implication.require.clone());
            }
        }

        let warnings = category
            .advisories
            .iter()
            .filter(|s| !found(s.as_str()))
            .cloned()
            .collect();

        Ok(CheckResult {
            category: category.name.clone(),
            passed: missing.is_empty(),
            missing,
            files_missing: false,
            scanned,
            warnings,
        })
    }
}

/// True if `needle` occurs in at least one of the (already normalised)
/// file contents.
fn contains_any(contents: &[String], case: CaseMode, needle: &str) -> bool {
    let needle = case.normalize(needle);
    contents.iter().any(|text| text.contains(needle.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::Path;

    /// In-memory provider keyed by relative path.
    #[derive(Default)]
    struct MemoryProvider {
        files: HashMap<PathBuf, String>,
    }

    impl MemoryProvider {
        fn with(mut self, path: &str, content: &str) -> Self {
            self.files.insert(PathBuf::from(path), content.to_string());
            self
        }
    }

    #[async_trait]
    impl FileProvider for MemoryProvider {
        async fn list(&self, pattern: &str) -> Result<Vec<PathBuf>> {
            let pattern = glob::Pattern::new(pattern).unwrap();
            let mut paths: Vec<_> = self
                .files
                .keys()
                .filter(|p| pattern.matches_path(p))
                .cloned()
                .collect();
            paths.sort();
            Ok(paths)
        }

        async fn read(&self, path: &Path) -> Result<Option<String>> {
            Ok(self.files.get(path).cloned())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl FileProvider for FailingProvider {
        async fn list(&self, _pattern: &str) -> Result<Vec<PathBuf>> {
            Err(std::io::Error::other("disk on fire").into())
        }

        async fn read(&self, _path: &Path) -> Result<Option<String>> {
            Ok(Some("ok".into()))
        }
    }

    #[tokio::test]
    async fn test_completeness_reports_missing_subset() {
        let provider = MemoryProvider::default().with("t.md", "only k1 here");
        let category = Category::new("K", Scope::file("t.md"), ["k1", "k2"]);

        let result = Checker::new(provider).check_category(&category).await.unwrap();

        assert!(!result.passed);
        assert_eq!(result.missing, BTreeSet::from(["k2".to_string()]));
        assert!(!result.files_missing);
    }

    #[tokio::test]
    async fn test_case_sensitivity_asymmetry() {
        let provider = MemoryProvider::default().with("a.md", "The Hostile Auditor speaks");
        let checker = Checker::new(provider);

        let insensitive =
            Category::new("I", Scope::file("a.md"), ["HOSTILE AUDITOR"]).case_insensitive();
        let sensitive = Category::new("S", Scope::file("a.md"), ["HOSTILE AUDITOR"]);

        assert!(checker.check_category(&insensitive).await.unwrap().passed);
        assert!(!checker.check_category(&sensitive).await.unwrap().passed);
    }

    #[tokio::test]
    async fn test_missing_file_fails_with_everything_missing() {
        let checker = Checker::new(MemoryProvider::default());
        let category = Category::new("F", Scope::file("absent.md"), ["a", "b"]);

        let result = checker.check_category(&category).await.unwrap();

        assert!(!result.passed);
        assert!(result.files_missing);
        assert_eq!(result.missing.len(), 2);
        assert!(result.scanned.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_fails_even_without_required_strings() {
        let checker = Checker::new(MemoryProvider::default());
        let category = Category::new("F", Scope::file("absent.md"), Vec::<String>::new());

        let result = checker.check_category(&category).await.unwrap();

        assert!(!result.passed);
        assert!(result.missing.is_empty());
    }

    #[tokio::test]
    async fn test_tree_scope_matches_across_files() {
        let provider = MemoryProvider::default()
            .with("phases/one.md", "alpha")
            .with("phases/two.md", "beta")
            .with("notes.txt", "gamma");
        let category = Category::new("T", Scope::all_markdown(), ["alpha", "beta", "gamma"]);

        let result = Checker::new(provider).check_category(&category).await.unwrap();

        assert_eq!(result.scanned.len(), 2);
        assert_eq!(result.missing, BTreeSet::from(["gamma".to_string()]));
    }

    #[tokio::test]
    async fn test_strings_do_not_match_across_file_boundaries() {
        let provider = MemoryProvider::default()
            .with("a.md", "SEMANTIC_")
            .with("b.md", "FINGERPRINTS");
        let category = Category::new("T", Scope::all_markdown(), ["SEMANTIC_FINGERPRINTS"]);

        let result = Checker::new(provider).check_category(&category).await.unwrap();

        assert!(!result.passed);
    }

    #[tokio::test]
    async fn test_tree_scope_with_no_files() {
        let checker = Checker::new(MemoryProvider::default().with("x.txt", "a"));
        let category = Category::new("T", Scope::all_markdown(), ["a"]);

        let result = checker.check_category(&category).await.unwrap();

        assert!(result.files_missing);
        assert!(!result.passed);
    }

    #[tokio::test]
    async fn test_any_of_uses_existing_subset() {
        let provider = MemoryProvider::default().with("second.md", "hostile");
        let category = Category::new(
            "A",
            Scope::AnyOf(vec![PathBuf::from("first.md"), PathBuf::from("second.md")]),
            ["HOSTILE"],
        )
        .case_insensitive();

        let result = Checker::new(provider).check_category(&category).await.unwrap();

        assert!(result.passed);
        assert_eq!(result.scanned, vec![PathBuf::from("second.md")]);
    }

    #[tokio::test]
    async fn test_implications_and_advisories() {
        let provider = MemoryProvider::default().with(
            "o.md",
            "parallel_execution: true\nearly_termination: critical_only",
        );
        let category = Category::new("P", Scope::file("o.md"), Vec::<String>::new())
            .with_implication("early_termination", "critical")
            .with_implication("parallel_execution", "independent_checks")
            .with_implication("never_mentioned", "whatever")
            .with_advisory("cache_validation_results: false");

        let result = Checker::new(provider).check_category(&category).await.unwrap();

        assert!(!result.passed);
        assert_eq!(result.missing, BTreeSet::from(["independent_checks".to_string()]));
        assert_eq!(result.warnings, vec!["cache_validation_results: false"]);
    }

    #[tokio::test]
    async fn test_check_runs_every_category_in_order() {
        let provider = MemoryProvider::default().with("a.md", "x");
        let set = MarkerSet::new(vec![
            Category::new("first", Scope::file("a.md"), ["missing"]),
            Category::new("second", Scope::file("a.md"), ["x"]),
        ]);

        let mut seen = Vec::new();
        let results = Checker::new(provider)
            .check_with(&set, |r| seen.push(r.category.clone()))
            .await
            .unwrap();

        assert_eq!(seen, vec!["first", "second"]);
        assert!(!results[0].passed);
        assert!(results[1].passed);
    }

    #[tokio::test]
    async fn test_missing_files_is_an_ordinary_failure() {
        let provider = MemoryProvider::default().with("a.md", "x");
        let set = MarkerSet::new(vec![
            Category::new("gone", Scope::file("absent.md"), ["x"]),
            Category::new("short", Scope::file("a.md"), ["y"]),
            Category::new("fine", Scope::file("a.md"), ["x"]),
        ]);

        let results = Checker::new(provider).check(&set).await.unwrap();

        assert_eq!(results.len(), 3);
        assert!(results[0].files_missing && !results[0].passed);
        assert!(!results[1].files_missing && !results[1].passed);
        assert!(results[2].passed);
    }

    #[tokio::test]
    async fn test_io_error_aborts_after_reporting_earlier_results() {
        let set = MarkerSet::new(vec![
            Category::new("file", Scope::file("a.md"), ["ok"]),
            Category::new("tree", Scope::all_markdown(), ["ok"]),
        ]);

        let mut seen = Vec::new();
        let result = Checker::new(FailingProvider)
            .check_with(&set, |r| seen.push(r.category.clone()))
            .await;

        assert!(result.unwrap_err().is_io());
        assert_eq!(seen, vec!["file"]);
    }
}
