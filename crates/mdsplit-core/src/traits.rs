//! Core traits for mdsplit.
//!
//! The primary trait is [`ConfigProvider`], which tells the CLI handlers
//! where the source document lives and where the destination tree goes.
//! Nothing in the library crates reads the working directory implicitly;
//! every location flows through an implementation of this trait or an
//! explicit parameter.

use std::path::PathBuf;

use crate::Result;

/// Trait for run configuration.
///
/// # Bounds
///
/// - `Send + Sync`: Configuration must be shareable across threads
/// - `Clone`: Configuration can be duplicated for passing to subsystems
/// - `'static`: Configuration lifetime is not borrowed
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use mdsplit_core::traits::ConfigProvider;
/// use mdsplit_core::Result;
///
/// #[derive(Clone)]
/// struct FixedConfig {
///     dir: PathBuf,
/// }
///
/// impl ConfigProvider for FixedConfig {
///     fn source_path(&self) -> Result<PathBuf> {
///         Ok(self.dir.join("JobEvalV5.md"))
///     }
///
///     fn output_root(&self) -> Result<PathBuf> {
///         Ok(self.dir.join("refactored"))
///     }
/// }
/// ```
pub trait ConfigProvider: Send + Sync + Clone + 'static {
    /// Path of the monolithic source document to segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be determined.
    fn source_path(&self) -> Result<PathBuf>;

    /// Root of the destination tree the segmenter writes and the checker
    /// reads.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be determined.
    fn output_root(&self) -> Result<PathBuf>;
}
