//! The mdsplit application: logging setup and command dispatch.

use crate::cli::{CliArgs, Command};
use crate::config::MdsplitConfig;
use crate::config_handlers;
use crate::handlers::{self, CheckOptions, SplitOptions};
use mdsplit_core::Result;
use tracing_subscriber::EnvFilter;

// ============================================================================
// MdsplitCli
// ============================================================================

/// CLI application bound to a loaded configuration.
pub struct MdsplitCli {
    name: String,
    config: MdsplitConfig,
    version: String,
}

impl MdsplitCli {
    /// Create from CLI args, loading config from file/env.
    pub fn from_args(name: impl Into<String>, args: &CliArgs) -> Result<Self> {
        let config = MdsplitConfig::load(args.config.as_deref())?;
        Ok(Self::new(name, config))
    }

    /// Create a new CLI application.
    pub fn new(name: impl Into<String>, config: MdsplitConfig) -> Self {
        Self {
            name: name.into(),
            config,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Override the version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// The loaded configuration.
    pub fn config(&self) -> &MdsplitConfig {
        &self.config
    }

    /// Initialise tracing-based logging.
    ///
    /// Uses `RUST_LOG` env var if set, otherwise defaults based on verbosity flags.
    pub fn init_logging(&self, verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // A subscriber may already be installed (e.g. in tests).
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }

    /// Run the CLI with the given arguments.
    pub async fn run(&self, args: CliArgs) -> Result<()> {
        self.init_logging(args.verbose, args.quiet);
        tracing::debug!(command = ?args.command, "dispatching");

        match args.command {
            Some(Command::Split {
                source,
                output,
                plan,
            }) => {
                let options = SplitOptions {
                    source,
                    output,
                    plan,
                };
                handlers::handle_split(&self.config, options).await?;
                Ok(())
            }
            Some(Command::Check {
                output,
                markers,
                no_report,
            }) => {
                let options = CheckOptions {
                    output,
                    markers,
                    no_report,
                };
                handlers::handle_check(&self.config, options).await?;
                Ok(())
            }
            Some(Command::Version) => {
                println!("{} {}", self.name, self.version);
                Ok(())
            }
            Some(Command::Config(config_cmd)) => {
                config_handlers::handle_config_command(args.config.as_deref(), config_cmd.command)
            }
            None => {
                println!("{} {}: use --help for usage", self.name, self.version);
                Ok(())
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_mdsplit_cli_new() {
        let cli = MdsplitCli::new("mdsplit", MdsplitConfig::default()).with_version("1.2.3");
        assert_eq!(cli.name, "mdsplit");
        assert_eq!(cli.version, "1.2.3");
        assert_eq!(cli.config().split.output_dir, "refactored");
    }

    #[test]
    fn test_from_args_with_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "framework_name = \"From File\"\n").unwrap();

        let args = CliArgs::parse_from(["mdsplit", "--config", path.to_str().unwrap()]);
        let cli = MdsplitCli::from_args("mdsplit", &args).unwrap();
        assert_eq!(cli.config().framework_name, "From File");
    }

    #[tokio::test]
    async fn test_run_version_and_no_command() {
        let cli = MdsplitCli::new("mdsplit", MdsplitConfig::default());
        assert!(cli.run(CliArgs::parse_from(["mdsplit", "version"])).await.is_ok());
        assert!(cli.run(CliArgs::parse_from(["mdsplit", "-q"])).await.is_ok());
    }

    #[tokio::test]
    async fn test_run_split_then_check() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = dir.path().join("JobEvalV5.md");
        std::fs::write(&source, "# Framework\n\n## PHASE 2: HYPOTHESES\nbody\n").unwrap();
        let out = dir.path().join("refactored");

        let cli = MdsplitCli::new("mdsplit", MdsplitConfig::default());
        let split = CliArgs::parse_from([
            "mdsplit",
            "split",
            "--source",
            source.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
        ]);
        cli.run(split).await.unwrap();
        assert!(out.join("phases/phase_2_hypothesis.md").exists());
        assert!(out.join("orchestrator.md").exists());

        // Most categories fail against this tiny document; the run still succeeds.
        let check = CliArgs::parse_from(["mdsplit", "check", "--output", out.to_str().unwrap()]);
        cli.run(check).await.unwrap();
        assert!(out.join("tests/validation_test_report.md").exists());
    }

    #[test]
    fn test_init_logging_does_not_panic() {
        let cli = MdsplitCli::new("mdsplit", MdsplitConfig::default());
        cli.init_logging(true, false);
        cli.init_logging(false, true);
    }
}
