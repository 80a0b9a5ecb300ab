//! CLI argument parsing and command definitions.
//!
//! Global flags cover configuration and verbosity; subcommands split a
//! framework document, check the resulting tree, and manage the config file.

use clap::{Parser, Subcommand};

// ============================================================================
// CLI argument types
// ============================================================================

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "mdsplit", author, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "MDSPLIT_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Split the source document into module files.
    Split {
        /// Source markdown document (defaults to `split.source`).
        #[arg(short, long)]
        source: Option<String>,

        /// Destination directory (defaults to `split.output_dir`).
        #[arg(short, long)]
        output: Option<String>,

        /// TOML split plan replacing the built-in one.
        #[arg(short, long)]
        plan: Option<String>,
    },

    /// Check the destination tree for required markers.
    Check {
        /// Destination directory to check (defaults to `split.output_dir`).
        #[arg(short, long)]
        output: Option<String>,

        /// TOML marker set replacing the built-in one.
        #[arg(short, long)]
        markers: Option<String>,

        /// Do not write the markdown report.
        #[arg(long)]
        no_report: bool,
    },

    /// Print version information.
    Version,

    /// Configuration operations.
    Config(ConfigCommand),
}

/// Config-specific subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Available config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Get a configuration value by dotted key.
    Get {
        /// Dotted key (e.g., "split.output_dir").
        key: String,
    },

    /// Create a default configuration file.
    Init {
        /// Output file path (defaults to XDG config path).
        #[arg(short, long)]
        file: Option<String>,

        /// Overwrite existing file.
        #[arg(long)]
        force: bool,
    },

    /// Export configuration as environment variables.
    Export {
        /// Format as Docker --env flags.
        #[arg(long)]
        docker_env: bool,
    },
}

// ============================================================================
// Tests
// ============================================================================
