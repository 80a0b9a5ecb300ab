//! Command-line front end for mdsplit.
//!
//! # Key Abstractions
//!
//! - [`MdsplitCli`]: loads configuration and dispatches commands
//! - [`CliArgs`]: clap-derived arguments (`split`, `check`, `config`, `version`)
//! - [`MdsplitConfig`]: confyg-backed configuration

#![doc = include_str!("../README.md")]

pub mod app;
pub mod cli;
pub mod config;
pub mod config_handlers;
pub mod handlers;

pub use app::MdsplitCli;
pub use cli::{CliArgs, Command, ConfigAction, ConfigCommand};
pub use config::{CheckConfig, MdsplitConfig, SplitConfig};
