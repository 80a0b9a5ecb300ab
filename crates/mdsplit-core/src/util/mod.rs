//! Utility modules for file operations and path handling.
//!
//! # Modules
//!
//! - [`files`]: Async file discovery, reading, and writing
//! - [`paths`]: Path helpers (tilde expansion, destination resolution)

pub mod files;
pub mod paths;
