//! CLI module for the photo lister
//!
//! # Submodules
//!
//! - `args` - Command-line argument definitions using clap
//! - `commands` - Turns parsed arguments into a listing run

pub mod args;
pub mod commands;

pub use args::Args;
pub use commands::{log_filter, logger_builder, run_command};
