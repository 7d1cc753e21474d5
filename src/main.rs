//! Phone Photo Lister - CLI Entry Point
//!
//! This binary is a thin wrapper around the library, handling argument
//! parsing and logging setup. The listing goes to stdout, logs to stderr.

use anyhow::Result;
use clap::Parser;
use log::debug;
use phone_photo_lister::cli::{self, Args};

fn main() -> Result<()> {
    let args = Args::parse();

    cli::logger_builder(&args).init();

    debug!("{} v{}", phone_photo_lister::NAME, phone_photo_lister::VERSION);

    cli::run_command(&args)?;
    Ok(())
}
