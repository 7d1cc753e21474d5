//! Command-line argument definitions
//!
//! This module defines the CLI arguments using clap. The tool takes no
//! positional arguments; anything unexpected is a usage error.

use clap::Parser;
use std::path::PathBuf;

/// List the photos on an attached phone that are not on this computer yet
#[derive(Parser, Debug)]
#[command(name = "list-photos-on-phone")]
#[command(version)]
#[command(
    about = "List the photos on an attached phone that have not been copied to this computer yet",
    long_about = "Finds an attached phone with an 'Internal Storage\\DCIM' folder and prints \
                  the photos on it that are newer than the newest photo in the phone's local \
                  directory (configured in name-to-path.yaml). One path per line, a blank \
                  line after each device folder."
)]
pub struct Args {
    /// Report progress (local directory, newest local index, timing) on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// List every photo on the phone, ignoring what is already on disk
    #[arg(short, long)]
    pub all: bool,

    /// Path to the name-to-path configuration file
    /// (default: name-to-path.yaml next to the executable)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Browse devices as sub-directories of DIR instead of the platform's
    /// device list (e.g. a gvfs/MTP mount point)
    #[arg(long, value_name = "DIR")]
    pub device_root: Option<PathBuf>,

    /// Fail instead of picking the first one when several phones are attached
    #[arg(long)]
    pub unique: bool,

    /// Log level: error, warn, info, debug, trace (overrides RUST_LOG; --verbose
    /// reports are still shown)
    #[arg(short, long, value_name = "LEVEL", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: Option<String>,
}
