//! Phone Photo Lister Library
//!
//! Lists the photos on an attached phone that have not been copied to the
//! local disk yet. "New" is decided by the number in the `IMG_<n>.JPG`
//! filenames, not by timestamps: every photo numbered above the newest one in
//! the phone's local directory is listed.
//!
//! # Architecture
//!
//! - [`core`] - Filename ordering, local horizon, device walk, orchestration
//! - [`device`] - Device namespaces (Windows Portable Devices, directories)
//!   and the phone locator
//! - [`cli`] - Command-line interface (only used by the binary)
//! - [`testdb`] - In-memory namespace and scenarios for testing
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use phone_photo_lister::core::config::DestinationConfig;
//! use phone_photo_lister::core::lister::{run_listing, ListingRequest};
//! use phone_photo_lister::core::report::LogReporter;
//! use phone_photo_lister::device::FsNamespace;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = DestinationConfig::load_default()?;
//!     let ns = FsNamespace::new("/run/user/1000/gvfs");
//!
//!     let mut out = std::io::stdout();
//!     let outcome = run_listing(&ns, &ListingRequest::incremental(config), &LogReporter, &mut out)?;
//!     if !outcome.device_found() {
//!         eprintln!("No phone attached");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Platform Support
//!
//! On Windows the phone is found through the Windows Portable Devices API.
//! Elsewhere any directory whose sub-directories are devices can be browsed,
//! such as a gvfs MTP mount.

pub mod cli;
pub mod core;
pub mod device;
pub mod testdb;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
