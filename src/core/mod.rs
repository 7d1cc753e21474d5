//! Core functionality module
//!
//! This module contains the listing logic: filename ordering, the local
//! horizon, the device walk and the orchestration tying them together.
//!
//! # Submodules
//!
//! - `config` - Name-to-path configuration loading
//! - `error` - Error types and result aliases
//! - `horizon` - Newest photo already on the local disk
//! - `index` - Ordering keys derived from photo filenames
//! - `lister` - One listing run from device lookup to output
//! - `report` - Verbose progress reporting
//! - `walker` - Collecting new photos below DCIM

pub mod config;
pub mod error;
pub mod horizon;
pub mod index;
pub mod lister;
pub mod report;
pub mod walker;
