//! Error types for the photo lister
//!
//! Only a few of these ever reach the user. Probe failures are absorbed by the
//! device locator and an unreadable destination falls back to listing
//! everything, see [`crate::core::lister`].

use crate::core::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the photo lister
#[derive(Error, Debug)]
pub enum ListerError {
    /// The name-to-path configuration could not be loaded (incremental mode only)
    #[error("Configuration unavailable: {0}")]
    ConfigurationMissing(#[from] ConfigError),

    /// A namespace operation failed while inspecting a node
    #[error("Failed to probe '{node}': {message}")]
    Probe { node: String, message: String },

    /// The top-level device list could not be enumerated at all
    #[error("Failed to enumerate devices: {0}")]
    Enumeration(String),

    /// The configured local destination does not exist or is not a directory
    #[error("Local photo directory '{0}' is not readable")]
    DestinationUnreadable(PathBuf),

    /// More than one device matched and the selection strategy forbids it
    #[error("More than one device looks like a phone: {}", .0.join(", "))]
    MultipleDevices(Vec<String>),

    /// General I/O error (writing the listing)
    #[error("IO error: {0}")]
    IoError(String),

    /// Windows API error
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    WindowsError(#[from] windows::core::Error),
}

impl ListerError {
    /// Build a probe error for the named node
    pub fn probe(node: impl Into<String>, message: impl std::fmt::Display) -> Self {
        ListerError::Probe {
            node: node.into(),
            message: message.to_string(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ListerError>;

impl From<std::io::Error> for ListerError {
    fn from(err: std::io::Error) -> Self {
        ListerError::IoError(err.to_string())
    }
}
