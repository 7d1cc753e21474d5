//! Device interaction module
//!
//! # Submodules
//!
//! - `namespace` - The device tree abstraction every backend implements
//! - `locator` - Finding the phone by its folder fingerprint
//! - `fs` - Directory-backed namespace (MTP mounts, test trees)
//! - `wpd` - Windows Portable Devices namespace (Windows only)
//!
//! The in-memory namespace used by tests lives in [`crate::testdb`].

pub mod fs;
pub mod locator;
pub mod namespace;
#[cfg(windows)]
pub mod wpd;

pub use fs::FsNamespace;
pub use locator::{locate_device, DeviceMatch, ProbeResult, SelectionStrategy};
pub use namespace::{ItemFilter, Namespace};
#[cfg(windows)]
pub use wpd::WpdNamespace;
