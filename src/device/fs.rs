//! Filesystem-backed namespace
//!
//! Treats every entry of a root directory as a device and the directories
//! below it as the device's folders. This fits MTP mounts such as
//! `$XDG_RUNTIME_DIR/gvfs`, where each attached phone appears as one
//! directory, and plain directory trees laid out the same way.

use crate::core::error::{ListerError, Result};
use crate::device::namespace::{ItemFilter, Namespace};
use log::{debug, trace};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable pointing at the per-user runtime directory
const RUNTIME_DIR_VAR: &str = "XDG_RUNTIME_DIR";

/// Namespace over a directory whose entries are devices
#[derive(Debug, Clone)]
pub struct FsNamespace {
    root: PathBuf,
}

impl FsNamespace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The gvfs mount directory of the current user, if the runtime
    /// directory is known
    pub fn gvfs() -> Option<Self> {
        let runtime_dir = std::env::var_os(RUNTIME_DIR_VAR)?;
        Some(Self::new(Path::new(&runtime_dir).join("gvfs")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Entries of `dir` that pass `filter`, sorted by name
    fn entries(&self, dir: &Path, filter: ItemFilter) -> Result<Vec<PathBuf>> {
        let read_dir =
            fs::read_dir(dir).map_err(|e| ListerError::probe(dir.display().to_string(), e))?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };
            // Follows symlinks, so a linked folder is still a folder
            let is_folder = entry.path().is_dir();
            if filter.accepts(is_folder) {
                entries.push(entry.path());
            }
        }

        entries.sort();
        trace!("{} {:?} entries in {}", entries.len(), filter, dir.display());
        Ok(entries)
    }
}

impl Namespace for FsNamespace {
    type Node = PathBuf;

    fn devices(&self) -> Result<Vec<PathBuf>> {
        let read_dir = fs::read_dir(&self.root).map_err(|e| {
            ListerError::Enumeration(format!("{}: {}", self.root.display(), e))
        })?;

        let mut devices: Vec<PathBuf> = read_dir
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .collect();
        devices.sort();
        Ok(devices)
    }

    fn children(&self, node: &PathBuf, filter: ItemFilter) -> Result<Vec<PathBuf>> {
        self.entries(node, filter)
    }

    fn display_name(&self, node: &PathBuf) -> Result<String> {
        node.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| ListerError::probe(node.display().to_string(), "path has no name"))
    }

    fn addressable_name(&self, node: &PathBuf) -> Result<String> {
        Ok(node.display().to_string())
    }
}
