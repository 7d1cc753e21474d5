//! Local horizon scanning
//!
//! The horizon is the most advanced photo already copied to the computer.
//! Device photos at or below it are considered copied.

use crate::core::error::{ListerError, Result};
use crate::core::index::OrderKey;
use crate::core::report::Reporter;
use log::{debug, trace};
use rayon::prelude::*;
use std::fmt;
use std::path::Path;
use walkdir::WalkDir;

/// Boundary below which device photos count as already copied
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Horizon {
    /// Nothing has been copied yet; every photo is listed
    #[default]
    Unbounded,
    /// Only photos with a strictly greater key are new
    After(OrderKey),
}

impl Horizon {
    /// Whether a photo with `key` lies beyond the horizon
    pub fn admits(&self, key: &OrderKey) -> bool {
        match self {
            Horizon::Unbounded => true,
            Horizon::After(horizon) => key > horizon,
        }
    }

    /// Horizon for the highest key seen, if any file was seen at all
    pub fn from_max(max: Option<OrderKey>) -> Self {
        max.map_or(Horizon::Unbounded, Horizon::After)
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Horizon::Unbounded => write!(f, "unbounded"),
            Horizon::After(key) => write!(f, "{}", key),
        }
    }
}

/// Walk `path` recursively and return the horizon of the files found there.
///
/// An empty tree gives [`Horizon::Unbounded`]. A path that is missing or not
/// a directory is reported as [`ListerError::DestinationUnreadable`] so the
/// caller can decide to list everything. Unreadable entries below the root
/// are skipped.
pub fn scan_local_horizon(path: &Path, reporter: &dyn Reporter) -> Result<Horizon> {
    if !path.is_dir() {
        return Err(ListerError::DestinationUnreadable(path.to_path_buf()));
    }

    let files = collect_file_names(path);
    debug!("Found {} local files under {}", files.len(), path.display());

    let max = files
        .par_iter()
        .map(|name| OrderKey::from_filename(name))
        .max();
    let horizon = Horizon::from_max(max);

    match &horizon {
        Horizon::After(key) => match key.index() {
            Some(index) => reporter.report(&format!(
                "The most recent image already on the computer had index {}.",
                index
            )),
            None => reporter.report(&format!(
                "No IMG_ files found in {}; only numbered photos will be listed.",
                path.display()
            )),
        },
        Horizon::Unbounded => reporter.report(&format!(
            "No files found in {}; listing every photo.",
            path.display()
        )),
    }

    Ok(horizon)
}

/// File names (not paths) of every regular file under `root`
fn collect_file_names(root: &Path) -> Vec<String> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            trace!("Local file: {}", entry.path().display());
            entry.file_name().to_string_lossy().into_owned()
        })
        .collect()
}
