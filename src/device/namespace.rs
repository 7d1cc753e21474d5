//! Virtual namespace abstraction
//!
//! Phones show up on the host as nodes of a virtual folder tree rather than as
//! ordinary drives. This module defines the small slice of that tree the lister
//! needs, so the Windows Portable Devices backend, a mounted filesystem and the
//! in-memory test namespace are interchangeable.
//!
//! # Architecture
//!
//! - `Namespace` - enumerates devices and browses their folders
//! - `ItemFilter` - folders or non-folders, as the platform enumerates them
//!
//! Enumeration hands back bound child nodes, so there is no separate bind step.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use phone_photo_lister::device::namespace::{ItemFilter, Namespace};
//!
//! fn print_top_folders<N: Namespace>(ns: &N) -> phone_photo_lister::core::error::Result<()> {
//!     for device in ns.devices()? {
//!         for folder in ns.children(&device, ItemFilter::Folders)? {
//!             println!("{}", ns.addressable_name(&folder)?);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

use crate::core::error::Result;
use std::fmt::Debug;

/// Which kind of children to enumerate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemFilter {
    /// Only containers (storages, folders)
    Folders,
    /// Everything that is not a container
    NonFolders,
}

impl ItemFilter {
    /// Whether an item with the given folder flag passes this filter
    pub fn accepts(&self, is_folder: bool) -> bool {
        match self {
            ItemFilter::Folders => is_folder,
            ItemFilter::NonFolders => !is_folder,
        }
    }
}

/// A hierarchical namespace of attached devices.
///
/// Display names are human labels and may be localized; addressable names are
/// stable and identify a node well enough to be pasted into a copy command.
pub trait Namespace {
    /// Handle to a node of the namespace. Only valid during one run.
    type Node: Clone + Debug;

    /// Enumerate the top-level devices, in platform order
    fn devices(&self) -> Result<Vec<Self::Node>>;

    /// Enumerate and bind the children of `node` that pass `filter`,
    /// in platform order
    fn children(&self, node: &Self::Node, filter: ItemFilter) -> Result<Vec<Self::Node>>;

    /// Human-readable label of `node`
    fn display_name(&self, node: &Self::Node) -> Result<String>;

    /// Stable, non-localized identifier of `node`
    fn addressable_name(&self, node: &Self::Node) -> Result<String>;

    /// First child folder of `node`, if it has any
    fn first_folder(&self, node: &Self::Node) -> Result<Option<Self::Node>> {
        Ok(self
            .children(node, ItemFilter::Folders)?
            .into_iter()
            .next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_filter_accepts() {
        assert!(ItemFilter::Folders.accepts(true));
        assert!(!ItemFilter::Folders.accepts(false));
        assert!(ItemFilter::NonFolders.accepts(false));
        assert!(!ItemFilter::NonFolders.accepts(true));
    }
}
