//! Mock namespace implementation for testing without a real device
//!
//! This module provides an in-memory [`Namespace`] that simulates the host's
//! device list with a configurable folder tree per device, including nodes
//! that fail when browsed the way printers and scanners do on Windows.

use crate::core::error::{ListerError, Result};
use crate::device::namespace::{ItemFilter, Namespace};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// Parent ID of every top-level device
pub const COMPUTER_ID: &str = "COMPUTER";

/// Prefix of every addressable name, like the Windows address bar shows it
pub const COMPUTER_ADDRESS: &str = "This PC";

/// Represents a device, folder or file in the mock namespace
#[derive(Debug, Clone)]
pub struct MockObject {
    /// Unique object ID
    pub object_id: String,
    /// Parent object ID (`COMPUTER` for devices)
    pub parent_id: String,
    /// Display name
    pub name: String,
    /// Whether this is a container
    pub is_folder: bool,
}

/// In-memory device tree
#[derive(Debug, Default)]
pub struct MockNamespace {
    /// All objects indexed by object ID
    objects: HashMap<String, MockObject>,
    /// Children index: parent_id -> Vec<object_id>, in insertion order
    children_index: HashMap<String, Vec<String>>,
    /// Objects whose enumeration fails
    enumeration_errors: HashSet<String>,
    /// Objects whose display name cannot be read
    name_errors: HashSet<String>,
    /// Whether listing the devices themselves fails
    device_list_error: bool,
    /// Display name lookups per object, to observe what was probed
    name_calls: RefCell<HashMap<String, usize>>,
    next_id: usize,
}

impl MockNamespace {
    /// Create an empty namespace (no devices attached)
    pub fn new() -> Self {
        Self::default()
    }

    fn add_object(&mut self, parent_id: &str, name: &str, is_folder: bool) -> String {
        self.next_id += 1;
        let object_id = format!("o{}", self.next_id);

        self.objects.insert(
            object_id.clone(),
            MockObject {
                object_id: object_id.clone(),
                parent_id: parent_id.to_string(),
                name: name.to_string(),
                is_folder,
            },
        );
        self.children_index
            .entry(parent_id.to_string())
            .or_default()
            .push(object_id.clone());
        object_id
    }

    /// Attach a device and return its ID
    pub fn add_device(&mut self, name: &str) -> String {
        self.add_object(COMPUTER_ID, name, true)
    }

    /// Add a folder below `parent_id` and return its ID
    pub fn add_folder(&mut self, parent_id: &str, name: &str) -> String {
        self.add_object(parent_id, name, true)
    }

    /// Add a file below `parent_id` and return its ID
    pub fn add_file(&mut self, parent_id: &str, name: &str) -> String {
        self.add_object(parent_id, name, false)
    }

    /// Add several files below `parent_id`
    pub fn add_files(&mut self, parent_id: &str, names: &[&str]) {
        for name in names {
            self.add_file(parent_id, name);
        }
    }

    /// Attach an iPhone-shaped device and return the ID of its DCIM folder
    pub fn add_iphone(&mut self, name: &str) -> String {
        let device = self.add_device(name);
        let storage = self.add_folder(&device, "Internal Storage");
        self.add_folder(&storage, "DCIM")
    }

    /// Make enumerating the children of `object_id` fail
    pub fn fail_enumeration(&mut self, object_id: &str) {
        self.enumeration_errors.insert(object_id.to_string());
    }

    /// Make reading the display name of `object_id` fail
    pub fn fail_display_name(&mut self, object_id: &str) {
        self.name_errors.insert(object_id.to_string());
    }

    /// Make listing the devices fail
    pub fn fail_device_list(&mut self) {
        self.device_list_error = true;
    }

    /// How many times the display name of `object_id` was requested
    pub fn display_name_calls(&self, object_id: &str) -> usize {
        self.name_calls
            .borrow()
            .get(object_id)
            .copied()
            .unwrap_or(0)
    }

    /// Get an object by ID
    pub fn get_object(&self, object_id: &str) -> Option<&MockObject> {
        self.objects.get(object_id)
    }

    /// Count files only
    pub fn file_count(&self) -> usize {
        self.objects.values().filter(|o| !o.is_folder).count()
    }

    fn object(&self, object_id: &str) -> Result<&MockObject> {
        self.objects
            .get(object_id)
            .ok_or_else(|| ListerError::probe(object_id, "no such object"))
    }

    fn child_ids(&self, parent_id: &str) -> impl Iterator<Item = &String> {
        self.children_index.get(parent_id).into_iter().flatten()
    }
}

impl Namespace for MockNamespace {
    type Node = String;

    fn devices(&self) -> Result<Vec<String>> {
        if self.device_list_error {
            return Err(ListerError::Enumeration(
                "simulated device list failure".to_string(),
            ));
        }
        Ok(self.child_ids(COMPUTER_ID).cloned().collect())
    }

    fn children(&self, node: &String, filter: ItemFilter) -> Result<Vec<String>> {
        let parent = self.object(node)?;
        if !parent.is_folder || self.enumeration_errors.contains(node) {
            return Err(ListerError::probe(
                &parent.name,
                "object does not support enumeration",
            ));
        }

        Ok(self
            .child_ids(node)
            .filter(|id| {
                self.objects
                    .get(*id)
                    .is_some_and(|o| filter.accepts(o.is_folder))
            })
            .cloned()
            .collect())
    }

    fn display_name(&self, node: &String) -> Result<String> {
        *self.name_calls.borrow_mut().entry(node.clone()).or_default() += 1;
        if self.name_errors.contains(node) {
            return Err(ListerError::probe(node, "display name unavailable"));
        }
        Ok(self.object(node)?.name.clone())
    }

    fn addressable_name(&self, node: &String) -> Result<String> {
        let mut parts = Vec::new();
        let mut current = self.object(node)?;

        loop {
            parts.push(current.name.as_str());
            if current.parent_id == COMPUTER_ID {
                break;
            }
            current = self.object(&current.parent_id)?;
        }

        parts.push(COMPUTER_ADDRESS);
        parts.reverse();
        Ok(parts.join("\\"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_namespace_basic() {
        let mut ns = MockNamespace::new();
        let dcim = ns.add_iphone("John's iPhone");
        let folder = ns.add_folder(&dcim, "100APPLE");
        ns.add_files(&folder, &["IMG_0001.JPG", "IMG_0002.JPG"]);

        assert_eq!(ns.devices().unwrap().len(), 1);
        assert_eq!(ns.file_count(), 2);
        assert_eq!(ns.get_object(&folder).unwrap().name, "100APPLE");
    }

    #[test]
    fn test_children_filter_and_order() {
        let mut ns = MockNamespace::new();
        let device = ns.add_device("Phone");
        ns.add_file(&device, "readme.txt");
        let b = ns.add_folder(&device, "B");
        let a = ns.add_folder(&device, "A");

        assert_eq!(ns.children(&device, ItemFilter::Folders).unwrap(), vec![b, a]);
        assert_eq!(ns.children(&device, ItemFilter::NonFolders).unwrap().len(), 1);
    }

    #[test]
    fn test_addressable_name() {
        let mut ns = MockNamespace::new();
        let dcim = ns.add_iphone("John's iPhone");
        let folder = ns.add_folder(&dcim, "100APPLE");
        let file = ns.add_file(&folder, "IMG_0001.JPG");

        assert_eq!(
            ns.addressable_name(&file).unwrap(),
            r"This PC\John's iPhone\Internal Storage\DCIM\100APPLE\IMG_0001.JPG"
        );
    }

    #[test]
    fn test_files_cannot_be_enumerated() {
        let mut ns = MockNamespace::new();
        let device = ns.add_device("Phone");
        let file = ns.add_file(&device, "IMG_0001.JPG");

        assert!(ns.children(&file, ItemFilter::NonFolders).is_err());
    }

    #[test]
    fn test_enumeration_failure_simulation() {
        let mut ns = MockNamespace::new();
        let device = ns.add_device("Scanner");
        ns.fail_enumeration(&device);

        assert!(matches!(
            ns.children(&device, ItemFilter::Folders),
            Err(ListerError::Probe { .. })
        ));
    }

    #[test]
    fn test_display_name_calls_are_counted() {
        let mut ns = MockNamespace::new();
        let device = ns.add_device("Phone");

        ns.display_name(&device).unwrap();
        ns.display_name(&device).unwrap();
        assert_eq!(ns.display_name_calls(&device), 2);
    }
}
