//! Predefined namespaces for testing
//!
//! Each scenario builds a [`MockNamespace`] shaped like a situation seen on a
//! real host: a single phone, no phone at all, a phone hidden behind printers
//! that cannot be browsed, two phones at once.

use super::mock_namespace::MockNamespace;

/// Scenario: one phone with two photos in `DCIM\100APPLE`
pub fn johns_phone() -> MockNamespace {
    let mut ns = MockNamespace::new();
    let dcim = ns.add_iphone("John's Phone");
    let folder = ns.add_folder(&dcim, "100APPLE");
    ns.add_files(&folder, &["IMG_0029.JPG", "IMG_0031.JPG"]);
    ns
}

/// Scenario: nothing phone-like attached, only local drives
pub fn no_phone() -> MockNamespace {
    let mut ns = MockNamespace::new();
    let c = ns.add_device("Local Disk (C:)");
    ns.add_folder(&c, "Windows");
    ns.add_folder(&c, "Users");
    ns.add_device("Network");
    ns
}

/// Scenario: devices that cannot be browsed come before the phone.
///
/// The printer refuses enumeration, the scanner hides its name and the
/// camera has storage without DCIM.
pub fn phone_behind_printers() -> MockNamespace {
    let mut ns = MockNamespace::new();

    let printer = ns.add_device("Office Printer");
    ns.fail_enumeration(&printer);

    let scanner = ns.add_device("Scanner");
    ns.add_folder(&scanner, "Internal Storage");
    ns.fail_display_name(&scanner);

    let camera = ns.add_device("Webcam");
    let storage = ns.add_folder(&camera, "Internal Storage");
    ns.add_folder(&storage, "Recordings");

    let dcim = ns.add_iphone("John's iPhone");
    let first = ns.add_folder(&dcim, "100APPLE");
    ns.add_files(&first, &["IMG_0001.JPG", "IMG_0002.JPG", "IMG_0002.AAE"]);
    let second = ns.add_folder(&dcim, "101APPLE");
    ns.add_files(&second, &["IMG_1001.JPG", "IMG_1001.MOV"]);
    ns
}

/// Scenario: two phones attached at the same time
pub fn two_phones() -> MockNamespace {
    let mut ns = MockNamespace::new();
    for name in ["First iPhone", "Second iPhone"] {
        let dcim = ns.add_iphone(name);
        let folder = ns.add_folder(&dcim, "100APPLE");
        ns.add_files(&folder, &["IMG_0001.JPG"]);
    }
    ns
}
