//! Device tree walking
//!
//! Gathers the new photos below a device's DCIM folder, grouped by the folder
//! they live in (`100APPLE`, `101APPLE`, ...), and writes them out as the
//! listing.

use crate::core::error::Result;
use crate::core::horizon::Horizon;
use crate::core::index::{is_photo_like, OrderKey};
use crate::device::namespace::{ItemFilter, Namespace};
use log::{debug, trace};
use std::io::Write;

/// New photos of one device folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoBucket {
    /// Addressable name of the folder
    pub folder: String,
    /// Addressable names of the new photos, ascending
    pub photos: Vec<String>,
}

/// New photos grouped by folder, in device enumeration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoBuckets {
    buckets: Vec<PhotoBucket>,
}

impl PhotoBuckets {
    pub fn buckets(&self) -> &[PhotoBucket] {
        &self.buckets
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of photos across all folders
    pub fn photo_count(&self) -> usize {
        self.buckets.iter().map(|b| b.photos.len()).sum()
    }

    /// Photos of the folder with the given addressable name
    pub fn photos_in(&self, folder: &str) -> Option<&[String]> {
        self.buckets
            .iter()
            .find(|b| b.folder == folder)
            .map(|b| b.photos.as_slice())
    }

    /// Add a folder's photos. Empty folders are not kept.
    fn push(&mut self, folder: String, mut photos: Vec<String>) {
        if photos.is_empty() {
            return;
        }
        photos.sort();
        self.buckets.push(PhotoBucket { folder, photos });
    }

    /// Write the listing: one photo per line, a blank line after each folder
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for bucket in &self.buckets {
            for photo in &bucket.photos {
                writeln!(out, "{}", photo)?;
            }
            writeln!(out)?;
        }
        out.flush()
    }
}

/// Collect the photos below `dcim` that lie beyond `horizon`.
///
/// Only the immediate sub-folders of DCIM are visited. A file counts as a
/// photo when its extension ends in `JPG`; its key comes from its display
/// name.
pub fn collect_new_photos<N: Namespace>(
    ns: &N,
    dcim: &N::Node,
    horizon: &Horizon,
) -> Result<PhotoBuckets> {
    let mut buckets = PhotoBuckets::default();

    for folder in ns.children(dcim, ItemFilter::Folders)? {
        let folder_address = ns.addressable_name(&folder)?;
        let mut photos = Vec::new();

        for item in ns.children(&folder, ItemFilter::NonFolders)? {
            let name = ns.display_name(&item)?;
            if !is_photo_like(&name) {
                trace!("Skipping non-photo '{}'", name);
                continue;
            }
            if horizon.admits(&OrderKey::from_filename(&name)) {
                photos.push(ns.addressable_name(&item)?);
            }
        }

        debug!("{}: {} new photo(s)", folder_address, photos.len());
        buckets.push(folder_address, photos);
    }

    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdb::MockNamespace;

    const A: &str = r"This PC\Phone\Internal Storage\DCIM\A";
    const B: &str = r"This PC\Phone\Internal Storage\DCIM\B";

    fn device_with(folders: Vec<(&str, Vec<&str>)>) -> (MockNamespace, String) {
        let mut ns = MockNamespace::new();
        let dcim = ns.add_iphone("Phone");
        for (folder, files) in folders {
            let id = ns.add_folder(&dcim, folder);
            ns.add_files(&id, &files);
        }
        (ns, dcim)
    }

    #[test]
    fn test_only_photos_beyond_horizon() {
        let (ns, dcim) = device_with(vec![
            ("A", vec!["IMG_0049.JPG", "IMG_0051.JPG"]),
            ("B", vec!["IMG_0100.JPG"]),
        ]);

        let buckets =
            collect_new_photos(&ns, &dcim, &Horizon::After(OrderKey::from_index(50))).unwrap();

        assert_eq!(buckets.buckets().len(), 2);
        assert_eq!(
            buckets.photos_in(A).unwrap(),
            &[format!(r"{}\IMG_0051.JPG", A)]
        );
        assert_eq!(
            buckets.photos_in(B).unwrap(),
            &[format!(r"{}\IMG_0100.JPG", B)]
        );
    }

    #[test]
    fn test_photos_sorted_within_folder() {
        let (ns, dcim) = device_with(vec![(
            "A",
            vec!["IMG_0003.JPG", "IMG_0001.JPG", "IMG_0002.JPG"],
        )]);

        let buckets = collect_new_photos(&ns, &dcim, &Horizon::Unbounded).unwrap();
        let names: Vec<&str> = buckets.photos_in(A).unwrap().iter().map(|s| s.as_str()).collect();
        assert_eq!(
            names,
            vec![
                format!(r"{}\IMG_0001.JPG", A),
                format!(r"{}\IMG_0002.JPG", A),
                format!(r"{}\IMG_0003.JPG", A),
            ]
        );
    }

    #[test]
    fn test_folders_keep_device_order() {
        let (ns, dcim) = device_with(vec![
            ("B", vec!["IMG_0002.JPG"]),
            ("A", vec!["IMG_0001.JPG"]),
        ]);

        let buckets = collect_new_photos(&ns, &dcim, &Horizon::Unbounded).unwrap();
        let folders: Vec<&str> = buckets.buckets().iter().map(|b| b.folder.as_str()).collect();
        assert_eq!(folders, vec![B, A]);
    }

    #[test]
    fn test_non_photos_and_empty_folders_skipped() {
        let (ns, dcim) = device_with(vec![
            ("A", vec!["IMG_0001.MOV", "IMG_0001.AAE", "IMG_0002.HEIC"]),
            ("B", vec!["img_0005.jpg"]),
        ]);

        let buckets = collect_new_photos(&ns, &dcim, &Horizon::Unbounded).unwrap();
        assert_eq!(buckets.buckets().len(), 1);
        assert_eq!(buckets.photo_count(), 1);
        assert!(buckets.photos_in(A).is_none());
    }

    #[test]
    fn test_unconventional_names_only_without_horizon() {
        let (ns, dcim) = device_with(vec![("A", vec!["holiday.jpg", "IMG_0001.JPG"])]);

        let all = collect_new_photos(&ns, &dcim, &Horizon::Unbounded).unwrap();
        assert_eq!(all.photo_count(), 2);

        let newer = collect_new_photos(&ns, &dcim, &Horizon::After(OrderKey::Unordered)).unwrap();
        assert_eq!(newer.photo_count(), 1);
    }

    #[test]
    fn test_wide_index_is_newer_than_horizon() {
        let (ns, dcim) = device_with(vec![(
            "A",
            vec!["IMG_0049.JPG", "IMG_99999999999999999999.JPG"],
        )]);

        let buckets =
            collect_new_photos(&ns, &dcim, &Horizon::After(OrderKey::from_index(50))).unwrap();
        assert_eq!(
            buckets.photos_in(A).unwrap(),
            &[format!(r"{}\IMG_99999999999999999999.JPG", A)]
        );
    }

    #[test]
    fn test_files_directly_in_dcim_ignored() {
        let (mut ns, dcim) = device_with(vec![]);
        ns.add_file(&dcim, "IMG_0001.JPG");

        let buckets = collect_new_photos(&ns, &dcim, &Horizon::Unbounded).unwrap();
        assert!(buckets.is_empty());
    }

    #[test]
    fn test_enumeration_failure_propagates() {
        let (mut ns, dcim) = device_with(vec![("A", vec!["IMG_0001.JPG"])]);
        let broken = ns.add_folder(&dcim, "B");
        ns.fail_enumeration(&broken);

        assert!(collect_new_photos(&ns, &dcim, &Horizon::Unbounded).is_err());
    }

    #[test]
    fn test_write_to_format() {
        let (ns, dcim) = device_with(vec![
            ("A", vec!["IMG_0002.JPG", "IMG_0001.JPG"]),
            ("B", vec!["IMG_0100.JPG"]),
        ]);
        let buckets = collect_new_photos(&ns, &dcim, &Horizon::Unbounded).unwrap();

        let mut out = Vec::new();
        buckets.write_to(&mut out).unwrap();

        let expected = format!(
            "{a}\\IMG_0001.JPG\n{a}\\IMG_0002.JPG\n\n{b}\\IMG_0100.JPG\n\n",
            a = A,
            b = B
        );
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_write_empty_listing() {
        let mut out = Vec::new();
        PhotoBuckets::default().write_to(&mut out).unwrap();
        assert!(out.is_empty());
    }
}
