//! Filename index parsing
//!
//! iOS names photos `IMG_<n>.JPG` with `n` increasing in capture order, and
//! the virtual folder API does not give reliable creation times for phones.
//! The number embedded in the name is therefore the only ordering we trust.
//!
//! Indices are compared as integers of any width: `IMG_9999` sorts before
//! `IMG_10000`.

use std::cmp::Ordering;
use std::fmt;

/// Literal that precedes the capture index in a photo's basename
pub const PHOTO_PREFIX: &str = "IMG_";

/// Photo extension, uppercase and including the dot
pub const PHOTO_EXTENSION: &str = ".JPG";

/// Text sidecar extension, uppercase and including the dot
pub const SIDECAR_EXTENSION: &str = ".TXT";

/// Capture index as written after `IMG_`, kept as digits without leading
/// zeros so that any width compares numerically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhotoIndex {
    digits: String,
}

impl PhotoIndex {
    /// Parse a non-empty run of ASCII digits
    fn from_digits(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let significant = digits.trim_start_matches('0');
        let digits = if significant.is_empty() { "0" } else { significant };
        Some(Self {
            digits: digits.to_string(),
        })
    }

    /// Significant digits, `"0"` for an all-zero index
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// The index as a machine integer, if it fits
    pub fn as_u64(&self) -> Option<u64> {
        self.digits.parse().ok()
    }
}

impl From<u64> for PhotoIndex {
    fn from(n: u64) -> Self {
        Self {
            digits: n.to_string(),
        }
    }
}

impl Ord for PhotoIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.digits
            .len()
            .cmp(&other.digits.len())
            .then_with(|| self.digits.cmp(&other.digits))
    }
}

impl PartialOrd for PhotoIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PhotoIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0>4}", self.digits)
    }
}

/// Ordering key derived from a photo filename.
///
/// `Unordered` is the minimum and is given to every name that does not follow
/// the `IMG_<digits>.JPG` convention, so such files are never newer than
/// anything.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum OrderKey {
    #[default]
    Unordered,
    Index(PhotoIndex),
}

impl OrderKey {
    /// Key of a conforming name with capture index `n`
    pub fn from_index(n: u64) -> Self {
        OrderKey::Index(PhotoIndex::from(n))
    }

    /// Derive the key for a filename. Never fails.
    ///
    /// Only the last path component is looked at, so full device addresses
    /// can be passed as well.
    pub fn from_filename(filename: &str) -> Self {
        let leaf = leaf_name(filename).to_uppercase();
        let (mut basename, mut ext) = split_extension(&leaf);

        if ext == SIDECAR_EXTENSION {
            // IMG_0042.JPG.TXT and friends describe IMG_0042.JPG
            let (inner_base, inner_ext) = split_extension(basename);
            if inner_ext != PHOTO_EXTENSION {
                return OrderKey::Unordered;
            }
            match inner_base.find(PHOTO_PREFIX) {
                Some(pos) => basename = &inner_base[pos..],
                None => return OrderKey::Unordered,
            }
            ext = inner_ext;
        }

        if ext != PHOTO_EXTENSION {
            return OrderKey::Unordered;
        }

        basename
            .strip_prefix(PHOTO_PREFIX)
            .and_then(PhotoIndex::from_digits)
            .map_or(OrderKey::Unordered, OrderKey::Index)
    }

    /// The capture index, if the name followed the convention
    pub fn index(&self) -> Option<&PhotoIndex> {
        match self {
            OrderKey::Unordered => None,
            OrderKey::Index(index) => Some(index),
        }
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKey::Unordered => write!(f, "none"),
            OrderKey::Index(index) => write!(f, "{}", index),
        }
    }
}

/// True when the name's extension ends in `JPG`, in any case
pub fn is_photo_like(filename: &str) -> bool {
    let leaf = leaf_name(filename);
    let (_, ext) = split_extension(leaf);
    ext.to_ascii_uppercase().ends_with("JPG")
}

/// Last component of a `/` or `\` separated name
fn leaf_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Split at the last dot. Leading dots start a hidden name, not an extension.
fn split_extension(name: &str) -> (&str, &str) {
    let start = name.len() - name.trim_start_matches('.').len();
    match name[start..].rfind('.') {
        Some(pos) => name.split_at(start + pos),
        None => (name, ""),
    }
}
