//! Configuration module for the photo lister
//!
//! The configuration is a single YAML mapping from a lowercase fragment of a
//! phone's name to the local directory its photos are copied to:
//!
//! ```yaml
//! johnsphone: D:/Photos/John
//! ipad: D:/Photos/Tablet
//! ```
//!
//! The file is looked up next to the executable as `name-to-path.yaml` unless
//! a path is given explicitly. Entries are matched in document order.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file name, resolved relative to the executable's directory
pub const CONFIG_FILE_NAME: &str = "name-to-path.yaml";

/// Get the standard configuration file path.
///
/// Returns `<directory of the running executable>/name-to-path.yaml`.
pub fn get_config_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// One configured device-name fragment and its destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationEntry {
    /// Lowercase substring matched against the device's lowercased display name
    pub key: String,
    /// Local directory holding photos already copied from that device
    pub destination: PathBuf,
}

impl DestinationEntry {
    pub fn new(key: &str, destination: impl Into<PathBuf>) -> Self {
        Self {
            key: key.to_lowercase(),
            destination: destination.into(),
        }
    }
}

/// Ordered name-to-path configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestinationConfig {
    entries: Vec<DestinationEntry>,
}

impl DestinationConfig {
    /// Create a configuration from entries, keeping their order
    pub fn new(entries: Vec<DestinationEntry>) -> Self {
        Self { entries }
    }

    /// All entries in match order
    pub fn entries(&self) -> &[DestinationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the destination for a device display name.
    ///
    /// The first entry whose key occurs in the lowercased name wins. Keys are
    /// also tried against the name with spaces and punctuation removed, so
    /// `johnsphone` finds "John's Phone".
    pub fn destination_for(&self, device_name: &str) -> Option<&Path> {
        let name_lower = device_name.to_lowercase();
        let name_compact: String = name_lower
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();

        self.entries
            .iter()
            .find(|entry| name_lower.contains(&entry.key) || name_compact.contains(&entry.key))
            .map(|entry| entry.destination.as_path())
    }

    /// Parse a configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        if is_blank_document(content) {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e.to_string()))?;

        let config = Self::from_yaml_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;

        log::debug!(
            "Loaded {} destination(s) from {}",
            config.len(),
            path.display()
        );
        Ok(config)
    }

    /// Load configuration from the standard location next to the executable
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = get_config_path().ok_or(ConfigError::ConfigDirNotFound)?;
        Self::load(path)
    }
}

/// True when the document has nothing but whitespace and comments
fn is_blank_document(content: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#') || line == "---")
}

impl<'de> Deserialize<'de> for DestinationConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(DestinationVisitor)
    }
}

/// Visits the mapping entry by entry so document order survives
struct DestinationVisitor;

impl<'de> Visitor<'de> for DestinationVisitor {
    type Value = DestinationConfig;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a mapping of device name fragments to directories")
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(DestinationConfig::default())
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, destination)) = map.next_entry::<String, PathBuf>()? {
            entries.push(DestinationEntry::new(&key, destination));
        }
        Ok(DestinationConfig { entries })
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    /// Configuration file was not found at the specified path
    FileNotFound(PathBuf),
    /// Failed to read the configuration file
    ReadError(PathBuf, String),
    /// Failed to parse the configuration file (invalid YAML or wrong shape)
    ParseError(PathBuf, String),
    /// Could not determine where the executable lives
    ConfigDirNotFound,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ReadError(path, err) => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::ParseError(path, err) => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::ConfigDirNotFound => {
                write!(f, "Could not determine configuration directory")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
