//! Device location by folder fingerprint
//!
//! An iPhone exposes exactly one storage named `Internal Storage` whose first
//! folder is `DCIM`. Rather than trusting manufacturer strings, every
//! top-level device is probed for that shape. Many nodes under the device
//! list are not storage devices at all and fail when browsed; such failures
//! only reject the candidate.
//!
//! Probing and choosing are separate steps: [`probe_device`] classifies one
//! candidate and a [`SelectionStrategy`] decides which match is used.

use crate::core::error::{ListerError, Result};
use crate::core::report::Reporter;
use crate::device::namespace::Namespace;
use log::{debug, info};

/// Display name of the storage folder a phone must expose first
pub const STORAGE_FOLDER_NAME: &str = "Internal Storage";

/// Display name of the photo folder inside the storage
pub const DCIM_FOLDER_NAME: &str = "DCIM";

/// A device that passed the fingerprint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceMatch<T> {
    /// The DCIM folder
    pub dcim: T,
    /// The storage folder containing DCIM
    pub storage: T,
    /// Human-readable device name (e.g., "John's iPhone")
    pub display_name: String,
}

/// Outcome of probing one candidate device
#[derive(Debug)]
pub enum ProbeResult<T> {
    /// The candidate has `Internal Storage/DCIM`
    Match(DeviceMatch<T>),
    /// The candidate is browsable but shaped differently
    NoMatch { reason: String },
    /// The namespace failed while browsing the candidate
    ProbeError(ListerError),
}

impl<T> ProbeResult<T> {
    pub fn is_match(&self) -> bool {
        matches!(self, ProbeResult::Match(_))
    }

    /// The match, if any
    pub fn into_match(self) -> Option<DeviceMatch<T>> {
        match self {
            ProbeResult::Match(found) => Some(found),
            _ => None,
        }
    }
}

/// Check whether `device` looks like a phone with a DCIM folder
pub fn probe_device<N: Namespace>(
    ns: &N,
    device: &N::Node,
    reporter: &dyn Reporter,
) -> ProbeResult<N::Node> {
    match try_probe(ns, device, reporter) {
        Ok(result) => result,
        Err(e) => {
            debug!("Probe failed, not a phone: {}", e);
            ProbeResult::ProbeError(e)
        }
    }
}

fn try_probe<N: Namespace>(
    ns: &N,
    device: &N::Node,
    reporter: &dyn Reporter,
) -> Result<ProbeResult<N::Node>> {
    let device_name = ns.display_name(device)?;
    debug!("Probing device '{}'", device_name);

    let storage = match ns.first_folder(device)? {
        Some(folder) => folder,
        None => {
            return Ok(ProbeResult::NoMatch {
                reason: format!("'{}' has no folders", device_name),
            })
        }
    };
    let storage_name = ns.display_name(&storage)?;
    if storage_name != STORAGE_FOLDER_NAME {
        return Ok(ProbeResult::NoMatch {
            reason: format!(
                "'{}' starts with '{}', not '{}'",
                device_name, storage_name, STORAGE_FOLDER_NAME
            ),
        });
    }

    let dcim = match ns.first_folder(&storage)? {
        Some(folder) => folder,
        None => {
            reporter.report(&format!(
                "{}'s '{}' has no folders, not a '{}' dir.",
                device_name, storage_name, DCIM_FOLDER_NAME
            ));
            return Ok(ProbeResult::NoMatch {
                reason: format!("'{}' has an empty storage", device_name),
            });
        }
    };
    let dcim_name = ns.display_name(&dcim)?;
    if dcim_name != DCIM_FOLDER_NAME {
        reporter.report(&format!(
            "{}'s '{}' has '{}', not a '{}' dir.",
            device_name, storage_name, dcim_name, DCIM_FOLDER_NAME
        ));
        return Ok(ProbeResult::NoMatch {
            reason: format!("'{}' storage starts with '{}'", device_name, dcim_name),
        });
    }

    Ok(ProbeResult::Match(DeviceMatch {
        dcim,
        storage,
        display_name: device_name,
    }))
}

/// Policy for choosing among matching devices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionStrategy {
    /// Use the first match in enumeration order; later candidates are never
    /// probed and extra phones are ignored
    #[default]
    FirstMatch,
    /// Probe every candidate and fail if more than one matches
    RequireUnique,
}

impl SelectionStrategy {
    /// Pick a device from a sequence of probe results.
    ///
    /// The sequence is consumed lazily, so `FirstMatch` stops probing at the
    /// first match.
    pub fn select<T, I>(self, probes: I) -> Result<Option<DeviceMatch<T>>>
    where
        I: IntoIterator<Item = ProbeResult<T>>,
    {
        let mut matches = probes.into_iter().filter_map(|probe| match probe {
            ProbeResult::Match(found) => Some(found),
            ProbeResult::NoMatch { reason } => {
                debug!("Rejected candidate: {}", reason);
                None
            }
            ProbeResult::ProbeError(_) => None,
        });

        match self {
            SelectionStrategy::FirstMatch => Ok(matches.next()),
            SelectionStrategy::RequireUnique => {
                let all: Vec<DeviceMatch<T>> = matches.collect();
                if all.len() > 1 {
                    return Err(ListerError::MultipleDevices(
                        all.into_iter().map(|m| m.display_name).collect(),
                    ));
                }
                Ok(all.into_iter().next())
            }
        }
    }
}

/// Enumerate the namespace's devices and select one with a DCIM folder.
///
/// Failing to list the devices at all is an error; failures on individual
/// candidates are not.
pub fn locate_device<N: Namespace>(
    ns: &N,
    strategy: SelectionStrategy,
    reporter: &dyn Reporter,
) -> Result<Option<DeviceMatch<N::Node>>> {
    let devices = ns.devices()?;
    debug!("Found {} candidate device(s)", devices.len());

    let found = strategy.select(
        devices
            .iter()
            .map(|device| probe_device(ns, device, reporter)),
    )?;

    match &found {
        Some(device) => info!("Using device '{}'", device.display_name),
        None => debug!("No device with {}/{}", STORAGE_FOLDER_NAME, DCIM_FOLDER_NAME),
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report::{RecordingReporter, SilentReporter};
    use crate::testdb::MockNamespace;

    fn iphone(ns: &mut MockNamespace, name: &str) -> String {
        let device = ns.add_device(name);
        let storage = ns.add_folder(&device, STORAGE_FOLDER_NAME);
        let dcim = ns.add_folder(&storage, DCIM_FOLDER_NAME);
        ns.add_folder(&dcim, "100APPLE");
        device
    }

    #[test]
    fn test_fingerprint_accepted() {
        let mut ns = MockNamespace::new();
        let device = iphone(&mut ns, "John's iPhone");

        let result = probe_device(&ns, &device, &SilentReporter);
        let found = result.into_match().expect("should match");
        assert_eq!(found.display_name, "John's iPhone");
        assert_eq!(ns.display_name(&found.dcim).unwrap(), "DCIM");
        assert_eq!(ns.display_name(&found.storage).unwrap(), "Internal Storage");
    }

    #[test]
    fn test_other_storage_rejected_without_error() {
        let mut ns = MockNamespace::new();
        let device = ns.add_device("USB Stick");
        let disk = ns.add_folder(&device, "Removable Disk");
        ns.add_folder(&disk, "DCIM");

        let result = probe_device(&ns, &device, &SilentReporter);
        assert!(matches!(result, ProbeResult::NoMatch { .. }));
    }

    #[test]
    fn test_storage_name_must_match_exactly() {
        let mut ns = MockNamespace::new();
        let device = ns.add_device("Tablet");
        let storage = ns.add_folder(&device, "Internal Storage 2");
        ns.add_folder(&storage, "DCIM");

        assert!(!probe_device(&ns, &device, &SilentReporter).is_match());

        let mut ns = MockNamespace::new();
        let device = ns.add_device("Tablet");
        let storage = ns.add_folder(&device, "internal storage");
        ns.add_folder(&storage, "DCIM");

        assert!(!probe_device(&ns, &device, &SilentReporter).is_match());
    }

    #[test]
    fn test_only_first_folder_is_considered() {
        let mut ns = MockNamespace::new();
        let device = ns.add_device("Android");
        ns.add_folder(&device, "SD Card");
        let storage = ns.add_folder(&device, STORAGE_FOLDER_NAME);
        ns.add_folder(&storage, DCIM_FOLDER_NAME);

        assert!(!probe_device(&ns, &device, &SilentReporter).is_match());
    }

    #[test]
    fn test_missing_dcim_is_reported() {
        let mut ns = MockNamespace::new();
        let device = ns.add_device("John's iPhone");
        let storage = ns.add_folder(&device, STORAGE_FOLDER_NAME);
        ns.add_folder(&storage, "Documents");
        let reporter = RecordingReporter::new();

        let result = probe_device(&ns, &device, &reporter);
        assert!(matches!(result, ProbeResult::NoMatch { .. }));
        assert!(reporter.contains("has 'Documents', not a 'DCIM' dir."));
    }

    #[test]
    fn test_empty_device_rejected() {
        let mut ns = MockNamespace::new();
        let device = ns.add_device("Printer");

        assert!(matches!(
            probe_device(&ns, &device, &SilentReporter),
            ProbeResult::NoMatch { .. }
        ));
    }

    #[test]
    fn test_failing_probe_is_tagged() {
        let mut ns = MockNamespace::new();
        let device = ns.add_device("Network Printer");
        ns.fail_enumeration(&device);

        let result = probe_device(&ns, &device, &SilentReporter);
        assert!(matches!(
            result,
            ProbeResult::ProbeError(ListerError::Probe { .. })
        ));
    }

    #[test]
    fn test_failing_candidate_does_not_stop_enumeration() {
        let mut ns = MockNamespace::new();
        let printer = ns.add_device("Network Printer");
        ns.fail_enumeration(&printer);
        iphone(&mut ns, "John's iPhone");

        let found = locate_device(&ns, SelectionStrategy::FirstMatch, &SilentReporter)
            .unwrap()
            .expect("phone should be found");
        assert_eq!(found.display_name, "John's iPhone");
    }

    #[test]
    fn test_first_match_wins_and_stops_probing() {
        let mut ns = MockNamespace::new();
        iphone(&mut ns, "First iPhone");
        let second = iphone(&mut ns, "Second iPhone");
        ns.fail_display_name(&second);

        let found = locate_device(&ns, SelectionStrategy::FirstMatch, &SilentReporter)
            .unwrap()
            .unwrap();
        assert_eq!(found.display_name, "First iPhone");
        assert_eq!(ns.display_name_calls(&second), 0);
    }

    #[test]
    fn test_require_unique_rejects_two_phones() {
        let mut ns = MockNamespace::new();
        iphone(&mut ns, "First iPhone");
        iphone(&mut ns, "Second iPhone");

        let result = locate_device(&ns, SelectionStrategy::RequireUnique, &SilentReporter);
        match result {
            Err(ListerError::MultipleDevices(names)) => {
                assert_eq!(names, vec!["First iPhone", "Second iPhone"]);
            }
            other => panic!("expected MultipleDevices, got {:?}", other),
        }
    }

    #[test]
    fn test_require_unique_accepts_single_phone() {
        let mut ns = MockNamespace::new();
        ns.add_device("Printer");
        iphone(&mut ns, "Only iPhone");

        let found = locate_device(&ns, SelectionStrategy::RequireUnique, &SilentReporter)
            .unwrap()
            .unwrap();
        assert_eq!(found.display_name, "Only iPhone");
    }

    #[test]
    fn test_no_devices_is_not_an_error() {
        let ns = MockNamespace::new();
        let found = locate_device(&ns, SelectionStrategy::FirstMatch, &SilentReporter).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_device_list_failure_is_fatal() {
        let mut ns = MockNamespace::new();
        ns.fail_device_list();

        assert!(locate_device(&ns, SelectionStrategy::FirstMatch, &SilentReporter).is_err());
    }

    #[test]
    fn test_select_over_plain_results() {
        let probes = vec![
            ProbeResult::NoMatch {
                reason: "printer".to_string(),
            },
            ProbeResult::ProbeError(ListerError::probe("scanner", "not a folder")),
            ProbeResult::Match(DeviceMatch {
                dcim: 3,
                storage: 2,
                display_name: "phone".to_string(),
            }),
        ];

        let found = SelectionStrategy::FirstMatch.select(probes).unwrap().unwrap();
        assert_eq!(found.dcim, 3);
    }
}
