//! Listing orchestration
//!
//! Ties the pieces together for one run:
//! - find the phone in the namespace
//! - decide the horizon (everything, or beyond what is already on disk)
//! - walk DCIM and write the new photos to the output

use crate::core::config::DestinationConfig;
use crate::core::error::Result;
use crate::core::horizon::{scan_local_horizon, Horizon};
use crate::core::report::Reporter;
use crate::core::walker::{collect_new_photos, PhotoBuckets};
use crate::device::locator::{locate_device, SelectionStrategy};
use crate::device::namespace::Namespace;
use log::{debug, warn};
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// What to list
#[derive(Debug, Clone)]
pub enum ListingMode {
    /// Every photo on the device
    Full,
    /// Only photos newer than the ones in the device's configured destination
    Incremental(DestinationConfig),
}

/// Parameters of one run
#[derive(Debug, Clone)]
pub struct ListingRequest {
    pub mode: ListingMode,
    pub selection: SelectionStrategy,
}

impl ListingRequest {
    pub fn full() -> Self {
        Self {
            mode: ListingMode::Full,
            selection: SelectionStrategy::default(),
        }
    }

    pub fn incremental(config: DestinationConfig) -> Self {
        Self {
            mode: ListingMode::Incremental(config),
            selection: SelectionStrategy::default(),
        }
    }

    pub fn with_selection(mut self, selection: SelectionStrategy) -> Self {
        self.selection = selection;
        self
    }
}

/// Summary of a run.
///
/// Both "no phone attached" and "nothing new" leave the output empty;
/// `device` tells them apart.
#[derive(Debug, Clone, Default)]
pub struct ListingOutcome {
    /// Display name of the device used, `None` if no phone was found
    pub device: Option<String>,
    /// Local destination resolved from the configuration
    pub destination: Option<PathBuf>,
    /// Horizon the device photos were compared against
    pub horizon: Horizon,
    /// The listed photos
    pub buckets: PhotoBuckets,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl ListingOutcome {
    pub fn device_found(&self) -> bool {
        self.device.is_some()
    }
}

/// Run one listing against `ns`, writing new photos to `out`
pub fn run_listing<N: Namespace, W: Write>(
    ns: &N,
    request: &ListingRequest,
    reporter: &dyn Reporter,
    out: &mut W,
) -> Result<ListingOutcome> {
    let start_time = Instant::now();
    let mut outcome = ListingOutcome::default();

    let device = match locate_device(ns, request.selection, reporter)? {
        Some(device) => device,
        None => {
            reporter.report("No connected device has an 'Internal Storage\\DCIM' folder.");
            outcome.elapsed = finish(start_time, reporter);
            return Ok(outcome);
        }
    };

    let (destination, horizon) = match &request.mode {
        ListingMode::Full => (None, Horizon::Unbounded),
        ListingMode::Incremental(config) => {
            resolve_horizon(config, &device.display_name, reporter)
        }
    };
    debug!("Listing photos beyond horizon {}", horizon);

    let buckets = collect_new_photos(ns, &device.dcim, &horizon)?;
    buckets.write_to(out)?;

    outcome.device = Some(device.display_name);
    outcome.destination = destination;
    outcome.horizon = horizon;
    outcome.buckets = buckets;
    outcome.elapsed = finish(start_time, reporter);
    Ok(outcome)
}

/// Work out how far the device has already been copied.
///
/// A device with no configured destination, or whose destination cannot be
/// read, is treated as never copied.
fn resolve_horizon(
    config: &DestinationConfig,
    device_name: &str,
    reporter: &dyn Reporter,
) -> (Option<PathBuf>, Horizon) {
    let destination = match config.destination_for(device_name) {
        Some(path) => path.to_path_buf(),
        None => {
            reporter.report(&format!(
                "No local photo directory configured for '{}'; listing every photo.",
                device_name
            ));
            return (None, Horizon::Unbounded);
        }
    };
    reporter.report(&format!("Local photo directory: {}", destination.display()));

    let horizon = match scan_local_horizon(&destination, reporter) {
        Ok(horizon) => horizon,
        Err(e) => {
            warn!("{}; listing every photo", e);
            Horizon::Unbounded
        }
    };
    (Some(destination), horizon)
}

fn finish(start_time: Instant, reporter: &dyn Reporter) -> Duration {
    let elapsed = start_time.elapsed();
    reporter.report(&format!("Done. That took {:.2}s.", elapsed.as_secs_f64()));
    elapsed
}
