//! Command handler implementation
//!
//! Resolves the run mode and the device namespace from the arguments, then
//! writes the listing to stdout. Everything else goes to stderr.

use crate::cli::Args;
use crate::core::config::DestinationConfig;
use crate::core::error::Result as ListerResult;
use crate::core::lister::{run_listing, ListingOutcome, ListingRequest};
use crate::core::report::{LogReporter, Reporter, SilentReporter, REPORT_TARGET};
use crate::device::fs::FsNamespace;
use crate::device::locator::SelectionStrategy;
use crate::device::namespace::Namespace;
use anyhow::Result;
use env_logger::{Builder, Env, Target};
use log::{debug, info, LevelFilter};
use std::io::{self, Write};

/// Log level requested on the command line, if any.
///
/// `--log-level` wins over `--verbose`; with neither, `RUST_LOG` decides.
pub fn log_filter(args: &Args) -> Option<LevelFilter> {
    match args.log_level.as_deref() {
        Some(level) => Some(match level.to_lowercase().as_str() {
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            _ => LevelFilter::Info,
        }),
        None if args.verbose => Some(LevelFilter::Info),
        None => None,
    }
}

/// Logger for the run: timestamped lines on stderr.
///
/// `--verbose` always lets the reports through, even when `--log-level`
/// asks for less.
pub fn logger_builder(args: &Args) -> Builder {
    let mut builder = match log_filter(args) {
        Some(level) => {
            let mut builder = Builder::new();
            builder.filter_level(level);
            builder
        }
        None => Builder::from_env(Env::default().default_filter_or("warn")),
    };
    if args.verbose {
        builder.filter_module(REPORT_TARGET, LevelFilter::Info);
    }
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(Target::Stderr);
    builder
}

/// Run one listing as described by `args`
pub fn run_command(args: &Args) -> Result<ListingOutcome> {
    let request = build_request(args)?;
    let reporter = make_reporter(args.verbose);

    let outcome = match &args.device_root {
        Some(root) => {
            debug!("Browsing devices under {}", root.display());
            list_on(&FsNamespace::new(root), &request, reporter.as_ref())?
        }
        None => list_on_platform(&request, reporter.as_ref())?,
    };

    match &outcome.device {
        Some(device) => info!(
            "Listed {} new photo(s) from '{}'",
            outcome.buckets.photo_count(),
            device
        ),
        None => info!("No phone found"),
    }
    Ok(outcome)
}

/// Work out the run mode. The configuration is only read for incremental
/// runs, and a missing one is fatal there.
pub fn build_request(args: &Args) -> ListerResult<ListingRequest> {
    let request = if args.all {
        ListingRequest::full()
    } else {
        let config = match &args.config {
            Some(path) => DestinationConfig::load(path)?,
            None => DestinationConfig::load_default()?,
        };
        ListingRequest::incremental(config)
    };

    let selection = if args.unique {
        SelectionStrategy::RequireUnique
    } else {
        SelectionStrategy::FirstMatch
    };
    Ok(request.with_selection(selection))
}

fn make_reporter(verbose: bool) -> Box<dyn Reporter> {
    if verbose {
        Box::new(LogReporter)
    } else {
        Box::new(SilentReporter)
    }
}

fn list_on<N: Namespace>(
    ns: &N,
    request: &ListingRequest,
    reporter: &dyn Reporter,
) -> ListerResult<ListingOutcome> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_listing(ns, request, reporter, &mut out)
}

#[cfg(windows)]
fn list_on_platform(
    request: &ListingRequest,
    reporter: &dyn Reporter,
) -> ListerResult<ListingOutcome> {
    let ns = crate::device::wpd::WpdNamespace::new()?;
    list_on(&ns, request, reporter)
}

#[cfg(not(windows))]
fn list_on_platform(
    request: &ListingRequest,
    reporter: &dyn Reporter,
) -> ListerResult<ListingOutcome> {
    match FsNamespace::gvfs() {
        Some(ns) if ns.root().is_dir() => {
            debug!("Browsing devices under {}", ns.root().display());
            list_on(&ns, request, reporter)
        }
        _ => {
            reporter.report("No mounted devices found; pass --device-root to browse a directory.");
            Ok(ListingOutcome::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ListerError;
    use crate::core::lister::ListingMode;
    use clap::Parser;
    use log::{Level, Log, Metadata};
    use std::fs;
    use tempfile::TempDir;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["list-photos-on-phone"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_log_filter() {
        assert_eq!(log_filter(&parse(&[])), None);
        assert_eq!(log_filter(&parse(&["-v"])), Some(LevelFilter::Info));
        assert_eq!(
            log_filter(&parse(&["-v", "-l", "trace"])),
            Some(LevelFilter::Trace)
        );
    }

    fn enabled(args: &Args, target: &str, level: Level) -> bool {
        let logger = logger_builder(args).build();
        logger.enabled(&Metadata::builder().target(target).level(level).build())
    }

    #[test]
    fn test_verbose_reports_survive_quieter_log_level() {
        let args = parse(&["-v", "-l", "warn"]);

        assert!(enabled(&args, REPORT_TARGET, Level::Info));
        assert!(!enabled(&args, "phone_photo_lister::core::walker", Level::Info));
    }

    #[test]
    fn test_reports_hidden_without_verbose() {
        let args = parse(&["-l", "warn"]);

        assert!(!enabled(&args, REPORT_TARGET, Level::Info));
        assert!(enabled(&args, REPORT_TARGET, Level::Warn));
    }

    #[test]
    fn test_full_mode_never_reads_config() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.yaml");
        let args = parse(&["-a", "-c", missing.to_str().unwrap()]);

        let request = build_request(&args).unwrap();
        assert!(matches!(request.mode, ListingMode::Full));
    }

    #[test]
    fn test_incremental_requires_config() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.yaml");
        let args = parse(&["-c", missing.to_str().unwrap()]);

        assert!(matches!(
            build_request(&args),
            Err(ListerError::ConfigurationMissing(_))
        ));
    }

    #[test]
    fn test_incremental_loads_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("name-to-path.yaml");
        fs::write(&path, "johnsphone: /photos/john\n").unwrap();
        let args = parse(&["--unique", "-c", path.to_str().unwrap()]);

        let request = build_request(&args).unwrap();
        assert_eq!(request.selection, SelectionStrategy::RequireUnique);
        match request.mode {
            ListingMode::Incremental(config) => assert_eq!(config.len(), 1),
            ListingMode::Full => panic!("expected incremental mode"),
        }
    }
}
