/// Scan progress reporting: messages sent from the scan thread to the UI
/// thread via a crossbeam channel.
use super::usage::PrefixUsage;
use super::ScanResult;
use std::path::PathBuf;
use std::time::Duration;

/// Progress updates sent from the scan thread to the UI.
///
/// Always arrives as one `Listing`, zero or more `Usage`, then exactly one
/// of `Finished` / `Cancelled`.
#[derive(Debug)]
pub enum ScanProgress {
    /// The prefix listing is ready.
    Listing {
        result: ScanResult,
        duration: Duration,
    },
    /// Disk usage of one prefix has been measured completely.
    Usage {
        prefix_path: PathBuf,
        usage: PrefixUsage,
    },
    /// All prefixes measured.
    Finished { duration: Duration },
    /// Usage measurement was cancelled; the listing is still valid and
    /// prefixes without a `Usage` message stay unmeasured.
    Cancelled,
}
