/// Prefix disk usage: how much space deleting a prefix would free.
///
/// Walks the prefix with `jwalk` without following symlinks (Wine prefixes
/// link `dosdevices/z:` to `/`, following it would walk the whole disk).
/// Prefixes are measured concurrently by the caller, so each walk runs
/// serially to avoid nesting thread pools.
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Check the cancel flag every this many entries.
const CANCEL_CHECK_INTERVAL: u64 = 1_000;

/// Totals for one prefix directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrefixUsage {
    /// Sum of regular-file sizes (apparent size, not allocated blocks).
    pub bytes: u64,
    pub files: u64,
    /// Entries that could not be read.
    pub errors: u64,
}

/// Measure `root`.
///
/// Returns `None` if `cancel` was set before the walk finished; partial
/// totals are never reported.
pub fn measure(root: &Path, cancel: &AtomicBool) -> Option<PrefixUsage> {
    let mut usage = PrefixUsage::default();
    let walker = jwalk::WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .parallelism(jwalk::Parallelism::Serial);

    let mut visited: u64 = 0;
    for entry_result in walker {
        visited += 1;
        if visited % CANCEL_CHECK_INTERVAL == 0 && cancel.load(Ordering::Relaxed) {
            debug!("Usage walk of {} cancelled", root.display());
            return None;
        }

        let entry = match entry_result {
            Ok(e) => e,
            Err(_) => {
                usage.errors += 1;
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        match entry.metadata() {
            Ok(meta) => {
                usage.bytes += meta.len();
                usage.files += 1;
            }
            Err(_) => usage.errors += 1,
        }
    }

    debug!(
        "{}: {} bytes in {} files",
        root.display(),
        usage.bytes,
        usage.files
    );
    Some(usage)
}
