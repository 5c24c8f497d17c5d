/// Scanner module: enumerates Proton prefixes and their save folders.
///
/// [`scan`] is the synchronous, read-only core: list `compatdata`, keep the
/// children that contain a `pfx` directory, and resolve every save-root
/// template inside each prefix. Filesystem errors on individual items never
/// abort the scan; they become [`ScanWarning`]s and the item is treated as
/// absent. Steam may be writing to `compatdata` while we read it.
///
/// [`start_scan`] runs the same scan on a background thread and then
/// measures each prefix's disk usage, reporting through a crossbeam channel
/// so a UI event loop never blocks on a slow (e.g. network-mounted) disk.
pub mod progress;
pub mod usage;

use crate::config::ScanConfig;
use crate::model::{CompatEntry, CompatId, GameFolder, SaveLocation};
use crate::steam;
use chrono::{DateTime, Local};
use crossbeam_channel::Receiver;
use progress::ScanProgress;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, info, warn};

/// A non-fatal problem met while scanning (permission denied, vanished dir).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub message: String,
}

/// Everything found under an existing `compatdata` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatListing {
    pub base: PathBuf,
    /// Numeric ids ascending, then named ids in listing order.
    pub entries: Vec<CompatEntry>,
    pub warnings: Vec<ScanWarning>,
}

impl CompatListing {
    pub fn find(&self, prefix_path: &Path) -> Option<&CompatEntry> {
        self.entries.iter().find(|e| e.prefix_path == prefix_path)
    }

    /// Drop the entry for `prefix_path` after a successful delete.
    ///
    /// Returns `true` if an entry was removed.
    pub fn remove_entry(&mut self, prefix_path: &Path) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.prefix_path != prefix_path);
        self.entries.len() != before
    }
}

/// Outcome of a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanResult {
    /// The compatdata directory does not exist (Proton never used, or the
    /// Steam root is wrong). Not an error.
    Missing { base: PathBuf },
    Found(CompatListing),
}

impl ScanResult {
    pub fn entries(&self) -> &[CompatEntry] {
        match self {
            Self::Missing { .. } => &[],
            Self::Found(listing) => &listing.entries,
        }
    }

    pub fn listing(&self) -> Option<&CompatListing> {
        match self {
            Self::Missing { .. } => None,
            Self::Found(listing) => Some(listing),
        }
    }

    pub fn listing_mut(&mut self) -> Option<&mut CompatListing> {
        match self {
            Self::Missing { .. } => None,
            Self::Found(listing) => Some(listing),
        }
    }
}

/// Collects warnings and logs them as they happen.
#[derive(Default)]
struct Warnings(Vec<ScanWarning>);

impl Warnings {
    fn push(&mut self, path: &Path, err: impl std::fmt::Display) {
        warn!("Skipping {}: {}", path.display(), err);
        self.0.push(ScanWarning {
            path: path.to_path_buf(),
            message: err.to_string(),
        });
    }
}

/// Scan `base` (a `compatdata` directory) for Proton prefixes.
pub fn scan(base: &Path, config: &ScanConfig) -> ScanResult {
    if !base.is_dir() {
        info!("No compatdata directory at {}", base.display());
        return ScanResult::Missing {
            base: base.to_path_buf(),
        };
    }

    let mut warnings = Warnings::default();
    let mut candidates = list_candidates(base, &mut warnings);
    // Stable: named ids keep their listing order.
    candidates.sort_by(|(a, _), (b, _)| a.sort_cmp(b));

    let steamapps = base.parent().map(Path::to_path_buf);
    let mut entries = Vec::with_capacity(candidates.len());

    for (id, prefix_path) in candidates {
        if !prefix_path.join("pfx").is_dir() {
            debug!("{} has no pfx directory, skipping", prefix_path.display());
            continue;
        }
        let name = match (&steamapps, id.as_numeric()) {
            (Some(dir), Some(app_id)) if config.resolve_names => steam::app_name(dir, app_id),
            _ => None,
        };
        entries.push(build_entry(id, prefix_path, name, config, &mut warnings));
    }

    info!(
        "Found {} prefixes in {} ({} warnings)",
        entries.len(),
        base.display(),
        warnings.0.len()
    );

    ScanResult::Found(CompatListing {
        base: base.to_path_buf(),
        entries,
        warnings: warnings.0,
    })
}

/// Immediate children of `base`, in directory-listing order.
fn list_candidates(base: &Path, warnings: &mut Warnings) -> Vec<(CompatId, PathBuf)> {
    let read_dir = match fs::read_dir(base) {
        Ok(rd) => rd,
        Err(e) => {
            warnings.push(base, e);
            return Vec::new();
        }
    };

    let mut out = Vec::new();
    for entry in read_dir {
        match entry {
            Ok(entry) => {
                let name = entry.file_name().to_string_lossy().into_owned();
                out.push((CompatId::parse(&name), entry.path()));
            }
            Err(e) => warnings.push(base, e),
        }
    }
    out
}

fn build_entry(
    id: CompatId,
    prefix_path: PathBuf,
    name: Option<String>,
    config: &ScanConfig,
    warnings: &mut Warnings,
) -> CompatEntry {
    let drive_c = prefix_path.join("pfx").join("drive_c");
    let user_path = drive_c.join("users").join("steamuser");

    let save_locations = config
        .save_templates
        .iter()
        .filter_map(|template| {
            let absolute_path = user_path.join(template);
            if !absolute_path.is_dir() {
                return None;
            }
            let game_folders = list_game_folders(&absolute_path, config, warnings);
            Some(SaveLocation {
                relative_path: template.clone(),
                absolute_path,
                game_folders,
            })
        })
        .collect();

    CompatEntry {
        id,
        drive_c_path: drive_c.is_dir().then_some(drive_c),
        prefix_path,
        user_path,
        save_locations,
        name,
    }
}

/// Directories directly inside a save root, minus the ignore set, by name.
fn list_game_folders(
    root: &Path,
    config: &ScanConfig,
    warnings: &mut Warnings,
) -> Vec<GameFolder> {
    let read_dir = match fs::read_dir(root) {
        Ok(rd) => rd,
        Err(e) => {
            warnings.push(root, e);
            return Vec::new();
        }
    };

    let mut folders = Vec::new();
    for entry in read_dir {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warnings.push(root, e);
                continue;
            }
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path();
        // `is_dir` follows symlinks; a link to a save dir still counts.
        if config.is_ignored(&name) || !path.is_dir() {
            continue;
        }
        let modified = fs::metadata(&path)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Local>::from);
        folders.push(GameFolder {
            name,
            path,
            modified,
        });
    }
    folders.sort_by(|a, b| a.name.cmp(&b.name));
    folders
}

/// Maximum number of progress messages that may queue up in the channel.
///
/// One `Listing`, one `Usage` per prefix, one terminal message. A few
/// hundred prefixes is a large library; the UI drains every frame.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 1_024;

/// Handle to a running or completed background scan.
pub struct ScanHandle {
    /// Receiver for progress updates from the scan thread.
    pub progress_rx: Receiver<ScanProgress>,
    cancel_flag: Arc<AtomicBool>,
    _thread: Option<thread::JoinHandle<()>>,
}

impl ScanHandle {
    /// Stop measuring disk usage as soon as possible.
    ///
    /// The listing itself is cheap and always delivered.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    /// Wrap a progress channel fed by something other than [`start_scan`],
    /// e.g. a replay of recorded progress.
    pub fn from_receiver(progress_rx: Receiver<ScanProgress>) -> Self {
        Self {
            progress_rx,
            cancel_flag: Arc::new(AtomicBool::new(false)),
            _thread: None,
        }
    }
}

/// Scan `base` on a background thread, then measure every prefix.
pub fn start_scan(base: PathBuf, config: ScanConfig) -> ScanHandle {
    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let cancel_clone = cancel_flag.clone();

    let thread = thread::Builder::new()
        .name("protonsaves-scanner".into())
        .spawn(move || {
            let start = Instant::now();
            let result = scan(&base, &config);
            let prefixes: Vec<PathBuf> = result
                .entries()
                .iter()
                .map(|e| e.prefix_path.clone())
                .collect();

            if progress_tx
                .send(ScanProgress::Listing {
                    result,
                    duration: start.elapsed(),
                })
                .is_err()
            {
                // Receiver dropped: nobody is listening any more.
                return;
            }

            prefixes.par_iter().for_each(|prefix| {
                if cancel_clone.load(Ordering::Relaxed) {
                    return;
                }
                // A cancelled walk has only partial totals; drop it.
                if let Some(usage) = usage::measure(prefix, &cancel_clone) {
                    let _ = progress_tx.send(ScanProgress::Usage {
                        prefix_path: prefix.clone(),
                        usage,
                    });
                }
            });

            let done = if cancel_clone.load(Ordering::Relaxed) {
                ScanProgress::Cancelled
            } else {
                ScanProgress::Finished {
                    duration: start.elapsed(),
                }
            };
            let _ = progress_tx.send(done);
        })
        .expect("failed to spawn scanner thread");

    ScanHandle {
        progress_rx,
        cancel_flag,
        _thread: Some(thread),
    }
}
