/// Application state management.
///
/// Centralises all mutable state that the UI reads and writes, and turns
/// user intents (refresh, delete, open) into calls on `protonsaves-core`.
/// Nothing in here touches egui, so the whole state machine is testable
/// without a window.
///
/// Scans run on the core's background thread; `process_scan_messages()`
/// runs once per frame to pick up results. Deletion is synchronous and
/// only happens through [`AppState::confirm_delete`] after
/// [`AppState::request_delete`] staged it.
use protonsaves_core::model::CompatEntry;
use protonsaves_core::opener;
use protonsaves_core::remover;
use protonsaves_core::scanner::progress::ScanProgress;
use protonsaves_core::scanner::usage::PrefixUsage;
use protonsaves_core::scanner::{self, ScanHandle, ScanResult};
use protonsaves_core::ScanConfig;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// The current phase of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPhase {
    /// No scan has run yet.
    Idle,
    /// Waiting for the prefix listing.
    Scanning,
    /// Listing available (disk usage may still be arriving).
    Results,
}

/// A delete the user asked for but has not confirmed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    /// Shown in the confirmation dialog.
    pub id: String,
    pub prefix_path: PathBuf,
}

/// Maximum number of progress messages drained from the channel per frame.
const MAX_MESSAGES_PER_FRAME: usize = 300;

/// All application state.
pub struct AppState {
    // ── Scan ───────────────────────────────────────────
    pub phase: AppPhase,
    /// The compatdata directory being managed.
    pub base_path: PathBuf,
    pub config: ScanConfig,
    pub scan_handle: Option<ScanHandle>,
    pub scan_duration: Option<Duration>,
    /// True while disk usage is still being measured.
    pub measuring: bool,

    // ── Results ────────────────────────────────────────
    pub result: Option<ScanResult>,
    /// Disk usage keyed by prefix path.
    pub usage: HashMap<PathBuf, PrefixUsage>,

    // ── UI state ───────────────────────────────────────
    /// Search box contents.
    pub filter: String,
    /// Editable compatdata path in the toolbar.
    pub path_input: String,
    pub pending_delete: Option<PendingDelete>,
    /// Error shown in a modal until dismissed. Verbatim from the core.
    pub error_message: Option<String>,
    /// Last successful action, shown in the status bar.
    pub status_message: Option<String>,
    pub show_warnings: bool,
}

impl AppState {
    /// Create initial application state for `base_path`.
    pub fn new(base_path: PathBuf, config: ScanConfig) -> Self {
        Self {
            phase: AppPhase::Idle,
            path_input: base_path.to_string_lossy().into_owned(),
            base_path,
            config,
            scan_handle: None,
            scan_duration: None,
            measuring: false,
            result: None,
            usage: HashMap::new(),
            filter: String::new(),
            pending_delete: None,
            error_message: None,
            status_message: None,
            show_warnings: false,
        }
    }

    /// Start a background scan. Ignored while one is already in flight.
    pub fn request_scan(&mut self) {
        if self.is_busy() {
            return;
        }
        self.phase = AppPhase::Scanning;
        self.scan_duration = None;
        self.measuring = false;
        self.usage.clear();
        self.status_message = None;

        let handle = scanner::start_scan(self.base_path.clone(), self.config.clone());
        self.scan_handle = Some(handle);
    }

    /// A scan or usage measurement is still running.
    pub fn is_busy(&self) -> bool {
        self.scan_handle.is_some()
    }

    /// Stop disk-usage measurement; the listing is kept.
    pub fn cancel_scan(&mut self) {
        if let Some(ref handle) = self.scan_handle {
            handle.cancel();
        }
    }

    /// Process pending scan progress messages. Called once per frame.
    ///
    /// Returns `true` if the UI should repaint (new data arrived).
    pub fn process_scan_messages(&mut self) -> bool {
        let handle = match &self.scan_handle {
            Some(h) => h,
            None => return false,
        };

        let mut repaint = false;
        let mut finished = false;
        for _ in 0..MAX_MESSAGES_PER_FRAME {
            let msg = match handle.progress_rx.try_recv() {
                Ok(m) => m,
                Err(crossbeam_channel::TryRecvError::Empty) => break,
                Err(crossbeam_channel::TryRecvError::Disconnected) => {
                    // Thread gone without a terminal message: it panicked.
                    warn!("Scanner thread for {} stopped unexpectedly", self.base_path.display());
                    self.error_message = Some(format!(
                        "Scanning {} stopped unexpectedly. Press Refresh to try again.",
                        self.base_path.display()
                    ));
                    repaint = true;
                    finished = true;
                    break;
                }
            };
            repaint = true;
            match msg {
                ScanProgress::Listing { result, duration } => {
                    self.scan_duration = Some(duration);
                    self.measuring = !result.entries().is_empty();
                    self.phase = AppPhase::Results;
                    self.result = Some(result);
                }
                ScanProgress::Usage { prefix_path, usage } => {
                    // The prefix may have been deleted while it was measured.
                    if self.entries().iter().any(|e| e.prefix_path == prefix_path) {
                        self.usage.insert(prefix_path, usage);
                    }
                }
                ScanProgress::Finished { .. } => {
                    finished = true;
                    break;
                }
                ScanProgress::Cancelled => {
                    info!("Disk usage measurement stopped");
                    self.status_message = Some("Disk usage measurement stopped".to_string());
                    finished = true;
                    break;
                }
            }
        }

        if finished {
            self.measuring = false;
            self.scan_handle = None;
            if self.phase == AppPhase::Scanning {
                self.phase = AppPhase::Idle;
            }
        }
        repaint
    }

    /// All entries of the current result, in scan order.
    pub fn entries(&self) -> &[CompatEntry] {
        self.result.as_ref().map(|r| r.entries()).unwrap_or(&[])
    }

    /// Entries matching the search box.
    pub fn visible_entries(&self) -> Vec<&CompatEntry> {
        self.entries()
            .iter()
            .filter(|e| e.matches(&self.filter))
            .collect()
    }

    /// Sum of measured usage across all prefixes.
    pub fn total_usage(&self) -> u64 {
        self.usage.values().map(|u| u.bytes).sum()
    }

    /// Stage deletion of a prefix. Nothing is deleted until
    /// [`confirm_delete`](Self::confirm_delete).
    pub fn request_delete(&mut self, prefix_path: &Path) {
        let id = match self
            .entries()
            .iter()
            .find(|e| e.prefix_path == prefix_path)
        {
            Some(entry) => entry.id.to_string(),
            None => {
                warn!("Delete requested for unknown prefix {}", prefix_path.display());
                return;
            }
        };
        self.pending_delete = Some(PendingDelete {
            id,
            prefix_path: prefix_path.to_path_buf(),
        });
    }

    /// The user declined (or closed) the confirmation.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// The user explicitly confirmed the staged delete.
    ///
    /// On success the entry is dropped from the current result without a
    /// re-scan. On failure the core's error text is surfaced as-is and the
    /// listing is left untouched (the prefix may be partially deleted; a
    /// refresh shows what remains).
    pub fn confirm_delete(&mut self) {
        let Some(pending) = self.pending_delete.take() else {
            return;
        };
        match remover::remove_prefix_in(&self.base_path, &pending.prefix_path) {
            Ok(()) => {
                if let Some(listing) = self.result.as_mut().and_then(|r| r.listing_mut()) {
                    listing.remove_entry(&pending.prefix_path);
                }
                self.usage.remove(&pending.prefix_path);
                info!("Removed prefix {}", pending.id);
                self.status_message = Some(format!("Deleted prefix for Game ID {}", pending.id));
            }
            Err(e) => {
                self.error_message = Some(format!("Error deleting prefix: {e}"));
            }
        }
    }

    /// Open a path in the file manager; failures go to the error dialog.
    pub fn request_open(&mut self, path: &Path) {
        if let Err(e) = opener::open_in_file_manager(path) {
            warn!("{e}");
            self.error_message = Some(e.to_string());
        }
    }

    pub fn dismiss_error(&mut self) {
        self.error_message = None;
    }

    /// Point at a different compatdata directory and re-scan.
    ///
    /// A scan still running against the old directory is cancelled and its
    /// remaining messages are discarded.
    /// A leading `~` is expanded to the home directory.
    pub fn set_base_path(&mut self, base_path: PathBuf) {
        let base_path = protonsaves_core::steam::expand_home(&base_path);
        if let Some(handle) = self.scan_handle.take() {
            handle.cancel();
        }
        self.measuring = false;
        self.path_input = base_path.to_string_lossy().into_owned();
        self.base_path = base_path;
        self.result = None;
        self.pending_delete = None;
        self.request_scan();
    }
}
