/// ProtonSaves Core: compatdata scanning, save discovery, and prefix removal.
///
/// This crate contains all business logic with zero UI dependencies.
/// Frontends render the values it returns and call back into it for
/// user intents (scan, delete, open).
///
/// # Modules
///
/// - [`config`]: Scan constants (ignore set, save templates) and user settings.
/// - [`model`]: `CompatEntry` / `SaveLocation` values and size formatting.
/// - [`scanner`]: Compatdata scanner, background scan handle, disk usage.
/// - [`remover`]: Recursive prefix deletion.
/// - [`opener`]: Hand a path to the desktop's default opener.
/// - [`steam`]: Steam root discovery and `appmanifest` name lookup.
pub mod config;
pub mod model;
pub mod opener;
pub mod remover;
pub mod scanner;
pub mod steam;

pub use config::{ScanConfig, Settings};
pub use model::{CompatEntry, CompatId, GameFolder, SaveLocation};
pub use scanner::{scan, CompatListing, ScanResult, ScanWarning};
