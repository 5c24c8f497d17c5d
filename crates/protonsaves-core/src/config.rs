/// Configuration: the fixed scan constants and the optional settings file.
///
/// [`ScanConfig`] is the immutable value handed to the scanner. The defaults
/// are the well-known Windows save roots and the vendor folders that live
/// next to game saves in every prefix. Tests build smaller configs.
///
/// [`Settings`] is read once at startup from
/// `<config_dir>/protonsaves/settings.json`. The file is optional and is
/// never written by the application.
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Vendor/system folders that are never game saves.
pub const IGNORE_DIRS: [&str; 6] = [
    "Microsoft",
    "Temp",
    "Packages",
    "ConnectedDevicesPlatform",
    "Comms",
    "Apps",
];

/// Save roots relative to the emulated user profile, in display order.
pub const SAVE_TEMPLATES: [&str; 4] = [
    "AppData/Local",
    "AppData/LocalLow",
    "AppData/Roaming",
    "Saved Games",
];

/// Environment variable that overrides the Steam root.
pub const STEAM_ROOT_ENV: &str = "PROTONSAVES_STEAM_ROOT";

/// Everything the scanner needs besides the base path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Folder names skipped when listing game folders.
    pub ignore_dirs: BTreeSet<String>,
    /// Save-root templates joined onto `users/steamuser`, in order.
    pub save_templates: Vec<String>,
    /// Look up game titles in `steamapps/appmanifest_<id>.acf`.
    pub resolve_names: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(IGNORE_DIRS, SAVE_TEMPLATES)
    }
}

impl ScanConfig {
    /// Build a config from explicit ignore names and templates.
    pub fn new<I, T>(ignore_dirs: I, save_templates: T) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            ignore_dirs: ignore_dirs.into_iter().map(Into::into).collect(),
            save_templates: save_templates.into_iter().map(Into::into).collect(),
            resolve_names: true,
        }
    }

    /// Disable `appmanifest` name lookup.
    pub fn without_names(mut self) -> Self {
        self.resolve_names = false;
        self
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore_dirs.contains(name)
    }
}

/// Failure to load the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// User settings, all optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Steam installation root (the directory containing `steamapps`).
    pub steam_root: Option<PathBuf>,
    /// Maximum log level: `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            steam_root: None,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Default location of the settings file, if a config dir exists.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "protonsaves", "protonsaves")
            .map(|pd| pd.config_dir().join("settings.json"))
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from the default location and apply the environment override.
    ///
    /// Errors are logged and replaced by defaults so a broken file never
    /// stops the application from starting.
    pub fn load() -> Self {
        let mut settings = match Self::default_path() {
            Some(path) => Self::load_from(&path).unwrap_or_else(|e| {
                tracing::warn!("{e} -- using default settings");
                Self::default()
            }),
            None => Self::default(),
        };
        if let Some(root) = std::env::var_os(STEAM_ROOT_ENV).filter(|v| !v.is_empty()) {
            settings.steam_root = Some(PathBuf::from(root));
        }
        settings
    }

    /// Parsed log level, falling back to INFO for unknown strings.
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }

    /// The compatdata directory these settings point at.
    pub fn compatdata_path(&self) -> PathBuf {
        let root = match &self.steam_root {
            Some(root) => crate::steam::expand_home(root),
            None => crate::steam::find_steam_root(),
        };
        crate::steam::compatdata_dir(&root)
    }
}
