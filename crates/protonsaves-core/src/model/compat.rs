/// Compatibility-prefix values returned by the scanner.
use chrono::{DateTime, Local};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

/// Identifier of a prefix: the name of its directory under `compatdata`.
///
/// Steam app ids (and non-Steam shortcut ids) are all digits and sort by
/// value. Both variants keep the directory name verbatim, so `007` and `7`
/// stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CompatId {
    Numeric(String),
    Named(String),
}

impl CompatId {
    /// Classify a directory name. Any non-empty run of ASCII digits is
    /// numeric, however long.
    pub fn parse(name: &str) -> Self {
        if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
            Self::Numeric(name.to_string())
        } else {
            Self::Named(name.to_string())
        }
    }

    /// The directory name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Numeric(s) | Self::Named(s) => s,
        }
    }

    /// The id as a Steam app id, when it is numeric and fits in `u64`.
    pub fn as_numeric(&self) -> Option<u64> {
        match self {
            Self::Numeric(s) => s.parse().ok(),
            Self::Named(_) => None,
        }
    }

    /// Sort order: numeric ids ascending by value, then every named id.
    ///
    /// Numeric ids with the same value (`007`, `7`) fall back to the
    /// directory name. Named ids compare equal to each other so a stable
    /// sort keeps their directory-listing order.
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Numeric(a), Self::Numeric(b)) => {
                cmp_digits(a, b).then_with(|| a.cmp(b))
            }
            (Self::Numeric(_), Self::Named(_)) => Ordering::Less,
            (Self::Named(_), Self::Numeric(_)) => Ordering::Greater,
            (Self::Named(_), Self::Named(_)) => Ordering::Equal,
        }
    }
}

/// Compare two digit strings by numeric value without parsing them.
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl fmt::Display for CompatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A game folder found directly inside a save location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameFolder {
    pub name: String,
    pub path: PathBuf,
    /// Last-modified time of the folder itself, when readable.
    pub modified: Option<DateTime<Local>>,
}

/// One existing well-known save root inside a prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveLocation {
    /// The template this location was resolved from, e.g. `AppData/Roaming`.
    pub relative_path: String,
    pub absolute_path: PathBuf,
    /// Sorted by name; ignored vendor folders are already removed.
    pub game_folders: Vec<GameFolder>,
}

/// One discovered Proton prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatEntry {
    pub id: CompatId,
    /// `<compatdata>/<id>`: the directory a delete removes.
    pub prefix_path: PathBuf,
    /// `<prefix>/pfx/drive_c`, only when it exists.
    pub drive_c_path: Option<PathBuf>,
    /// `<prefix>/pfx/drive_c/users/steamuser`, whether or not it exists.
    pub user_path: PathBuf,
    pub save_locations: Vec<SaveLocation>,
    /// Game title from the Steam app manifest, if the game is installed.
    pub name: Option<String>,
}

impl CompatEntry {
    /// Heading used by frontends, e.g. `Game ID: 440 (Team Fortress 2)`.
    pub fn display_title(&self) -> String {
        match &self.name {
            Some(name) => format!("Game ID: {} ({name})", self.id),
            None => format!("Game ID: {}", self.id),
        }
    }

    pub fn game_folder_count(&self) -> usize {
        self.save_locations
            .iter()
            .map(|l| l.game_folders.len())
            .sum()
    }

    pub fn has_saves(&self) -> bool {
        self.game_folder_count() > 0
    }

    /// Fuzzy, case-insensitive search over the id, game title, save
    /// templates and game-folder names. An empty query matches everything.
    ///
    /// The query only has to appear in order, not contiguously: `eldrng`
    /// finds `ELDEN RING`.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return true;
        }
        SkimMatcherV2::default()
            .ignore_case()
            .fuzzy_match(&self.search_text(), query)
            .is_some()
    }

    /// Everything [`matches`](Self::matches) searches, space-separated.
    pub fn search_text(&self) -> String {
        let mut text = self.id.to_string();
        if let Some(name) = &self.name {
            text.push(' ');
            text.push_str(name);
        }
        for location in &self.save_locations {
            text.push(' ');
            text.push_str(&location.relative_path);
            for folder in &location.game_folders {
                text.push(' ');
                text.push_str(&folder.name);
            }
        }
        text
    }
}
