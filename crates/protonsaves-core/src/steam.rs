/// Steam installation layout: root discovery and `appmanifest` lookup.
///
/// Proton prefixes live in `<steam root>/steamapps/compatdata/<appid>`.
/// The matching `steamapps/appmanifest_<appid>.acf` (text KeyValues) holds
/// the installed game's title. Uninstalled games keep their prefix but lose
/// the manifest, so name lookup is best-effort.
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `<root>/steamapps`.
pub fn steamapps_dir(steam_root: &Path) -> PathBuf {
    steam_root.join("steamapps")
}

/// `<root>/steamapps/compatdata`.
pub fn compatdata_dir(steam_root: &Path) -> PathBuf {
    steamapps_dir(steam_root).join("compatdata")
}

fn home_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|b| b.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Replace a leading `~` component of `path` with `home`.
///
/// `~user` forms are left alone.
pub fn expand_home_in(path: &Path, home: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) if rest.as_os_str().is_empty() => home.to_path_buf(),
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// [`expand_home_in`] with the current user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    if path.starts_with("~") {
        expand_home_in(path, &home_dir())
    } else {
        path.to_path_buf()
    }
}

/// Candidate Steam roots under `home`, most common first.
pub fn candidate_roots(home: &Path) -> Vec<PathBuf> {
    vec![
        home.join(".steam").join("steam"),
        home.join(".local").join("share").join("Steam"),
        home.join(".var")
            .join("app")
            .join("com.valvesoftware.Steam")
            .join(".steam")
            .join("steam"),
    ]
}

/// First existing candidate root under `home`, or `~/.steam/steam`.
pub fn find_steam_root_in(home: &Path) -> PathBuf {
    let candidates = candidate_roots(home);
    candidates
        .iter()
        .find(|p| p.is_dir())
        .cloned()
        .unwrap_or_else(|| candidates[0].clone())
}

/// Locate the Steam root for the current user.
pub fn find_steam_root() -> PathBuf {
    find_steam_root_in(&home_dir())
}

/// Title of `app_id` from `steamapps/appmanifest_<app_id>.acf`, if installed.
pub fn app_name(steamapps: &Path, app_id: u64) -> Option<String> {
    let path = steamapps.join(format!("appmanifest_{app_id}.acf"));
    let text = fs::read_to_string(&path).ok()?;
    let name = parse_manifest_name(&text);
    if name.is_none() {
        debug!("No name key in {}", path.display());
    }
    name
}

#[derive(Debug, PartialEq)]
enum Token {
    Str(String),
    Open,
    Close,
}

/// Tokenise text KeyValues: quoted strings, braces, `//` comments.
fn tokenize(text: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' => tokens.push(Token::Open),
            '}' => tokens.push(Token::Close),
            '"' => {
                let mut s = String::new();
                loop {
                    match chars.next()? {
                        '"' => break,
                        '\\' => match chars.next()? {
                            'n' => s.push('\n'),
                            't' => s.push('\t'),
                            other => s.push(other),
                        },
                        other => s.push(other),
                    }
                }
                tokens.push(Token::Str(s));
            }
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            c if c.is_whitespace() => {}
            _ => {
                // Unquoted token: read until whitespace or brace.
                let mut s = String::from(c);
                while let Some(&n) = chars.peek() {
                    if n.is_whitespace() || n == '{' || n == '}' || n == '"' {
                        break;
                    }
                    s.push(n);
                    chars.next();
                }
                tokens.push(Token::Str(s));
            }
        }
    }
    Some(tokens)
}

/// Extract the `name` value directly inside the root `AppState` object.
fn parse_manifest_name(text: &str) -> Option<String> {
    let tokens = tokenize(text)?;
    let mut depth = 0usize;
    let mut i = 0;
    while i < tokens.len() {
        match &tokens[i] {
            Token::Open => depth += 1,
            Token::Close => depth = depth.saturating_sub(1),
            Token::Str(key) => {
                if let Some(Token::Str(value)) = tokens.get(i + 1) {
                    if depth == 1 && key.eq_ignore_ascii_case("name") && !value.is_empty() {
                        return Some(value.clone());
                    }
                    // Key/value pair consumed.
                    i += 2;
                    continue;
                }
            }
        }
        i += 1;
    }
    None
}
