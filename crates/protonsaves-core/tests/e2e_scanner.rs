/// End-to-end scanner and remover integration tests.
///
/// These tests build real Proton-shaped `compatdata` trees in a temporary
/// directory and run the real scanner, background scan thread and remover
/// against them. No filesystem mocking.
use protonsaves_core::remover::{remove_prefix, RemoveError};
use protonsaves_core::scanner::progress::ScanProgress;
use protonsaves_core::scanner::{start_scan, ScanHandle};
use protonsaves_core::{scan, CompatId, ScanConfig, ScanResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Create `<base>/<id>/pfx/drive_c/users/steamuser` and return the prefix.
fn make_prefix(base: &Path, id: &str) -> PathBuf {
    let prefix = base.join(id);
    fs::create_dir_all(user_dir(&prefix)).unwrap();
    fs::write(prefix.join("pfx.lock"), b"").unwrap();
    prefix
}

fn user_dir(prefix: &Path) -> PathBuf {
    prefix.join("pfx/drive_c/users/steamuser")
}

/// Create `<user>/<template>/<folder>` for each folder.
fn make_saves(prefix: &Path, template: &str, folders: &[&str]) {
    let root = user_dir(prefix).join(template);
    fs::create_dir_all(&root).unwrap();
    for f in folders {
        fs::create_dir_all(root.join(f)).unwrap();
    }
}

fn ids(result: &ScanResult) -> Vec<String> {
    result.entries().iter().map(|e| e.id.to_string()).collect()
}

/// Drain a background scan until its terminal message, returning all
/// messages seen. Panics after 30 seconds.
fn drain(handle: ScanHandle) -> Vec<ScanProgress> {
    let deadline = std::time::Instant::now() + Duration::from_secs(30);
    let mut seen = Vec::new();
    loop {
        assert!(
            std::time::Instant::now() < deadline,
            "scanner did not finish within 30 seconds"
        );
        match handle.progress_rx.try_recv() {
            Ok(msg) => {
                let terminal =
                    matches!(msg, ScanProgress::Finished { .. } | ScanProgress::Cancelled);
                seen.push(msg);
                if terminal {
                    return seen;
                }
            }
            Err(crossbeam_channel::TryRecvError::Empty) => {
                std::thread::sleep(Duration::from_millis(10));
            }
            Err(crossbeam_channel::TryRecvError::Disconnected) => {
                panic!("scanner channel disconnected before Finished was sent");
            }
        }
    }
}

// ── Ordering ─────────────────────────────────────────────────────────────────

/// `10, 2, abc, 1` must come back as `1, 2, 10, abc`.
#[test]
fn numeric_ids_sort_before_named() {
    let tmp = TempDir::new().unwrap();
    for id in ["10", "2", "abc", "1"] {
        make_prefix(tmp.path(), id);
    }

    let result = scan(tmp.path(), &ScanConfig::default());
    assert_eq!(ids(&result), ["1", "2", "10", "abc"]);
    assert_eq!(result.entries()[2].id, CompatId::Numeric("10".into()));
    assert_eq!(result.entries()[3].id, CompatId::Named("abc".into()));
}

/// Numeric order is by value, not by string.
#[test]
fn numeric_ids_sort_by_value() {
    let tmp = TempDir::new().unwrap();
    for id in ["1245620", "440", "2054970", "70"] {
        make_prefix(tmp.path(), id);
    }
    let result = scan(tmp.path(), &ScanConfig::default());
    assert_eq!(ids(&result), ["70", "440", "1245620", "2054970"]);
}

/// `007` and `7` are different directories and keep their own names.
#[test]
fn leading_zero_ids_stay_distinct() {
    let tmp = TempDir::new().unwrap();
    for id in ["7", "007", "8"] {
        make_prefix(tmp.path(), id);
    }
    let result = scan(tmp.path(), &ScanConfig::default());
    assert_eq!(ids(&result), ["007", "7", "8"]);

    let titles: Vec<String> = result.entries().iter().map(|e| e.display_title()).collect();
    assert_eq!(titles, ["Game ID: 007", "Game ID: 7", "Game ID: 8"]);
    assert_eq!(result.entries()[0].prefix_path, tmp.path().join("007"));
    assert_ne!(result.entries()[0].id, result.entries()[1].id);
}

/// Named entries keep the relative order of the directory listing.
#[test]
fn named_ids_keep_listing_order() {
    let tmp = TempDir::new().unwrap();
    for id in ["5", "beta", "alpha", "gamma", "3"] {
        make_prefix(tmp.path(), id);
    }

    let listing_order: Vec<String> = fs::read_dir(tmp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.parse::<u64>().is_err())
        .collect();

    let result = scan(tmp.path(), &ScanConfig::default());
    let got = ids(&result);
    assert_eq!(&got[..2], ["3", "5"]);
    assert_eq!(got[2..].to_vec(), listing_order);
}

// ── Filtering ────────────────────────────────────────────────────────────────

/// Stray files and directories without `pfx` are not prefixes.
#[test]
fn entries_without_pfx_are_excluded() {
    let tmp = TempDir::new().unwrap();
    make_prefix(tmp.path(), "440");
    fs::create_dir_all(tmp.path().join("123")).unwrap();
    fs::write(tmp.path().join("README.txt"), b"hello").unwrap();
    // `pfx` present but as a file.
    fs::create_dir_all(tmp.path().join("999")).unwrap();
    fs::write(tmp.path().join("999/pfx"), b"").unwrap();

    let result = scan(tmp.path(), &ScanConfig::default());
    assert_eq!(ids(&result), ["440"]);
}

/// A missing base path is a normal "no data" outcome, not an error.
#[test]
fn missing_base_is_no_data() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("compatdata");

    let result = scan(&base, &ScanConfig::default());
    assert_eq!(result, ScanResult::Missing { base: base.clone() });
    assert!(result.entries().is_empty());

    // A file in place of the directory behaves the same.
    fs::write(&base, b"").unwrap();
    assert!(matches!(
        scan(&base, &ScanConfig::default()),
        ScanResult::Missing { .. }
    ));
}

/// An empty compatdata directory is `Found` with no entries.
#[test]
fn empty_base_is_found_with_no_entries() {
    let tmp = TempDir::new().unwrap();
    let result = scan(tmp.path(), &ScanConfig::default());
    let listing = result.listing().expect("listing");
    assert!(listing.entries.is_empty());
    assert!(listing.warnings.is_empty());
}

// ── Save locations ───────────────────────────────────────────────────────────

/// `AppData/Roaming` is listed iff it exists as a directory.
#[test]
fn roaming_location_iff_directory() {
    let tmp = TempDir::new().unwrap();
    let with_dir = make_prefix(tmp.path(), "1");
    let with_file = make_prefix(tmp.path(), "2");
    let without = make_prefix(tmp.path(), "3");
    make_saves(&with_dir, "AppData/Roaming", &[]);
    fs::create_dir_all(user_dir(&with_file).join("AppData")).unwrap();
    fs::write(user_dir(&with_file).join("AppData/Roaming"), b"").unwrap();
    let _ = without;

    let result = scan(tmp.path(), &ScanConfig::default());
    let has_roaming: Vec<bool> = result
        .entries()
        .iter()
        .map(|e| {
            e.save_locations
                .iter()
                .any(|l| l.relative_path == "AppData/Roaming")
        })
        .collect();
    assert_eq!(has_roaming, [true, false, false]);
}

/// Locations follow template order regardless of creation order.
#[test]
fn save_locations_follow_template_order() {
    let tmp = TempDir::new().unwrap();
    let prefix = make_prefix(tmp.path(), "440");
    make_saves(&prefix, "Saved Games", &["B"]);
    make_saves(&prefix, "AppData/Roaming", &["R"]);
    make_saves(&prefix, "AppData/Local", &["L"]);

    let result = scan(tmp.path(), &ScanConfig::default());
    let entry = &result.entries()[0];
    let templates: Vec<&str> = entry
        .save_locations
        .iter()
        .map(|l| l.relative_path.as_str())
        .collect();
    assert_eq!(templates, ["AppData/Local", "AppData/Roaming", "Saved Games"]);
    assert_eq!(
        entry.save_locations[1].absolute_path,
        user_dir(&prefix).join("AppData/Roaming")
    );
    assert_eq!(entry.drive_c_path, Some(prefix.join("pfx/drive_c")));
}

/// `Microsoft` is never a game folder; `MyRPG` is. Folders are sorted.
#[test]
fn ignore_set_filters_vendor_folders() {
    let tmp = TempDir::new().unwrap();
    let prefix = make_prefix(tmp.path(), "440");
    make_saves(
        &prefix,
        "AppData/Roaming",
        &["Microsoft", "MyRPG", "Apps", "Temp", "AnotherGame", "zzz"],
    );
    // Nested Microsoft deeper down does not matter.
    fs::create_dir_all(user_dir(&prefix).join("AppData/Roaming/MyRPG/Microsoft")).unwrap();

    let result = scan(tmp.path(), &ScanConfig::default());
    let names: Vec<&str> = result.entries()[0].save_locations[0]
        .game_folders
        .iter()
        .map(|g| g.name.as_str())
        .collect();
    assert_eq!(names, ["AnotherGame", "MyRPG", "zzz"]);
}

/// A smaller config substitutes for the defaults.
#[test]
fn custom_config_is_honoured() {
    let tmp = TempDir::new().unwrap();
    let prefix = make_prefix(tmp.path(), "440");
    make_saves(&prefix, "Documents/My Games", &["Junk", "Keep"]);
    make_saves(&prefix, "AppData/Roaming", &["Roamer"]);

    let config = ScanConfig::new(["Junk"], ["Documents/My Games"]).without_names();
    let result = scan(tmp.path(), &config);
    let entry = &result.entries()[0];
    assert_eq!(entry.save_locations.len(), 1);
    let names: Vec<&str> = entry.save_locations[0]
        .game_folders
        .iter()
        .map(|g| g.name.as_str())
        .collect();
    assert_eq!(names, ["Keep"]);
}

// ── Idempotence ──────────────────────────────────────────────────────────────

/// Two scans of an unchanged tree are identical.
#[test]
fn scan_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    for id in ["30", "4", "custom"] {
        let p = make_prefix(tmp.path(), id);
        make_saves(&p, "AppData/LocalLow", &["Studio", "Microsoft"]);
    }
    let first = scan(tmp.path(), &ScanConfig::default());
    let second = scan(tmp.path(), &ScanConfig::default());
    assert_eq!(first, second);
}

// ── Error tolerance ──────────────────────────────────────────────────────────

/// An unreadable save root is reported as a warning and the scan goes on.
#[cfg(unix)]
#[test]
fn unreadable_save_root_is_skipped_with_warning() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let locked = make_prefix(tmp.path(), "1");
    let fine = make_prefix(tmp.path(), "2");
    make_saves(&locked, "AppData/Roaming", &["Hidden"]);
    make_saves(&fine, "AppData/Roaming", &["Visible"]);
    let locked_root = user_dir(&locked).join("AppData/Roaming");
    fs::set_permissions(&locked_root, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits; nothing to assert in that case.
    let readable_anyway = fs::read_dir(&locked_root).is_ok();

    let result = scan(tmp.path(), &ScanConfig::default());
    fs::set_permissions(&locked_root, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(ids(&result), ["1", "2"]);
    assert_eq!(
        result.entries()[1].save_locations[0].game_folders[0].name,
        "Visible"
    );
    if !readable_anyway {
        let listing = result.listing().unwrap();
        assert!(listing.entries[0].save_locations[0].game_folders.is_empty());
        assert!(listing.warnings.iter().any(|w| w.path == locked_root));
    }
}

// ── Remover ──────────────────────────────────────────────────────────────────

/// Removing `<root>/compatdata/440` drops it from the next scan.
#[test]
fn removed_prefix_disappears_from_scan() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("compatdata");
    let doomed = make_prefix(&base, "440");
    make_saves(&doomed, "AppData/Roaming", &["Game"]);
    make_prefix(&base, "570");

    assert_eq!(ids(&scan(&base, &ScanConfig::default())), ["440", "570"]);
    remove_prefix(&base.join("440")).expect("delete");
    assert!(!doomed.exists());
    assert_eq!(ids(&scan(&base, &ScanConfig::default())), ["570"]);
}

/// Removing a path that does not exist is a reported failure, not a panic.
#[test]
fn remove_missing_prefix_fails() {
    let tmp = TempDir::new().unwrap();
    let result = remove_prefix(&tmp.path().join("compatdata/440"));
    assert!(matches!(result, Err(RemoveError::NotFound(_))));
}

// ── Background scan ──────────────────────────────────────────────────────────

/// The background scan delivers the listing, one usage per prefix, then
/// `Finished`.
#[test]
fn background_scan_reports_listing_and_usage() {
    let tmp = TempDir::new().unwrap();
    let a = make_prefix(tmp.path(), "1");
    let b = make_prefix(tmp.path(), "2");
    fs::write(a.join("pfx/system.reg"), vec![0u8; 1_000]).unwrap();
    fs::write(b.join("pfx/user.reg"), vec![0u8; 50]).unwrap();

    let messages = drain(start_scan(tmp.path().to_path_buf(), ScanConfig::default()));

    match &messages[0] {
        ScanProgress::Listing { result, .. } => assert_eq!(ids(result), ["1", "2"]),
        other => panic!("expected Listing first, got {other:?}"),
    }
    assert!(matches!(messages.last(), Some(ScanProgress::Finished { .. })));

    let mut usages: Vec<(PathBuf, u64)> = messages
        .iter()
        .filter_map(|m| match m {
            ScanProgress::Usage { prefix_path, usage } => Some((prefix_path.clone(), usage.bytes)),
            _ => None,
        })
        .collect();
    usages.sort();
    assert_eq!(usages, [(a, 1_000), (b, 50)]);
}

/// Cancelling right after the start still delivers the listing, sends no
/// partial usage and ends with `Cancelled`.
#[test]
fn background_scan_cancel_reports_cancelled() {
    let tmp = TempDir::new().unwrap();
    for id in ["1", "2"] {
        let prefix = make_prefix(tmp.path(), id);
        for i in 0..2_500 {
            fs::write(prefix.join(format!("pfx/{i}.dat")), vec![0u8; 100]).unwrap();
        }
    }

    let handle = start_scan(tmp.path().to_path_buf(), ScanConfig::default());
    handle.cancel();
    assert!(handle.is_cancelled());
    let messages = drain(handle);

    match &messages[0] {
        ScanProgress::Listing { result, .. } => assert_eq!(ids(result), ["1", "2"]),
        other => panic!("expected Listing first, got {other:?}"),
    }
    assert!(matches!(messages.last(), Some(ScanProgress::Cancelled)));
    assert!(
        !messages
            .iter()
            .any(|m| matches!(m, ScanProgress::Usage { .. })),
        "a cancelled scan must not report usage"
    );
}

/// A background scan of a missing base still completes.
#[test]
fn background_scan_of_missing_base() {
    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("nowhere");
    let messages = drain(start_scan(base.clone(), ScanConfig::default()));
    assert_eq!(messages.len(), 2);
    assert!(matches!(
        &messages[0],
        ScanProgress::Listing { result: ScanResult::Missing { .. }, .. }
    ));
}
