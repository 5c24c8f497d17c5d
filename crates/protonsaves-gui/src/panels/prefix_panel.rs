/// Prefix panel: one collapsible row per Proton prefix with its save
/// locations and game folders.
///
/// Rendering only reads `AppState`; button clicks come back as a
/// [`PrefixAction`] for the caller to dispatch.
use crate::state::{AppPhase, AppState};
use egui::{RichText, Ui};
use protonsaves_core::model::size::{format_count, format_size};
use protonsaves_core::model::{CompatEntry, GameFolder};
use protonsaves_core::scanner::ScanResult;
use std::path::PathBuf;

/// What the user clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefixAction {
    Open(PathBuf),
    Delete(PathBuf),
}

/// Draw the prefix list.
pub fn prefix_panel(ui: &mut Ui, state: &AppState) -> Option<PrefixAction> {
    let color_muted = ui.visuals().weak_text_color();

    ui.heading("Proton Compatdata Folders");
    ui.label(
        RichText::new("Manage your Proton prefixes and game save files").color(color_muted),
    );
    ui.add_space(8.0);

    let result = match (&state.result, state.phase) {
        (Some(result), _) => result,
        (None, AppPhase::Scanning) => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Scanning compatdata...");
            });
            return None;
        }
        (None, _) => {
            placeholder(ui, "Press Refresh to scan.");
            return None;
        }
    };

    if let ScanResult::Missing { base } = result {
        placeholder(ui, "No compatdata directory found.");
        ui.label(RichText::new(base.to_string_lossy()).size(11.0).color(color_muted));
        return None;
    }

    if result.entries().is_empty() {
        placeholder(ui, "No Proton prefixes found.");
        return None;
    }

    let visible = state.visible_entries();
    if visible.is_empty() {
        placeholder(ui, &format!("No prefixes match \"{}\".", state.filter.trim()));
        return None;
    }

    let mut action = None;
    for entry in visible {
        if let Some(a) = prefix_row(ui, state, entry) {
            action = Some(a);
        }
        ui.add_space(2.0);
    }
    action
}

fn placeholder(ui: &mut Ui, text: &str) {
    ui.add_space(12.0);
    ui.vertical_centered(|ui| {
        ui.label(RichText::new(text).italics().color(ui.visuals().weak_text_color()));
    });
}

fn prefix_row(ui: &mut Ui, state: &AppState, entry: &CompatEntry) -> Option<PrefixAction> {
    let mut action = None;

    let size = match state.usage.get(&entry.prefix_path) {
        Some(usage) => format!("  ·  {}", format_size(usage.bytes)),
        None if state.measuring => "  ·  measuring...".to_string(),
        None => String::new(),
    };
    let header = RichText::new(format!("{}{}", entry.display_title(), size)).strong();

    egui::CollapsingHeader::new(header)
        .id_salt(&entry.prefix_path)
        .default_open(false)
        .show(ui, |ui| {
            // ── Actions ───────────────────────────────────────
            ui.horizontal(|ui| {
                let open_drive_c = ui.add_enabled(
                    entry.drive_c_path.is_some(),
                    egui::Button::new("📂 Open drive_c Folder"),
                );
                if open_drive_c.clicked() {
                    if let Some(ref drive_c) = entry.drive_c_path {
                        action = Some(PrefixAction::Open(drive_c.clone()));
                    }
                }

                let delete = egui::Button::new(
                    RichText::new("🗑 Delete Prefix").color(egui::Color32::WHITE),
                )
                .fill(egui::Color32::from_rgb(0xc0, 0x1c, 0x28));
                if ui
                    .add(delete)
                    .on_hover_text("Permanently delete this prefix and all save files")
                    .clicked()
                {
                    action = Some(PrefixAction::Delete(entry.prefix_path.clone()));
                }

                if let Some(usage) = state.usage.get(&entry.prefix_path) {
                    ui.label(
                        RichText::new(format!("{} files", format_count(usage.files)))
                            .size(11.0)
                            .color(ui.visuals().weak_text_color()),
                    );
                }
            });

            ui.label(
                RichText::new(entry.prefix_path.to_string_lossy())
                    .size(11.0)
                    .color(ui.visuals().weak_text_color()),
            );
            ui.separator();

            // ── Save locations ────────────────────────────────
            ui.label("Save Locations:");
            for location in &entry.save_locations {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&location.relative_path).monospace());
                    if ui.small_button("Open").clicked() {
                        action = Some(PrefixAction::Open(location.absolute_path.clone()));
                    }
                });
                for folder in &location.game_folders {
                    if let Some(a) = game_folder_row(ui, folder) {
                        action = Some(a);
                    }
                }
            }

            if !entry.has_saves() {
                ui.label(
                    RichText::new("No save folders found for this game")
                        .italics()
                        .color(ui.visuals().weak_text_color()),
                );
            }
        });

    action
}

fn game_folder_row(ui: &mut Ui, folder: &GameFolder) -> Option<PrefixAction> {
    let mut action = None;
    ui.horizontal(|ui| {
        ui.add_space(24.0);
        ui.label(folder.name.as_str());
        if let Some(modified) = folder.modified {
            ui.label(
                RichText::new(modified.format("%Y-%m-%d %H:%M").to_string())
                    .size(11.0)
                    .color(ui.visuals().weak_text_color()),
            );
        }
        if ui.small_button("Open").clicked() {
            action = Some(PrefixAction::Open(folder.path.clone()));
        }
    });
    action
}
