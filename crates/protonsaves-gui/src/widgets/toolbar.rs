/// Top action bar: refresh, compatdata path and search.
use crate::state::AppState;
use egui::Ui;
use std::path::PathBuf;

/// Draw the toolbar.
pub fn toolbar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new("ProtonSaves")
                .size(18.0)
                .strong()
                .color(ui.visuals().hyperlink_color),
        );

        ui.separator();

        // Disabled while a scan is running.
        let can_scan = !state.is_busy();
        if ui
            .add_enabled(
                can_scan,
                egui::Button::new("🔄 Refresh").min_size(egui::vec2(80.0, 28.0)),
            )
            .on_disabled_hover_text("A scan is already running")
            .clicked()
        {
            state.request_scan();
        }

        // Stop disk-usage measurement (the listing is already shown).
        if state.measuring && ui.button("⏹ Stop").on_hover_text("Stop measuring disk usage").clicked()
        {
            state.cancel_scan();
        }

        ui.separator();

        // Compatdata path; Enter applies and re-scans.
        ui.label("compatdata:");
        let path_edit = ui.add(
            egui::TextEdit::singleline(&mut state.path_input)
                .desired_width(320.0)
                .hint_text("~/.steam/steam/steamapps/compatdata"),
        );
        if path_edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            let new_path = PathBuf::from(state.path_input.trim());
            if new_path != state.base_path {
                state.set_base_path(new_path);
            }
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if !state.filter.is_empty() && ui.small_button("✖").on_hover_text("Clear").clicked() {
                state.filter.clear();
            }
            ui.add(
                egui::TextEdit::singleline(&mut state.filter)
                    .desired_width(220.0)
                    .hint_text("🔍 Search Game IDs or Save Folders..."),
            );
        });
    });
}
