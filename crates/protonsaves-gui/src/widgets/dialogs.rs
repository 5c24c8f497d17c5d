/// Modal-style windows: delete confirmation, error, scan warnings.
use crate::state::AppState;
use protonsaves_core::scanner::ScanResult;

/// Destructive confirmation for a staged delete.
///
/// Cancel is the default: closing the window or pressing Escape cancels,
/// only the explicit "Delete" button calls `confirm_delete`.
pub fn confirm_delete_dialog(ctx: &egui::Context, state: &mut AppState) {
    let Some(pending) = state.pending_delete.clone() else {
        return;
    };

    let mut open = true;
    let mut confirmed = false;
    let mut cancelled = false;

    egui::Window::new(format!("Delete Prefix for Game ID {}?", pending.id))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([380.0, 0.0])
        .show(ctx, |ui| {
            ui.label(
                "This will permanently delete the prefix folder and all save files. \
                 This action cannot be undone.",
            );
            ui.add_space(4.0);
            ui.label(
                egui::RichText::new(pending.prefix_path.to_string_lossy())
                    .size(11.0)
                    .color(ui.visuals().weak_text_color()),
            );
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let cancel = ui.button("Cancel");
                // Keyboard focus starts on Cancel.
                if ui.memory(|m| m.focused().is_none()) {
                    cancel.request_focus();
                }
                if cancel.clicked() {
                    cancelled = true;
                }
                let delete = egui::Button::new(
                    egui::RichText::new("Delete").color(egui::Color32::WHITE),
                )
                .fill(egui::Color32::from_rgb(0xc0, 0x1c, 0x28));
                if ui.add(delete).clicked() {
                    confirmed = true;
                }
            });
        });

    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        cancelled = true;
    }

    if confirmed {
        state.confirm_delete();
    } else if cancelled || !open {
        state.cancel_delete();
    }
}

/// Error dialog; stays up until dismissed.
pub fn error_dialog(ctx: &egui::Context, state: &mut AppState) {
    let Some(message) = state.error_message.clone() else {
        return;
    };

    let mut open = true;
    let mut dismissed = false;
    egui::Window::new("Error")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([380.0, 0.0])
        .show(ctx, |ui| {
            ui.label(message);
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });

    if dismissed || !open {
        state.dismiss_error();
    }
}

/// Paths the last scan had to skip.
pub fn warnings_window(ctx: &egui::Context, state: &mut AppState) {
    if !state.show_warnings {
        return;
    }
    let mut open = true;
    egui::Window::new("Scan warnings")
        .open(&mut open)
        .default_size([520.0, 260.0])
        .show(ctx, |ui| {
            let warnings = match &state.result {
                Some(ScanResult::Found(listing)) => listing.warnings.as_slice(),
                _ => &[],
            };
            egui::ScrollArea::vertical().show(ui, |ui| {
                for w in warnings {
                    ui.label(egui::RichText::new(w.path.to_string_lossy()).strong());
                    ui.label(
                        egui::RichText::new(&w.message)
                            .size(11.0)
                            .color(ui.visuals().weak_text_color()),
                    );
                    ui.add_space(4.0);
                }
            });
        });
    state.show_warnings = open;
}
