/// Bottom status bar: scan state and totals.
use crate::state::{AppPhase, AppState};
use egui::Ui;
use protonsaves_core::model::size::{format_count, format_size};
use protonsaves_core::scanner::ScanResult;

/// Draw the status bar at the bottom of the window.
pub fn status_bar(ui: &mut Ui, state: &mut AppState) {
    let color_accent = ui.visuals().hyperlink_color;
    let color_weak = ui.visuals().weak_text_color();
    let color_normal = ui.visuals().text_color();
    let color_warning = egui::Color32::from_rgb(0xfa, 0xb3, 0x87);

    ui.horizontal(|ui| {
        match state.phase {
            AppPhase::Idle => {
                ui.label(egui::RichText::new("Ready").size(12.0).color(color_weak));
            }
            AppPhase::Scanning => {
                ui.spinner();
                ui.label(
                    egui::RichText::new(format!("Scanning {}...", state.base_path.display()))
                        .size(12.0)
                        .color(color_normal),
                );
            }
            AppPhase::Results => {
                let (count, warnings) = match &state.result {
                    Some(ScanResult::Found(listing)) => {
                        (listing.entries.len(), listing.warnings.len())
                    }
                    _ => (0, 0),
                };
                ui.label(
                    egui::RichText::new(format!("{} prefixes", format_count(count as u64)))
                        .size(12.0)
                        .color(color_normal),
                );

                if !state.filter.trim().is_empty() {
                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!(
                            "{} shown",
                            format_count(state.visible_entries().len() as u64)
                        ))
                        .size(12.0)
                        .color(color_weak),
                    );
                }

                if !state.usage.is_empty() {
                    ui.separator();
                    ui.label(
                        egui::RichText::new(format_size(state.total_usage()))
                            .size(12.0)
                            .color(color_accent),
                    );
                }

                if state.measuring {
                    ui.separator();
                    ui.spinner();
                    ui.label(
                        egui::RichText::new("Measuring disk usage...")
                            .size(12.0)
                            .color(color_weak),
                    );
                } else if let Some(d) = state.scan_duration {
                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!("Scanned in {:.0} ms", d.as_secs_f64() * 1000.0))
                            .size(12.0)
                            .color(color_weak),
                    );
                }

                if warnings > 0 {
                    ui.separator();
                    let label = egui::RichText::new(format!("{warnings} warnings"))
                        .size(12.0)
                        .color(color_warning);
                    if ui
                        .link(label)
                        .on_hover_text("Some folders could not be read")
                        .clicked()
                    {
                        state.show_warnings = true;
                    }
                }
            }
        }

        if let Some(ref msg) = state.status_message {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(egui::RichText::new(msg).size(12.0).color(color_normal));
            });
        }
    });
}
