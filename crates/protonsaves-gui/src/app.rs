/// Main `eframe::App` implementation for ProtonSaves.
///
/// This is the top-level UI layout that composes all panels and widgets.
use crate::panels;
use crate::state::AppState;
use crate::widgets;
use protonsaves_core::{ScanConfig, Settings};

/// Pre-built application state.
///
/// Construct this **before** calling `eframe::run_native` so the first
/// scan is already running when the window appears.
pub struct ProtonSavesState {
    pub(crate) inner: AppState,
}

impl ProtonSavesState {
    /// Resolve the compatdata directory from `settings` and kick off the
    /// initial scan.
    pub fn build(settings: &Settings) -> Self {
        let base = settings.compatdata_path();
        tracing::info!("Using compatdata directory {}", base.display());

        let mut state = AppState::new(base, ScanConfig::default());
        state.request_scan();
        Self { inner: state }
    }
}

/// The ProtonSaves application.
pub struct ProtonSavesApp {
    state: AppState,
}

impl ProtonSavesApp {
    /// Create a new application instance from pre-built state.
    pub fn with_state(_cc: &eframe::CreationContext<'_>, state: ProtonSavesState) -> Self {
        Self { state: state.inner }
    }
}

impl eframe::App for ProtonSavesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── Process background messages ───────────────────────────────────
        let _data_changed = self.state.process_scan_messages();

        // Keep polling the channel while the scanner is working.
        if self.state.is_busy() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        // ── Top toolbar ───────────────────────────────────────────────────
        egui::TopBottomPanel::top("toolbar")
            .min_height(36.0)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                widgets::toolbar::toolbar(ui, &mut self.state);
                ui.add_space(4.0);
            });

        // ── Bottom status bar ─────────────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(24.0)
            .show(ctx, |ui| {
                ui.add_space(2.0);
                widgets::status_bar::status_bar(ui, &mut self.state);
                ui.add_space(2.0);
            });

        // ── Central panel (prefix list) ───────────────────────────────────
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if let Some(action) = panels::prefix_panel::prefix_panel(ui, &self.state) {
                        self.apply(action);
                    }
                });
        });

        // ── Dialogs ───────────────────────────────────────────────────────
        // Drawn last so they sit above the panels.
        widgets::dialogs::confirm_delete_dialog(ctx, &mut self.state);
        widgets::dialogs::error_dialog(ctx, &mut self.state);
        widgets::dialogs::warnings_window(ctx, &mut self.state);
    }
}

impl ProtonSavesApp {
    fn apply(&mut self, action: panels::prefix_panel::PrefixAction) {
        use panels::prefix_panel::PrefixAction;
        match action {
            PrefixAction::Open(path) => self.state.request_open(&path),
            PrefixAction::Delete(prefix_path) => self.state.request_delete(&prefix_path),
        }
    }
}
