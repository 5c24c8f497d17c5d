//! ProtonSaves: manage Proton compatdata prefixes and their save files.
//!
//! Thin binary entry point. All logic lives in the `protonsaves-core`
//! and `protonsaves-gui` crates.

fn main() -> anyhow::Result<()> {
    // Settings first: they carry the log level.
    let settings = protonsaves_core::Settings::load();

    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_max_level(settings.tracing_level())
        .init();

    tracing::info!("ProtonSaves starting");

    // Build application state *before* opening the window so the first
    // scan is already running when the first frame is drawn.
    let state = protonsaves_gui::ProtonSavesState::build(&settings);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("Proton Game Saves Manager")
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "ProtonSaves",
        options,
        Box::new(|cc| {
            Ok(Box::new(protonsaves_gui::ProtonSavesApp::with_state(
                cc, state,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))?;

    Ok(())
}
