/// UI widgets for ProtonSaves.

pub mod dialogs;
pub mod status_bar;
pub mod toolbar;
