/// ProtonSaves GUI: egui-based desktop frontend.
///
/// This crate contains all UI code. Business logic lives in `protonsaves-core`.
pub mod app;
pub mod panels;
pub mod state;
pub mod widgets;

pub use app::{ProtonSavesApp, ProtonSavesState};
