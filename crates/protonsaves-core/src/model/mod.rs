/// Data model for scan results.
///
/// Values are built fresh on every scan and never mutated afterwards.
pub mod compat;
pub mod size;

pub use compat::{CompatEntry, CompatId, GameFolder, SaveLocation};
