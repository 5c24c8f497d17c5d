/// Central-panel content.
pub mod prefix_panel;
