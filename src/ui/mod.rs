// src/ui/mod.rs
//
// UI module providing screen-space UI elements for the bird status display.
//
// Current features:
// - Status panel (top-left corner: bird status, trip progress, command help)
//
// Future features:
// - Map view tracking the active trip
// - Souvenir album browser

pub mod status_panel;

// Re-export the main plugin
pub use status_panel::UiPlugin;
