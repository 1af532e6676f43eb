// src/ui/status_panel/mod.rs
//
// Status panel module providing the top-left bird status display.

pub mod components;
pub mod plugin;
pub mod systems;

// Re-export main types
pub use plugin::UiPlugin;
