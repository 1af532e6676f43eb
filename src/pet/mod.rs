//! Pet module hosting the bird aggregate, its config, and care systems.
pub mod config;
pub mod events;
pub mod plugin;
pub mod state;
pub mod systems;

pub use plugin::PetPlugin;
