//! Trip module hosting the lifecycle engine, tick systems, and records.
pub mod engine;
pub mod events;
pub mod plugin;
pub mod systems;
pub mod types;

pub use plugin::TripPlugin;
