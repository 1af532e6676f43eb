//! Core module hosting the shared simulation clock and randomness.
pub mod plugin;

pub use plugin::{minutes_between, CorePlugin, SharedRng, SimulationClock};
