//! Messages emitted by pet care actions.
use bevy::prelude::{Event, Message};

use super::state::BirdSpecies;

/// Fired once, when the bird hatches on first launch.
#[derive(Event, Message, Debug, Clone)]
pub struct BirdAdoptedEvent {
    pub species: BirdSpecies,
    pub name: String,
}

/// Fired after a successful feeding.
#[derive(Event, Message, Debug, Clone)]
pub struct BirdFedEvent {
    pub energy: u32,
}
