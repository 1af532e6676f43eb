//! Messages emitted by the trip lifecycle engine.
use bevy::prelude::{Event, Message};

use crate::pet::state::Souvenir;

use super::types::TripPhase;

/// Fired when a trip departs, before its destination is known.
#[derive(Event, Message, Debug, Clone)]
pub struct TripStartedEvent {
    pub total_duration_minutes: u32,
    pub search_radius_meters: f64,
    pub energy_spent: u32,
}

/// Fired when the derived phase moves to a new window.
#[derive(Event, Message, Debug, Clone)]
pub struct TripPhaseChangedEvent {
    pub from: TripPhase,
    pub to: TripPhase,
}

/// Fired once per trip, when it settles into the history.
#[derive(Event, Message, Debug, Clone)]
pub struct TripCompletedEvent {
    pub souvenir: Souvenir,
}
