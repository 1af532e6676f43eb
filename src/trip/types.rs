//! Trip records and phase definitions for the lifecycle engine.
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::Coordinates;

/// Destination shown while the asynchronous lookup is still in flight.
pub const PLACEHOLDER_DESTINATION: &str = "Confirming destination...";

/// Correlates a trip with its asynchronous destination resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TripId(Uuid);

impl TripId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TripId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Active sub-states of a journey. Idle is the absence of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripPhase {
    FlyingOut,
    Staying,
    FlyingBack,
}

impl TripPhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::FlyingOut => "flying out",
            Self::Staying => "staying",
            Self::FlyingBack => "flying back",
        }
    }
}

/// A journey in progress. Consumed on completion and replaced by a souvenir.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub destination_name: String,
    pub destination_coords: Option<Coordinates>,
    pub map_reference: Option<String>,
    pub started_at: jiff::Timestamp,
    pub total_duration_minutes: u32,
    pub search_radius_meters: f64,
    pub energy_spent: u32,
    /// Zero until resolution lands.
    pub actual_distance_meters: f64,
    pub phase: TripPhase,
}

impl Trip {
    /// Whether the lookup has filled in the destination fields yet.
    pub fn is_resolved(&self) -> bool {
        self.destination_coords.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trip_ids_are_unique() {
        assert_ne!(TripId::new(), TripId::new());
    }

    #[test]
    fn phase_labels_read_naturally() {
        assert_eq!(TripPhase::FlyingOut.label(), "flying out");
        assert_eq!(TripPhase::Staying.label(), "staying");
        assert_eq!(TripPhase::FlyingBack.label(), "flying back");
    }
}
