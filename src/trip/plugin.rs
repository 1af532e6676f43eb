//! Trip plugin wiring the lifecycle tick chain.
use bevy::prelude::*;

use crate::pet::config::BirdConfig;

use super::{
    events::{TripCompletedEvent, TripPhaseChangedEvent, TripStartedEvent},
    systems::{
        advance_active_trip, advance_trip_ticker, apply_resolved_destinations, auto_start_trip,
        handle_test_flight_key, handle_time_skip_keys, TripTicker,
    },
};

pub struct TripPlugin;

impl Plugin for TripPlugin {
    fn build(&self, app: &mut App) {
        // The pet plugin loads the config first; fall back to the stock
        // cadence if the plugin order ever changes.
        let tick_seconds = app
            .world()
            .get_resource::<BirdConfig>()
            .map(|config| config.tick_seconds)
            .unwrap_or(5.0);
        info!("Trip engine ticking every {:.1}s", tick_seconds);

        app.insert_resource(TripTicker::new(tick_seconds))
            .add_event::<TripStartedEvent>()
            .add_event::<TripPhaseChangedEvent>()
            .add_event::<TripCompletedEvent>()
            .add_systems(
                Update,
                (
                    handle_test_flight_key,
                    handle_time_skip_keys,
                    advance_trip_ticker,
                    apply_resolved_destinations,
                    advance_active_trip,
                    auto_start_trip,
                )
                    .chain(),
            );
    }
}
