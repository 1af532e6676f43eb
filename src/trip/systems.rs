//! Systems driving the trip lifecycle each tick.

use std::time::Duration;

use bevy::prelude::*;
use jiff::Timestamp;
use rand::Rng;

use crate::core::{SharedRng, SimulationClock};
use crate::destination::{
    events::DestinationResolvedEvent,
    worker::{ResolutionBridge, ResolutionOutcome},
};
use crate::geo::Coordinates;
use crate::pet::{
    config::BirdConfig,
    state::{PetState, Souvenir},
};

use super::{
    engine,
    events::{TripCompletedEvent, TripPhaseChangedEvent, TripStartedEvent},
    types::{TripId, TripPhase},
};

/// Simulated energy used when a test flight is requested from the keyboard.
pub const TEST_FLIGHT_ENERGY: u32 = 100;

/// Repeating gate that batches trip evaluation to the configured cadence.
#[derive(Resource)]
pub struct TripTicker {
    timer: Timer,
}

impl TripTicker {
    pub fn new(tick_seconds: f32) -> Self {
        Self {
            timer: Timer::from_seconds(tick_seconds, TimerMode::Repeating),
        }
    }

    pub fn tick(&mut self, delta: Duration) {
        self.timer.tick(delta);
    }

    pub fn just_finished(&self) -> bool {
        self.timer.just_finished()
    }
}

pub fn advance_trip_ticker(time: Res<Time>, mut ticker: ResMut<TripTicker>) {
    ticker.tick(time.delta());
}

/// What one settlement pass did to the active trip.
#[derive(Debug, Clone, PartialEq)]
pub enum TripTickOutcome {
    Idle,
    InFlight,
    PhaseChanged {
        trip_id: TripId,
        from: TripPhase,
        to: TripPhase,
    },
    Completed {
        trip_id: TripId,
        souvenir: Souvenir,
    },
}

/// Settles the active trip against the clock.
///
/// Completion wins over phase movement, and both derive purely from
/// elapsed time, so one late tick settles to the same place as many
/// small ones would have.
pub fn settle_active_trip(
    state: &mut PetState,
    now: Timestamp,
    config: &BirdConfig,
) -> TripTickOutcome {
    let Some(trip) = state.active_trip.as_ref() else {
        return TripTickOutcome::Idle;
    };

    if engine::is_complete(trip, now) {
        let trip_id = trip.id;
        let souvenir = engine::souvenir_for(trip, now);
        state.record_trip_completion(souvenir.clone(), now);
        return TripTickOutcome::Completed { trip_id, souvenir };
    }

    let trip_id = trip.id;
    let stored = trip.phase;
    let derived = engine::current_phase(trip, now, config);
    if stored == derived {
        return TripTickOutcome::InFlight;
    }

    if let Some(trip) = state.active_trip.as_mut() {
        trip.phase = derived;
    }
    TripTickOutcome::PhaseChanged {
        trip_id,
        from: stored,
        to: derived,
    }
}

/// Copies a finished lookup into the trip that requested it.
///
/// Returns false when the outcome belongs to some other trip; those are
/// stale and must leave the state untouched.
pub fn apply_resolution(state: &mut PetState, outcome: &ResolutionOutcome) -> bool {
    let is_current = state
        .active_trip
        .as_ref()
        .map(|trip| trip.id == outcome.trip_id)
        .unwrap_or(false);
    if !is_current {
        return false;
    }

    if let Some(trip) = state.active_trip.as_mut() {
        let destination = &outcome.resolution.destination;
        trip.destination_name = destination.display_name.clone();
        trip.destination_coords = Some(destination.coordinates);
        trip.map_reference = Some(destination.map_reference.clone());
        trip.actual_distance_meters = outcome.actual_distance_meters;
    }
    true
}

pub fn apply_resolved_destinations(
    mut state: ResMut<PetState>,
    mut resolved: MessageReader<DestinationResolvedEvent>,
) {
    for event in resolved.read() {
        let outcome = &event.outcome;
        // Read-only match check first so stale outcomes never flag the
        // state as changed.
        let is_current = state
            .active_trip
            .as_ref()
            .map(|trip| trip.id == outcome.trip_id)
            .unwrap_or(false);
        if !is_current {
            debug!(
                target: "trip",
                "Dropping stale resolution {} for {}",
                outcome.request_id, outcome.trip_id
            );
            continue;
        }

        apply_resolution(&mut state, outcome);
        info!(
            target: "trip",
            "Destination for {}: {} ({:.1} km out, via {})",
            outcome.trip_id,
            outcome.resolution.destination.display_name,
            outcome.actual_distance_meters / 1_000.0,
            outcome.resolution.source.label()
        );
    }
}

pub fn advance_active_trip(
    ticker: Res<TripTicker>,
    clock: Res<SimulationClock>,
    config: Res<BirdConfig>,
    mut state: ResMut<PetState>,
    mut phase_changes: MessageWriter<TripPhaseChangedEvent>,
    mut completions: MessageWriter<TripCompletedEvent>,
) {
    if !ticker.just_finished() {
        return;
    }

    let now = clock.now();
    // Touch the state mutably only when this tick actually moves it, so
    // change detection fires on real transitions alone.
    let will_act = state
        .active_trip
        .as_ref()
        .map(|trip| {
            engine::is_complete(trip, now) || engine::current_phase(trip, now, &config) != trip.phase
        })
        .unwrap_or(false);
    if !will_act {
        return;
    }

    match settle_active_trip(&mut state, now, &config) {
        TripTickOutcome::Completed { trip_id, souvenir } => {
            info!(
                target: "trip",
                "{} came home with a souvenir from {}",
                state.name, souvenir.place_name
            );
            debug!(target: "trip", "{} settled into the souvenir album", trip_id);
            completions.write(TripCompletedEvent { souvenir });
        }
        TripTickOutcome::PhaseChanged { trip_id, from, to } => {
            info!(target: "trip", "{} is now {}", trip_id, to.label());
            phase_changes.write(TripPhaseChangedEvent { from, to });
        }
        TripTickOutcome::Idle | TripTickOutcome::InFlight => {}
    }
}

pub fn auto_start_trip(
    ticker: Res<TripTicker>,
    clock: Res<SimulationClock>,
    config: Res<BirdConfig>,
    mut state: ResMut<PetState>,
    mut bridge: ResMut<ResolutionBridge>,
    mut rng: ResMut<SharedRng>,
    mut starts: MessageWriter<TripStartedEvent>,
) {
    if !ticker.just_finished() {
        return;
    }
    let Some(home) = config.home else {
        return;
    };

    let now = clock.now();
    if !state.can_start_trip(now, &config) {
        return;
    }

    let energy = state.energy;
    launch_trip(
        energy,
        home,
        now,
        &config,
        &mut state,
        &mut bridge,
        &mut rng,
        &mut starts,
    );
}

/// Keyboard shortcut: T sends the bird on a flight with simulated energy,
/// skipping the cooldown and energy gates. The real energy still drains.
pub fn handle_test_flight_key(
    keys: Res<ButtonInput<KeyCode>>,
    clock: Res<SimulationClock>,
    config: Res<BirdConfig>,
    mut state: ResMut<PetState>,
    mut bridge: ResMut<ResolutionBridge>,
    mut rng: ResMut<SharedRng>,
    mut starts: MessageWriter<TripStartedEvent>,
) {
    if !keys.just_pressed(KeyCode::KeyT) {
        return;
    }
    let Some(home) = config.home else {
        warn!(target: "trip", "Test flight needs home coordinates in the [origin] config");
        return;
    };
    if !state.initialized || state.active_trip.is_some() {
        return;
    }

    info!(target: "trip", "Test flight requested");
    launch_trip(
        TEST_FLIGHT_ENERGY,
        home,
        clock.now(),
        &config,
        &mut state,
        &mut bridge,
        &mut rng,
        &mut starts,
    );
}

/// Keyboard shortcuts 1/2/3 backdate the departure so the next tick sees
/// the bird arriving, returning, or already home. Only the start time
/// moves; phase and completion still derive from elapsed time.
pub fn handle_time_skip_keys(
    keys: Res<ButtonInput<KeyCode>>,
    clock: Res<SimulationClock>,
    config: Res<BirdConfig>,
    mut state: ResMut<PetState>,
) {
    let to_arrival = keys.just_pressed(KeyCode::Digit1);
    let to_return = keys.just_pressed(KeyCode::Digit2);
    let to_completion = keys.just_pressed(KeyCode::Digit3);
    if !(to_arrival || to_return || to_completion) {
        return;
    }

    if state.active_trip.is_none() {
        debug!(target: "trip", "No active trip to fast-forward");
        return;
    }

    let now = clock.now();
    if let Some(trip) = state.active_trip.as_mut() {
        if to_completion {
            trip.started_at = engine::shifted_start_for_completion(trip, now);
            info!(target: "trip", "Fast-forwarded {} to completion", trip.id);
        } else if to_return {
            trip.started_at = engine::shifted_start_for_return(trip, now, &config);
            info!(target: "trip", "Fast-forwarded {} to the return flight", trip.id);
        } else {
            trip.started_at = engine::shifted_start_for_arrival(now, &config);
            info!(target: "trip", "Fast-forwarded {} to arrival", trip.id);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn launch_trip(
    energy: u32,
    home: Coordinates,
    now: Timestamp,
    config: &BirdConfig,
    state: &mut PetState,
    bridge: &mut ResolutionBridge,
    rng: &mut SharedRng,
    starts: &mut MessageWriter<TripStartedEvent>,
) {
    let trip = engine::begin_trip(energy, now, config);
    let request_id = bridge.dispatch(trip.id, home, trip.search_radius_meters, rng.0.gen());

    info!(
        target: "trip",
        "{} departs for {} minutes, search radius {:.0} km ({})",
        state.name,
        trip.total_duration_minutes,
        trip.search_radius_meters / 1_000.0,
        request_id
    );

    starts.write(TripStartedEvent {
        total_duration_minutes: trip.total_duration_minutes,
        search_radius_meters: trip.search_radius_meters,
        energy_spent: trip.energy_spent,
    });

    state.energy = 0;
    state.active_trip = Some(trip);
}
