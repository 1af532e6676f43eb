//! Pure trip math: planning, phase evaluation, progress and souvenirs.
//!
//! Everything here derives from the trip record, the wall clock and the
//! config. Phase is never stored authoritatively; it is recomputed from
//! elapsed time on every tick so a sleeping process catches up on wake.

use jiff::Timestamp;
use uuid::Uuid;

use crate::core::minutes_between;
use crate::destination::types::fallback_map_reference;
use crate::geo::{interpolate, Coordinates};
use crate::pet::config::BirdConfig;
use crate::pet::state::Souvenir;

use super::types::{Trip, TripId, TripPhase, PLACEHOLDER_DESTINATION};

/// Margin subtracted by the time-shift helpers so the next tick lands
/// unambiguously past the boundary it targets.
const SKIP_SAFETY_MARGIN_MS: i64 = 5_000;

/// Travel envelope derived from the energy spent at departure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripPlan {
    pub total_duration_minutes: u32,
    pub search_radius_meters: f64,
}

/// Duration scales with energy and clamps into the configured window.
/// The search radius scales linearly and is deliberately uncapped.
pub fn plan_trip(energy: u32, config: &BirdConfig) -> TripPlan {
    let computed = energy / config.energy_per_minute;
    let total_duration_minutes = computed.clamp(
        config.min_trip_duration_minutes,
        config.max_trip_duration_minutes,
    );
    let search_radius_meters = f64::from(energy) * config.radius_per_energy_meters;

    TripPlan {
        total_duration_minutes,
        search_radius_meters,
    }
}

/// Builds a departing trip with the destination still unresolved.
pub fn begin_trip(energy: u32, started_at: Timestamp, config: &BirdConfig) -> Trip {
    debug_assert!(energy > 0, "trips cannot depart with zero energy");
    let plan = plan_trip(energy, config);

    Trip {
        id: TripId::new(),
        destination_name: PLACEHOLDER_DESTINATION.to_string(),
        destination_coords: None,
        map_reference: None,
        started_at,
        total_duration_minutes: plan.total_duration_minutes,
        search_radius_meters: plan.search_radius_meters,
        energy_spent: energy,
        actual_distance_meters: 0.0,
        phase: TripPhase::FlyingOut,
    }
}

/// Minutes since departure, never negative even if the clock jumps back.
pub fn elapsed_minutes(trip: &Trip, now: Timestamp) -> f64 {
    minutes_between(trip.started_at, now).max(0.0)
}

/// Minutes spent at the destination between the two flight legs.
pub fn stay_minutes(trip: &Trip, config: &BirdConfig) -> u32 {
    trip.total_duration_minutes
        .saturating_sub(config.transit_minutes())
}

pub fn is_complete(trip: &Trip, now: Timestamp) -> bool {
    elapsed_minutes(trip, now) >= f64::from(trip.total_duration_minutes)
}

/// Maps elapsed time onto the three phase windows.
pub fn phase_for_elapsed(trip: &Trip, elapsed: f64, config: &BirdConfig) -> TripPhase {
    let fly_out = f64::from(config.fly_out_minutes);
    let stay_end = fly_out + f64::from(stay_minutes(trip, config));

    if elapsed < fly_out {
        TripPhase::FlyingOut
    } else if elapsed < stay_end {
        TripPhase::Staying
    } else {
        TripPhase::FlyingBack
    }
}

pub fn current_phase(trip: &Trip, now: Timestamp, config: &BirdConfig) -> TripPhase {
    phase_for_elapsed(trip, elapsed_minutes(trip, now), config)
}

/// Journey progress from 0 to 100. The outbound flight covers the first
/// third, the stay the second, and the return flight the final 34 points.
///
/// Config sanitisation keeps both flight legs at least a minute long, so
/// only the stay window can be empty.
pub fn progress_percent(trip: &Trip, now: Timestamp, config: &BirdConfig) -> f64 {
    let elapsed = elapsed_minutes(trip, now);
    let fly_out = f64::from(config.fly_out_minutes);
    let fly_back = f64::from(config.fly_back_minutes);
    let stay = f64::from(stay_minutes(trip, config));

    let raw = match phase_for_elapsed(trip, elapsed, config) {
        TripPhase::FlyingOut => (elapsed / fly_out) * 33.0,
        TripPhase::Staying if stay > 0.0 => 33.0 + ((elapsed - fly_out) / stay) * 33.0,
        TripPhase::Staying => 66.0,
        TripPhase::FlyingBack => 66.0 + ((elapsed - fly_out - stay) / fly_back) * 34.0,
    };

    raw.clamp(0.0, 100.0)
}

/// Where to draw the bird between home and the destination.
///
/// Until resolution lands the bird sits at home no matter the phase.
pub fn display_position(
    trip: &Trip,
    home: Coordinates,
    now: Timestamp,
    config: &BirdConfig,
) -> Coordinates {
    let Some(destination) = trip.destination_coords else {
        return home;
    };

    let elapsed = elapsed_minutes(trip, now);
    let fly_out = f64::from(config.fly_out_minutes);
    let fly_back = f64::from(config.fly_back_minutes);
    let stay = f64::from(stay_minutes(trip, config));

    match phase_for_elapsed(trip, elapsed, config) {
        TripPhase::FlyingOut => interpolate(home, destination, elapsed / fly_out),
        TripPhase::Staying => destination,
        TripPhase::FlyingBack => {
            interpolate(destination, home, (elapsed - fly_out - stay) / fly_back)
        }
    }
}

/// Mints the keepsake for a finished trip.
///
/// An unresolved trip still yields a souvenir; its link degrades to a
/// plain text search for whatever name the trip ended with.
pub fn souvenir_for(trip: &Trip, collected_at: Timestamp) -> Souvenir {
    let map_reference = trip
        .map_reference
        .clone()
        .unwrap_or_else(|| fallback_map_reference(&trip.destination_name));

    Souvenir {
        id: Uuid::new_v4(),
        place_name: trip.destination_name.clone(),
        collected_at,
        map_reference,
        description: format!(
            "Your bird visited {} and brought back a photo!",
            trip.destination_name
        ),
    }
}

fn start_for_elapsed(now: Timestamp, minutes: f64) -> Timestamp {
    let shifted_ms = now.as_millisecond() - (minutes * 60_000.0) as i64 - SKIP_SAFETY_MARGIN_MS;
    Timestamp::from_millisecond(shifted_ms).unwrap_or(Timestamp::UNIX_EPOCH)
}

/// Backdated start that puts the bird just past the outbound flight.
pub fn shifted_start_for_arrival(now: Timestamp, config: &BirdConfig) -> Timestamp {
    start_for_elapsed(now, f64::from(config.fly_out_minutes))
}

/// Backdated start that puts the bird at the top of the return flight.
pub fn shifted_start_for_return(trip: &Trip, now: Timestamp, config: &BirdConfig) -> Timestamp {
    start_for_elapsed(
        now,
        f64::from(config.fly_out_minutes) + f64::from(stay_minutes(trip, config)),
    )
}

/// Backdated start that puts the whole trip in the past.
pub fn shifted_start_for_completion(trip: &Trip, now: Timestamp) -> Timestamp {
    start_for_elapsed(now, f64::from(trip.total_duration_minutes))
}
