//! CorePlugin wires the shared time and randomness authorities.
use bevy::prelude::*;
#[cfg(feature = "engine_debug")]
use bevy::time::TimerMode;
use jiff::Timestamp;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

#[cfg(feature = "engine_debug")]
#[derive(Resource)]
struct DebugTickTimer {
    timer: Timer,
}

#[cfg(feature = "engine_debug")]
impl Default for DebugTickTimer {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(1.0, TimerMode::Repeating),
        }
    }
}

/// Wall-clock source consulted by every time-dependent system.
///
/// The live clock follows the host; tests pin it to an instant so cooldown
/// and phase math can be asserted against exact timestamps.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct SimulationClock {
    frozen: Option<Timestamp>,
}

impl SimulationClock {
    /// Creates a clock that follows the host wall clock.
    pub const fn live() -> Self {
        Self { frozen: None }
    }

    /// Creates a clock pinned to the provided instant.
    pub const fn frozen_at(instant: Timestamp) -> Self {
        Self {
            frozen: Some(instant),
        }
    }

    /// Current simulation timestamp.
    pub fn now(&self) -> Timestamp {
        self.frozen.unwrap_or_else(Timestamp::now)
    }

    /// Re-pins the clock to a new instant.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn freeze_at(&mut self, instant: Timestamp) {
        self.frozen = Some(instant);
    }

    /// Whether the clock is pinned rather than following the host.
    pub fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }
}

/// Fractional minutes from `earlier` to `later`; negative if reversed.
pub fn minutes_between(earlier: Timestamp, later: Timestamp) -> f64 {
    (later.as_millisecond() - earlier.as_millisecond()) as f64 / 60_000.0
}

/// Process-wide RNG so every gameplay draw comes off one stream.
///
/// Worker threads get seeds drawn from this stream instead of the resource
/// itself, which keeps a seeded run reproducible end to end.
#[derive(Resource)]
pub struct SharedRng(pub ChaCha20Rng);

impl Default for SharedRng {
    fn default() -> Self {
        Self(ChaCha20Rng::from_entropy())
    }
}

impl SharedRng {
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn seeded(seed: u64) -> Self {
        Self(ChaCha20Rng::seed_from_u64(seed))
    }
}

/// Registers the simulation time authority.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorePlugin {
    frozen: Option<Timestamp>,
}

impl CorePlugin {
    /// Creates a CorePlugin whose clock is pinned to the provided instant.
    #[cfg_attr(not(test), allow(dead_code))]
    pub const fn frozen_at(instant: Timestamp) -> Self {
        Self {
            frozen: Some(instant),
        }
    }
}

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        let clock = match self.frozen {
            Some(instant) => SimulationClock::frozen_at(instant),
            None => SimulationClock::live(),
        };
        app.insert_resource(clock)
            .init_resource::<SharedRng>()
            .add_systems(Startup, log_startup_clock);

        #[cfg(feature = "engine_debug")]
        {
            app.insert_resource(DebugTickTimer::default())
                .add_systems(Update, log_clock_ticks);
        }
    }
}

fn log_startup_clock(clock: Res<SimulationClock>) {
    if clock.is_frozen() {
        info!("CorePlugin initialised with a frozen clock at {}", clock.now());
    } else {
        info!("CorePlugin initialised with the live wall clock");
    }
}

#[cfg(feature = "engine_debug")]
fn log_clock_ticks(mut timer: ResMut<DebugTickTimer>, clock: Res<SimulationClock>, time: Res<Time>) {
    if timer.timer.tick(time.delta()).just_finished() {
        info!(target: "engine_debug", "Sim now: {}", clock.now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frozen_clock_returns_the_pinned_instant() {
        let instant = Timestamp::UNIX_EPOCH;
        let clock = SimulationClock::frozen_at(instant);
        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), instant);
        assert!(clock.is_frozen());
    }

    #[test]
    fn freeze_at_repins_the_clock() {
        let mut clock = SimulationClock::live();
        assert!(!clock.is_frozen());

        let instant = Timestamp::UNIX_EPOCH;
        clock.freeze_at(instant);
        assert_eq!(clock.now(), instant);
    }

    #[test]
    fn live_clock_tracks_the_host() {
        let clock = SimulationClock::live();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    #[test]
    fn minutes_between_handles_both_directions() {
        let start = Timestamp::UNIX_EPOCH;
        let later = Timestamp::from_millisecond(90_000).unwrap();
        assert!((minutes_between(start, later) - 1.5).abs() < 1e-9);
        assert!((minutes_between(later, start) + 1.5).abs() < 1e-9);
    }

    #[test]
    fn seeded_rng_repeats_its_stream() {
        use rand::Rng;

        let mut first = SharedRng::seeded(42);
        let mut second = SharedRng::seeded(42);
        assert_eq!(first.0.gen::<u64>(), second.0.gen::<u64>());
    }
}
