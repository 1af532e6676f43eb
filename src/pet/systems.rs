//! Systems for adoption, feeding, and snapshot saves.

use bevy::prelude::*;
use jiff::Timestamp;

use crate::core::{SharedRng, SimulationClock};
use crate::persistence::{self, SavePath};

use super::{
    config::BirdConfig,
    events::{BirdAdoptedEvent, BirdFedEvent},
    state::{AdoptOutcome, FeedOutcome, PetState},
};

/// Hatches the bird on first launch. Later runs load an adopted bird
/// from the save file and skip this.
pub fn adopt_on_first_run(
    clock: Res<SimulationClock>,
    config: Res<BirdConfig>,
    mut state: ResMut<PetState>,
    mut rng: ResMut<SharedRng>,
    mut adoptions: MessageWriter<BirdAdoptedEvent>,
) {
    if state.initialized {
        debug!(target: "pet", "Loaded {} the {}", state.name, state.species.label());
        return;
    }

    adopt_bird(clock.now(), &config, &mut state, &mut rng, &mut adoptions);
}

/// Keyboard shortcut: A adopts a bird if none exists, for recovering
/// from a wiped save without restarting.
pub fn handle_adopt_key(
    keys: Res<ButtonInput<KeyCode>>,
    clock: Res<SimulationClock>,
    config: Res<BirdConfig>,
    mut state: ResMut<PetState>,
    mut rng: ResMut<SharedRng>,
    mut adoptions: MessageWriter<BirdAdoptedEvent>,
) {
    if !keys.just_pressed(KeyCode::KeyA) {
        return;
    }
    if state.initialized {
        debug!(target: "pet", "{} is already adopted", state.name);
        return;
    }

    adopt_bird(clock.now(), &config, &mut state, &mut rng, &mut adoptions);
}

/// Keyboard shortcut: F feeds the bird when it is home and off cooldown.
pub fn handle_feed_key(
    keys: Res<ButtonInput<KeyCode>>,
    clock: Res<SimulationClock>,
    config: Res<BirdConfig>,
    mut state: ResMut<PetState>,
    mut fed: MessageWriter<BirdFedEvent>,
) {
    if !keys.just_pressed(KeyCode::KeyF) {
        return;
    }

    match state.feed(clock.now(), &config) {
        FeedOutcome::Fed { energy } => {
            info!(target: "pet", "{} ate well, energy is now {}", state.name, energy);
            fed.write(BirdFedEvent { energy });
        }
        FeedOutcome::OnCooldown { remaining_minutes } => {
            info!(
                target: "pet",
                "{} is not hungry yet ({:.1} min until the next meal)",
                state.name, remaining_minutes
            );
        }
        FeedOutcome::Traveling => {
            info!(target: "pet", "{} is away and cannot be fed", state.name);
        }
        FeedOutcome::NotAdopted => {
            debug!(target: "pet", "Cannot feed before adoption");
        }
    }
}

/// Writes the snapshot back whenever something actually changed it. The
/// initial insert does not count as a change worth writing.
pub fn save_pet_state(state: Res<PetState>, save_path: Res<SavePath>) {
    if !state.is_changed() || state.is_added() {
        return;
    }

    write_snapshot(&save_path, &state);
}

/// One-shot write after startup so a first-run adoption reaches disk
/// even if the app closes straight away.
pub fn save_after_startup(state: Res<PetState>, save_path: Res<SavePath>) {
    if !state.initialized {
        return;
    }

    write_snapshot(&save_path, &state);
}

fn write_snapshot(save_path: &SavePath, state: &PetState) {
    if let Err(err) = persistence::save(save_path.path(), state) {
        warn!(
            "Failed to write save file {:?}: {}",
            save_path.path(),
            err
        );
    }
}

fn adopt_bird(
    now: Timestamp,
    config: &BirdConfig,
    state: &mut PetState,
    rng: &mut SharedRng,
    adoptions: &mut MessageWriter<BirdAdoptedEvent>,
) {
    let adoption = &config.adoption;
    let AdoptOutcome::Adopted(species) =
        state.adopt(adoption.species, &adoption.name, now, &mut rng.0)
    else {
        return;
    };

    let rarity = if species.is_rare() { " (rare find!)" } else { "" };
    info!(
        target: "pet",
        "Adopted {} the {}{}",
        state.name,
        species.label(),
        rarity
    );
    adoptions.write(BirdAdoptedEvent {
        species,
        name: state.name.clone(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pet::config::{AdoptionSettings, SpeciesChoice};
    use crate::pet::state::BirdSpecies;
    use std::{env, fs, time::SystemTime};

    fn at_minutes(minutes: f64) -> Timestamp {
        Timestamp::from_millisecond((minutes * 60_000.0) as i64).expect("timestamp in range")
    }

    fn pip_config() -> BirdConfig {
        let mut config = BirdConfig::default();
        config.adoption = AdoptionSettings {
            name: "Pip".to_string(),
            species: SpeciesChoice::Fixed(BirdSpecies::Pigeon),
        };
        config
    }

    #[test]
    fn first_run_adopts_the_configured_bird() {
        let mut app = App::new();
        app.add_event::<BirdAdoptedEvent>();
        app.add_systems(Startup, adopt_on_first_run);

        let now = at_minutes(10_000.0);
        app.insert_resource(pip_config());
        app.insert_resource(SimulationClock::frozen_at(now));
        app.insert_resource(SharedRng::seeded(1));
        app.insert_resource(PetState::default());

        app.update();

        let state = app.world().resource::<PetState>();
        assert!(state.initialized);
        assert_eq!(state.name, "Pip");
        assert_eq!(state.species, BirdSpecies::Pigeon);
        assert_eq!(state.last_trip_end_at, now);
    }

    #[test]
    fn adoption_never_replaces_a_loaded_bird() {
        let mut app = App::new();
        app.add_event::<BirdAdoptedEvent>();
        app.add_systems(Startup, adopt_on_first_run);

        app.insert_resource(pip_config());
        app.insert_resource(SimulationClock::frozen_at(at_minutes(10_000.0)));
        app.insert_resource(SharedRng::seeded(1));
        app.insert_resource(PetState {
            initialized: true,
            species: BirdSpecies::BlueJay,
            name: "Kiwi".to_string(),
            ..PetState::default()
        });

        app.update();

        let state = app.world().resource::<PetState>();
        assert_eq!(state.name, "Kiwi");
        assert_eq!(state.species, BirdSpecies::BlueJay);
    }

    #[test]
    fn feed_key_feeds_a_hungry_bird() {
        let mut app = App::new();
        app.add_event::<BirdFedEvent>();
        app.add_systems(Update, handle_feed_key);

        let now = at_minutes(10_000.0);
        app.insert_resource(BirdConfig::default());
        app.insert_resource(SimulationClock::frozen_at(now));
        app.insert_resource(PetState {
            initialized: true,
            name: "Pip".to_string(),
            ..PetState::default()
        });

        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::KeyF);
        app.insert_resource(keys);

        app.update();

        let state = app.world().resource::<PetState>();
        assert_eq!(state.energy, 10);
        assert_eq!(state.last_fed_at, now);
    }

    #[test]
    fn feed_key_respects_the_cooldown() {
        let mut app = App::new();
        app.add_event::<BirdFedEvent>();
        app.add_systems(Update, handle_feed_key);

        app.insert_resource(BirdConfig::default());
        app.insert_resource(SimulationClock::frozen_at(at_minutes(10_000.0)));
        app.insert_resource(PetState {
            initialized: true,
            name: "Pip".to_string(),
            last_fed_at: at_minutes(9_995.0),
            ..PetState::default()
        });

        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::KeyF);
        app.insert_resource(keys);

        app.update();

        let state = app.world().resource::<PetState>();
        assert_eq!(state.energy, 0);
        assert_eq!(state.last_fed_at, at_minutes(9_995.0));
    }

    #[test]
    fn saves_land_only_after_real_changes() {
        let unique_suffix = SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = env::temp_dir().join(format!("bird_save_system_{}", unique_suffix));
        let path = dir.join("bird.json");

        let mut app = App::new();
        app.add_systems(Update, save_pet_state);
        app.insert_resource(SavePath::new(&path));
        app.insert_resource(PetState::default());

        app.update();
        assert!(!path.exists());

        app.world_mut().resource_mut::<PetState>().energy = 5;
        app.update();
        assert!(path.exists());

        let loaded = persistence::load_or_default(&path);
        assert_eq!(loaded.energy, 5);

        let _ = fs::remove_dir_all(&dir);
    }
}
