//! Pet plugin wiring configuration, the saved snapshot, and care systems.
use bevy::prelude::*;

use crate::persistence::{self, SavePath};

use super::{
    config::BirdConfig,
    events::{BirdAdoptedEvent, BirdFedEvent},
    systems::{
        adopt_on_first_run, handle_adopt_key, handle_feed_key, save_after_startup, save_pet_state,
    },
};

pub struct PetPlugin;

impl Plugin for PetPlugin {
    fn build(&self, app: &mut App) {
        let config = BirdConfig::load_or_default();
        info!(
            "Bird config loaded: +{} energy per feed, {:.0} min feed cooldown, {:.0} min trip rest",
            config.feed_energy_gain, config.feed_cooldown_minutes, config.trip_cooldown_minutes
        );
        if config.home.is_none() {
            warn!("No [origin] coordinates configured; trips stay grounded until they are set");
        }

        let save_path = SavePath::default();
        let state = persistence::load_or_default(save_path.path());
        if state.initialized {
            info!(
                "Save file loaded: {} the {} is back",
                state.name,
                state.species.label()
            );
        }

        app.insert_resource(config)
            .insert_resource(save_path)
            .insert_resource(state)
            .add_event::<BirdAdoptedEvent>()
            .add_event::<BirdFedEvent>()
            .add_systems(Startup, adopt_on_first_run)
            .add_systems(PostStartup, save_after_startup)
            .add_systems(Update, (handle_adopt_key, handle_feed_key))
            // Gameplay systems mutate the snapshot during Update; the save
            // pass runs after all of them have settled.
            .add_systems(PostUpdate, save_pet_state);
    }
}
