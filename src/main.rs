use std::path::Path;

use bevy::prelude::*;

mod core;
mod destination;
mod geo;
mod persistence;
mod pet;
mod trip;
mod ui;

use crate::{
    core::CorePlugin, destination::DestinationPlugin, pet::PetPlugin, trip::TripPlugin,
    ui::UiPlugin,
};

fn main() {
    load_secrets_env();

    App::new()
        .add_plugins((
            DefaultPlugins,
            CorePlugin::default(),
            DestinationPlugin,
            PetPlugin,
            TripPlugin, // After PetPlugin so the ticker picks up the configured cadence
            UiPlugin,
        ))
        .run();
}

fn load_secrets_env() {
    const SECRETS_FILE: &str = "secrets.env";

    let path = Path::new(SECRETS_FILE);
    if !path.exists() {
        return;
    }

    if let Err(err) = dotenvy::from_filename(path) {
        eprintln!("Failed to load {}: {}", SECRETS_FILE, err);
    }
}
