// src/ui/status_panel/plugin.rs
//
// UiPlugin coordinates status panel systems and resources.

use bevy::prelude::*;

use super::components::{RecentActivity, StatusPanelSettings};
use super::systems::{record_activity, spawn_status_panel, update_status_panel};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        info!("UiPlugin registered");

        app.insert_resource(StatusPanelSettings::default())
            .init_resource::<RecentActivity>()
            .add_systems(Startup, spawn_status_panel)
            .add_systems(
                Update,
                (record_activity, update_status_panel.after(record_activity)),
            );
    }
}
