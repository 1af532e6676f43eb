// src/ui/status_panel/systems.rs
//
// Systems for spawning and refreshing the status panel.

use bevy::prelude::*;
use jiff::Timestamp;

use crate::core::SimulationClock;
use crate::destination::status::ResolverStatus;
use crate::pet::{
    config::BirdConfig,
    events::{BirdAdoptedEvent, BirdFedEvent},
    state::PetState,
};
use crate::trip::{
    engine,
    events::{TripCompletedEvent, TripPhaseChangedEvent, TripStartedEvent},
    types::TripPhase,
};

use super::components::{RecentActivity, StatusPanel, StatusPanelSettings, StatusPanelText};

// Visual constants
const BACKGROUND_COLOR: Color = Color::srgba(0.1, 0.1, 0.1, 0.9);
const BORDER_COLOR: Color = Color::srgb(0.3, 0.3, 0.3);
const TEXT_COLOR: Color = Color::WHITE;
const TITLE_COLOR: Color = Color::srgb(1.0, 0.9, 0.4); // Yellow/gold
const ICON_TEXT: &str = "🐦 ";
const PANEL_TITLE: &str = "Travel Bird";

/// Shown in place of the destination while the bird is still flying out.
const MYSTERY_DESTINATION: &str = "Mystery location ???";

const HELP_LINE: &str = "[F] Feed   [T] Test flight   [1/2/3] Time skip   [A] Adopt";

/// Spawn the camera and the status panel hierarchy.
pub fn spawn_status_panel(mut commands: Commands, settings: Res<StatusPanelSettings>) {
    commands.spawn(Camera2d);

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(settings.top_offset),
                left: Val::Px(settings.left_offset),
                width: Val::Px(settings.panel_width),
                padding: UiRect::all(Val::Px(settings.padding)),
                border: UiRect::all(Val::Px(settings.border_width)),
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(BACKGROUND_COLOR),
            BorderColor::from(BORDER_COLOR),
            StatusPanel,
        ))
        .with_children(|parent| {
            // Header row (icon + title)
            parent
                .spawn(Node {
                    flex_direction: FlexDirection::Row,
                    align_items: AlignItems::Center,
                    margin: UiRect::bottom(Val::Px(8.0)),
                    ..default()
                })
                .with_children(|header| {
                    header.spawn((
                        Text::new(ICON_TEXT),
                        TextFont {
                            font_size: settings.title_font_size,
                            ..default()
                        },
                        TextColor(TEXT_COLOR),
                    ));

                    header.spawn((
                        Text::new(PANEL_TITLE),
                        TextFont {
                            font_size: settings.title_font_size,
                            ..default()
                        },
                        TextColor(TITLE_COLOR),
                    ));
                });

            // Status body, rewritten every frame
            parent.spawn((
                Text::new(String::new()),
                TextFont {
                    font_size: settings.body_font_size,
                    ..default()
                },
                TextColor(TEXT_COLOR),
                StatusPanelText,
            ));
        });
}

/// Folds the frame's messages into the rolling activity feed.
pub fn record_activity(
    mut activity: ResMut<RecentActivity>,
    mut adoptions: MessageReader<BirdAdoptedEvent>,
    mut feedings: MessageReader<BirdFedEvent>,
    mut starts: MessageReader<TripStartedEvent>,
    mut phase_changes: MessageReader<TripPhaseChangedEvent>,
    mut completions: MessageReader<TripCompletedEvent>,
) {
    for adoption in adoptions.read() {
        activity.push(format!(
            "Adopted {} the {}",
            adoption.name,
            adoption.species.label()
        ));
    }
    for meal in feedings.read() {
        activity.push(format!("Ate a meal, energy {}", meal.energy));
    }
    for start in starts.read() {
        activity.push(format!(
            "Departed: {} min trip, {} energy, {:.0} km range",
            start.total_duration_minutes,
            start.energy_spent,
            start.search_radius_meters / 1_000.0
        ));
    }
    for change in phase_changes.read() {
        activity.push(format!(
            "Now {} (was {})",
            change.to.label(),
            change.from.label()
        ));
    }
    for completion in completions.read() {
        activity.push(format!("Souvenir from {}", completion.souvenir.place_name));
    }
}

/// Refresh the status text from the live resources.
pub fn update_status_panel(
    clock: Res<SimulationClock>,
    config: Res<BirdConfig>,
    state: Res<PetState>,
    status: Res<ResolverStatus>,
    activity: Res<RecentActivity>,
    mut query: Query<&mut Text, With<StatusPanelText>>,
) {
    let Ok(mut text) = query.single_mut() else {
        return;
    };

    let composed = compose_status_text(&state, &config, &status, &activity, clock.now());
    // Rewriting identical text would dirty the layout every frame.
    if text.0 != composed {
        text.0 = composed;
    }
}

/// Builds the panel body. Pure so the display rules stay testable.
pub fn compose_status_text(
    state: &PetState,
    config: &BirdConfig,
    status: &ResolverStatus,
    activity: &RecentActivity,
    now: Timestamp,
) -> String {
    let mut lines = Vec::new();

    if !state.initialized {
        lines.push("No bird yet. Press A to adopt one.".to_string());
        lines.push(String::new());
        lines.push(HELP_LINE.to_string());
        return lines.join("\n");
    }

    lines.push(format!("{} the {}", state.name, state.species.label()));
    lines.push(format!("Energy: {}", state.energy));

    match state.active_trip.as_ref() {
        Some(trip) => {
            let progress = engine::progress_percent(trip, now, config);
            lines.push(format!("Status: {} ({:.0}%)", trip.phase.label(), progress));

            let destination = if trip.phase == TripPhase::FlyingOut {
                MYSTERY_DESTINATION
            } else {
                trip.destination_name.as_str()
            };
            lines.push(format!("Destination: {}", destination));

            if trip.phase != TripPhase::FlyingOut && trip.is_resolved() {
                lines.push(format!(
                    "Distance: {:.1} km",
                    trip.actual_distance_meters / 1_000.0
                ));
            }
            if let Some(home) = config.home {
                let position = engine::display_position(trip, home, now, config);
                lines.push(format!("Position: {:.4}, {:.4}", position.lat, position.lng));
            }
            lines.push("Next meal: after the trip".to_string());
        }
        None => {
            lines.push("Status: home".to_string());

            if state.can_feed(now, config) {
                lines.push("Next meal: ready now".to_string());
            } else {
                let meal_wait = state.feed_cooldown_remaining_minutes(now, config);
                lines.push(format!("Next meal: in {:.0} min", meal_wait.ceil()));
            }

            let rest = state.trip_cooldown_remaining_minutes(now, config);
            if config.home.is_none() {
                lines.push("Next trip: grounded, set [origin] in config/bird.toml".to_string());
            } else if rest > 0.0 {
                lines.push(format!("Next trip: resting for {:.0} min", rest.ceil()));
            } else if state.energy == 0 {
                lines.push("Next trip: needs a meal first".to_string());
            } else {
                lines.push("Next trip: ready for takeoff".to_string());
            }
        }
    }

    lines.push(format!("Souvenirs: {}", state.history.len()));
    lines.push(format!(
        "Lookup: {} ({})",
        status.provider(),
        status.connection_label()
    ));

    if !activity.is_empty() {
        lines.push(String::new());
        lines.push("Recent:".to_string());
        for entry in activity.entries() {
            lines.push(format!("- {}", entry));
        }
    }

    lines.push(String::new());
    lines.push(HELP_LINE.to_string());

    lines.join("\n")
}
