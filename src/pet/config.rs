//! Bird configuration loaded from config/bird.toml.
use std::{fs, path::Path};

use bevy::prelude::*;
use serde::Deserialize;

use crate::geo::Coordinates;
use crate::pet::state::BirdSpecies;

const CONFIG_PATH: &str = "config/bird.toml";

pub const DEFAULT_BIRD_NAME: &str = "Birdie";

#[derive(Debug, Clone, Deserialize, Default)]
struct RawBirdConfig {
    #[serde(default)]
    economy: RawEconomySection,
    #[serde(default)]
    trip: RawTripSection,
    #[serde(default)]
    engine: RawEngineSection,
    #[serde(default)]
    adoption: RawAdoptionSection,
    #[serde(default)]
    origin: RawOriginSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawEconomySection {
    feed_cooldown_minutes: f64,
    feed_energy_gain: u32,
    trip_cooldown_minutes: f64,
}

impl Default for RawEconomySection {
    fn default() -> Self {
        Self {
            feed_cooldown_minutes: 30.0,
            feed_energy_gain: 10,
            trip_cooldown_minutes: 360.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawTripSection {
    min_duration_minutes: u32,
    max_duration_minutes: u32,
    fly_out_minutes: u32,
    fly_back_minutes: u32,
    energy_per_minute: u32,
    radius_per_energy_meters: f64,
}

impl Default for RawTripSection {
    fn default() -> Self {
        Self {
            min_duration_minutes: 30,
            max_duration_minutes: 90,
            fly_out_minutes: 10,
            fly_back_minutes: 10,
            energy_per_minute: 10,
            radius_per_energy_meters: 50_000.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawEngineSection {
    tick_seconds: f32,
}

impl Default for RawEngineSection {
    fn default() -> Self {
        Self { tick_seconds: 5.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawAdoptionSection {
    name: String,
    species: String,
}

impl Default for RawAdoptionSection {
    fn default() -> Self {
        Self {
            name: DEFAULT_BIRD_NAME.to_string(),
            species: "random".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawOriginSection {
    lat: Option<f64>,
    lng: Option<f64>,
}

/// Species requested at adoption time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeciesChoice {
    /// Weighted draw with a small chance of the rare species.
    Random,
    Fixed(BirdSpecies),
}

/// How a new bird is named and which species it hatches as.
#[derive(Debug, Clone)]
pub struct AdoptionSettings {
    pub name: String,
    pub species: SpeciesChoice,
}

/// Tunable parameters for feeding, trips, and the engine tick.
#[derive(Resource, Debug, Clone)]
pub struct BirdConfig {
    pub feed_cooldown_minutes: f64,
    pub feed_energy_gain: u32,
    pub trip_cooldown_minutes: f64,
    pub min_trip_duration_minutes: u32,
    pub max_trip_duration_minutes: u32,
    pub fly_out_minutes: u32,
    pub fly_back_minutes: u32,
    pub energy_per_minute: u32,
    pub radius_per_energy_meters: f64,
    pub tick_seconds: f32,
    pub adoption: AdoptionSettings,
    /// Home coordinates; trips cannot start while unset.
    pub home: Option<Coordinates>,
}

impl BirdConfig {
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_PATH);
        match fs::read_to_string(path) {
            Ok(data) => match toml::from_str::<RawBirdConfig>(&data) {
                Ok(raw) => raw.into(),
                Err(err) => {
                    warn!(
                        "Failed to parse {} ({}). Falling back to defaults.",
                        CONFIG_PATH, err
                    );
                    RawBirdConfig::default().into()
                }
            },
            Err(err) => {
                warn!(
                    "Failed to read {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                RawBirdConfig::default().into()
            }
        }
    }

    /// Flight-leg minutes that every trip spends in the air.
    pub fn transit_minutes(&self) -> u32 {
        self.fly_out_minutes + self.fly_back_minutes
    }
}

impl Default for BirdConfig {
    fn default() -> Self {
        RawBirdConfig::default().into()
    }
}

impl From<RawBirdConfig> for BirdConfig {
    fn from(value: RawBirdConfig) -> Self {
        let economy = value.economy;
        let trip = value.trip;

        let fly_out = trip.fly_out_minutes.max(1);
        let fly_back = trip.fly_back_minutes.max(1);
        // Stay duration is total minus both flight legs and must never go
        // negative, so the minimum total is pinned above the transit time.
        let min_duration = trip.min_duration_minutes.max(fly_out + fly_back);
        let max_duration = trip.max_duration_minutes.max(min_duration);

        let home = match (value.origin.lat, value.origin.lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
                Some(Coordinates::new(lat, lng))
            }
            _ => None,
        };

        let name = if value.adoption.name.trim().is_empty() {
            DEFAULT_BIRD_NAME.to_string()
        } else {
            value.adoption.name.trim().to_string()
        };

        Self {
            feed_cooldown_minutes: economy.feed_cooldown_minutes.max(0.0),
            feed_energy_gain: economy.feed_energy_gain,
            trip_cooldown_minutes: economy.trip_cooldown_minutes.max(0.0),
            min_trip_duration_minutes: min_duration,
            max_trip_duration_minutes: max_duration,
            fly_out_minutes: fly_out,
            fly_back_minutes: fly_back,
            energy_per_minute: trip.energy_per_minute.max(1),
            radius_per_energy_meters: trip.radius_per_energy_meters.max(0.0),
            tick_seconds: value.engine.tick_seconds.max(0.5),
            adoption: AdoptionSettings {
                name,
                species: parse_species_choice(&value.adoption.species),
            },
            home,
        }
    }
}

/// Unknown species strings fall back to the random draw.
fn parse_species_choice(value: &str) -> SpeciesChoice {
    match value.trim().to_ascii_lowercase().as_str() {
        "sparrow" => SpeciesChoice::Fixed(BirdSpecies::Sparrow),
        "robin" => SpeciesChoice::Fixed(BirdSpecies::Robin),
        "blue_jay" | "bluejay" | "blue jay" => SpeciesChoice::Fixed(BirdSpecies::BlueJay),
        "cockatiel" => SpeciesChoice::Fixed(BirdSpecies::Cockatiel),
        "pigeon" => SpeciesChoice::Fixed(BirdSpecies::Pigeon),
        _ => SpeciesChoice::Random,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_design_constants() {
        let config = BirdConfig::default();
        assert_eq!(config.feed_cooldown_minutes, 30.0);
        assert_eq!(config.feed_energy_gain, 10);
        assert_eq!(config.trip_cooldown_minutes, 360.0);
        assert_eq!(config.min_trip_duration_minutes, 30);
        assert_eq!(config.max_trip_duration_minutes, 90);
        assert_eq!(config.fly_out_minutes, 10);
        assert_eq!(config.fly_back_minutes, 10);
        assert_eq!(config.energy_per_minute, 10);
        assert_eq!(config.radius_per_energy_meters, 50_000.0);
        assert_eq!(config.tick_seconds, 5.0);
        assert_eq!(config.adoption.species, SpeciesChoice::Random);
        assert!(config.home.is_none());
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let raw: RawBirdConfig = toml::from_str(
            r#"
            [origin]
            lat = 25.0339
            lng = 121.5644

            [adoption]
            name = "Pip"
            species = "cockatiel"
            "#,
        )
        .unwrap();
        let config = BirdConfig::from(raw);

        let home = config.home.unwrap();
        assert_eq!(home.lat, 25.0339);
        assert_eq!(home.lng, 121.5644);
        assert_eq!(config.adoption.name, "Pip");
        assert_eq!(
            config.adoption.species,
            SpeciesChoice::Fixed(BirdSpecies::Cockatiel)
        );
        assert_eq!(config.trip_cooldown_minutes, 360.0);
    }

    #[test]
    fn minimum_duration_never_undercuts_transit_time() {
        let raw: RawBirdConfig = toml::from_str(
            r#"
            [trip]
            min_duration_minutes = 5
            max_duration_minutes = 8
            fly_out_minutes = 10
            fly_back_minutes = 10
            "#,
        )
        .unwrap();
        let config = BirdConfig::from(raw);

        assert_eq!(config.min_trip_duration_minutes, 20);
        assert_eq!(config.max_trip_duration_minutes, 20);
        assert_eq!(config.transit_minutes(), 20);
    }

    #[test]
    fn origin_requires_both_axes() {
        let raw: RawBirdConfig = toml::from_str(
            r#"
            [origin]
            lat = 25.0
            "#,
        )
        .unwrap();
        assert!(BirdConfig::from(raw).home.is_none());
    }

    #[test]
    fn unknown_species_falls_back_to_random() {
        assert_eq!(parse_species_choice("ostrich"), SpeciesChoice::Random);
        assert_eq!(
            parse_species_choice("Blue Jay"),
            SpeciesChoice::Fixed(BirdSpecies::BlueJay)
        );
    }

    #[test]
    fn blank_name_falls_back_to_the_default() {
        let raw: RawBirdConfig = toml::from_str(
            r#"
            [adoption]
            name = "   "
            "#,
        )
        .unwrap();
        assert_eq!(BirdConfig::from(raw).adoption.name, DEFAULT_BIRD_NAME);
    }
}
