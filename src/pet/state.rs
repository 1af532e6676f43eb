//! Pet state aggregate: species, energy, cooldowns, and souvenir history.
use bevy::prelude::*;
use jiff::Timestamp;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::minutes_between;
use crate::pet::config::{BirdConfig, SpeciesChoice, DEFAULT_BIRD_NAME};
use crate::trip::types::Trip;

const RARE_SPECIES_CHANCE: f64 = 0.1;

const COMMON_SPECIES: [BirdSpecies; 4] = [
    BirdSpecies::Sparrow,
    BirdSpecies::Robin,
    BirdSpecies::BlueJay,
    BirdSpecies::Pigeon,
];

/// Fixed at adoption, immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BirdSpecies {
    Sparrow,
    Robin,
    BlueJay,
    Cockatiel,
    Pigeon,
}

impl BirdSpecies {
    pub fn label(self) -> &'static str {
        match self {
            Self::Sparrow => "Sparrow",
            Self::Robin => "Robin",
            Self::BlueJay => "Blue Jay",
            Self::Cockatiel => "Cockatiel",
            Self::Pigeon => "Pigeon",
        }
    }

    pub fn is_rare(self) -> bool {
        matches!(self, Self::Cockatiel)
    }

    /// Weighted hatch: the rare cockatiel at 10%, otherwise one of the
    /// four common species with equal likelihood.
    pub fn draw_random<R: Rng>(rng: &mut R) -> Self {
        if rng.gen_bool(RARE_SPECIES_CHANCE) {
            Self::Cockatiel
        } else {
            COMMON_SPECIES[rng.gen_range(0..COMMON_SPECIES.len())]
        }
    }
}

/// Reward collected when a trip completes. Never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Souvenir {
    pub id: Uuid,
    pub place_name: String,
    pub collected_at: Timestamp,
    pub map_reference: String,
    pub description: String,
}

/// What happened when feeding was attempted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedOutcome {
    Fed { energy: u32 },
    OnCooldown { remaining_minutes: f64 },
    Traveling,
    NotAdopted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdoptOutcome {
    Adopted(BirdSpecies),
    AlreadyAdopted,
}

/// Root aggregate for the whole pet, persisted as one snapshot.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetState {
    pub initialized: bool,
    pub species: BirdSpecies,
    pub name: String,
    pub energy: u32,
    pub last_fed_at: Timestamp,
    pub last_trip_end_at: Timestamp,
    pub active_trip: Option<Trip>,
    /// Newest first.
    pub history: Vec<Souvenir>,
}

impl Default for PetState {
    fn default() -> Self {
        Self {
            initialized: false,
            species: BirdSpecies::Sparrow,
            name: String::new(),
            energy: 0,
            last_fed_at: Timestamp::UNIX_EPOCH,
            last_trip_end_at: Timestamp::UNIX_EPOCH,
            active_trip: None,
            history: Vec::new(),
        }
    }
}

impl PetState {
    /// One-time initialisation. Starts the trip cooldown immediately so a
    /// fresh bird cannot depart on the first tick.
    pub fn adopt<R: Rng>(
        &mut self,
        choice: SpeciesChoice,
        name: &str,
        now: Timestamp,
        rng: &mut R,
    ) -> AdoptOutcome {
        if self.initialized {
            return AdoptOutcome::AlreadyAdopted;
        }

        let species = match choice {
            SpeciesChoice::Fixed(species) => species,
            SpeciesChoice::Random => BirdSpecies::draw_random(rng),
        };
        let trimmed = name.trim();

        self.initialized = true;
        self.species = species;
        self.name = if trimmed.is_empty() {
            DEFAULT_BIRD_NAME.to_string()
        } else {
            trimmed.to_string()
        };
        self.energy = 0;
        self.last_fed_at = Timestamp::UNIX_EPOCH;
        self.last_trip_end_at = now;
        self.active_trip = None;
        self.history.clear();

        AdoptOutcome::Adopted(species)
    }

    /// Feeding is rejected silently when the bird is away, unadopted, or
    /// the cooldown has not elapsed. Callers surface eligibility; the
    /// engine still guards every precondition itself.
    pub fn feed(&mut self, now: Timestamp, config: &BirdConfig) -> FeedOutcome {
        if !self.initialized {
            return FeedOutcome::NotAdopted;
        }
        if self.active_trip.is_some() {
            return FeedOutcome::Traveling;
        }

        let remaining = self.feed_cooldown_remaining_minutes(now, config);
        if remaining > 0.0 {
            return FeedOutcome::OnCooldown {
                remaining_minutes: remaining,
            };
        }

        self.energy = self.energy.saturating_add(config.feed_energy_gain);
        self.last_fed_at = now;
        FeedOutcome::Fed {
            energy: self.energy,
        }
    }

    pub fn can_feed(&self, now: Timestamp, config: &BirdConfig) -> bool {
        self.initialized
            && self.active_trip.is_none()
            && self.feed_cooldown_remaining_minutes(now, config) <= 0.0
    }

    pub fn feed_cooldown_remaining_minutes(&self, now: Timestamp, config: &BirdConfig) -> f64 {
        (config.feed_cooldown_minutes - minutes_between(self.last_fed_at, now)).max(0.0)
    }

    pub fn trip_cooldown_remaining_minutes(&self, now: Timestamp, config: &BirdConfig) -> f64 {
        (config.trip_cooldown_minutes - minutes_between(self.last_trip_end_at, now)).max(0.0)
    }

    /// Departure gate: adopted, home, rested, and fuelled. The caller also
    /// needs a configured origin before a trip may begin.
    pub fn can_start_trip(&self, now: Timestamp, config: &BirdConfig) -> bool {
        self.initialized
            && self.active_trip.is_none()
            && self.trip_cooldown_remaining_minutes(now, config) <= 0.0
            && self.energy > 0
    }

    /// Folds a finished trip into the aggregate: the souvenir goes to the
    /// front of the history, the trip slot clears, and the next trip
    /// cooldown starts counting from `now`.
    pub fn record_trip_completion(&mut self, souvenir: Souvenir, now: Timestamp) {
        self.history.insert(0, souvenir);
        self.active_trip = None;
        self.last_trip_end_at = now;
    }
}
