//! Save-file persistence for the pet snapshot.
//!
//! The whole aggregate serialises as one JSON document. Writes land in a
//! sibling `.tmp` file first and rename over the target, so a crash
//! mid-write never leaves a torn save behind.
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use bevy::prelude::*;

use crate::pet::state::PetState;

pub const DEFAULT_SAVE_PATH: &str = "save/bird.json";

/// Where the snapshot lives on disk. Swappable in tests.
#[derive(Resource, Debug, Clone)]
pub struct SavePath {
    path: PathBuf,
}

impl SavePath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for SavePath {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_PATH)
    }
}

/// Reads the snapshot at `path`. A missing file is the normal first-run
/// case; an unreadable or unparsable one is logged and replaced by a
/// fresh state rather than crashing the app.
pub fn load_or_default(path: &Path) -> PetState {
    if !path.exists() {
        debug!("No save file at {}; starting fresh.", path.display());
        return PetState::default();
    }

    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(state) => state,
            Err(err) => {
                warn!(
                    "Failed to parse save file {} ({}). Starting fresh.",
                    path.display(),
                    err
                );
                PetState::default()
            }
        },
        Err(err) => {
            warn!(
                "Failed to read save file {} ({}). Starting fresh.",
                path.display(),
                err
            );
            PetState::default()
        }
    }
}

/// Serialises the snapshot, writes a `.tmp` sibling, renames over the
/// target.
pub fn save(path: &Path, state: &PetState) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(state)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pet::state::{BirdSpecies, Souvenir};
    use jiff::Timestamp;
    use std::{env, time::SystemTime};
    use uuid::Uuid;

    fn temp_save_path(label: &str) -> PathBuf {
        let unique_suffix = SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        env::temp_dir().join(format!("bird_save_{}_{}", label, unique_suffix))
    }

    fn travelled_state() -> PetState {
        PetState {
            initialized: true,
            species: BirdSpecies::Cockatiel,
            name: "Birdie".to_string(),
            energy: 40,
            last_fed_at: Timestamp::from_millisecond(90_000_000).unwrap(),
            last_trip_end_at: Timestamp::from_millisecond(120_000_000).unwrap(),
            active_trip: None,
            history: vec![Souvenir {
                id: Uuid::new_v4(),
                place_name: "Japan - Tokyo Tokyo Tower".to_string(),
                collected_at: Timestamp::from_millisecond(119_000_000).unwrap(),
                map_reference: "https://www.google.com/maps/search/Tokyo%20Tower".to_string(),
                description: "Your bird visited Japan - Tokyo Tokyo Tower and brought back a photo!"
                    .to_string(),
            }],
        }
    }

    #[test]
    fn round_trip_restores_the_saved_snapshot() {
        let dir = temp_save_path("round_trip");
        let path = dir.join("bird.json");

        let state = travelled_state();
        save(&path, &state).expect("save should succeed");
        let loaded = load_or_default(&path);

        assert_eq!(loaded, state);
        assert!(!path.with_extension("tmp").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_starts_fresh() {
        let path = temp_save_path("missing").join("bird.json");
        let loaded = load_or_default(&path);

        assert!(!loaded.initialized);
        assert!(loaded.history.is_empty());
    }

    #[test]
    fn corrupt_file_starts_fresh() {
        let dir = temp_save_path("corrupt");
        let path = dir.join("bird.json");
        fs::create_dir_all(&dir).expect("temp dir should be writable");
        fs::write(&path, "{ not json").expect("temp file should be writable");

        let loaded = load_or_default(&path);
        assert_eq!(loaded, PetState::default());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let dir = temp_save_path("nested");
        let path = dir.join("deeper").join("bird.json");

        save(&path, &PetState::default()).expect("save should build the directory chain");
        assert!(path.exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn default_save_path_points_at_the_save_directory() {
        let save_path = SavePath::default();
        assert_eq!(save_path.path(), Path::new(DEFAULT_SAVE_PATH));
    }
}
