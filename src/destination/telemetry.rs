//! Telemetry storage for finished destination lookups.
use std::{
    collections::VecDeque,
    fs::{create_dir_all, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use bevy::{log::warn, prelude::*};
use serde::Serialize;

use super::{events::DestinationResolvedEvent, worker::ResolutionOutcome};

const DEFAULT_DESTINATION_TELEMETRY_LOG_PATH: &str = "logs/destinations.jsonl";

const DEFAULT_DESTINATION_TELEMETRY_CAPACITY: usize = 64;

/// Rolling log of resolved destinations for UI consumers.
#[derive(Resource, Debug)]
pub struct DestinationTelemetry {
    capacity: usize,
    records: VecDeque<ResolutionRecord>,
}

impl DestinationTelemetry {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: VecDeque::new(),
        }
    }

    pub fn push(&mut self, record: ResolutionRecord) {
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    #[allow(dead_code)]
    pub fn records(&self) -> impl Iterator<Item = &ResolutionRecord> {
        self.records.iter()
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for DestinationTelemetry {
    fn default() -> Self {
        Self::new(DEFAULT_DESTINATION_TELEMETRY_CAPACITY)
    }
}

/// Single telemetry entry.
#[derive(Debug, Clone)]
pub struct ResolutionRecord {
    pub occurred_at_seconds: f64,
    pub outcome: ResolutionOutcome,
}

/// System that records every resolved destination.
pub fn record_destination_telemetry(
    time: Res<Time>,
    mut telemetry: ResMut<DestinationTelemetry>,
    mut resolved: MessageReader<DestinationResolvedEvent>,
    mut log: ResMut<DestinationTelemetryLog>,
) {
    let now = time.elapsed_secs_f64();

    for event in resolved.read() {
        let record = ResolutionRecord {
            occurred_at_seconds: now,
            outcome: event.outcome.clone(),
        };
        log.push(&record);
        telemetry.push(record);
    }
}

/// Rolling log that writes lookup telemetry to disk for offline inspection.
#[derive(Resource, Debug)]
pub struct DestinationTelemetryLog {
    output_path: PathBuf,
    pending: Vec<ResolutionRecord>,
}

impl DestinationTelemetryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: path.into(),
            pending: Vec::new(),
        }
    }

    pub fn push(&mut self, record: &ResolutionRecord) {
        self.pending.push(record.clone());
    }

    fn ensure_directory(&self) -> std::io::Result<()> {
        if let Some(parent) = self.output_path.parent() {
            create_dir_all(parent)?;
        }
        Ok(())
    }

    fn drain_pending(&mut self) -> Vec<ResolutionRecord> {
        std::mem::take(&mut self.pending)
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        self.ensure_directory()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output_path)?;

        for record in self.drain_pending() {
            let serialisable: SerializableResolutionRecord = record.into();
            serde_json::to_writer(&mut file, &serialisable)?;
            file.write_all(b"\n")?;
        }

        file.flush()?;
        Ok(())
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        &self.output_path
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Default for DestinationTelemetryLog {
    fn default() -> Self {
        Self::new(DEFAULT_DESTINATION_TELEMETRY_LOG_PATH)
    }
}

/// Flushes pending telemetry entries to disk, warning if persistence fails.
pub fn flush_destination_telemetry_log(mut log: ResMut<DestinationTelemetryLog>) {
    if let Err(err) = log.flush() {
        warn!(
            "Failed to persist destination telemetry to {:?}: {}",
            log.path(),
            err
        );
    }
}

#[derive(Serialize)]
struct SerializableResolutionRecord {
    occurred_at_seconds: f64,
    request_id: u64,
    trip_id: String,
    source: String,
    display_name: String,
    lat: f64,
    lng: f64,
    distance_meters: f64,
}

impl From<ResolutionRecord> for SerializableResolutionRecord {
    fn from(value: ResolutionRecord) -> Self {
        let outcome = value.outcome;
        Self {
            occurred_at_seconds: value.occurred_at_seconds,
            request_id: outcome.request_id.value(),
            trip_id: outcome.trip_id.to_string(),
            source: outcome.resolution.source.label().to_string(),
            display_name: outcome.resolution.destination.display_name,
            lat: outcome.resolution.destination.coordinates.lat,
            lng: outcome.resolution.destination.coordinates.lng,
            distance_meters: outcome.actual_distance_meters,
        }
    }
}
