//! Background resolution jobs and the channel back to the schedule.

use std::sync::{
    mpsc::{channel, Receiver, Sender, TryRecvError},
    Arc, Mutex,
};
use std::thread;

use bevy::prelude::{debug, MessageWriter, Res, Resource};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::geo::{distance_meters, Coordinates};
use crate::trip::types::TripId;

use super::{
    events::DestinationResolvedEvent,
    resolver::DestinationResolver,
    types::{Resolution, ResolutionRequestId},
};

/// Work order handed to a resolution thread.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionJob {
    pub request_id: ResolutionRequestId,
    pub trip_id: TripId,
    pub origin: Coordinates,
    pub radius_meters: f64,
    pub rng_seed: u64,
}

/// Finished lookup, ready to be applied to the trip that asked for it.
#[derive(Debug, Clone)]
pub struct ResolutionOutcome {
    pub request_id: ResolutionRequestId,
    pub trip_id: TripId,
    pub resolution: Resolution,
    pub actual_distance_meters: f64,
}

/// Connects the schedule to resolution threads.
///
/// Lookups run on short-lived worker threads so a slow provider never
/// stalls a tick. The receiver sits behind a mutex because resources must
/// be `Sync`; only the pump system ever locks it.
#[derive(Resource)]
pub struct ResolutionBridge {
    resolver: Arc<DestinationResolver>,
    sender: Sender<ResolutionOutcome>,
    receiver: Mutex<Receiver<ResolutionOutcome>>,
    next_request_id: u64,
}

impl ResolutionBridge {
    pub fn new(resolver: DestinationResolver) -> Self {
        let (sender, receiver) = channel();
        Self {
            resolver: Arc::new(resolver),
            sender,
            receiver: Mutex::new(receiver),
            next_request_id: 1,
        }
    }

    /// Fires a background lookup for the given trip and returns the id
    /// the outcome will carry.
    pub fn dispatch(
        &mut self,
        trip_id: TripId,
        origin: Coordinates,
        radius_meters: f64,
        rng_seed: u64,
    ) -> ResolutionRequestId {
        let request_id = ResolutionRequestId::new(self.next_request_id);
        self.next_request_id += 1;

        let job = ResolutionJob {
            request_id,
            trip_id,
            origin,
            radius_meters,
            rng_seed,
        };
        let resolver = Arc::clone(&self.resolver);
        let sender = self.sender.clone();

        thread::spawn(move || {
            let outcome = run_job(&resolver, job);
            // A dropped receiver means the app is shutting down.
            let _ = sender.send(outcome);
        });

        request_id
    }

    /// Collects every outcome that has arrived since the last call.
    pub fn drain(&self) -> Vec<ResolutionOutcome> {
        let Ok(receiver) = self.receiver.lock() else {
            return Vec::new();
        };

        let mut outcomes = Vec::new();
        loop {
            match receiver.try_recv() {
                Ok(outcome) => outcomes.push(outcome),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        outcomes
    }
}

fn run_job(resolver: &DestinationResolver, job: ResolutionJob) -> ResolutionOutcome {
    let mut rng = ChaCha20Rng::seed_from_u64(job.rng_seed);
    let resolution = resolver.resolve(job.request_id, job.origin, job.radius_meters, &mut rng);
    let actual_distance_meters = distance_meters(job.origin, resolution.destination.coordinates);

    ResolutionOutcome {
        request_id: job.request_id,
        trip_id: job.trip_id,
        resolution,
        actual_distance_meters,
    }
}

/// Moves finished lookups from the channel into the message stream.
pub fn pump_resolution_outcomes(
    bridge: Res<ResolutionBridge>,
    mut resolved: MessageWriter<DestinationResolvedEvent>,
) {
    for outcome in bridge.drain() {
        debug!(
            target: "destination",
            "{} resolved via {}: {}",
            outcome.request_id,
            outcome.resolution.source.label(),
            outcome.resolution.destination.display_name
        );
        resolved.write(DestinationResolvedEvent { outcome });
    }
}
