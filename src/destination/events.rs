//! Messages emitted by the destination service.
use bevy::prelude::{Event, Message};

use super::worker::ResolutionOutcome;

/// Fired when a background lookup lands, whichever path produced it.
///
/// Consumers must check the carried trip id against the active trip;
/// a slow lookup can outlive the trip that asked for it.
#[derive(Event, Message, Debug, Clone)]
pub struct DestinationResolvedEvent {
    pub outcome: ResolutionOutcome,
}
