//! Destination plugin wiring resolver resources and systems.
use bevy::prelude::*;

use super::{
    broker::{DestinationBroker, GeminiDestinationBroker},
    events::DestinationResolvedEvent,
    resolver::DestinationResolver,
    status::{LookupConnectionState, ResolverStatus},
    telemetry::{
        flush_destination_telemetry_log, record_destination_telemetry, DestinationTelemetry,
        DestinationTelemetryLog,
    },
    worker::{pump_resolution_outcomes, ResolutionBridge},
};

pub struct DestinationPlugin;

impl Plugin for DestinationPlugin {
    fn build(&self, app: &mut App) {
        let broker = GeminiDestinationBroker::new();
        let connection_state = if broker.is_live() {
            LookupConnectionState::Live
        } else {
            LookupConnectionState::Offline
        };
        let status = ResolverStatus::new(broker.provider_kind(), connection_state);
        let bridge = ResolutionBridge::new(DestinationResolver::new(Box::new(broker)));

        app.insert_resource(status)
            .insert_resource(bridge)
            .init_resource::<DestinationTelemetry>()
            .init_resource::<DestinationTelemetryLog>()
            .add_event::<DestinationResolvedEvent>()
            .add_systems(Startup, log_resolver_status)
            .add_systems(
                Update,
                (
                    pump_resolution_outcomes,
                    record_destination_telemetry,
                    flush_destination_telemetry_log,
                )
                    .chain(),
            );
    }
}

fn log_resolver_status(status: Res<ResolverStatus>) {
    info!(
        "DestinationPlugin initialised with provider: {} ({})",
        status.provider(),
        status.connection_label()
    );
}
