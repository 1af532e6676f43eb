//! Resolver status tracking for logging and the status panel.
use bevy::prelude::Resource;

use super::broker::DestinationProviderKind;

/// Connection state of the generative lookup backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupConnectionState {
    Live,
    Offline,
}

impl LookupConnectionState {
    /// Human-readable label for logging.
    pub fn label(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Offline => "offline",
        }
    }
}

/// Shared resource describing the active destination resolver.
#[derive(Resource, Debug, Clone)]
pub struct ResolverStatus {
    provider: DestinationProviderKind,
    connection_state: LookupConnectionState,
}

impl ResolverStatus {
    pub fn new(provider: DestinationProviderKind, connection_state: LookupConnectionState) -> Self {
        Self {
            provider,
            connection_state,
        }
    }

    pub fn provider(&self) -> DestinationProviderKind {
        self.provider
    }

    pub fn connection_label(&self) -> &'static str {
        self.connection_state.label()
    }
}
