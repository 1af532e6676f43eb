//! Destination resolution: generative lookup, gazetteer fallback, telemetry.
pub mod broker;
pub mod errors;
pub mod events;
pub mod gazetteer;
pub mod plugin;
pub mod resolver;
pub mod status;
pub mod telemetry;
pub mod types;
pub mod worker;

pub use plugin::DestinationPlugin;

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use super::{
        broker::{DestinationBroker, DestinationProviderKind, GeminiDestinationBroker},
        errors::{LookupError, LookupErrorKind},
        gazetteer,
        status::{LookupConnectionState, ResolverStatus},
        types::{ResolutionRequestId, ResolutionSource},
    };
    use crate::geo::Coordinates;

    #[test]
    fn reexports_are_usable() {
        let broker = GeminiDestinationBroker::new();
        assert_eq!(broker.provider_kind(), DestinationProviderKind::Gemini);

        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let (place, source) =
            gazetteer::pick_fallback(Coordinates::new(25.0339, 121.5644), 10_000.0, &mut rng);
        assert_eq!(source, ResolutionSource::GazetteerNearby);

        let destination = place.into_destination();
        assert!(destination
            .map_reference
            .starts_with("https://www.google.com/maps/search/"));

        let status =
            ResolverStatus::new(DestinationProviderKind::Gemini, LookupConnectionState::Offline);
        assert_eq!(status.connection_label(), "offline");

        let error = LookupError::new(
            ResolutionRequestId::new(1),
            DestinationProviderKind::Gemini,
            LookupErrorKind::offline(),
        );
        assert!(error.to_string().contains("RES-00001"));
    }
}
