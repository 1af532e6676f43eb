//! Resolution pipeline: generative lookup first, gazetteer as the net.

use bevy::prelude::warn;
use rand::Rng;

use crate::geo::{self, Coordinates};

use super::{
    broker::DestinationBroker,
    gazetteer,
    types::{ExplorationTheme, LookupRequest, Resolution, ResolutionRequestId, ResolutionSource},
};

/// Owns the lookup backend and turns a trip's search envelope into a
/// concrete destination.
pub struct DestinationResolver {
    broker: Box<dyn DestinationBroker>,
}

impl DestinationResolver {
    pub fn new(broker: Box<dyn DestinationBroker>) -> Self {
        Self { broker }
    }

    /// Resolves a destination for one trip. This never fails: any lookup
    /// error is logged and the built-in gazetteer takes over.
    ///
    /// The search center is drawn uniformly inside the radius, while the
    /// fallback filters by distance from the origin itself, so a low-energy
    /// bird stays close to home on both paths.
    pub fn resolve<R: Rng>(
        &self,
        request_id: ResolutionRequestId,
        origin: Coordinates,
        radius_meters: f64,
        rng: &mut R,
    ) -> Resolution {
        let search_center = geo::random_point_in_radius(origin, radius_meters, rng);
        let theme = ExplorationTheme::pick(rng);
        let request = LookupRequest::new(search_center, theme);

        match self.broker.lookup(request_id, &request) {
            Ok(place) => Resolution {
                destination: place.into_destination(),
                source: ResolutionSource::Generative,
            },
            Err(error) => {
                warn!(target: "destination", "{}; picking from the built-in gazetteer", error);
                let (place, source) = gazetteer::pick_fallback(origin, radius_meters, rng);
                Resolution {
                    destination: place.into_destination(),
                    source,
                }
            }
        }
    }
}
