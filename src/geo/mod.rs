//! Pure coordinate math shared by trip planning and destination lookup.

use rand::Rng;
use serde::{Deserialize, Serialize};

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
const METERS_PER_DEGREE_LAT: f64 = 111_000.0;

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Great-circle distance in meters via the haversine formula.
///
/// Symmetric, and zero when both points coincide.
pub fn distance_meters(a: Coordinates, b: Coordinates) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let delta_phi = (b.lat - a.lat).to_radians();
    let delta_lambda = (b.lng - a.lng).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Sample a point uniformly over the disk of `radius_meters` around `center`.
///
/// The radial draw takes a square root so the distribution is uniform by
/// area rather than by radius. The linear offset is converted to degrees
/// with a flat-earth approximation (1 degree of latitude is roughly
/// 111 km), which degrades near the poles.
pub fn random_point_in_radius<R: Rng>(
    center: Coordinates,
    radius_meters: f64,
    rng: &mut R,
) -> Coordinates {
    let angle = rng.gen::<f64>() * std::f64::consts::TAU;
    let distance = rng.gen::<f64>().sqrt() * radius_meters;

    let lat_offset = distance * angle.cos() / METERS_PER_DEGREE_LAT;
    let lng_offset =
        distance * angle.sin() / (METERS_PER_DEGREE_LAT * center.lat.to_radians().cos());

    Coordinates {
        lat: center.lat + lat_offset,
        lng: center.lng + lng_offset,
    }
}

/// Linear interpolation per axis, with `progress` clamped to `[0, 1]`.
///
/// Display-only positioning between home and destination, not routing.
pub fn interpolate(start: Coordinates, end: Coordinates, progress: f64) -> Coordinates {
    let t = progress.clamp(0.0, 1.0);
    Coordinates {
        lat: start.lat + (end.lat - start.lat) * t,
        lng: start.lng + (end.lng - start.lng) * t,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    const TAIPEI: Coordinates = Coordinates::new(25.0339, 121.5644);

    #[test]
    fn distance_is_zero_for_identical_points() {
        assert_eq!(distance_meters(TAIPEI, TAIPEI), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let paris = Coordinates::new(48.8584, 2.2945);
        let there = distance_meters(TAIPEI, paris);
        let back = distance_meters(paris, TAIPEI);
        assert!((there - back).abs() < 1e-6);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let a = Coordinates::new(10.0, 50.0);
        let b = Coordinates::new(11.0, 50.0);
        let d = distance_meters(a, b);
        // pi / 180 * 6_371_000
        assert!((d - 111_194.9).abs() < 1.0, "got {d}");
    }

    #[test]
    fn one_degree_of_longitude_at_the_equator_matches_latitude() {
        let lat = distance_meters(Coordinates::new(0.0, 0.0), Coordinates::new(1.0, 0.0));
        let lng = distance_meters(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 1.0));
        assert!((lat - lng).abs() < 1e-6);
    }

    #[test]
    fn random_points_stay_within_the_requested_radius() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let radius = 100_000.0;
        for _ in 0..200 {
            let point = random_point_in_radius(TAIPEI, radius, &mut rng);
            let d = distance_meters(TAIPEI, point);
            // Flat-earth conversion introduces a small error at this scale.
            assert!(d <= radius * 1.02, "point {point:?} is {d} m out");
        }
    }

    #[test]
    fn random_points_are_not_pinned_to_the_center() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let point = random_point_in_radius(TAIPEI, 50_000.0, &mut rng);
        assert!(distance_meters(TAIPEI, point) > 0.0);
    }

    #[test]
    fn interpolate_hits_both_endpoints() {
        let start = Coordinates::new(0.0, 0.0);
        let end = Coordinates::new(10.0, 20.0);
        assert_eq!(interpolate(start, end, 0.0), start);
        assert_eq!(interpolate(start, end, 1.0), end);
    }

    #[test]
    fn interpolate_midpoint_and_clamping() {
        let start = Coordinates::new(0.0, 0.0);
        let end = Coordinates::new(10.0, 20.0);
        let mid = interpolate(start, end, 0.5);
        assert!((mid.lat - 5.0).abs() < 1e-9);
        assert!((mid.lng - 10.0).abs() < 1e-9);
        assert_eq!(interpolate(start, end, 1.5), end);
    }
}
