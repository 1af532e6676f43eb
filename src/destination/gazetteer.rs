//! Built-in table of well-known places used when generative lookup fails.

use rand::Rng;

use crate::geo::{distance_meters, Coordinates};

use super::types::{CandidatePlace, ResolutionSource};

/// One curated place. Kept as static strs so the table costs nothing
/// until an entry is actually picked.
pub struct GazetteerEntry {
    pub country: &'static str,
    pub city: &'static str,
    pub poi_name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl GazetteerEntry {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }

    fn to_place(&self) -> CandidatePlace {
        CandidatePlace {
            country: self.country.to_string(),
            city: self.city.to_string(),
            district: None,
            poi_name: self.poi_name.to_string(),
            coordinates: self.coordinates(),
        }
    }
}

const fn place(
    country: &'static str,
    city: &'static str,
    poi_name: &'static str,
    lat: f64,
    lng: f64,
) -> GazetteerEntry {
    GazetteerEntry {
        country,
        city,
        poi_name,
        lat,
        lng,
    }
}

pub const FALLBACK_PLACES: [GazetteerEntry; 37] = [
    place("Taiwan", "Taipei", "Taipei 101", 25.0339, 121.5644),
    place("Taiwan", "Taipei", "Shilin Night Market", 25.0889, 121.5245),
    place("Taiwan", "Taipei", "Ximending Red House", 25.0423, 121.5065),
    place("Taiwan", "Taipei", "Chiang Kai-shek Memorial Hall", 25.0354, 121.5197),
    place("Taiwan", "Taipei", "Beitou Hot Spring Museum", 25.1365, 121.5063),
    place("Taiwan", "New Taipei", "Jiufen Old Street", 25.1099, 121.8452),
    place("Taiwan", "New Taipei", "Tamsui Fisherman's Wharf", 25.1828, 121.4115),
    place("Taiwan", "New Taipei", "Banqiao Christmasland", 25.0134, 121.4646),
    place("Taiwan", "New Taipei", "Hongludi Nanshan Fude Temple", 24.9706, 121.5074),
    place("Taiwan", "New Taipei", "Shifen Waterfall", 25.0494, 121.7877),
    place("Taiwan", "New Taipei", "Yingge Ceramics Old Street", 24.9546, 121.3484),
    place("Taiwan", "Taichung", "National Taichung Theater", 24.1627, 120.6402),
    place("Taiwan", "Taichung", "Shen Ji New Village", 24.1456, 120.6625),
    place("Taiwan", "Taichung", "Gaomei Wetlands", 24.3123, 120.5484),
    place("Taiwan", "Nantou", "Sun Moon Lake", 23.8517, 120.9159),
    place("Taiwan", "Tainan", "Chimei Museum", 22.9346, 120.2260),
    place("Taiwan", "Tainan", "Anping Old Fort", 23.0016, 120.1606),
    place("Taiwan", "Kaohsiung", "Pier-2 Art Center", 22.6204, 120.2816),
    place("Taiwan", "Kaohsiung", "Lotus Pond Dragon and Tiger Pagodas", 22.6806, 120.2917),
    place("Taiwan", "Pingtung", "Eluanbi Lighthouse", 21.9023, 120.8528),
    place("Japan", "Tokyo", "Tokyo Tower", 35.6586, 139.7454),
    place("Japan", "Tokyo", "Senso-ji Temple", 35.7111, 139.7967),
    place("Japan", "Tokyo", "Shibuya Scramble Crossing", 35.6595, 139.7004),
    place("Japan", "Osaka", "Dotonbori Glico Sign", 34.6687, 135.5013),
    place("Japan", "Osaka", "Universal Studios Japan", 34.6654, 135.4323),
    place("Japan", "Kyoto", "Kinkaku-ji", 35.0394, 135.7292),
    place("South Korea", "Seoul", "N Seoul Tower", 37.5511, 126.9882),
    place("South Korea", "Seoul", "Gyeongbokgung Palace", 37.5796, 126.9770),
    place("France", "Paris", "Eiffel Tower", 48.8584, 2.2945),
    place("France", "Paris", "Louvre Museum", 48.8606, 2.3376),
    place("United States", "New York", "Times Square", 40.7580, -73.9855),
    place("United States", "San Francisco", "Golden Gate Bridge", 37.8199, -122.4783),
    place("United Kingdom", "London", "Big Ben", 51.5007, -0.1246),
    place("Australia", "Sydney", "Sydney Opera House", -33.8568, 151.2153),
    place("Thailand", "Bangkok", "Wat Arun", 13.7437, 100.4888),
    place("Singapore", "Singapore", "Merlion Park", 1.2868, 103.8545),
    place("Italy", "Rome", "Colosseum", 41.8902, 12.4922),
];

/// Picks a stand-in destination near `origin`.
///
/// Entries within `radius_meters` of the origin are drawn uniformly; when
/// none qualify the globally nearest entry wins so the bird always has
/// somewhere to go.
pub fn pick_fallback<R: Rng>(
    origin: Coordinates,
    radius_meters: f64,
    rng: &mut R,
) -> (CandidatePlace, ResolutionSource) {
    let nearby: Vec<&GazetteerEntry> = FALLBACK_PLACES
        .iter()
        .filter(|entry| distance_meters(origin, entry.coordinates()) <= radius_meters)
        .collect();

    if !nearby.is_empty() {
        let entry = nearby[rng.gen_range(0..nearby.len())];
        return (entry.to_place(), ResolutionSource::GazetteerNearby);
    }

    let nearest = FALLBACK_PLACES
        .iter()
        .min_by(|left, right| {
            distance_meters(origin, left.coordinates())
                .total_cmp(&distance_meters(origin, right.coordinates()))
        })
        .unwrap_or(&FALLBACK_PLACES[0]);

    (nearest.to_place(), ResolutionSource::GazetteerNearest)
}
