//! Shared request/response types exposed by the destination module.
use rand::Rng;

use crate::geo::Coordinates;

const MAP_SEARCH_BASE: &str = "https://www.google.com/maps/search/";
// Trailing parameter forcing the photo layer when the link is opened.
const MAP_PHOTO_SUFFIX: &str = "data=!3m1!1e2";

/// Identifier assigned to lookup attempts, for logs and telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolutionRequestId(u64);

impl ResolutionRequestId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ResolutionRequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RES-{:05}", self.0)
    }
}

/// Flavor injected into the lookup prompt. Never used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExplorationTheme {
    LocalFood,
    HiddenCafe,
    HistoricSite,
    Nature,
    Shopping,
    Museum,
    ReligiousSite,
    Landmark,
}

pub const ALL_THEMES: [ExplorationTheme; 8] = [
    ExplorationTheme::LocalFood,
    ExplorationTheme::HiddenCafe,
    ExplorationTheme::HistoricSite,
    ExplorationTheme::Nature,
    ExplorationTheme::Shopping,
    ExplorationTheme::Museum,
    ExplorationTheme::ReligiousSite,
    ExplorationTheme::Landmark,
];

impl ExplorationTheme {
    pub fn prompt_label(self) -> &'static str {
        match self {
            Self::LocalFood => "a must-eat restaurant that locals recommend",
            Self::HiddenCafe => "a hidden cafe with a great atmosphere",
            Self::HistoricSite => "a historic site or old street",
            Self::Nature => "a scenic park or natural landmark",
            Self::Shopping => "a well-known shopping center or market street",
            Self::Museum => "an interesting museum or arts district",
            Self::ReligiousSite => "a famous temple or church",
            Self::Landmark => "an iconic piece of landmark architecture",
        }
    }

    pub fn pick<R: Rng>(rng: &mut R) -> Self {
        ALL_THEMES[rng.gen_range(0..ALL_THEMES.len())]
    }
}

/// Lookup request describing where to search and which flavor to chase.
#[derive(Debug, Clone)]
pub struct LookupRequest {
    pub search_center: Coordinates,
    pub theme: ExplorationTheme,
}

impl LookupRequest {
    pub fn new(search_center: Coordinates, theme: ExplorationTheme) -> Self {
        Self {
            search_center,
            theme,
        }
    }
}

/// A validated place candidate, from either lookup path.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidatePlace {
    pub country: String,
    pub city: String,
    pub district: Option<String>,
    pub poi_name: String,
    pub coordinates: Coordinates,
}

impl CandidatePlace {
    /// Human-readable label: country, city, optional district, then POI.
    pub fn display_name(&self) -> String {
        match &self.district {
            Some(district) if !district.is_empty() => {
                format!(
                    "{} - {} {} {}",
                    self.country, self.city, district, self.poi_name
                )
            }
            _ => format!("{} - {} {}", self.country, self.city, self.poi_name),
        }
    }

    /// Query string handed to the map search: POI, city, country.
    pub fn search_query(&self) -> String {
        format!("{} {} {}", self.poi_name, self.city, self.country)
    }

    pub fn into_destination(self) -> ResolvedDestination {
        let display_name = self.display_name();
        let map_reference = map_reference_for(&self.search_query(), self.coordinates);
        ResolvedDestination {
            display_name,
            map_reference,
            coordinates: self.coordinates,
        }
    }
}

/// What the service hands back to the trip engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDestination {
    pub display_name: String,
    pub map_reference: String,
    pub coordinates: Coordinates,
}

/// Which path actually produced the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    Generative,
    GazetteerNearby,
    GazetteerNearest,
}

impl ResolutionSource {
    pub fn label(self) -> &'static str {
        match self {
            Self::Generative => "generative",
            Self::GazetteerNearby => "gazetteer nearby",
            Self::GazetteerNearest => "gazetteer nearest",
        }
    }
}

/// Final result of a resolution pass. Resolution never fails outright.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub destination: ResolvedDestination,
    pub source: ResolutionSource,
}

/// Map search URL pinned to the resolved coordinates.
pub fn map_reference_for(query: &str, coordinates: Coordinates) -> String {
    format!(
        "{MAP_SEARCH_BASE}{}/@{},{},17z/{MAP_PHOTO_SUFFIX}",
        encode_query_component(query),
        coordinates.lat,
        coordinates.lng
    )
}

/// Synthesized map search used when a trip ends without a resolved link.
pub fn fallback_map_reference(place_name: &str) -> String {
    format!(
        "{MAP_SEARCH_BASE}?api=1&query={}&{MAP_PHOTO_SUFFIX}",
        encode_query_component(place_name)
    )
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
pub fn encode_query_component(raw: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => {
                out.push('%');
                out.push(HEX[(byte >> 4) as usize] as char);
                out.push(HEX[(byte & 0x0F) as usize] as char);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_place() -> CandidatePlace {
        CandidatePlace {
            country: "Taiwan".to_string(),
            city: "Taipei".to_string(),
            district: Some("Xinyi District".to_string()),
            poi_name: "Taipei 101".to_string(),
            coordinates: Coordinates::new(25.0339, 121.5644),
        }
    }

    #[test]
    fn display_name_includes_the_district_when_present() {
        assert_eq!(
            sample_place().display_name(),
            "Taiwan - Taipei Xinyi District Taipei 101"
        );

        let mut place = sample_place();
        place.district = None;
        assert_eq!(place.display_name(), "Taiwan - Taipei Taipei 101");

        place.district = Some(String::new());
        assert_eq!(place.display_name(), "Taiwan - Taipei Taipei 101");
    }

    #[test]
    fn map_reference_encodes_the_query_and_keeps_the_photo_flag() {
        let destination = sample_place().into_destination();
        assert_eq!(
            destination.map_reference,
            "https://www.google.com/maps/search/Taipei%20101%20Taipei%20Taiwan/@25.0339,121.5644,17z/data=!3m1!1e2"
        );
    }

    #[test]
    fn fallback_reference_uses_the_query_form() {
        assert_eq!(
            fallback_map_reference("Mystery spot"),
            "https://www.google.com/maps/search/?api=1&query=Mystery%20spot&data=!3m1!1e2"
        );
    }

    #[test]
    fn encoding_keeps_unreserved_bytes_and_escapes_the_rest() {
        assert_eq!(encode_query_component("a-b_c.d~e"), "a-b_c.d~e");
        assert_eq!(encode_query_component("a b/c"), "a%20b%2Fc");
        assert_eq!(encode_query_component("caf\u{e9}"), "caf%C3%A9");
    }

    #[test]
    fn theme_pick_stays_inside_the_fixed_set() {
        use rand::SeedableRng;
        let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(9);
        for _ in 0..32 {
            let theme = ExplorationTheme::pick(&mut rng);
            assert!(ALL_THEMES.contains(&theme));
        }
    }

    #[test]
    fn request_ids_format_for_logs() {
        assert_eq!(ResolutionRequestId::new(42).to_string(), "RES-00042");
    }
}
