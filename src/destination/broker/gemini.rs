//! Gemini-backed destination lookup with an explicit offline mode.

use bevy::prelude::warn;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::{
    config::{GeminiConfig, GeminiConfigError},
    DestinationBroker, DestinationProviderKind,
};
use crate::destination::{
    errors::{LookupError, LookupErrorKind},
    types::{CandidatePlace, LookupRequest, ResolutionRequestId},
};
use crate::geo::Coordinates;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Broker that asks Gemini for a real place near the search center.
///
/// Without a usable API key the broker stays in offline mode and every
/// lookup fails fast, which hands the trip over to the gazetteer fallback.
pub struct GeminiDestinationBroker {
    mode: BrokerMode,
}

impl GeminiDestinationBroker {
    pub fn new() -> Self {
        let mode = match GeminiConfig::from_env() {
            Ok(config) => match GeminiLiveClient::new(config) {
                Ok(client) => BrokerMode::Live(client),
                Err(error) => {
                    warn!(target: "destination", "{}; lookups degrade to the gazetteer", error);
                    BrokerMode::Offline
                }
            },
            Err(error @ GeminiConfigError::MissingApiKey) => {
                warn!(target: "destination", "{}", error);
                BrokerMode::Offline
            }
            Err(error) => {
                warn!(target: "destination", "{}; lookups degrade to the gazetteer", error);
                BrokerMode::Offline
            }
        };

        Self { mode }
    }

    pub fn is_live(&self) -> bool {
        matches!(self.mode, BrokerMode::Live(_))
    }
}

impl Default for GeminiDestinationBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl DestinationBroker for GeminiDestinationBroker {
    fn provider_kind(&self) -> DestinationProviderKind {
        DestinationProviderKind::Gemini
    }

    fn lookup(
        &self,
        request_id: ResolutionRequestId,
        request: &LookupRequest,
    ) -> Result<CandidatePlace, LookupError> {
        match &self.mode {
            BrokerMode::Live(client) => client
                .send(request)
                .map_err(|kind| LookupError::new(request_id, self.provider_kind(), kind)),
            BrokerMode::Offline => Err(LookupError::new(
                request_id,
                self.provider_kind(),
                LookupErrorKind::offline(),
            )),
        }
    }
}

enum BrokerMode {
    Live(GeminiLiveClient),
    Offline,
}

struct GeminiLiveClient {
    http: Client,
    config: GeminiConfig,
}

impl GeminiLiveClient {
    fn new(config: GeminiConfig) -> Result<Self, GeminiConfigError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|error| GeminiConfigError::ClientBuild(error.to_string()))?;

        Ok(Self { http, config })
    }

    fn send(&self, request: &LookupRequest) -> Result<CandidatePlace, LookupErrorKind> {
        let payload = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: build_prompt(request),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                temperature: self.config.temperature,
                response_schema: place_schema(),
            },
        };

        let response = self
            .http
            .post(self.config.generate_url())
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&payload)
            .send()
            .map_err(|error| LookupErrorKind::transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<GeminiErrorResponse>()
                .map(|body| body.error.message)
                .unwrap_or_else(|_| "no error detail in response body".to_string());
            return Err(LookupErrorKind::http_status(status.as_u16(), message));
        }

        let completion: GenerateContentResponse = response
            .json()
            .map_err(|error| LookupErrorKind::malformed_payload(error.to_string()))?;

        let text = completion
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .find_map(|part| part.text)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(LookupErrorKind::empty_completion)?;

        parse_place_payload(&text)
    }
}

fn build_prompt(request: &LookupRequest) -> String {
    format!(
        "You are a seasoned travel guide who knows real places all over the world.\n\
         Search center:\n\
         latitude: {lat}\n\
         longitude: {lng}\n\
         \n\
         Tasks:\n\
         1. Identify the city or town nearest to the search center. If the center falls on \
         open water or uninhabited terrain, use the nearest settlement instead.\n\
         2. Inside that place, recommend exactly one point of interest matching this theme: \
         {theme}.\n\
         \n\
         Rules:\n\
         1. The place must actually exist and be findable on a map by its name.\n\
         2. Be specific. Name the actual venue, never \"a park\" or \"the city center\".\n\
         3. The returned coordinates must point at the venue itself.\n\
         4. Reply with JSON only, using the fields country, city, district, poi_name, lat and lng. \
         Leave district empty when the place has no meaningful district.",
        lat = request.search_center.lat,
        lng = request.search_center.lng,
        theme = request.theme.prompt_label(),
    )
}

/// Response schema handed to Gemini so the completion comes back as
/// machine-readable JSON instead of prose.
fn place_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "country": { "type": "STRING" },
            "city": { "type": "STRING" },
            "district": { "type": "STRING" },
            "poi_name": { "type": "STRING" },
            "lat": { "type": "NUMBER" },
            "lng": { "type": "NUMBER" },
        },
        "required": ["country", "city", "poi_name", "lat", "lng"],
    })
}

fn parse_place_payload(text: &str) -> Result<CandidatePlace, LookupErrorKind> {
    let payload: PlacePayload = serde_json::from_str(text)
        .map_err(|error| LookupErrorKind::malformed_payload(error.to_string()))?;

    let (Some(lat), Some(lng)) = (payload.lat, payload.lng) else {
        return Err(LookupErrorKind::missing_coordinates());
    };
    if !lat.is_finite() || !lng.is_finite() {
        return Err(LookupErrorKind::missing_coordinates());
    }

    let country = non_empty(payload.country);
    let city = non_empty(payload.city);
    let poi_name = non_empty(payload.poi_name);
    let (Some(country), Some(city), Some(poi_name)) = (country, city, poi_name) else {
        return Err(LookupErrorKind::malformed_payload(
            "completion is missing country, city or poi_name".to_string(),
        ));
    };

    Ok(CandidatePlace {
        country,
        city,
        district: non_empty(payload.district),
        poi_name,
        coordinates: Coordinates::new(lat, lng),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
    temperature: f32,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct PlacePayload {
    country: Option<String>,
    city: Option<String>,
    district: Option<String>,
    poi_name: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::types::ExplorationTheme;

    fn sample_request() -> LookupRequest {
        LookupRequest::new(
            Coordinates::new(25.0339, 121.5644),
            ExplorationTheme::LocalFood,
        )
    }

    #[test]
    fn offline_broker_fails_with_offline_kind() {
        let broker = GeminiDestinationBroker {
            mode: BrokerMode::Offline,
        };

        let error = broker
            .lookup(ResolutionRequestId::new(4), &sample_request())
            .expect_err("offline broker must not produce a place");

        assert!(matches!(error.kind, LookupErrorKind::Offline));
        assert!(!broker.is_live());
    }

    #[test]
    fn prompt_names_search_center_and_theme() {
        let prompt = build_prompt(&sample_request());

        assert!(prompt.contains("25.0339"));
        assert!(prompt.contains("121.5644"));
        assert!(prompt.contains(ExplorationTheme::LocalFood.prompt_label()));
        assert!(prompt.contains("poi_name"));
    }

    #[test]
    fn schema_lists_every_place_field() {
        let schema = place_schema().to_string();

        for field in ["country", "city", "district", "poi_name", "lat", "lng"] {
            assert!(schema.contains(field), "schema is missing {}", field);
        }
    }

    #[test]
    fn complete_payload_parses_into_place() {
        let text = r#"{
            "country": "Japan",
            "city": "Tokyo",
            "district": "Minato",
            "poi_name": "Tokyo Tower",
            "lat": 35.6586,
            "lng": 139.7454
        }"#;

        let place = parse_place_payload(text).expect("payload should parse");

        assert_eq!(place.country, "Japan");
        assert_eq!(place.city, "Tokyo");
        assert_eq!(place.district.as_deref(), Some("Minato"));
        assert_eq!(place.poi_name, "Tokyo Tower");
        assert!((place.coordinates.lat - 35.6586).abs() < 1e-9);
    }

    #[test]
    fn blank_district_collapses_to_none() {
        let text = r#"{
            "country": "Singapore",
            "city": "Singapore",
            "district": "  ",
            "poi_name": "Merlion Park",
            "lat": 1.2868,
            "lng": 103.8545
        }"#;

        let place = parse_place_payload(text).expect("payload should parse");

        assert_eq!(place.district, None);
    }

    #[test]
    fn payload_without_coordinates_is_rejected() {
        let text = r#"{
            "country": "France",
            "city": "Paris",
            "poi_name": "Louvre Museum",
            "lng": 2.3376
        }"#;

        let error = parse_place_payload(text).expect_err("missing lat must fail");

        assert!(matches!(error, LookupErrorKind::MissingCoordinates));
    }

    #[test]
    fn payload_with_blank_poi_is_rejected() {
        let text = r#"{
            "country": "Italy",
            "city": "Rome",
            "poi_name": "",
            "lat": 41.8902,
            "lng": 12.4922
        }"#;

        let error = parse_place_payload(text).expect_err("blank poi must fail");

        assert!(matches!(error, LookupErrorKind::MalformedPayload { .. }));
    }

    #[test]
    fn garbled_completion_is_rejected() {
        let error = parse_place_payload("here is a nice place for you!")
            .expect_err("prose must fail");

        assert!(matches!(error, LookupErrorKind::MalformedPayload { .. }));
    }
}
