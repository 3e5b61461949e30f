use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::key_manager::{get_secret, FLIGHT_API_KEY};

pub const AVIATIONSTACK_HOST: &str = "https://api.aviationstack.com";

/// Returned verbatim when the provider has no matching flights.
pub const NO_FLIGHTS_MESSAGE: &str = "No flights found matching the search criteria.";

/// Placeholder for fields the provider omits, so the model always sees
/// a deterministic record shape.
const NOT_AVAILABLE: &str = "N/A";

/// Caps how many records reach the model, bounding context size.
const MAX_RESULTS: usize = 5;

/// Search terms extracted from the model's tool call. All fields are
/// optional; the all-empty query is valid and yields the provider's
/// defaults for today.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightQuery {
    pub flight_number: Option<String>,
    pub dep_iata: Option<String>,
    pub arr_iata: Option<String>,
    pub flight_date: Option<String>,
    pub airline_iata: Option<String>,
}

impl FlightQuery {
    /// Pull out whichever fields arrived as strings, ignoring anything
    /// else the model sent. Matches the permissive handling of the
    /// upstream chat providers: a half-formed call still searches.
    pub fn from_arguments(arguments: &Value) -> Self {
        let field = |name: &str| {
            arguments
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        FlightQuery {
            flight_number: field("flight_number"),
            dep_iata: field("dep_iata"),
            arr_iata: field("arr_iata"),
            flight_date: field("flight_date"),
            airline_iata: field("airline_iata"),
        }
    }

    /// Upstream query parameters: IATA codes uppercased, the date
    /// passed through as-is, empty fields left out entirely.
    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(number) = non_empty(&self.flight_number) {
            params.push(("flight_iata", number.to_string()));
        }
        if let Some(code) = non_empty(&self.dep_iata) {
            params.push(("dep_iata", code.to_uppercase()));
        }
        if let Some(code) = non_empty(&self.arr_iata) {
            params.push(("arr_iata", code.to_uppercase()));
        }
        if let Some(date) = non_empty(&self.flight_date) {
            params.push(("flight_date", date.to_string()));
        }
        if let Some(code) = non_empty(&self.airline_iata) {
            params.push(("airline_iata", code.to_uppercase()));
        }
        params
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.trim().is_empty())
}

/// One normalized flight, the shape the model sees. Every field falls
/// back to "N/A" when the provider omits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub flight_number: String,
    pub airline: String,
    pub departure: EndpointRecord,
    pub arrival: EndpointRecord,
    pub flight_status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointRecord {
    pub airport: String,
    pub iata: String,
    pub scheduled: String,
    pub estimated: String,
    pub status: String,
}

// Raw Aviationstack response shapes. Everything is optional here;
// defaulting to the sentinel happens when mapping to FlightRecord.

#[derive(Debug, Deserialize)]
struct FlightsResponse {
    #[serde(default)]
    error: Option<ApiError>,
    #[serde(default)]
    data: Vec<RawFlight>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    info: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawFlight {
    #[serde(default)]
    flight: Option<RawFlightIdent>,
    #[serde(default)]
    departure: Option<RawEndpoint>,
    #[serde(default)]
    arrival: Option<RawEndpoint>,
    #[serde(default)]
    airline: Option<RawAirline>,
    #[serde(default)]
    flight_status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawFlightIdent {
    #[serde(default)]
    iata: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAirline {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawEndpoint {
    #[serde(default)]
    airport: Option<String>,
    #[serde(default)]
    iata: Option<String>,
    #[serde(default)]
    scheduled: Option<String>,
    #[serde(default)]
    estimated: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

fn or_na(field: Option<String>) -> String {
    field.unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

impl From<RawEndpoint> for EndpointRecord {
    fn from(raw: RawEndpoint) -> Self {
        EndpointRecord {
            airport: or_na(raw.airport),
            iata: or_na(raw.iata),
            scheduled: or_na(raw.scheduled),
            estimated: or_na(raw.estimated),
            status: or_na(raw.status),
        }
    }
}

impl From<RawFlight> for FlightRecord {
    fn from(raw: RawFlight) -> Self {
        FlightRecord {
            flight_number: or_na(raw.flight.unwrap_or_default().iata),
            airline: or_na(raw.airline.unwrap_or_default().name),
            departure: raw.departure.unwrap_or_default().into(),
            arrival: raw.arrival.unwrap_or_default().into(),
            flight_status: or_na(raw.flight_status),
        }
    }
}

/// Configuration for the Aviationstack flight data provider. The key
/// stays optional: looking it up lazily would hide the degraded mode
/// the search path reports in-band.
#[derive(Debug, Clone)]
pub struct AviationstackConfig {
    pub host: String,
    pub api_key: Option<String>,
}

impl AviationstackConfig {
    pub fn from_env() -> Self {
        Self {
            host: AVIATIONSTACK_HOST.to_string(),
            api_key: get_secret(FLIGHT_API_KEY).ok(),
        }
    }
}

/// Thin client over Aviationstack's /v1/flights endpoint. Every
/// outcome is a string: results as a pretty-printed JSON array,
/// failures as descriptive text the model can relay to the user.
pub struct FlightLookupClient {
    client: Client,
    config: AviationstackConfig,
}

impl FlightLookupClient {
    pub fn new(config: AviationstackConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client, config })
    }

    pub async fn search(&self, query: &FlightQuery) -> String {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return format!(
                "Error: Aviationstack API key ({}) not found in environment variables",
                FLIGHT_API_KEY
            );
        };

        let url = format!("{}/v1/flights", self.config.host.trim_end_matches('/'));
        let mut params: Vec<(&str, String)> = vec![("access_key", api_key.to_string())];
        params.extend(query.to_params());

        debug!(?query, "searching flights");
        let response = match self.client.get(&url).query(&params).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "flight lookup transport failure");
                return format!("Error fetching flight data: {}", e);
            }
        };

        if !response.status().is_success() {
            return format!("Error fetching flight data: HTTP {}", response.status());
        }

        let body: FlightsResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => return format!("Error fetching flight data: {}", e),
        };

        if let Some(error) = body.error {
            return format!(
                "API Error: {}",
                error.info.unwrap_or_else(|| "Unknown error".to_string())
            );
        }

        if body.data.is_empty() {
            return NO_FLIGHTS_MESSAGE.to_string();
        }

        let records: Vec<FlightRecord> = body
            .data
            .into_iter()
            .take(MAX_RESULTS)
            .map(FlightRecord::from)
            .collect();

        serde_json::to_string_pretty(&records)
            .unwrap_or_else(|e| format!("Error fetching flight data: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn config_for(server: &mockito::ServerGuard) -> AviationstackConfig {
        AviationstackConfig {
            host: server.url(),
            api_key: Some("test_key".to_string()),
        }
    }

    fn sample_flight(number: &str) -> Value {
        json!({
            "flight": {"iata": number},
            "airline": {"name": "American Airlines"},
            "departure": {
                "airport": "John F. Kennedy International",
                "iata": "JFK",
                "scheduled": "2026-08-29T08:00:00+00:00",
                "estimated": "2026-08-29T08:05:00+00:00",
                "status": "on time"
            },
            "arrival": {
                "airport": "Los Angeles International",
                "iata": "LAX",
                "scheduled": "2026-08-29T11:30:00+00:00",
                "estimated": "2026-08-29T11:25:00+00:00",
                "status": "scheduled"
            },
            "flight_status": "active"
        })
    }

    #[test]
    fn test_from_arguments_ignores_non_strings() {
        let query = FlightQuery::from_arguments(&json!({
            "flight_number": "AA100",
            "dep_iata": 42,
            "unexpected": "field"
        }));

        assert_eq!(query.flight_number.as_deref(), Some("AA100"));
        assert_eq!(query.dep_iata, None);
    }

    #[test]
    fn test_to_params_uppercases_codes() {
        let query = FlightQuery {
            dep_iata: Some("jfk".to_string()),
            arr_iata: Some("lax".to_string()),
            airline_iata: Some("aa".to_string()),
            flight_date: Some("2026-08-29".to_string()),
            ..Default::default()
        };

        let params = query.to_params();
        assert!(params.contains(&("dep_iata", "JFK".to_string())));
        assert!(params.contains(&("arr_iata", "LAX".to_string())));
        assert!(params.contains(&("airline_iata", "AA".to_string())));
        assert!(params.contains(&("flight_date", "2026-08-29".to_string())));
    }

    #[test]
    fn test_to_params_skips_empty_fields() {
        let query = FlightQuery {
            flight_number: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(query.to_params().is_empty());
    }

    #[tokio::test]
    async fn test_search_without_key_makes_no_network_call() {
        let config = AviationstackConfig {
            host: "http://127.0.0.1:1".to_string(),
            api_key: None,
        };
        let client = FlightLookupClient::new(config).unwrap();

        let result = client.search(&FlightQuery::default()).await;
        assert!(result.contains("CLIENTSECRET"));
        assert!(result.starts_with("Error:"));
    }

    #[tokio::test]
    async fn test_search_sends_uppercased_codes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/flights")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("access_key".into(), "test_key".into()),
                Matcher::UrlEncoded("dep_iata".into(), "JFK".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"data": [sample_flight("AA100")]}).to_string())
            .create_async()
            .await;

        let client = FlightLookupClient::new(config_for(&server)).unwrap();
        let query = FlightQuery {
            dep_iata: Some("jfk".to_string()),
            ..Default::default()
        };

        let result = client.search(&query).await;
        mock.assert_async().await;
        assert!(result.contains("AA100"));
    }

    #[tokio::test]
    async fn test_search_truncates_to_five_records() {
        let flights: Vec<Value> = (0..7).map(|i| sample_flight(&format!("AA10{}", i))).collect();
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/flights")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"data": flights}).to_string())
            .create_async()
            .await;

        let client = FlightLookupClient::new(config_for(&server)).unwrap();
        let result = client.search(&FlightQuery::default()).await;

        let records: Vec<FlightRecord> = serde_json::from_str(&result).unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].flight_number, "AA100");
        assert_eq!(records[4].flight_number, "AA104");
    }

    #[tokio::test]
    async fn test_search_no_results() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/flights")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"data": []}).to_string())
            .create_async()
            .await;

        let client = FlightLookupClient::new(config_for(&server)).unwrap();
        let result = client.search(&FlightQuery::default()).await;
        assert_eq!(result, NO_FLIGHTS_MESSAGE);
    }

    #[tokio::test]
    async fn test_search_provider_reported_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/flights")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({"error": {"code": "invalid_access_key", "info": "You have not supplied a valid API Access Key."}})
                    .to_string(),
            )
            .create_async()
            .await;

        let client = FlightLookupClient::new(config_for(&server)).unwrap();
        let result = client.search(&FlightQuery::default()).await;
        assert_eq!(
            result,
            "API Error: You have not supplied a valid API Access Key."
        );
    }

    #[tokio::test]
    async fn test_search_http_error_is_absorbed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/flights")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client = FlightLookupClient::new(config_for(&server)).unwrap();
        let result = client.search(&FlightQuery::default()).await;
        assert!(result.starts_with("Error fetching flight data: HTTP 500"));
    }

    #[tokio::test]
    async fn test_search_defaults_missing_fields_to_sentinel() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/flights")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"data": [{"flight": {"iata": "AA100"}, "departure": null}]}).to_string())
            .create_async()
            .await;

        let client = FlightLookupClient::new(config_for(&server)).unwrap();
        let result = client.search(&FlightQuery::default()).await;

        let records: Vec<FlightRecord> = serde_json::from_str(&result).unwrap();
        assert_eq!(records[0].flight_number, "AA100");
        assert_eq!(records[0].airline, "N/A");
        assert_eq!(records[0].departure.airport, "N/A");
        assert_eq!(records[0].arrival.status, "N/A");
        assert_eq!(records[0].flight_status, "N/A");
    }
}
