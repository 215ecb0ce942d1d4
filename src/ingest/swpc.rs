/// NOAA Space Weather Prediction Center JSON feeds.
///
///   https://services.swpc.noaa.gov/json/ovation_aurora_latest.json
///   https://services.swpc.noaa.gov/json/planetary_k_index_1m.json
///
/// The OVATION feed is a single object whose `coordinates` array holds
/// `[longitude, latitude, aurora]` triples on a whole-degree grid. The
/// K-index feed is an array of one-minute readings, oldest first. See
/// `fixtures.rs` for annotated payloads.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::ingest::DataSource;
use crate::model::{AuroraGrid, KpReading, MonitorError};

pub const AURORA_URL: &str = "https://services.swpc.noaa.gov/json/ovation_aurora_latest.json";
pub const K_INDEX_URL: &str = "https://services.swpc.noaa.gov/json/planetary_k_index_1m.json";

// ---------------------------------------------------------------------------
// Serde structures
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct OvationResponse {
    #[serde(rename = "Observation Time")]
    observation_time: Option<String>,
    #[serde(rename = "Forecast Time")]
    forecast_time: Option<String>,
    #[serde(default)]
    coordinates: Vec<(i32, i32, f64)>,
}

#[derive(Deserialize)]
struct KpEntry {
    #[serde(default)]
    time_tag: String,
    #[serde(default)]
    kp_index: f64,
    estimated_kp: Option<f64>,
    kp: Option<String>,
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses an OVATION response into an `AuroraGrid`.
///
/// # Errors
/// `MonitorError::DataIntegrity` when the body is not the expected JSON or
/// carries no coordinates at all.
pub fn parse_ovation_response(json: &str) -> Result<AuroraGrid, MonitorError> {
    let response: OvationResponse = serde_json::from_str(json)
        .map_err(|e| MonitorError::DataIntegrity(format!("aurora feed JSON: {}", e)))?;

    let points: BTreeMap<_, _> = response
        .coordinates
        .into_iter()
        .map(|(lon, lat, aurora)| ((lon, lat), aurora))
        .collect();

    if points.is_empty() {
        return Err(MonitorError::DataIntegrity("No aurora data available.".to_string()));
    }

    Ok(AuroraGrid {
        points,
        observation_time: response.observation_time,
        forecast_time: response.forecast_time,
    })
}

/// Parses a K-index response and keeps only the most recent (last) reading.
///
/// A reading without `kp_index` counts as 0 and one without `time_tag` gets
/// an empty tag; neither affects anything beyond display.
///
/// # Errors
/// `MonitorError::DataIntegrity` for malformed JSON or an empty array.
pub fn parse_kp_response(json: &str) -> Result<KpReading, MonitorError> {
    let entries: Vec<KpEntry> = serde_json::from_str(json)
        .map_err(|e| MonitorError::DataIntegrity(format!("K-index feed JSON: {}", e)))?;

    let latest = entries
        .into_iter()
        .last()
        .ok_or_else(|| MonitorError::DataIntegrity("No K-index data available.".to_string()))?;

    Ok(KpReading {
        time_tag: latest.time_tag.replace('T', " "),
        kp_index: latest.kp_index,
        estimated_kp: latest.estimated_kp,
        label: latest.kp,
    })
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

/// Blocking client for both SWPC feeds.
pub struct SwpcClient {
    client: reqwest::blocking::Client,
    aurora_url: String,
    k_index_url: String,
}

impl SwpcClient {
    pub fn new() -> Self {
        Self::with_urls(AURORA_URL, K_INDEX_URL)
    }

    /// Client pointed at alternative feed URLs (mirrors, local test servers).
    pub fn with_urls(aurora_url: &str, k_index_url: &str) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            aurora_url: aurora_url.to_string(),
            k_index_url: k_index_url.to_string(),
        }
    }

    fn fetch(&self, url: &str, endpoint: &'static str) -> Result<String, MonitorError> {
        debug!(url, "fetching {}", endpoint);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::Connectivity {
                endpoint,
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        Ok(response.text()?)
    }
}

impl Default for SwpcClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSource for SwpcClient {
    fn aurora_grid(&self) -> Result<AuroraGrid, MonitorError> {
        let body = self.fetch(&self.aurora_url, "aurora feed")?;
        parse_ovation_response(&body)
    }

    fn latest_kp(&self) -> Result<KpReading, MonitorError> {
        let body = self.fetch(&self.k_index_url, "K-index feed")?;
        parse_kp_response(&body)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::*;

    // --- OVATION ------------------------------------------------------------

    #[test]
    fn test_parse_ovation_keys_by_longitude_latitude() {
        let grid = parse_ovation_response(fixture_ovation_json())
            .expect("valid fixture should parse without error");

        assert_eq!(grid.intensity_at(18, 60), 55.0, "Uppsala-area point");
        assert_eq!(grid.intensity_at(18, 61), 62.0);
        assert_eq!(grid.intensity_at(0, -90), 0.0);
    }

    #[test]
    fn test_parse_ovation_keeps_feed_times() {
        let grid = parse_ovation_response(fixture_ovation_json()).unwrap();
        assert_eq!(grid.observation_time.as_deref(), Some("2024-05-10T21:53:00Z"));
        assert_eq!(grid.forecast_time.as_deref(), Some("2024-05-10T22:38:00Z"));
    }

    #[test]
    fn test_parse_ovation_max_over_whole_grid() {
        let grid = parse_ovation_response(fixture_ovation_json()).unwrap();
        assert_eq!(grid.max_intensity(), 97.0);
    }

    #[test]
    fn test_parse_ovation_without_observer_point() {
        let grid = parse_ovation_response(fixture_ovation_missing_point_json()).unwrap();
        assert!(!grid.contains(18, 60));
        assert_eq!(grid.intensity_at(18, 60), 0.0);
        assert_eq!(grid.max_intensity(), 90.0);
    }

    #[test]
    fn test_parse_ovation_empty_coordinates_is_integrity_error() {
        let result = parse_ovation_response(fixture_ovation_empty_json());
        assert!(
            matches!(result, Err(MonitorError::DataIntegrity(_))),
            "empty coordinates should be DataIntegrity, got {:?}",
            result
        );
    }

    #[test]
    fn test_parse_ovation_missing_coordinates_is_integrity_error() {
        let result = parse_ovation_response(r#"{ "type": "MultiPoint" }"#);
        assert!(matches!(result, Err(MonitorError::DataIntegrity(_))));
    }

    #[test]
    fn test_parse_ovation_malformed_json() {
        let result = parse_ovation_response("{ not json ]");
        assert!(matches!(result, Err(MonitorError::DataIntegrity(_))));
    }

    // --- K-index ------------------------------------------------------------

    #[test]
    fn test_parse_kp_uses_last_reading() {
        let reading = parse_kp_response(fixture_kp_json()).expect("valid fixture should parse");
        assert_eq!(reading.kp_index, 6.0);
        assert_eq!(reading.estimated_kp, Some(6.33));
        assert_eq!(reading.label.as_deref(), Some("6P"));
    }

    #[test]
    fn test_parse_kp_normalizes_time_tag() {
        let reading = parse_kp_response(fixture_kp_json()).unwrap();
        assert_eq!(reading.time_tag, "2024-05-10 22:02:00");
    }

    #[test]
    fn test_parse_kp_missing_fields_default() {
        let reading = parse_kp_response(r#"[{ "estimated_kp": 1.0 }]"#).unwrap();
        assert_eq!(reading.kp_index, 0.0);
        assert_eq!(reading.time_tag, "");
        assert_eq!(reading.label, None);
    }

    #[test]
    fn test_parse_kp_empty_array_is_integrity_error() {
        let result = parse_kp_response("[]");
        assert!(
            matches!(result, Err(MonitorError::DataIntegrity(_))),
            "empty K-index array should be DataIntegrity, got {:?}",
            result
        );
    }

    #[test]
    fn test_parse_kp_object_instead_of_array() {
        let result = parse_kp_response(r#"{ "kp_index": 5 }"#);
        assert!(matches!(result, Err(MonitorError::DataIntegrity(_))));
    }

    #[test]
    fn test_default_client_targets_swpc() {
        let client = SwpcClient::new();
        assert!(client.aurora_url.contains("ovation_aurora_latest.json"));
        assert!(client.k_index_url.contains("planetary_k_index_1m.json"));
        assert!(client.aurora_url.starts_with("https://services.swpc.noaa.gov/json/"));
    }
}
