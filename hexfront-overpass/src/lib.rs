//! HEXFRONT Overpass - geographic terrain source
//!
//! Fetches tagged map features for the game's bounding box from public
//! Overpass API mirrors. Each mirror is a `FeatureSource`; the engine's
//! `fetch_with_fallback` walks them in order and falls back to all-Plain
//! terrain when every mirror fails.

use std::time::Duration;

use hexfront_core::{fetch_with_fallback, DataFetchError, FeatureSource, GeoBounds, GeoFeature};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Public mirrors, tried in this order
pub const DEFAULT_ENDPOINTS: [&str; 3] = [
    "https://overpass-api.de/api/interpreter",
    "https://overpass.kumi.systems/api/interpreter",
    "https://maps.mail.ru/osm/tools/overpass/api/interpreter",
];

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Endpoint list and timeout
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverpassConfig {
    pub endpoints: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoints: DEFAULT_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl OverpassConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_endpoints(mut self, endpoints: Vec<String>) -> Self {
        self.endpoints = endpoints;
        self
    }
}

// ============================================================================
// QUERY
// ============================================================================

/// Tag filters requested from the server
const TAG_FILTERS: [&str; 10] = [
    r#"["natural"="wood"]"#,
    r#"["natural"="water"]"#,
    r#"["natural"="peak"]"#,
    r#"["natural"="ridge"]"#,
    r#"["landuse"="forest"]"#,
    r#"["landuse"="residential"]"#,
    r#"["landuse"="commercial"]"#,
    r#"["landuse"="industrial"]"#,
    r#"["place"="city"]"#,
    r#"["place"="town"]"#,
];

/// Overpass QL for every tag filter over the bounding box
pub fn build_query(bounds: &GeoBounds, timeout: Duration) -> String {
    let bbox = bounds.bbox();
    let mut query = format!("[out:json][timeout:{}];\n(\n", timeout.as_secs().max(1));
    for filter in TAG_FILTERS {
        for element in ["node", "way", "relation"] {
            query.push_str(&format!("  {element}{filter}({bbox});\n"));
        }
    }
    query.push_str(");\nout body;\n");
    query
}

// ============================================================================
// RESPONSE
// ============================================================================

/// Validate an Overpass JSON body and extract its features. Elements that
/// do not deserialize are dropped.
pub fn parse_response(body: &str) -> Result<Vec<GeoFeature>, DataFetchError> {
    if body.trim().is_empty() {
        return Err(DataFetchError::EmptyBody);
    }
    let value: Value = serde_json::from_str(body).map_err(|e| DataFetchError::Parse(e.to_string()))?;

    if let Some(remark) = value.get("remark").and_then(Value::as_str) {
        if remark.contains("error") || remark.contains("timeout") {
            return Err(DataFetchError::Remote(remark.to_string()));
        }
    }

    let elements = value
        .get("elements")
        .and_then(Value::as_array)
        .ok_or(DataFetchError::InvalidStructure)?;

    let features: Vec<GeoFeature> = elements
        .iter()
        .filter_map(|el| GeoFeature::deserialize(el).ok())
        .collect();

    if features.len() < elements.len() {
        tracing::debug!("Dropped {} malformed elements", elements.len() - features.len());
    }
    Ok(features)
}

// ============================================================================
// ENDPOINT
// ============================================================================

/// One Overpass mirror
pub struct OverpassEndpoint {
    url: String,
    client: Client,
}

impl OverpassEndpoint {
    pub fn new(url: impl Into<String>, client: Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

impl FeatureSource for OverpassEndpoint {
    fn name(&self) -> &str {
        &self.url
    }

    fn fetch(&self, bounds: &GeoBounds, timeout: Duration) -> Result<Vec<GeoFeature>, DataFetchError> {
        let query = build_query(bounds, timeout);
        let response = self
            .client
            .post(&self.url)
            .form(&[("data", query.as_str())])
            .timeout(timeout)
            .send()
            .map_err(|e| transport_error(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataFetchError::Http(status.as_u16()));
        }

        let body = response.text().map_err(|e| transport_error(e, timeout))?;
        parse_response(&body)
    }
}

fn transport_error(e: reqwest::Error, timeout: Duration) -> DataFetchError {
    if e.is_timeout() {
        DataFetchError::Timeout(timeout)
    } else {
        DataFetchError::Transport(e.to_string())
    }
}

/// One source per configured endpoint, sharing a client
pub fn sources_from_config(
    config: &OverpassConfig,
) -> Result<Vec<Box<dyn FeatureSource + Send + Sync>>, DataFetchError> {
    let client = Client::builder()
        .user_agent(concat!("hexfront/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| DataFetchError::Transport(e.to_string()))?;

    Ok(config
        .endpoints
        .iter()
        .map(|url| Box::new(OverpassEndpoint::new(url.clone(), client.clone())) as Box<dyn FeatureSource + Send + Sync>)
        .collect())
}

/// Fetch features for `bounds`, trying every endpoint. None means default
/// terrain should be used.
pub fn fetch_terrain(config: &OverpassConfig, bounds: &GeoBounds) -> Option<Vec<GeoFeature>> {
    match sources_from_config(config) {
        Ok(sources) => fetch_with_fallback(&sources, bounds, config.timeout()),
        Err(e) => {
            tracing::warn!("Could not create HTTP client: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_contains_bbox_and_tags() {
        let q = build_query(&GeoBounds::default(), Duration::from_secs(60));
        assert!(q.starts_with("[out:json][timeout:60];"));
        assert!(q.contains(r#"node["place"="city"](37.25,125,38.75,129);"#));
        assert!(q.contains(r#"way["natural"="water"]"#));
        assert!(q.trim_end().ends_with("out body;"));
    }

    #[test]
    fn test_parse_nodes() {
        let body = r#"{
            "version": 0.6,
            "elements": [
                {"type": "node", "id": 1, "lat": 38.0, "lon": 127.0, "tags": {"place": "city"}},
                {"type": "way", "id": 2, "tags": {"natural": "water"}},
                {"type": "node", "id": 3, "lat": "bad", "lon": 127.0}
            ]
        }"#;
        let features = parse_response(body).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].point(), Some((38.0, 127.0)));
        assert_eq!(features[0].tag("place"), Some("city"));
        assert!(features[1].point().is_none());
    }

    #[test]
    fn test_empty_elements_ok() {
        assert_eq!(parse_response(r#"{"elements": []}"#).unwrap().len(), 0);
    }

    #[test]
    fn test_invalid_responses() {
        assert!(matches!(parse_response(""), Err(DataFetchError::EmptyBody)));
        assert!(matches!(parse_response("<html>"), Err(DataFetchError::Parse(_))));
        assert!(matches!(
            parse_response(r#"{"version": 0.6}"#),
            Err(DataFetchError::InvalidStructure)
        ));
        assert!(matches!(
            parse_response(r#"{"elements": {}}"#),
            Err(DataFetchError::InvalidStructure)
        ));
    }

    #[test]
    fn test_remote_remark() {
        let body = r#"{"remark": "runtime error: Query timed out", "elements": []}"#;
        assert!(matches!(parse_response(body), Err(DataFetchError::Remote(_))));
        // Harmless remarks are ignored
        let body = r#"{"remark": "note", "elements": []}"#;
        assert!(parse_response(body).is_ok());
    }

    #[test]
    fn test_unreachable_endpoints_fall_back() {
        let config = OverpassConfig::default()
            .with_endpoints(vec!["http://127.0.0.1:9/api/interpreter".to_string()])
            .with_timeout(1);
        assert!(fetch_terrain(&config, &GeoBounds::default()).is_none());
    }

    #[test]
    fn test_default_config() {
        let config = OverpassConfig::default();
        assert_eq!(config.endpoints.len(), 3);
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }
}
