//! Geographic bounds, map features, and feature sources

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::board::Coord;
use crate::error::{DataFetchError, GameError};

// ============================================================================
// BOUNDS
// ============================================================================

/// Lat/lon bounding box mapped onto the grid. North edge is row 0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Default for GeoBounds {
    fn default() -> Self {
        // 1.5 deg x 4.0 deg centred on (38.0, 127.0)
        Self {
            min_lat: 37.25,
            max_lat: 38.75,
            min_lon: 125.0,
            max_lon: 129.0,
        }
    }
}

impl GeoBounds {
    pub fn validate(&self) -> Result<(), GameError> {
        let finite = [self.min_lat, self.max_lat, self.min_lon, self.max_lon]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.max_lat <= self.min_lat || self.max_lon <= self.min_lon {
            return Err(GameError::InvalidBounds(format!("{self:?}")));
        }
        Ok(())
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }

    /// Map a point to its grid cell, None if outside the box
    pub fn lat_lon_to_grid(&self, lat: f64, lon: f64, rows: usize, cols: usize) -> Option<Coord> {
        if !self.contains(lat, lon) || rows == 0 || cols == 0 {
            return None;
        }

        let norm_lat = (self.max_lat - lat) / (self.max_lat - self.min_lat);
        let norm_lon = (lon - self.min_lon) / (self.max_lon - self.min_lon);

        // Clamp only guards the far edges (norm == 1.0)
        let row = ((norm_lat * rows as f64).floor() as i64).clamp(0, rows as i64 - 1);
        let col = ((norm_lon * cols as f64).floor() as i64).clamp(0, cols as i64 - 1);

        Some(Coord::new(row as i32, col as i32))
    }

    /// Centre point of a grid cell as (lat, lon)
    pub fn grid_to_lat_lon(&self, coord: Coord, rows: usize, cols: usize) -> (f64, f64) {
        let norm_lat = (f64::from(coord.row) + 0.5) / rows as f64;
        let norm_lon = (f64::from(coord.col) + 0.5) / cols as f64;

        let lat = self.max_lat - norm_lat * (self.max_lat - self.min_lat);
        let lon = self.min_lon + norm_lon * (self.max_lon - self.min_lon);
        (lat, lon)
    }

    /// Overpass-style "south,west,north,east"
    pub fn bbox(&self) -> String {
        format!("{},{},{},{}", self.min_lat, self.min_lon, self.max_lat, self.max_lon)
    }
}

// ============================================================================
// FEATURES
// ============================================================================

/// Geometry type of a map feature
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Node,
    Way,
    Relation,
}

/// A tagged map feature. Only nodes carry a point location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoFeature {
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl GeoFeature {
    pub fn node(lat: f64, lon: f64, tags: &[(&str, &str)]) -> Self {
        Self {
            kind: FeatureKind::Node,
            id: None,
            lat: Some(lat),
            lon: Some(lon),
            tags: tags
                .iter()
                .map(|&(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Point location, for nodes with both coordinates present
    pub fn point(&self) -> Option<(f64, f64)> {
        match (self.kind, self.lat, self.lon) {
            (FeatureKind::Node, Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
                Some((lat, lon))
            }
            _ => None,
        }
    }
}

// ============================================================================
// SOURCES
// ============================================================================

/// Something that can supply map features for a bounding box
pub trait FeatureSource {
    /// Label used in logs
    fn name(&self) -> &str;

    /// Blocking fetch bounded by `timeout`
    fn fetch(&self, bounds: &GeoBounds, timeout: Duration) -> Result<Vec<GeoFeature>, DataFetchError>;
}

/// Try each source in order and return the first success. None when every
/// source failed; callers fall back to default terrain.
pub fn fetch_with_fallback(
    sources: &[Box<dyn FeatureSource + Send + Sync>],
    bounds: &GeoBounds,
    timeout: Duration,
) -> Option<Vec<GeoFeature>> {
    for (i, source) in sources.iter().enumerate() {
        tracing::info!(
            "Requesting terrain from source {}/{}: {}",
            i + 1,
            sources.len(),
            source.name()
        );
        match source.fetch(bounds, timeout) {
            Ok(features) => {
                tracing::info!("Received {} features from {}", features.len(), source.name());
                return Some(features);
            }
            Err(e) => {
                tracing::warn!("Terrain source {} failed: {}", source.name(), e);
            }
        }
    }

    tracing::warn!("All terrain sources failed, using default terrain");
    None
}
