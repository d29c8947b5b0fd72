//! Terrain ingestion from map features
//!
//! Every cell starts as Plain. Point features are classified by their tags
//! and projected onto the grid; when several land on one cell the terrain
//! with the highest priority wins. Area features are ignored.

use serde::Serialize;

use crate::board::HexGrid;
use crate::catalog::TerrainKind;
use crate::geo::{GeoBounds, GeoFeature};

/// Default number of features handled between progress callbacks
pub const DEFAULT_BATCH_SIZE: usize = 5000;

/// Classify a feature by its tags. Water beats forest beats city when a
/// feature carries several matching tags.
pub fn classify(feature: &GeoFeature) -> TerrainKind {
    let natural = feature.tag("natural");
    let landuse = feature.tag("landuse");
    let place = feature.tag("place");

    if natural == Some("water") {
        TerrainKind::Water
    } else if natural == Some("wood") || landuse == Some("forest") {
        TerrainKind::Forest
    } else if matches!(place, Some("city" | "town"))
        || matches!(landuse, Some("residential" | "commercial" | "industrial"))
    {
        TerrainKind::City
    } else {
        TerrainKind::Plain
    }
}

/// Per-terrain classification counts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TerrainCounts {
    pub city: usize,
    pub forest: usize,
    pub water: usize,
    pub plain: usize,
}

impl TerrainCounts {
    fn record(&mut self, kind: TerrainKind) {
        match kind {
            TerrainKind::City => self.city += 1,
            TerrainKind::Forest => self.forest += 1,
            TerrainKind::Water => self.water += 1,
            TerrainKind::Plain => self.plain += 1,
        }
    }

    /// Tally terrain across a whole grid
    pub fn of_grid(grid: &HexGrid) -> Self {
        let mut counts = Self::default();
        for cell in grid.cells() {
            counts.record(cell.terrain);
        }
        counts
    }
}

/// Progress after each batch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchProgress {
    pub batch: usize,
    pub total_batches: usize,
    pub processed: usize,
    pub total: usize,
}

/// Ingestion summary
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Features examined
    pub processed: usize,
    /// Features that changed a cell's terrain
    pub applied: usize,
    /// Non-node, coordinate-less, or out-of-bounds features
    pub skipped: usize,
    pub batches: usize,
    /// Classification of every feature, placed or not
    pub classified: TerrainCounts,
}

/// Projects features onto a grid
#[derive(Clone, Debug)]
pub struct TerrainIngestor {
    bounds: GeoBounds,
    batch_size: usize,
}

impl TerrainIngestor {
    pub fn new(bounds: GeoBounds) -> Self {
        Self {
            bounds,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    /// Reset the grid to Plain and apply the features, if any
    pub fn ingest(&self, grid: &mut HexGrid, features: Option<&[GeoFeature]>) -> IngestReport {
        self.ingest_with_progress(grid, features, |_| {})
    }

    /// Like `ingest`, calling `on_batch` after every batch
    pub fn ingest_with_progress<F>(
        &self,
        grid: &mut HexGrid,
        features: Option<&[GeoFeature]>,
        mut on_batch: F,
    ) -> IngestReport
    where
        F: FnMut(BatchProgress),
    {
        grid.fill_terrain(TerrainKind::Plain);

        let mut report = IngestReport::default();
        let features = match features {
            Some(f) if !f.is_empty() => f,
            _ => {
                tracing::info!("No terrain data, using default terrain");
                return report;
            }
        };

        let total_batches = features.len().div_ceil(self.batch_size);
        for (i, batch) in features.chunks(self.batch_size).enumerate() {
            for feature in batch {
                self.apply_feature(grid, feature, &mut report);
            }
            report.batches += 1;

            tracing::debug!("Terrain batch {}/{} done", i + 1, total_batches);
            on_batch(BatchProgress {
                batch: i + 1,
                total_batches,
                processed: report.processed,
                total: features.len(),
            });
        }

        tracing::info!(
            "Terrain processed: {} features, {} applied, {} skipped (city={}, forest={}, water={})",
            report.processed,
            report.applied,
            report.skipped,
            report.classified.city,
            report.classified.forest,
            report.classified.water
        );

        report
    }

    fn apply_feature(&self, grid: &mut HexGrid, feature: &GeoFeature, report: &mut IngestReport) {
        report.processed += 1;

        let kind = classify(feature);
        report.classified.record(kind);

        let coord = feature
            .point()
            .and_then(|(lat, lon)| self.bounds.lat_lon_to_grid(lat, lon, grid.rows(), grid.cols()));

        let Some(cell) = coord.and_then(|c| grid.cell_mut(c)) else {
            report.skipped += 1;
            return;
        };

        if kind.priority() > cell.terrain.priority() {
            cell.terrain = kind;
            report.applied += 1;
        }
    }
}

impl Default for TerrainIngestor {
    fn default() -> Self {
        Self::new(GeoBounds::default())
    }
}
