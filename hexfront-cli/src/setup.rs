//! Shared setup steps: configuration loading, terrain fetch and ingestion
//!
//! Every subcommand starts from a `GameConfig` and most of them need a
//! terrain-ingested `Game`, so those steps live here.

use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use hexfront_core::{Game, GameConfig, GeoFeature, IngestReport};
use hexfront_overpass::OverpassConfig;

/// Load the config file (or defaults) and apply the seed override
pub fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    Ok(config)
}

/// Fetch features for the configured bounds. Offline or total failure both
/// yield None, which ingests as all-Plain terrain.
pub fn fetch_features(config: &GameConfig, offline: bool, timeout_secs: u64) -> Option<Vec<GeoFeature>> {
    if offline {
        tracing::info!("Offline mode, skipping terrain fetch");
        return None;
    }
    let overpass = OverpassConfig::default().with_timeout(timeout_secs);
    hexfront_overpass::fetch_terrain(&overpass, &config.bounds)
}

/// Build a game and ingest `features` with a progress bar
pub fn build_game(config: GameConfig, features: Option<&[GeoFeature]>) -> Result<(Game, IngestReport)> {
    let mut game = Game::new(config).context("Invalid game configuration")?;

    let total = features.map_or(0, <[GeoFeature]>::len) as u64;
    let bar = ingest_bar(total);
    let report = game.ingest_terrain_with_progress(features, |progress| {
        bar.set_position(progress.processed as u64);
        bar.set_message(format!("batch {}/{}", progress.batch, progress.total_batches));
    });
    bar.finish_and_clear();

    Ok((game, report))
}

fn ingest_bar(total: u64) -> ProgressBar {
    if total == 0 {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} features {msg}")
    {
        bar.set_style(style.progress_chars("=>-"));
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexfront_core::{Faction, TerrainKind};
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let config = load_config(None, None).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_seed_override() {
        let config = load_config(None, Some(17)).unwrap();
        assert_eq!(config.seed, Some(17));
    }

    #[test]
    fn test_load_partial_file() {
        let path = std::env::temp_dir().join(format!("hexfront-cli-{}.json", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"player_faction": "ROK", "seed": 3}}"#).unwrap();

        let config = load_config(Some(&path), Some(9)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.player_faction, Faction::Rok);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.rows, 30);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_config(Some(Path::new("/nonexistent/hexfront.json")), None).is_err());
    }

    #[test]
    fn test_offline_builds_plain_game() {
        let config = GameConfig::default().with_seed(1);
        let features = fetch_features(&config, true, 1);
        assert!(features.is_none());

        let (game, report) = build_game(config, features.as_deref()).unwrap();
        assert_eq!(report.processed, 0);
        assert!(game.grid().cells().all(|c| c.terrain == TerrainKind::Plain));
    }
}
