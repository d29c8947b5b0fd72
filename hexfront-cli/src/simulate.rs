//! Simulate command - AI-only games for balancing and smoke tests
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_terrain(), play_games(), report_results()
//! - Level 3: play_single_game(), summarize()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;

use hexfront_core::{AiAction, Faction, Game, GameConfig, GeoFeature, Standing};
use hexfront_overpass::DEFAULT_TIMEOUT_SECS;

use crate::setup;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: u64,

    /// Full rounds per game (every faction moves once per round)
    #[arg(long, default_value = "20")]
    pub rounds: u32,

    /// Fetch real terrain instead of playing on open ground
    #[arg(long)]
    pub online: bool,

    /// Terrain request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug, Serialize)]
pub struct GameSummary {
    pub seed: u64,
    pub standings: Vec<Standing>,
    pub attacks: usize,
    pub destroyed: usize,
    pub captures: usize,
}

/// Per-faction averages over all games
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FactionSummary {
    pub faction: Faction,
    pub avg_units: f64,
    pub avg_health: f64,
    pub avg_cities: f64,
    /// Games in which this faction had the most cities, then health
    pub leads: usize,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    games: Vec<GameSummary>,
    factions: Vec<FactionSummary>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run simulate command
///
/// 1. Load terrain once
/// 2. Play all games in parallel
/// 3. Report standings
pub fn run(args: SimulateArgs, config: GameConfig) -> Result<()> {
    config.validate()?;
    let features = load_terrain(&args, &config);

    let base_seed = config.seed.unwrap_or_else(rand::random);
    tracing::info!(
        "Simulating {} games of {} rounds (base seed {})",
        args.games,
        args.rounds,
        base_seed
    );

    let games = play_games(&config, features.as_deref(), base_seed, &args);
    report_results(&games, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_terrain(args: &SimulateArgs, config: &GameConfig) -> Option<Vec<GeoFeature>> {
    setup::fetch_features(config, !args.online, args.timeout)
}

/// Execute games in parallel using rayon
fn play_games(
    config: &GameConfig,
    features: Option<&[GeoFeature]>,
    base_seed: u64,
    args: &SimulateArgs,
) -> Vec<GameSummary> {
    let pb = ProgressBar::new(args.games);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})")
    {
        pb.set_style(style.progress_chars("=>-"));
    }

    let games: Vec<GameSummary> = (0..args.games)
        .into_par_iter()
        .filter_map(|i| {
            let seed = base_seed.wrapping_add(i);
            let result = play_single_game(config.clone().with_seed(seed), features, args.rounds);
            pb.inc(1);
            match result {
                Ok(summary) => Some(summary),
                Err(e) => {
                    tracing::warn!("Game with seed {} failed: {}", seed, e);
                    None
                }
            }
        })
        .collect();

    pb.finish_and_clear();
    games
}

fn report_results(games: &[GameSummary], json: bool) -> Result<()> {
    let factions = summarize(games);

    if json {
        let report = SimulationReport {
            games: games.to_vec(),
            factions,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Games played: {}", games.len());
    println!(
        "Attacks: {}  Destroyed: {}  Captures: {}",
        games.iter().map(|g| g.attacks).sum::<usize>(),
        games.iter().map(|g| g.destroyed).sum::<usize>(),
        games.iter().map(|g| g.captures).sum::<usize>()
    );
    println!();
    println!("{}", format_header());
    for faction in &factions {
        println!("{}", format_row(faction));
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Deploy, then let every faction play `rounds` AI turns
fn play_single_game(config: GameConfig, features: Option<&[GeoFeature]>, rounds: u32) -> Result<GameSummary> {
    let seed = config.seed.unwrap_or_default();
    let mut game = Game::new(config)?;
    game.ingest_terrain(features);
    game.deploy_initial_units();

    let mut summary = GameSummary {
        seed,
        standings: Vec::new(),
        attacks: 0,
        destroyed: 0,
        captures: 0,
    };

    for _ in 0..rounds {
        for _ in 0..Faction::ALL.len() {
            let report = game.play_ai_turn();
            for action in &report.actions {
                match action {
                    AiAction::Attack(outcome) => {
                        summary.attacks += 1;
                        summary.destroyed += usize::from(outcome.destroyed);
                    }
                    AiAction::Capture { .. } => summary.captures += 1,
                    AiAction::Move { .. } => {}
                }
            }
        }
    }

    tracing::debug!("Seed {} finished at round {}", seed, game.turn().round());
    summary.standings = game.standings();
    Ok(summary)
}

/// Average standings per faction and count who led each game
fn summarize(games: &[GameSummary]) -> Vec<FactionSummary> {
    let n = games.len().max(1) as f64;

    Faction::ALL
        .into_iter()
        .map(|faction| {
            let rows: Vec<&Standing> = games
                .iter()
                .flat_map(|g| g.standings.iter().filter(move |s| s.faction == faction))
                .collect();
            let leads = games
                .iter()
                .filter(|g| leader(&g.standings) == Some(faction))
                .count();

            FactionSummary {
                faction,
                avg_units: rows.iter().map(|s| s.units as f64).sum::<f64>() / n,
                avg_health: rows.iter().map(|s| s.total_health as f64).sum::<f64>() / n,
                avg_cities: rows.iter().map(|s| s.cities as f64).sum::<f64>() / n,
                leads,
            }
        })
        .collect()
}

/// Most cities, then most total health; ties go to the earlier faction
fn leader(standings: &[Standing]) -> Option<Faction> {
    standings
        .iter()
        .rev()
        .max_by_key(|s| (s.cities, s.total_health))
        .map(|s| s.faction)
}

// ============================================================================
// LEVEL 4 - FORMATTING
// ============================================================================

fn format_header() -> String {
    format!(
        "{:<8} {:>10} {:>10} {:>10} {:>6}",
        "Faction", "Units", "Health", "Cities", "Leads"
    )
}

fn format_row(s: &FactionSummary) -> String {
    format!(
        "{:<8} {:>10.2} {:>10.2} {:>10.2} {:>6}",
        s.faction.code(),
        s.avg_units,
        s.avg_health,
        s.avg_cities,
        s.leads
    )
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn standing(faction: Faction, units: usize, total_health: i32, cities: usize) -> Standing {
        Standing {
            faction,
            units,
            total_health,
            cities,
        }
    }

    #[test]
    fn test_single_game_is_deterministic() {
        let config = GameConfig::default().with_seed(11);
        let a = play_single_game(config.clone(), None, 3).unwrap();
        let b = play_single_game(config, None, 3).unwrap();
        assert_eq!(a.standings, b.standings);
        assert_eq!(a.attacks, b.attacks);
        assert_eq!(a.standings.len(), 4);
    }

    #[test]
    fn test_zero_rounds_keeps_deployment() {
        let summary = play_single_game(GameConfig::default().with_seed(2), None, 0).unwrap();
        assert_eq!(summary.attacks, 0);
        for s in &summary.standings {
            assert_eq!(s.units, 8);
            assert_eq!(s.cities, 0);
        }
    }

    #[test]
    fn test_leader_prefers_cities_then_health() {
        let standings = vec![
            standing(Faction::Us, 8, 50, 0),
            standing(Faction::Rok, 3, 10, 2),
            standing(Faction::Dprk, 8, 60, 1),
            standing(Faction::Pla, 8, 60, 2),
        ];
        assert_eq!(leader(&standings), Some(Faction::Pla));

        let tied = vec![standing(Faction::Us, 8, 50, 0), standing(Faction::Rok, 8, 50, 0)];
        assert_eq!(leader(&tied), Some(Faction::Us));
        assert_eq!(leader(&[]), None);
    }

    #[test]
    fn test_summarize_averages() {
        let games = vec![
            GameSummary {
                seed: 0,
                standings: vec![standing(Faction::Us, 8, 40, 1)],
                attacks: 0,
                destroyed: 0,
                captures: 0,
            },
            GameSummary {
                seed: 1,
                standings: vec![standing(Faction::Us, 4, 20, 0)],
                attacks: 0,
                destroyed: 0,
                captures: 0,
            },
        ];
        let factions = summarize(&games);
        let us = &factions[0];
        assert_eq!(us.faction, Faction::Us);
        assert_eq!(us.avg_units, 6.0);
        assert_eq!(us.avg_health, 30.0);
        assert_eq!(us.avg_cities, 0.5);
        assert_eq!(us.leads, 2);
        assert_eq!(factions[1].leads, 0);
    }

    #[test]
    fn test_row_format() {
        let row = format_row(&FactionSummary {
            faction: Faction::Dprk,
            avg_units: 7.5,
            avg_health: 40.0,
            avg_cities: 1.0,
            leads: 3,
        });
        assert!(row.starts_with("DPRK"));
        assert!(row.contains("7.50"));
        assert!(row.ends_with('3'));
    }
}
