//! Terrain command - ingest terrain and print the map
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: setup::build_game(), report_terrain()
//! - Level 3: render_map()
//! - Level 4: cell glyphs

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use hexfront_core::{Cell, Faction, GameConfig, HexGrid, IngestReport, TerrainCounts, TerrainKind};
use hexfront_overpass::DEFAULT_TIMEOUT_SECS;

use crate::setup;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct TerrainArgs {
    /// Skip the download and show the default terrain
    #[arg(long)]
    pub offline: bool,

    /// Terrain request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Also deploy the starting forces and show them on the map
    #[arg(long)]
    pub deploy: bool,

    /// Output the ingestion report as JSON instead of the map
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct TerrainReport {
    ingest: IngestReport,
    grid: TerrainCounts,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run terrain command
///
/// 1. Fetch and ingest terrain
/// 2. Optionally deploy
/// 3. Print map and counts
pub fn run(args: TerrainArgs, config: GameConfig) -> Result<()> {
    let features = setup::fetch_features(&config, args.offline, args.timeout);
    let (mut game, report) = setup::build_game(config, features.as_deref())?;

    if args.deploy {
        game.deploy_initial_units();
    }

    report_terrain(game.grid(), report, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn report_terrain(grid: &HexGrid, ingest: IngestReport, json: bool) -> Result<()> {
    let counts = TerrainCounts::of_grid(grid);

    if json {
        let report = TerrainReport { ingest, grid: counts };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print!("{}", render_map(grid));
    println!();
    println!(
        "Features: {} processed, {} applied, {} skipped in {} batches",
        ingest.processed, ingest.applied, ingest.skipped, ingest.batches
    );
    println!(
        "Cells: {} city, {} forest, {} water, {} plain",
        counts.city, counts.forest, counts.water, counts.plain
    );
    println!("Legend: # city  ^ forest  ~ water  . plain  U/R/D/P units");
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// One line per row; even rows are shifted half a cell right, matching
/// the grid's neighbor layout
fn render_map(grid: &HexGrid) -> String {
    let mut out = String::with_capacity(grid.rows() * (grid.cols() * 2 + 2));
    let mut cells = grid.cells().peekable();

    for row in 0..grid.rows() {
        if row % 2 == 0 {
            out.push(' ');
        }
        let mut first = true;
        while let Some(cell) = cells.next_if(|c| c.coord.row as usize == row) {
            if !first {
                out.push(' ');
            }
            out.push(glyph(cell));
            first = false;
        }
        out.push('\n');
    }
    out
}

// ============================================================================
// LEVEL 4 - GLYPHS
// ============================================================================

fn glyph(cell: &Cell) -> char {
    if let Some(unit) = &cell.unit {
        return match unit.faction {
            Faction::Us => 'U',
            Faction::Rok => 'R',
            Faction::Dprk => 'D',
            Faction::Pla => 'P',
        };
    }
    match cell.terrain {
        TerrainKind::City => '#',
        TerrainKind::Forest => '^',
        TerrainKind::Water => '~',
        TerrainKind::Plain => '.',
    }
}

// ============================================================================
// TESTS
// ============================================================================
