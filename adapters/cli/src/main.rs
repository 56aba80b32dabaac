#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that exercises the rope systems against the
//! in-memory world.

mod interact;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use glam::DVec3;
use ropeworks_core::{
    coil_length, rope_arrow, rope_coil, BlockFace, BlockPos, Config, GridProbe, Material,
};
use ropeworks_system_animation::{AnimationOutcome, Conveyor};
use ropeworks_system_arrow::{resolve_impact, Impact, ImpactHit, ImpactOutcome};
use ropeworks_system_climbing::{ClimbInput, Climbing};
use ropeworks_system_crafting::{rewrite_preview, CraftVerdict};
use ropeworks_system_rigging::{cell_center, CoilDrop, RopeEngine};
use ropeworks_world::{query, MarkerField, VoxelWorld};
use tracing_subscriber::EnvFilter;

/// Ropeworks demo and administration commands.
#[derive(Debug, Parser)]
#[command(name = "ropeworks")]
struct Cli {
    /// Optional TOML configuration file; defaults apply when absent.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Construct a rope item and print it.
    Give {
        /// Which item to construct.
        kind: ItemKind,
        /// Rope length; defaults to the configured coil default.
        #[arg(long)]
        length: Option<u32>,
    },
    /// Report rope statistics for the demo scene.
    Info,
    /// Break every rope in the demo scene.
    DeleteAll {
        /// Actually delete; without this flag only a warning is printed.
        #[arg(long)]
        confirm: bool,
    },
    /// Run the scripted placement, arrow, climb, and craft scenario.
    Demo,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ItemKind {
    /// A placeable rope coil.
    Coil,
    /// A rope-carrying projectile.
    Arrow,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        CliCommand::Give { kind, length } => give(&config, kind, length),
        CliCommand::Info => info(&config),
        CliCommand::DeleteAll { confirm } => delete_all(&config, confirm),
        CliCommand::Demo => demo(&config),
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading configuration from {}", path.display()))?;
    Config::from_toml_str(&text)
        .with_context(|| format!("parsing configuration from {}", path.display()))
}

fn give(config: &Config, kind: ItemKind, length: Option<u32>) {
    if let Some(requested) = length {
        if requested > config.coil.max_length {
            tracing::warn!(
                requested,
                max = config.coil.max_length,
                "length clamped to the configured maximum"
            );
        }
    }
    let length = length
        .unwrap_or(config.coil.default_length)
        .clamp(1, config.coil.max_length);
    let item = match kind {
        ItemKind::Coil => rope_coil(length),
        ItemKind::Arrow => rope_arrow(length),
    };
    println!("{item:?}");
}

/// Stone ledge with a pillar beside it, the stage every subcommand shares.
fn build_scene(world: &mut VoxelWorld) {
    world.set_material(LEDGE, Material::Stone);
    world.set_material(GROUND, Material::Stone);
    for y in 61..=64 {
        world.set_material(BlockPos::new(5, y, 0), Material::Stone);
    }
}

const LEDGE: BlockPos = BlockPos::new(0, 70, 0);
const GROUND: BlockPos = BlockPos::new(0, 64, 0);
const PILLAR_TOP: BlockPos = BlockPos::new(5, 64, 0);

/// Places the scene's two ropes synchronously, as `info` and `delete-all`
/// need existing state rather than a narrated scenario.
fn populate(engine: &RopeEngine, world: &mut VoxelWorld, markers: &mut MarkerField) {
    let _ = engine.place(world, markers, LEDGE.below(), 5);
    let _ = engine.place(world, markers, BlockPos::new(6, 63, 0), 3);
}

fn info(config: &Config) {
    let engine = RopeEngine::new(config);
    let mut world = VoxelWorld::new();
    let mut markers = MarkerField::new();
    build_scene(&mut world);
    populate(&engine, &mut world, &mut markers);

    let cells = query::rope_cells(&world, &markers, engine.structural_material());
    println!("rope cells: {}", cells.len());
    println!("markers:    {}", query::marker_count(&markers));
    for cell in cells {
        println!(
            "  ({}, {}, {}) anchor {:?}",
            cell.x(),
            cell.y(),
            cell.z(),
            engine
                .find_anchor(&world, &markers, cell)
                .map(|anchor| anchor.y())
        );
    }
}

fn delete_all(config: &Config, confirm: bool) {
    if !confirm {
        println!("This removes every rope. Re-run with --confirm to proceed.");
        return;
    }

    let engine = RopeEngine::new(config);
    let mut world = VoxelWorld::new();
    let mut markers = MarkerField::new();
    build_scene(&mut world);
    populate(&engine, &mut world, &mut markers);

    let cells = query::rope_cells(&world, &markers, engine.structural_material());
    let mut drops = Vec::new();
    let removed = engine.break_all_affected(&mut world, &mut markers, &cells, &mut drops);
    println!("removed {removed} rope cells as {} coil(s)", drops.len());
}

fn demo(config: &Config) {
    let engine = RopeEngine::new(config);
    let climbing = Climbing::new(config);
    let mut world = VoxelWorld::new();
    let mut markers = MarkerField::new();
    let mut conveyor = Conveyor::new();
    build_scene(&mut world);

    // Hand-place a 12-cell coil beneath the ledge; the ground truncates it.
    let coil_length_requested = 12;
    println!("right-click beneath the ledge with a {coil_length_requested}-cell coil");
    let action = interact::right_click_with_coil(
        config,
        &engine,
        &mut world,
        &mut markers,
        LEDGE,
        BlockFace::Down,
        coil_length_requested,
    );
    let placed = match action {
        interact::PlaceAction::Placed { placed } => placed,
        interact::PlaceAction::Extended { added } => added,
        interact::PlaceAction::Scheduled { run } => {
            let _ = conveyor.start(run);
            drain(&mut conveyor, &engine, &mut world, &mut markers)
                .first()
                .map_or(0, |outcome| outcome.placed)
        }
        interact::PlaceAction::Ignored => 0,
    };
    let refund = coil_length_requested - placed;
    println!("  placed {placed}, refunded a {refund}-cell coil");

    // Arrow into the side of the pillar: no overhead support, so a fence
    // post goes in first and a shortened rope hangs beneath it.
    println!("rope arrow strikes the pillar's east face carrying 4 cells");
    let mut drops: Vec<CoilDrop> = Vec::new();
    let outcome = resolve_impact(
        config,
        &engine,
        &mut world,
        &mut markers,
        Impact {
            point: cell_center(PILLAR_TOP.offset(BlockFace::East)),
            rope_length: Some(4),
            hit: ImpactHit::Block {
                block: PILLAR_TOP,
                face: BlockFace::East,
            },
        },
        &mut drops,
    );
    match outcome {
        ImpactOutcome::Placed {
            support, placed, ..
        } => println!("  support {support:?}, placed {placed}"),
        ImpactOutcome::PlacementScheduled { support, run, .. } => {
            let _ = conveyor.start(run);
            let placed = drain(&mut conveyor, &engine, &mut world, &mut markers)
                .first()
                .map_or(0, |outcome| outcome.placed);
            println!("  support {support:?}, placed {placed}");
        }
        other => println!("  {other:?}"),
    }

    // One movement tick on the ledge rope, looking up.
    let input = ClimbInput {
        position: DVec3::new(0.5, 66.0, 0.5),
        pitch_degrees: -45.0,
        jumping: false,
    };
    match climbing.adjust(&engine, &world, &markers, input) {
        Some(adjustment) => println!(
            "climb tick: {:?} at vertical velocity {:+.2}",
            adjustment.band, adjustment.vertical_velocity
        ),
        None => println!("climb tick: not near a rope"),
    }

    // Craft previews: combining coils and building a rope arrow.
    let slots = [Some(rope_coil(3)), Some(rope_coil(5))];
    if let CraftVerdict::Replace(item) =
        rewrite_preview(config, Some(&rope_coil(config.coil.default_length)), &slots)
    {
        println!(
            "combining 3 + 5 previews a {}-cell coil",
            coil_length(&item).unwrap_or(0)
        );
    }

    // Left-click breaks the ledge rope and drops its length back.
    drops.clear();
    let broken = interact::left_click_on_rope(
        &engine,
        &mut world,
        &mut markers,
        LEDGE.below().below(),
        &mut drops,
    );
    println!("left-click on the ledge rope: {broken} cells break into {} coil(s)", drops.len());

    let remaining = query::rope_cells(&world, &markers, engine.structural_material());
    println!(
        "scene ends with {} rope cells and {} markers",
        remaining.len(),
        query::marker_count(&markers)
    );
}

/// Ticks the conveyor until every run completes, returning the outcomes.
fn drain(
    conveyor: &mut Conveyor,
    engine: &RopeEngine,
    world: &mut VoxelWorld,
    markers: &mut MarkerField,
) -> Vec<AnimationOutcome> {
    let mut outcomes = Vec::new();
    let mut budget = 10_000;
    while conveyor.in_flight() > 0 && budget > 0 {
        conveyor.tick(engine, world, markers, &mut outcomes);
        budget -= 1;
    }
    outcomes
}
