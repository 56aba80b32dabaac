use glam::DVec3;
use ropeworks_core::{coil_length, BlockFace, BlockPos, Config, GridProbe, Material, MarkerRegistry};
use ropeworks_system_arrow::{resolve_impact, Impact, ImpactHit, ImpactOutcome};
use ropeworks_system_rigging::{cell_center, CoilDrop, RopeEngine};
use ropeworks_world::{MarkerField, VoxelWorld};

fn sync_config() -> Config {
    let mut config = Config::default();
    config.animation.enabled = false;
    config
}

fn setup() -> (Config, RopeEngine, VoxelWorld, MarkerField, Vec<CoilDrop>) {
    let config = sync_config();
    let engine = RopeEngine::new(&config);
    (config, engine, VoxelWorld::new(), MarkerField::new(), Vec::new())
}

fn block_hit(length: u32, block: BlockPos, face: BlockFace) -> Impact {
    Impact {
        point: cell_center(block.offset(face)),
        rope_length: Some(length),
        hit: ImpactHit::Block { block, face },
    }
}

#[test]
fn entity_hit_drops_the_carried_length() {
    let (config, engine, mut world, mut markers, mut drops) = setup();
    let point = DVec3::new(3.0, 70.0, 3.0);

    let outcome = resolve_impact(
        &config,
        &engine,
        &mut world,
        &mut markers,
        Impact {
            point,
            rope_length: Some(6),
            hit: ImpactHit::Entity,
        },
        &mut drops,
    );

    assert!(matches!(outcome, ImpactOutcome::CoilDropped));
    assert_eq!(drops.len(), 1);
    assert_eq!(coil_length(&drops[0].coil), Some(6));
    assert_eq!(drops[0].at, point);
}

#[test]
fn terrain_hit_without_metadata_is_not_engaged() {
    let (config, engine, mut world, mut markers, mut drops) = setup();
    let block = BlockPos::new(0, 64, 0);
    world.set_material(block, Material::Stone);

    let outcome = resolve_impact(
        &config,
        &engine,
        &mut world,
        &mut markers,
        Impact {
            point: cell_center(block),
            rope_length: None,
            hit: ImpactHit::Block {
                block,
                face: BlockFace::Up,
            },
        },
        &mut drops,
    );

    assert!(matches!(outcome, ImpactOutcome::NotEngaged));
    assert!(drops.is_empty());
    assert_eq!(world.material(block), Material::Stone);
}

#[test]
fn directly_struck_rope_is_extended_with_remainder_dropped() {
    let (config, engine, mut world, mut markers, mut drops) = setup();
    let anchor = BlockPos::new(0, 64, 0);
    assert_eq!(engine.place(&mut world, &mut markers, anchor, 2), 2);
    // Obstruction three cells below the current bottom caps the extension.
    world.set_material(anchor.translated(0, -5, 0), Material::Stone);

    let outcome = resolve_impact(
        &config,
        &engine,
        &mut world,
        &mut markers,
        block_hit(8, anchor, BlockFace::East),
        &mut drops,
    );

    match outcome {
        ImpactOutcome::Extended { target, added } => {
            assert_eq!(target, anchor);
            assert_eq!(added, 3);
        }
        other => panic!("expected extension, got {other:?}"),
    }
    assert_eq!(engine.rope_length(&world, &markers, anchor), 5);
    assert_eq!(drops.len(), 1);
    assert_eq!(coil_length(&drops[0].coil), Some(5));
}

#[test]
fn nearby_rope_within_radius_is_extended_instead_of_placing() {
    let (config, engine, mut world, mut markers, mut drops) = setup();
    let rope = BlockPos::new(0, 64, 0);
    world.set_material(rope, Material::Chain);
    markers.attach(rope);

    // The struck block is a neighbour; the impact point sits on the shared
    // face, within the 0.5 default radius of the rope cell's centre.
    let block = BlockPos::new(1, 64, 0);
    world.set_material(block, Material::Stone);
    let impact = Impact {
        point: DVec3::new(1.0, 64.5, 0.5),
        rope_length: Some(2),
        hit: ImpactHit::Block {
            block,
            face: BlockFace::West,
        },
    };

    let outcome = resolve_impact(&config, &engine, &mut world, &mut markers, impact, &mut drops);

    match outcome {
        ImpactOutcome::Extended { target, added } => {
            assert_eq!(target, rope);
            assert_eq!(added, 2);
        }
        other => panic!("expected extension, got {other:?}"),
    }
}

#[test]
fn underside_hit_hangs_the_rope_below_the_block() {
    let (config, engine, mut world, mut markers, mut drops) = setup();
    let block = BlockPos::new(0, 70, 0);
    world.set_material(block, Material::Stone);

    let outcome = resolve_impact(
        &config,
        &engine,
        &mut world,
        &mut markers,
        block_hit(4, block, BlockFace::Down),
        &mut drops,
    );

    match outcome {
        ImpactOutcome::Placed {
            start,
            support,
            placed,
        } => {
            assert_eq!(start, block.below());
            assert_eq!(support, None);
            assert_eq!(placed, 4);
        }
        other => panic!("expected placement, got {other:?}"),
    }
    assert_eq!(engine.rope_length(&world, &markers, block.below()), 4);
}

#[test]
fn topside_hit_uses_a_support_two_cells_above() {
    let (config, engine, mut world, mut markers, mut drops) = setup();
    let block = BlockPos::new(0, 64, 0);
    world.set_material(block, Material::Stone);
    world.set_material(block.translated(0, 2, 0), Material::Stone);

    let outcome = resolve_impact(
        &config,
        &engine,
        &mut world,
        &mut markers,
        block_hit(3, block, BlockFace::Up),
        &mut drops,
    );

    match outcome {
        ImpactOutcome::Placed { start, placed, .. } => {
            assert_eq!(start, block.above());
            // The struck block occupies the second cell, so only the cell
            // between block and support is written.
            assert_eq!(placed, 1);
        }
        other => panic!("expected placement, got {other:?}"),
    }
}

#[test]
fn topside_hit_on_a_solid_block_aborts_with_a_drop() {
    let (config, engine, mut world, mut markers, mut drops) = setup();
    let block = BlockPos::new(0, 64, 0);
    world.set_material(block, Material::Stone);

    let outcome = resolve_impact(
        &config,
        &engine,
        &mut world,
        &mut markers,
        block_hit(5, block, BlockFace::Up),
        &mut drops,
    );

    // No support two above; the auxiliary position's below-cell is the
    // struck solid block, so the rope has nowhere to hang.
    assert!(matches!(outcome, ImpactOutcome::CoilDropped));
    assert_eq!(drops.len(), 1);
    assert_eq!(coil_length(&drops[0].coil), Some(5));
    assert_eq!(world.material(block.above()), Material::Air);
}

#[test]
fn topside_hit_on_replaceable_cover_places_a_support() {
    let (config, engine, mut world, mut markers, mut drops) = setup();
    // Arrow landed on a snow layer; the auxiliary support goes above it and
    // the rope replaces the snow.
    let block = BlockPos::new(0, 64, 0);
    world.set_material(block, Material::SnowLayer);

    let outcome = resolve_impact(
        &config,
        &engine,
        &mut world,
        &mut markers,
        block_hit(4, block, BlockFace::Up),
        &mut drops,
    );

    match outcome {
        ImpactOutcome::Placed {
            start,
            support,
            placed,
        } => {
            assert_eq!(support, Some(block.above()));
            assert_eq!(start, block);
            assert_eq!(placed, 3, "the support consumed one unit");
        }
        other => panic!("expected placement, got {other:?}"),
    }
    assert_eq!(world.material(block.above()), Material::OakFence);
    assert_eq!(engine.rope_length(&world, &markers, block), 3);
}

#[test]
fn side_hit_with_overhead_support_places_at_the_adjacent_cell() {
    let (config, engine, mut world, mut markers, mut drops) = setup();
    let block = BlockPos::new(0, 64, 0);
    let adjacent = block.offset(BlockFace::East);
    world.set_material(block, Material::Stone);
    world.set_material(adjacent.above(), Material::Stone);

    let outcome = resolve_impact(
        &config,
        &engine,
        &mut world,
        &mut markers,
        block_hit(2, block, BlockFace::East),
        &mut drops,
    );

    match outcome {
        ImpactOutcome::Placed {
            start,
            support,
            placed,
        } => {
            assert_eq!(start, adjacent);
            assert_eq!(support, None);
            assert_eq!(placed, 2);
        }
        other => panic!("expected placement, got {other:?}"),
    }
}

#[test]
fn side_hit_without_support_places_a_fence_and_a_shortened_rope() {
    let (config, engine, mut world, mut markers, mut drops) = setup();
    let block = BlockPos::new(0, 64, 0);
    world.set_material(block, Material::Stone);
    let adjacent = block.offset(BlockFace::South);

    let outcome = resolve_impact(
        &config,
        &engine,
        &mut world,
        &mut markers,
        block_hit(6, block, BlockFace::South),
        &mut drops,
    );

    match outcome {
        ImpactOutcome::Placed {
            start,
            support,
            placed,
        } => {
            assert_eq!(support, Some(adjacent));
            assert_eq!(start, adjacent.below());
            assert_eq!(placed, 5);
        }
        other => panic!("expected placement, got {other:?}"),
    }
    assert_eq!(world.material(adjacent), Material::OakFence);
    assert_eq!(engine.rope_length(&world, &markers, adjacent.below()), 5);
    assert!(drops.is_empty());
}

#[test]
fn side_hit_over_solid_ground_aborts_with_a_drop() {
    let (config, engine, mut world, mut markers, mut drops) = setup();
    let block = BlockPos::new(0, 64, 0);
    world.set_material(block, Material::Stone);
    let adjacent = block.offset(BlockFace::North);
    world.set_material(adjacent.below(), Material::Stone);

    let outcome = resolve_impact(
        &config,
        &engine,
        &mut world,
        &mut markers,
        block_hit(3, block, BlockFace::North),
        &mut drops,
    );

    assert!(matches!(outcome, ImpactOutcome::CoilDropped));
    assert_eq!(drops.len(), 1);
    assert_eq!(world.material(adjacent), Material::Air, "no support placed");
}

#[test]
fn single_unit_projectile_yields_a_bare_support() {
    let (config, engine, mut world, mut markers, mut drops) = setup();
    let block = BlockPos::new(0, 64, 0);
    world.set_material(block, Material::Stone);
    let adjacent = block.offset(BlockFace::East);

    let outcome = resolve_impact(
        &config,
        &engine,
        &mut world,
        &mut markers,
        block_hit(1, block, BlockFace::East),
        &mut drops,
    );

    match outcome {
        ImpactOutcome::Placed {
            support, placed, ..
        } => {
            assert_eq!(support, Some(adjacent));
            assert_eq!(placed, 0, "the whole length went into the support");
        }
        other => panic!("expected placement, got {other:?}"),
    }
    assert_eq!(world.material(adjacent), Material::OakFence);
}

#[test]
fn animated_configuration_returns_prepared_runs() {
    let mut config = Config::default();
    assert!(config.animation.enabled);
    config.arrow.extend_radius = 0.0;
    let engine = RopeEngine::new(&config);
    let mut world = VoxelWorld::new();
    let mut markers = MarkerField::new();
    let mut drops = Vec::new();

    let block = BlockPos::new(0, 70, 0);
    world.set_material(block, Material::Stone);

    let outcome = resolve_impact(
        &config,
        &engine,
        &mut world,
        &mut markers,
        block_hit(3, block, BlockFace::Down),
        &mut drops,
    );

    let mut run = match outcome {
        ImpactOutcome::PlacementScheduled { start, run, .. } => {
            assert_eq!(start, block.below());
            run
        }
        other => panic!("expected a scheduled placement, got {other:?}"),
    };

    // Nothing is written until the run is driven.
    assert_eq!(engine.rope_length(&world, &markers, block.below()), 0);
    let mut completion = None;
    for _ in 0..10 {
        if let Some(placed) = run.tick(&engine, &mut world, &mut markers) {
            completion = Some(placed);
            break;
        }
    }
    assert_eq!(completion, Some(3));
    assert_eq!(engine.rope_length(&world, &markers, block.below()), 3);
}

#[test]
fn animated_extension_reports_its_target() {
    let config = Config::default();
    let engine = RopeEngine::new(&config);
    let mut world = VoxelWorld::new();
    let mut markers = MarkerField::new();
    let mut drops = Vec::new();

    let anchor = BlockPos::new(0, 64, 0);
    assert_eq!(engine.place(&mut world, &mut markers, anchor, 2), 2);

    let outcome = resolve_impact(
        &config,
        &engine,
        &mut world,
        &mut markers,
        block_hit(4, anchor, BlockFace::East),
        &mut drops,
    );

    match outcome {
        ImpactOutcome::ExtendScheduled { target, mut run } => {
            assert_eq!(target, anchor);
            let mut completion = None;
            for _ in 0..20 {
                if let Some(placed) = run.tick(&engine, &mut world, &mut markers) {
                    completion = Some(placed);
                    break;
                }
            }
            assert_eq!(completion, Some(4));
        }
        other => panic!("expected a scheduled extension, got {other:?}"),
    }
    assert_eq!(engine.rope_length(&world, &markers, anchor), 6);
}
