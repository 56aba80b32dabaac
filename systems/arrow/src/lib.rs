#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Projectile landing resolution.
//!
//! Evaluated once per impact: decides whether the carried rope length
//! extends a nearby rope, hangs a fresh rope from the struck face, places
//! an auxiliary support first, or falls back to dropping the coil. Every
//! terminal branch discards the projectile; the caller only has to start
//! any returned animated run and reconcile its completion.

use glam::DVec3;
use ropeworks_core::{BlockFace, BlockPos, Config, GridProbe, MarkerRegistry};
use ropeworks_system_animation::RopeAnimation;
use ropeworks_system_rigging::{CoilDrop, RopeEngine};

/// What the projectile struck.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImpactHit {
    /// A living target rather than terrain.
    Entity,
    /// A terrain block, struck through the given face.
    Block {
        /// The struck block.
        block: BlockPos,
        /// Face of the block the projectile entered through.
        face: BlockFace,
    },
}

/// One projectile impact event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Impact {
    /// Projectile position at the moment of impact.
    pub point: DVec3,
    /// Rope length carried by the projectile, if any.
    pub rope_length: Option<u32>,
    /// What was struck.
    pub hit: ImpactHit,
}

/// Terminal action taken for an impact.
///
/// The projectile is discarded in every variant except [`Self::NotEngaged`].
#[derive(Debug)]
pub enum ImpactOutcome {
    /// No length metadata on a terrain hit; other handlers own this impact.
    NotEngaged,
    /// Coils dropped at the impact point; nothing was placed.
    CoilDropped,
    /// An existing rope was extended synchronously; any remainder has
    /// already been dropped at the impact point.
    Extended {
        /// Rope cell the extension targeted.
        target: BlockPos,
        /// Count actually added.
        added: u32,
    },
    /// An animated extension was prepared. The caller starts the run and
    /// drops the completion's unused length at the impact point.
    ExtendScheduled {
        /// Rope cell the extension targeted.
        target: BlockPos,
        /// The prepared run.
        run: RopeAnimation,
    },
    /// A fresh rope was placed synchronously.
    Placed {
        /// Topmost cell of the new rope.
        start: BlockPos,
        /// Auxiliary support placed first, when one was needed.
        support: Option<BlockPos>,
        /// Count actually placed.
        placed: u32,
    },
    /// An animated fresh placement was prepared for the caller to start.
    PlacementScheduled {
        /// Topmost cell of the new rope.
        start: BlockPos,
        /// Auxiliary support placed first, when one was needed.
        support: Option<BlockPos>,
        /// The prepared run.
        run: RopeAnimation,
    },
}

/// Resolves a single projectile impact.
///
/// Synchronous placements and drops are applied before returning; animated
/// variants are returned as prepared runs so the caller's tick loop drives
/// them. `out_drops` receives every coil emitted while resolving.
pub fn resolve_impact<G, M>(
    config: &Config,
    engine: &RopeEngine,
    grid: &mut G,
    markers: &mut M,
    impact: Impact,
    out_drops: &mut Vec<CoilDrop>,
) -> ImpactOutcome
where
    G: GridProbe,
    M: MarkerRegistry,
{
    let Some(length) = impact.rope_length else {
        return ImpactOutcome::NotEngaged;
    };

    match impact.hit {
        ImpactHit::Entity => {
            engine.drop_coils(impact.point, length, out_drops);
            ImpactOutcome::CoilDropped
        }
        ImpactHit::Block { block, face } => {
            resolve_block_hit(config, engine, grid, markers, impact.point, block, face, length, out_drops)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn resolve_block_hit<G, M>(
    config: &Config,
    engine: &RopeEngine,
    grid: &mut G,
    markers: &mut M,
    point: DVec3,
    block: BlockPos,
    face: BlockFace,
    length: u32,
    out_drops: &mut Vec<CoilDrop>,
) -> ImpactOutcome
where
    G: GridProbe,
    M: MarkerRegistry,
{
    // An existing rope at or near the impact is extended, never shadowed by
    // a fresh placement.
    let target = if engine.is_rope_cell(grid, markers, block) {
        Some(block)
    } else {
        engine.find_nearest_rope(grid, markers, point, config.arrow.extend_radius)
    };

    if let Some(target) = target {
        if config.animation.enabled {
            let run = RopeAnimation::extend(&config.animation, engine, grid, markers, target, length);
            return ImpactOutcome::ExtendScheduled { target, run };
        }
        let added = engine.extend(grid, markers, target, length);
        let unused = length.saturating_sub(added);
        if unused > 0 {
            engine.drop_coils(point, unused, out_drops);
        }
        return ImpactOutcome::Extended { target, added };
    }

    let placement = match face {
        BlockFace::Down => block.below(),
        BlockFace::Up => {
            if config.qualifies_as_support(grid.material(block.translated(0, 2, 0))) {
                block.above()
            } else {
                return place_with_support(
                    config,
                    engine,
                    grid,
                    markers,
                    point,
                    block.above(),
                    length,
                    out_drops,
                );
            }
        }
        side => {
            let adjacent = block.offset(side);
            if config.qualifies_as_support(grid.material(adjacent.above())) {
                adjacent
            } else {
                return place_with_support(
                    config, engine, grid, markers, point, adjacent, length, out_drops,
                );
            }
        }
    };

    if config.animation.enabled {
        return ImpactOutcome::PlacementScheduled {
            start: placement,
            support: None,
            run: RopeAnimation::place(&config.animation, placement, length),
        };
    }
    let placed = engine.place(grid, markers, placement, length);
    ImpactOutcome::Placed {
        start: placement,
        support: None,
        placed,
    }
}

/// Places the auxiliary support and hangs a shortened rope beneath it.
///
/// The support consumes one unit of the carried length. Aborts with a coil
/// drop when the cell beneath the support position is already solid, since
/// the rope would have nowhere to hang.
#[allow(clippy::too_many_arguments)]
fn place_with_support<G, M>(
    config: &Config,
    engine: &RopeEngine,
    grid: &mut G,
    markers: &mut M,
    point: DVec3,
    support: BlockPos,
    length: u32,
    out_drops: &mut Vec<CoilDrop>,
) -> ImpactOutcome
where
    G: GridProbe,
    M: MarkerRegistry,
{
    let start = support.below();
    if grid.material(start).is_solid() {
        engine.drop_coils(point, length, out_drops);
        return ImpactOutcome::CoilDropped;
    }

    grid.set_material(support, config.arrow.support_material);

    let rope_length = length.saturating_sub(1);
    if rope_length == 0 {
        return ImpactOutcome::Placed {
            start,
            support: Some(support),
            placed: 0,
        };
    }

    if config.animation.enabled {
        return ImpactOutcome::PlacementScheduled {
            start,
            support: Some(support),
            run: RopeAnimation::place(&config.animation, start, rope_length),
        };
    }
    let placed = engine.place(grid, markers, start, rope_length);
    ImpactOutcome::Placed {
        start,
        support: Some(support),
        placed,
    }
}
