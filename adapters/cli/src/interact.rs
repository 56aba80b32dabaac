//! Hand-placement flow: the event-layer logic that turns block clicks with
//! a coil in hand into engine operations.
//!
//! The triggering coil is consumed by the caller before any animated run is
//! scheduled, so a completion never races with a re-trigger from the same
//! item. All returned counts follow the engine convention: the caller
//! reconciles `requested - actual` as a refund coil.

use ropeworks_core::{BlockFace, BlockPos, Config, GridProbe, MarkerRegistry};
use ropeworks_system_animation::RopeAnimation;
use ropeworks_system_rigging::{cell_center, CoilDrop, RopeEngine};

/// What a right-click with a coil in hand turned into.
#[derive(Debug)]
pub(crate) enum PlaceAction {
    /// The click had no valid anchor; the coil is not consumed.
    Ignored,
    /// An existing rope was extended synchronously.
    Extended {
        /// Count actually added.
        added: u32,
    },
    /// A fresh rope was placed synchronously.
    Placed {
        /// Count actually placed.
        placed: u32,
    },
    /// An animated run was prepared; consume the coil, then start it.
    Scheduled {
        /// The prepared run.
        run: RopeAnimation,
    },
}

/// Resolves a right-click on `block` through `face` holding a coil of
/// `length`.
///
/// Clicking an existing rope extends it. Otherwise the placement cell
/// derives from the clicked face and needs a qualifying support above it;
/// clicking a configured anchor material hangs the rope directly beneath
/// it, extending any rope already hanging there.
pub(crate) fn right_click_with_coil<G, M>(
    config: &Config,
    engine: &RopeEngine,
    grid: &mut G,
    markers: &mut M,
    block: BlockPos,
    face: BlockFace,
    length: u32,
) -> PlaceAction
where
    G: GridProbe,
    M: MarkerRegistry,
{
    if engine.is_rope_cell(grid, markers, block) {
        return extend(config, engine, grid, markers, block, length);
    }

    let mut target = match face {
        BlockFace::Down => block.below(),
        BlockFace::Up => block,
        side => block.offset(side),
    };

    // Clicking an anchor post anywhere hangs the rope beneath the post.
    if config.is_anchor_material(grid.material(block)) {
        target = block.below();
    }

    let anchor = target.above();
    let anchor_material = grid.material(anchor);
    let anchored_by_post = config.is_anchor_material(anchor_material)
        && (grid.is_empty_or_replaceable(target) || engine.is_rope_cell(grid, markers, target));
    if !anchor_material.is_solid() && !anchored_by_post {
        return PlaceAction::Ignored;
    }

    // A rope already hanging beneath the post grows instead of restarting.
    if anchored_by_post && engine.is_rope_cell(grid, markers, target) {
        return extend(config, engine, grid, markers, target, length);
    }

    if !grid.is_empty_or_replaceable(target) {
        return PlaceAction::Ignored;
    }

    if config.animation.enabled {
        return PlaceAction::Scheduled {
            run: RopeAnimation::place(&config.animation, target, length),
        };
    }
    PlaceAction::Placed {
        placed: engine.place(grid, markers, target, length),
    }
}

fn extend<G, M>(
    config: &Config,
    engine: &RopeEngine,
    grid: &mut G,
    markers: &mut M,
    cell: BlockPos,
    length: u32,
) -> PlaceAction
where
    G: GridProbe,
    M: MarkerRegistry,
{
    if config.animation.enabled {
        return PlaceAction::Scheduled {
            run: RopeAnimation::extend(&config.animation, engine, grid, markers, cell, length),
        };
    }
    PlaceAction::Extended {
        added: engine.extend(grid, markers, cell, length),
    }
}

/// Resolves a left-click on a rope cell: the whole rope breaks and its
/// length drops as coils at the clicked cell.
pub(crate) fn left_click_on_rope<G, M>(
    engine: &RopeEngine,
    grid: &mut G,
    markers: &mut M,
    block: BlockPos,
    out_drops: &mut Vec<CoilDrop>,
) -> u32
where
    G: GridProbe,
    M: MarkerRegistry,
{
    if !engine.is_rope_cell(grid, markers, block) {
        return 0;
    }
    let length = engine.break_rope(grid, markers, block);
    if length > 0 {
        engine.drop_coils(cell_center(block), length, out_drops);
    }
    length
}
