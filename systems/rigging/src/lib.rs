#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Rope placement, extension, breaking, and discovery over the voxel grid.
//!
//! A rope is never stored: it is a maximal vertically-contiguous run of
//! cells that carry both the structural material and a marker, rediscovered
//! by grid walks on every query. All mutations write strictly top to bottom
//! and stop at the first obstruction, so an interrupted operation always
//! leaves a valid shorter rope behind.

use std::collections::HashSet;

use glam::DVec3;
use ropeworks_core::{rope_coil, BlockPos, Config, GridProbe, ItemStack, Material, MarkerRegistry};

/// Continuous centre point of a grid cell.
#[must_use]
pub fn cell_center(pos: BlockPos) -> DVec3 {
    DVec3::new(
        f64::from(pos.x()) + 0.5,
        f64::from(pos.y()) + 0.5,
        f64::from(pos.z()) + 0.5,
    )
}

/// Coil item emitted into the world at a continuous point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoilDrop {
    /// Point the coil appears at.
    pub at: DVec3,
    /// The coil item itself.
    pub coil: ItemStack,
}

/// Outcome of a single-cell placement attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentOutcome {
    /// The cell now carries the structural material and a marker.
    Placed,
    /// The cell lies below the world's minimum height.
    BelowWorld,
    /// The cell holds a material placement may not overwrite.
    Occupied,
    /// The chunk containing the cell is not loaded.
    ChunkUnloaded,
}

impl SegmentOutcome {
    /// Reports whether the attempt wrote the cell.
    #[must_use]
    pub const fn is_placed(self) -> bool {
        matches!(self, Self::Placed)
    }
}

/// Placement, extension, break, and discovery algorithms.
///
/// The engine owns no grid state; every call rediscovers rope structure
/// through the provided [`GridProbe`] and [`MarkerRegistry`].
#[derive(Clone, Debug)]
pub struct RopeEngine {
    structural: Material,
    max_coil_length: u32,
}

impl RopeEngine {
    /// Creates an engine bound to the validated configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            structural: config.rope.structural_material,
            max_coil_length: config.coil.max_length,
        }
    }

    /// Structural material a rope cell must carry.
    #[must_use]
    pub const fn structural_material(&self) -> Material {
        self.structural
    }

    /// Reports whether the cell is a rope cell.
    ///
    /// Both conditions are required: the structural material alone may
    /// appear for unrelated reasons, and a stray marker over some other
    /// material is stale. This predicate is the single source of truth for
    /// every other operation.
    #[must_use]
    pub fn is_rope_cell<G, M>(&self, grid: &G, markers: &M, pos: BlockPos) -> bool
    where
        G: GridProbe,
        M: MarkerRegistry,
    {
        grid.material(pos) == self.structural && markers.has(pos)
    }

    /// Topmost cell of the rope containing `pos`, or `None` if `pos` is not
    /// a rope cell.
    #[must_use]
    pub fn find_anchor<G, M>(&self, grid: &G, markers: &M, pos: BlockPos) -> Option<BlockPos>
    where
        G: GridProbe,
        M: MarkerRegistry,
    {
        if !self.is_rope_cell(grid, markers, pos) {
            return None;
        }

        let mut current = pos;
        while self.is_rope_cell(grid, markers, current.above()) {
            current = current.above();
        }
        Some(current)
    }

    /// Lowest cell of the rope containing `pos`, or `None` if `pos` is not
    /// a rope cell.
    #[must_use]
    pub fn find_bottom<G, M>(&self, grid: &G, markers: &M, pos: BlockPos) -> Option<BlockPos>
    where
        G: GridProbe,
        M: MarkerRegistry,
    {
        if !self.is_rope_cell(grid, markers, pos) {
            return None;
        }

        let mut current = pos;
        while self.is_rope_cell(grid, markers, current.below()) {
            current = current.below();
        }
        Some(current)
    }

    /// Number of cells in the rope hanging from `anchor`.
    ///
    /// Returns zero when `anchor` is not a rope cell.
    #[must_use]
    pub fn rope_length<G, M>(&self, grid: &G, markers: &M, anchor: BlockPos) -> u32
    where
        G: GridProbe,
        M: MarkerRegistry,
    {
        let mut length = 0;
        let mut current = anchor;
        while self.is_rope_cell(grid, markers, current) {
            length += 1;
            current = current.below();
        }
        length
    }

    /// Attempts to place a single rope cell.
    ///
    /// Shared by [`RopeEngine::place`] and the animated variant so both
    /// enforce identical stop conditions: world bounds, occupancy, and
    /// chunk-loaded state, checked in that order. Liquids count as
    /// replaceable.
    pub fn place_segment<G, M>(&self, grid: &mut G, markers: &mut M, pos: BlockPos) -> SegmentOutcome
    where
        G: GridProbe,
        M: MarkerRegistry,
    {
        if pos.y() < grid.min_height() {
            return SegmentOutcome::BelowWorld;
        }
        if !grid.is_empty_or_replaceable(pos) && !grid.is_liquid(pos) {
            return SegmentOutcome::Occupied;
        }
        if !grid.is_chunk_loaded(pos) {
            return SegmentOutcome::ChunkUnloaded;
        }

        grid.set_material(pos, self.structural);
        markers.attach(pos);
        SegmentOutcome::Placed
    }

    /// Places a rope hanging down from `anchor`.
    ///
    /// Cells are written strictly top to bottom; the walk stops at the
    /// first cell that cannot be placed. Returns the count actually placed,
    /// which may be anything from zero to `length`; the caller reconciles
    /// the remainder (refund or drop).
    pub fn place<G, M>(&self, grid: &mut G, markers: &mut M, anchor: BlockPos, length: u32) -> u32
    where
        G: GridProbe,
        M: MarkerRegistry,
    {
        let mut placed = 0;
        for step in 0..length {
            let Ok(offset) = i32::try_from(step) else {
                break;
            };
            let pos = anchor.translated(0, -offset, 0);
            if !self.place_segment(grid, markers, pos).is_placed() {
                break;
            }
            placed += 1;
        }
        placed
    }

    /// Cell one below the true bottom of the rope touching `cell`.
    ///
    /// Walks downward from `cell` while rope cells continue; the given cell
    /// need not be the bottom, or even a rope cell at all.
    #[must_use]
    pub fn extension_start<G, M>(&self, grid: &G, markers: &M, cell: BlockPos) -> BlockPos
    where
        G: GridProbe,
        M: MarkerRegistry,
    {
        let mut current = cell;
        while self.is_rope_cell(grid, markers, current.below()) {
            current = current.below();
        }
        current.below()
    }

    /// Extends the rope touching `cell` downward by up to `additional`
    /// cells, returning the count actually added.
    pub fn extend<G, M>(
        &self,
        grid: &mut G,
        markers: &mut M,
        cell: BlockPos,
        additional: u32,
    ) -> u32
    where
        G: GridProbe,
        M: MarkerRegistry,
    {
        let start = self.extension_start(grid, markers, cell);
        self.place(grid, markers, start, additional)
    }

    /// Breaks the entire rope containing `cell`, returning the removed
    /// length.
    ///
    /// Resolves the anchor first and removes downward from there, so any
    /// interior cell destroys the whole contiguous run. Partial removal is
    /// not a supported behavior. Marker removal clears duplicates.
    pub fn break_rope<G, M>(&self, grid: &mut G, markers: &mut M, cell: BlockPos) -> u32
    where
        G: GridProbe,
        M: MarkerRegistry,
    {
        let Some(anchor) = self.find_anchor(grid, markers, cell) else {
            return 0;
        };

        let mut removed = 0;
        let mut current = anchor;
        while self.is_rope_cell(grid, markers, current) {
            let _ = markers.detach_all(current);
            grid.set_material(current, Material::Air);
            removed += 1;
            current = current.below();
        }
        removed
    }

    /// Nearest rope cell within `radius` of the continuous point `center`.
    ///
    /// Scans the cubic neighborhood of `ceil(radius)` cells and filters by
    /// true Euclidean distance from the cell centre. Among equidistant
    /// candidates the first in ascending x, then y, then z scan order wins,
    /// which keeps the result deterministic.
    #[must_use]
    pub fn find_nearest_rope<G, M>(
        &self,
        grid: &G,
        markers: &M,
        center: DVec3,
        radius: f64,
    ) -> Option<BlockPos>
    where
        G: GridProbe,
        M: MarkerRegistry,
    {
        if radius <= 0.0 || !radius.is_finite() {
            return None;
        }

        let bound = radius.ceil() as i32;
        let origin = BlockPos::new(
            center.x.floor() as i32,
            center.y.floor() as i32,
            center.z.floor() as i32,
        );
        let radius_sq = radius * radius;

        let mut best: Option<(f64, BlockPos)> = None;
        for dx in -bound..=bound {
            for dy in -bound..=bound {
                for dz in -bound..=bound {
                    let pos = origin.translated(dx, dy, dz);
                    if !self.is_rope_cell(grid, markers, pos) {
                        continue;
                    }
                    let distance_sq = cell_center(pos).distance_squared(center);
                    if distance_sq > radius_sq {
                        continue;
                    }
                    if best.map_or(true, |(best_sq, _)| distance_sq < best_sq) {
                        best = Some((distance_sq, pos));
                    }
                }
            }
        }
        best.map(|(_, pos)| pos)
    }

    /// Emits coils at `at` whose lengths sum to `total_length`.
    ///
    /// Greedy: maximum-length coils first, remainder last, so the coil
    /// count is the minimum possible. A zero total is a no-op.
    pub fn drop_coils(&self, at: DVec3, total_length: u32, out: &mut Vec<CoilDrop>) {
        let mut remaining = total_length;
        while remaining > 0 {
            let coil_length = remaining.min(self.max_coil_length);
            out.push(CoilDrop {
                at,
                coil: rope_coil(coil_length),
            });
            remaining -= coil_length;
        }
    }

    /// Breaks every rope touched by the affected cells exactly once.
    ///
    /// For explosion and piston block lists: each affected rope is
    /// discovered through its anchor, deduplicated per call, broken whole,
    /// and its full length dropped as coils at the anchor centre. Returns
    /// the total cells removed.
    pub fn break_all_affected<G, M>(
        &self,
        grid: &mut G,
        markers: &mut M,
        cells: &[BlockPos],
        out: &mut Vec<CoilDrop>,
    ) -> u32
    where
        G: GridProbe,
        M: MarkerRegistry,
    {
        let mut processed: HashSet<BlockPos> = HashSet::new();
        let mut removed_total = 0;

        for &cell in cells {
            if !self.is_rope_cell(grid, markers, cell) {
                continue;
            }
            let Some(anchor) = self.find_anchor(grid, markers, cell) else {
                continue;
            };
            if !processed.insert(anchor) {
                continue;
            }

            let removed = self.break_rope(grid, markers, cell);
            if removed > 0 {
                self.drop_coils(cell_center(anchor), removed, out);
                removed_total += removed;
            }
        }
        removed_total
    }

    /// Responds to the removal of the block at `removed`.
    ///
    /// If the cell below was the anchor of a rope, the rope lost its
    /// support: break it whole and drop its length in coils there. Interior
    /// cells are left alone; only anchor exposure severs the rope.
    pub fn handle_support_removed<G, M>(
        &self,
        grid: &mut G,
        markers: &mut M,
        removed: BlockPos,
        out: &mut Vec<CoilDrop>,
    ) -> u32
    where
        G: GridProbe,
        M: MarkerRegistry,
    {
        let below = removed.below();
        if !self.is_rope_cell(grid, markers, below) {
            return 0;
        }
        if self.is_rope_cell(grid, markers, removed) {
            // A rope cell above means `below` is interior, not the anchor.
            return 0;
        }

        let length = self.break_rope(grid, markers, below);
        if length > 0 {
            self.drop_coils(cell_center(below), length, out);
        }
        length
    }
}
