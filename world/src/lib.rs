#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! In-memory voxel world and marker field backing the rope systems.
//!
//! [`VoxelWorld`] implements the [`GridProbe`] contract over a sparse
//! material map, and [`MarkerField`] implements [`MarkerRegistry`] as a
//! per-cell marker multiset. Adapters and tests drive the pure systems
//! against these; a live game would substitute its own implementations.

use std::collections::{HashMap, HashSet};

use ropeworks_core::{BlockPos, GridProbe, Material, MarkerRegistry};

const DEFAULT_MIN_HEIGHT: i32 = -64;
const DEFAULT_MAX_HEIGHT: i32 = 320;
const CHUNK_SHIFT: i32 = 4;

/// Sparse voxel grid with vertical bounds and chunk-loaded tracking.
///
/// Cells default to [`Material::Air`]; chunks are loaded unless explicitly
/// unloaded, which keeps test setups short while still letting scenarios
/// exercise the unloaded-chunk stop condition.
#[derive(Clone, Debug, Default)]
pub struct VoxelWorld {
    cells: HashMap<BlockPos, Material>,
    unloaded: HashSet<(i32, i32)>,
    bounds: Option<(i32, i32)>,
}

impl VoxelWorld {
    /// Creates a world with the default vertical bounds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a world with explicit vertical bounds.
    #[must_use]
    pub fn with_bounds(min_height: i32, max_height: i32) -> Self {
        Self {
            cells: HashMap::new(),
            unloaded: HashSet::new(),
            bounds: Some((min_height.min(max_height), max_height.max(min_height))),
        }
    }

    /// Marks the chunk containing the cell as unloaded.
    pub fn unload_chunk_at(&mut self, pos: BlockPos) {
        let _ = self.unloaded.insert(chunk_of(pos));
    }

    /// Marks the chunk containing the cell as loaded again.
    pub fn load_chunk_at(&mut self, pos: BlockPos) {
        let _ = self.unloaded.remove(&chunk_of(pos));
    }

    /// Number of non-air cells currently stored.
    #[must_use]
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }
}

impl GridProbe for VoxelWorld {
    fn material(&self, pos: BlockPos) -> Material {
        self.cells.get(&pos).copied().unwrap_or(Material::Air)
    }

    fn set_material(&mut self, pos: BlockPos, material: Material) {
        if material.is_empty() {
            let _ = self.cells.remove(&pos);
        } else {
            let _ = self.cells.insert(pos, material);
        }
    }

    fn is_chunk_loaded(&self, pos: BlockPos) -> bool {
        !self.unloaded.contains(&chunk_of(pos))
    }

    fn min_height(&self) -> i32 {
        self.bounds.map_or(DEFAULT_MIN_HEIGHT, |(min, _)| min)
    }

    fn max_height(&self) -> i32 {
        self.bounds.map_or(DEFAULT_MAX_HEIGHT, |(_, max)| max)
    }
}

fn chunk_of(pos: BlockPos) -> (i32, i32) {
    (pos.x() >> CHUNK_SHIFT, pos.z() >> CHUNK_SHIFT)
}

/// Marker multiset keyed by cell.
///
/// Duplicate markers at one cell are tolerated by design: competing
/// placements can each attach one, and removal clears them all.
#[derive(Clone, Debug, Default)]
pub struct MarkerField {
    markers: HashMap<BlockPos, u32>,
}

impl MarkerField {
    /// Creates an empty marker field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of markers across all cells, duplicates included.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.markers.values().map(|count| u64::from(*count)).sum()
    }

    /// Cells carrying at least one marker, in deterministic order.
    #[must_use]
    pub fn cells(&self) -> Vec<BlockPos> {
        let mut cells: Vec<BlockPos> = self.markers.keys().copied().collect();
        cells.sort();
        cells
    }
}

impl MarkerRegistry for MarkerField {
    fn attach(&mut self, pos: BlockPos) {
        let count = self.markers.entry(pos).or_insert(0);
        *count = count.saturating_add(1);
    }

    fn detach_all(&mut self, pos: BlockPos) -> u32 {
        self.markers.remove(&pos).unwrap_or(0)
    }

    fn has(&self, pos: BlockPos) -> bool {
        self.markers.contains_key(&pos)
    }
}

/// Read-only aggregate queries over the world and marker field.
pub mod query {
    use super::{MarkerField, VoxelWorld};
    use ropeworks_core::{BlockPos, GridProbe, Material};

    /// Total marker count, duplicates included.
    #[must_use]
    pub fn marker_count(markers: &MarkerField) -> u64 {
        markers.total()
    }

    /// Cells that are rope cells for the given structural material.
    ///
    /// Deterministic order: ascending block position.
    #[must_use]
    pub fn rope_cells(
        world: &VoxelWorld,
        markers: &MarkerField,
        structural: Material,
    ) -> Vec<BlockPos> {
        markers
            .cells()
            .into_iter()
            .filter(|pos| world.material(*pos) == structural)
            .collect()
    }
}
