#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Ropeworks engine.
//!
//! This crate defines the vocabulary that connects the in-memory world, the
//! pure systems, and the adapters: grid coordinates, materials, the
//! [`GridProbe`] and [`MarkerRegistry`] contracts the systems consume, the
//! rope item values, and the validated configuration. Rope structure itself
//! is never stored here (or anywhere): every system rediscovers it from the
//! live grid on each call.

mod config;
mod items;
mod material;

pub use config::{
    AnimationConfig, ArrowConfig, CoilConfig, Config, ConfigError, CraftingConfig, RopeConfig,
};
pub use items::{
    arrow_length, coil_length, combine_coils, is_rope_arrow, is_rope_coil, rope_arrow, rope_coil,
    ItemStack,
};
pub use material::Material;

use serde::{Deserialize, Serialize};

/// Location of a single grid cell expressed as block coordinates.
///
/// The vertical axis is `y`; ropes are runs of cells sharing `x` and `z`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPos {
    x: i32,
    y: i32,
    z: i32,
}

impl BlockPos {
    /// Creates a new block position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Horizontal east-west coordinate of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Horizontal north-south coordinate of the cell.
    #[must_use]
    pub const fn z(&self) -> i32 {
        self.z
    }

    /// Cell directly above this one.
    #[must_use]
    pub const fn above(&self) -> Self {
        Self::new(self.x, self.y + 1, self.z)
    }

    /// Cell directly below this one.
    #[must_use]
    pub const fn below(&self) -> Self {
        Self::new(self.x, self.y - 1, self.z)
    }

    /// Cell reached by moving one step through the given face.
    #[must_use]
    pub const fn offset(&self, face: BlockFace) -> Self {
        let (dx, dy, dz) = face.delta();
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Cell displaced by the provided per-axis deltas.
    #[must_use]
    pub const fn translated(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Computes the Manhattan distance between two cells.
    #[must_use]
    pub fn manhattan_distance(self, other: BlockPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) + self.z.abs_diff(other.z)
    }
}

/// Face of a block struck or clicked, used to derive placement cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockFace {
    /// Top face, pointing toward increasing `y`.
    Up,
    /// Bottom face, pointing toward decreasing `y`.
    Down,
    /// Face pointing toward decreasing `z`.
    North,
    /// Face pointing toward increasing `z`.
    South,
    /// Face pointing toward increasing `x`.
    East,
    /// Face pointing toward decreasing `x`.
    West,
}

impl BlockFace {
    /// Unit offset of the face expressed as per-axis deltas.
    #[must_use]
    pub const fn delta(self) -> (i32, i32, i32) {
        match self {
            Self::Up => (0, 1, 0),
            Self::Down => (0, -1, 0),
            Self::North => (0, 0, -1),
            Self::South => (0, 0, 1),
            Self::East => (1, 0, 0),
            Self::West => (-1, 0, 0),
        }
    }
}

/// Read/write access to single grid cells.
///
/// The engine consumes this contract and never holds state of its own; the
/// authoritative grid lives behind the implementation. All rope operations
/// are bounded by rope length in calls through this trait.
pub trait GridProbe {
    /// Material currently occupying the cell.
    fn material(&self, pos: BlockPos) -> Material;

    /// Overwrites the cell with the provided material.
    fn set_material(&mut self, pos: BlockPos, material: Material);

    /// Reports whether the cell holds no block or a replaceable cover.
    fn is_empty_or_replaceable(&self, pos: BlockPos) -> bool {
        let material = self.material(pos);
        material.is_empty() || material.is_replaceable()
    }

    /// Reports whether the cell holds a liquid.
    fn is_liquid(&self, pos: BlockPos) -> bool {
        self.material(pos).is_liquid()
    }

    /// Reports whether the chunk containing the cell is loaded.
    fn is_chunk_loaded(&self, pos: BlockPos) -> bool;

    /// Lowest valid vertical coordinate of the world.
    fn min_height(&self) -> i32;

    /// Highest valid vertical coordinate of the world.
    fn max_height(&self) -> i32;
}

/// Lifecycle of the out-of-band rope markers attached to grid cells.
///
/// A cell is a rope cell only while it carries both the structural material
/// and a marker. At most one marker is expected per cell, but competing
/// placements can leave duplicates behind; removal therefore clears every
/// marker at the cell and reports how many it found.
pub trait MarkerRegistry {
    /// Attaches a marker to the cell.
    fn attach(&mut self, pos: BlockPos);

    /// Removes every marker at the cell, returning the count removed.
    fn detach_all(&mut self, pos: BlockPos) -> u32;

    /// Reports whether at least one marker exists at the cell.
    fn has(&self, pos: BlockPos) -> bool;
}

#[cfg(test)]
mod tests {
    use super::{BlockFace, BlockPos};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = BlockPos::new(1, 64, -3);
        let destination = BlockPos::new(4, 62, -1);
        assert_eq!(origin.manhattan_distance(destination), 7);
        assert_eq!(destination.manhattan_distance(origin), 7);
    }

    #[test]
    fn face_offsets_are_unit_steps() {
        let origin = BlockPos::new(0, 0, 0);
        assert_eq!(origin.offset(BlockFace::Up), BlockPos::new(0, 1, 0));
        assert_eq!(origin.offset(BlockFace::Down), BlockPos::new(0, -1, 0));
        assert_eq!(origin.offset(BlockFace::North), BlockPos::new(0, 0, -1));
        assert_eq!(origin.offset(BlockFace::South), BlockPos::new(0, 0, 1));
        assert_eq!(origin.offset(BlockFace::East), BlockPos::new(1, 0, 0));
        assert_eq!(origin.offset(BlockFace::West), BlockPos::new(-1, 0, 0));
    }

    #[test]
    fn vertical_helpers_move_along_y() {
        let pos = BlockPos::new(7, 10, 7);
        assert_eq!(pos.above(), BlockPos::new(7, 11, 7));
        assert_eq!(pos.below(), BlockPos::new(7, 9, 7));
        assert_eq!(pos.above().below(), pos);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn block_pos_round_trips_through_bincode() {
        assert_round_trip(&BlockPos::new(-12, 80, 44));
    }

    #[test]
    fn block_face_round_trips_through_bincode() {
        assert_round_trip(&BlockFace::Down);
    }
}
