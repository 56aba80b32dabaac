#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-tick climb velocity controller.
//!
//! Runs on every movement tick, read-only: if the entity's body overlaps a
//! rope cell within the configured Manhattan radius at feet or eye level,
//! the look pitch and jump intent map to one of three vertical-velocity
//! bands. Nothing is retained between ticks; the decision is recomputed
//! from the current position and intent every time.

use glam::DVec3;
use ropeworks_core::{BlockPos, Config, GridProbe, MarkerRegistry};
use ropeworks_system_rigging::RopeEngine;

/// Pitch below which the entity is looking up enough to ascend.
const ASCEND_PITCH_DEGREES: f32 = -30.0;
/// Pitch above which the entity is looking down enough to descend.
const DESCEND_PITCH_DEGREES: f32 = 30.0;
/// Vertical offset from feet to the eye-level sample, in cells.
const EYE_OFFSET: f64 = 1.6;

/// Movement-tick snapshot of the climbing entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClimbInput {
    /// Feet position of the entity in continuous world coordinates.
    pub position: DVec3,
    /// Look pitch in degrees; negative looks up, positive looks down.
    pub pitch_degrees: f32,
    /// Whether the entity is holding its jump intent this tick.
    pub jumping: bool,
}

/// Vertical band selected for the tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClimbBand {
    /// Move up at the configured climb speed.
    Ascend,
    /// Move down at the configured climb speed.
    Descend,
    /// Hold position with zero vertical velocity.
    Hold,
}

/// Velocity adjustment applied while on a rope.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClimbAdjustment {
    /// Band the intent mapped to.
    pub band: ClimbBand,
    /// Vertical velocity to set on the entity this tick.
    pub vertical_velocity: f64,
    /// Fall-damage accumulation must be cleared for this tick.
    pub reset_fall_distance: bool,
}

/// Stateless climb controller bound to the validated configuration.
#[derive(Clone, Debug)]
pub struct Climbing {
    climb_speed: f64,
    interaction_radius: u32,
}

impl Climbing {
    /// Creates a controller bound to the validated configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            climb_speed: config.rope.climb_speed,
            interaction_radius: config.rope.interaction_radius,
        }
    }

    /// Computes this tick's adjustment, or `None` when not near a rope.
    #[must_use]
    pub fn adjust<G, M>(
        &self,
        engine: &RopeEngine,
        grid: &G,
        markers: &M,
        input: ClimbInput,
    ) -> Option<ClimbAdjustment>
    where
        G: GridProbe,
        M: MarkerRegistry,
    {
        if !self.is_near_rope(engine, grid, markers, input.position) {
            return None;
        }

        let band = if input.jumping || input.pitch_degrees < ASCEND_PITCH_DEGREES {
            ClimbBand::Ascend
        } else if input.pitch_degrees > DESCEND_PITCH_DEGREES {
            ClimbBand::Descend
        } else {
            ClimbBand::Hold
        };

        let vertical_velocity = match band {
            ClimbBand::Ascend => self.climb_speed,
            ClimbBand::Descend => -self.climb_speed,
            ClimbBand::Hold => 0.0,
        };

        Some(ClimbAdjustment {
            band,
            vertical_velocity,
            reset_fall_distance: true,
        })
    }

    fn is_near_rope<G, M>(&self, engine: &RopeEngine, grid: &G, markers: &M, feet: DVec3) -> bool
    where
        G: GridProbe,
        M: MarkerRegistry,
    {
        let feet_cell = cell_of(feet);
        let eye_cell = cell_of(feet + DVec3::new(0.0, EYE_OFFSET, 0.0));
        let radius = match i32::try_from(self.interaction_radius) {
            Ok(radius) => radius,
            Err(_) => return false,
        };

        for dx in -radius..=radius {
            for dy in -radius..=radius {
                for dz in -radius..=radius {
                    if dx.unsigned_abs() + dy.unsigned_abs() + dz.unsigned_abs()
                        > self.interaction_radius
                    {
                        continue;
                    }
                    if engine.is_rope_cell(grid, markers, feet_cell.translated(dx, dy, dz)) {
                        return true;
                    }
                    if engine.is_rope_cell(grid, markers, eye_cell.translated(dx, dy, dz)) {
                        return true;
                    }
                }
            }
        }
        false
    }
}

fn cell_of(point: DVec3) -> BlockPos {
    BlockPos::new(
        point.x.floor() as i32,
        point.y.floor() as i32,
        point.z.floor() as i32,
    )
}
