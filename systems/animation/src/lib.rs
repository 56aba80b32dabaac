#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Time-sliced rope placement driven by an external tick.
//!
//! A [`RopeAnimation`] is the suspended form of a synchronous placement: it
//! attempts one cell per configured tick interval through the engine's
//! single-cell operation, re-validating the same stop conditions each time.
//! A run finishes exactly once, either by exhausting its length or at the
//! first blocked cell, and reports the count actually placed; callers use
//! that count exactly as they would the synchronous return value. The
//! triggering item must be consumed before a run starts, so the completion
//! races with nothing that could re-trigger the same placement.

use ropeworks_core::{AnimationConfig, BlockPos, GridProbe, MarkerRegistry};
use ropeworks_system_rigging::RopeEngine;

/// Identifier assigned to an in-flight animated run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(u32);

impl RunId {
    /// Creates a run identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Completion record for a finished run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationOutcome {
    /// Identifier of the run that finished.
    pub run: RunId,
    /// Length the run was asked to place.
    pub requested: u32,
    /// Count actually placed before the run finished.
    pub placed: u32,
}

impl AnimationOutcome {
    /// Length left over for the caller to refund or drop.
    #[must_use]
    pub const fn unused(&self) -> u32 {
        self.requested.saturating_sub(self.placed)
    }
}

/// One suspended placement or extension, advanced by [`RopeAnimation::tick`].
#[derive(Clone, Debug)]
pub struct RopeAnimation {
    next: BlockPos,
    remaining: u32,
    requested: u32,
    placed: u32,
    ticks_per_cell: u32,
    countdown: u32,
    finished: bool,
}

impl RopeAnimation {
    /// Suspended form of a placement hanging down from `anchor`.
    #[must_use]
    pub fn place(config: &AnimationConfig, anchor: BlockPos, length: u32) -> Self {
        let ticks_per_cell = config.ticks_per_cell.max(1);
        Self {
            next: anchor,
            remaining: length,
            requested: length,
            placed: 0,
            ticks_per_cell,
            countdown: ticks_per_cell,
            finished: false,
        }
    }

    /// Suspended form of an extension of the rope touching `cell`.
    ///
    /// The true bottom is resolved now, while the triggering interaction is
    /// still being handled; the run then behaves like a placement starting
    /// one cell below it.
    #[must_use]
    pub fn extend<G, M>(
        config: &AnimationConfig,
        engine: &RopeEngine,
        grid: &G,
        markers: &M,
        cell: BlockPos,
        additional: u32,
    ) -> Self
    where
        G: GridProbe,
        M: MarkerRegistry,
    {
        let start = engine.extension_start(grid, markers, cell);
        Self::place(config, start, additional)
    }

    /// Length the run was asked to place.
    #[must_use]
    pub const fn requested(&self) -> u32 {
        self.requested
    }

    /// Count placed so far.
    #[must_use]
    pub const fn placed_so_far(&self) -> u32 {
        self.placed
    }

    /// Reports whether the run has already finished.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advances the run by one tick.
    ///
    /// Returns the final placed count on the tick the run finishes, and
    /// `None` on every other tick, so completion is observed exactly once.
    pub fn tick<G, M>(&mut self, engine: &RopeEngine, grid: &mut G, markers: &mut M) -> Option<u32>
    where
        G: GridProbe,
        M: MarkerRegistry,
    {
        if self.finished {
            return None;
        }
        if self.remaining == 0 {
            return Some(self.finish());
        }

        self.countdown -= 1;
        if self.countdown > 0 {
            return None;
        }
        self.countdown = self.ticks_per_cell;

        if !engine.place_segment(grid, markers, self.next).is_placed() {
            return Some(self.finish());
        }

        self.placed += 1;
        self.remaining -= 1;
        self.next = self.next.below();
        if self.remaining == 0 {
            return Some(self.finish());
        }
        None
    }

    fn finish(&mut self) -> u32 {
        self.finished = true;
        self.placed
    }
}

/// Pool of in-flight runs, drained once per world tick.
///
/// Completions surface through the output vector with their [`RunId`], so
/// the event layer's refund logic observes each run exactly once.
#[derive(Debug, Default)]
pub struct Conveyor {
    runs: Vec<(RunId, RopeAnimation)>,
    next_id: u32,
}

impl Conveyor {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopts a run, returning the identifier its completion will carry.
    pub fn start(&mut self, run: RopeAnimation) -> RunId {
        let id = RunId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.runs.push((id, run));
        id
    }

    /// Number of runs still in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.runs.len()
    }

    /// Advances every run by one tick, draining completions in start order.
    pub fn tick<G, M>(
        &mut self,
        engine: &RopeEngine,
        grid: &mut G,
        markers: &mut M,
        out: &mut Vec<AnimationOutcome>,
    ) where
        G: GridProbe,
        M: MarkerRegistry,
    {
        let mut index = 0;
        while index < self.runs.len() {
            let (id, run) = &mut self.runs[index];
            match run.tick(engine, grid, markers) {
                Some(placed) => {
                    out.push(AnimationOutcome {
                        run: *id,
                        requested: run.requested(),
                        placed,
                    });
                    let _ = self.runs.remove(index);
                }
                None => index += 1,
            }
        }
    }
}
