//! Keeps an annulus of chunks around a moving observer populated and meshed.

use crate::chunk::ChunkCoord;
use crate::world::World;
use std::collections::{HashSet, VecDeque};

/// Summarizes the work a single [`StreamingManager::tick`] call performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Chunks ensured (terrain/carve/ore/decorate) this tick.
    pub ensured: usize,
    /// Chunks meshed this tick.
    pub meshed: usize,
    /// Whether the observer moved (or the radius changed), triggering a full rescan.
    pub rescanned: bool,
}

/// Drives chunk population and meshing around an observer chunk coordinate.
pub struct StreamingManager {
    pending: VecDeque<ChunkCoord>,
    pending_set: HashSet<ChunkCoord>,
    last_observer: Option<ChunkCoord>,
    radius: i32,
    budget_per_tick: usize,
}

impl StreamingManager {
    /// Construct a manager with the given mesh radius (`render_distance`) and
    /// per-tick mesh budget.
    pub fn new(radius: i32, budget_per_tick: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            pending_set: HashSet::new(),
            last_observer: None,
            radius,
            budget_per_tick,
        }
    }

    /// Current mesh radius, in chunks.
    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Reconfigure the mesh radius; the next tick performs a full rescan.
    pub fn set_radius(&mut self, radius: i32) {
        if radius != self.radius {
            self.radius = radius;
            self.last_observer = None;
        }
    }

    /// Directly enqueue a chunk for meshing (used when an edit dirties it).
    pub fn enqueue(&mut self, coord: ChunkCoord) {
        if self.pending_set.insert(coord) {
            self.pending.push_back(coord);
        }
    }

    /// Advance streaming by one tick: ensure the populated margin, enqueue
    /// dirty chunks in the inner window, then drain up to the mesh budget.
    pub fn tick(&mut self, world: &World, observer: ChunkCoord) -> TickReport {
        let mut report = TickReport::default();
        let full_rescan = self.last_observer != Some(observer);
        report.rescanned = full_rescan;

        if full_rescan {
            self.full_scan(world, observer, &mut report);
            self.last_observer = Some(observer);
        }

        for dz in -self.radius..=self.radius {
            for dx in -self.radius..=self.radius {
                let coord = ChunkCoord::new(observer.x + dx, observer.z + dz);
                if let Some(handle) = world.get_chunk(coord) {
                    let dirty = handle.read().is_dirty();
                    if dirty {
                        self.enqueue(coord);
                    }
                }
            }
        }

        for _ in 0..self.budget_per_tick {
            let Some(coord) = self.pending.pop_front() else {
                break;
            };
            self.pending_set.remove(&coord);
            world.remesh_chunk(coord);
            report.meshed += 1;
        }

        report
    }

    fn full_scan(&mut self, world: &World, observer: ChunkCoord, report: &mut TickReport) {
        use rayon::prelude::*;

        let margin = self.radius + 1;
        let mut coords = Vec::new();
        for dz in -margin..=margin {
            for dx in -margin..=margin {
                coords.push(ChunkCoord::new(observer.x + dx, observer.z + dz));
            }
        }

        // Each chunk locks independently, so generation for the whole margin
        // can be offloaded to the worker pool; only write application and
        // pending-queue bookkeeping happen back on this thread.
        let generated: Vec<(ChunkCoord, Vec<crate::world::PendingWrite>)> = coords
            .par_iter()
            .map(|&coord| {
                let (_, writes) = world.ensure_chunk(coord);
                (coord, writes)
            })
            .collect();

        for (coord, writes) in generated {
            world.apply_pending_writes(writes);
            report.ensured += 1;
            self.enqueue(coord);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxen_core::WorldConfig;

    fn small_world() -> World {
        let mut cfg = WorldConfig::default();
        cfg.chunk_width = 4;
        cfg.chunk_height = 16;
        World::new(cfg)
    }

    #[test]
    fn first_tick_populates_and_meshes_within_budget() {
        let world = small_world();
        let mut manager = StreamingManager::new(1, 100);
        let report = manager.tick(&world, ChunkCoord::new(0, 0));
        assert!(report.rescanned);
        // margin = radius+1 = 2, so a 5x5 window of chunks is ensured.
        assert_eq!(report.ensured, 25);
        for dz in -1..=1 {
            for dx in -1..=1 {
                let coord = ChunkCoord::new(dx, dz);
                let handle = world.get_chunk(coord).expect("chunk should be loaded");
                assert!(handle.read().is_populated());
            }
        }
    }

    #[test]
    fn stationary_observer_drains_pending_over_multiple_ticks() {
        let world = small_world();
        let mut manager = StreamingManager::new(2, 2);
        let first = manager.tick(&world, ChunkCoord::new(0, 0));
        assert!(first.rescanned);
        assert_eq!(first.meshed, 2);

        let mut total = first.meshed;
        for _ in 0..20 {
            let report = manager.tick(&world, ChunkCoord::new(0, 0));
            assert!(!report.rescanned);
            total += report.meshed;
            if manager.pending.is_empty() {
                break;
            }
        }
        assert!(total > 0);
        assert!(manager.pending.is_empty());
    }

    #[test]
    fn moving_observer_triggers_rescan() {
        let world = small_world();
        let mut manager = StreamingManager::new(1, 100);
        manager.tick(&world, ChunkCoord::new(0, 0));
        let report = manager.tick(&world, ChunkCoord::new(5, 0));
        assert!(report.rescanned);
    }
}
