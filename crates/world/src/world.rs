//! The chunk map and its query/edit/streaming surface.

use crate::catalog::BlockCatalog;
use crate::chunk::{
    chunk_local_to_world, world_to_chunk_local, BlockId, Chunk, ChunkCoord, ChunkDims, LocalCoord,
    BLOCK_AIR,
};
use crate::generator::Generator;
use crate::mesh::{self, VoxelSource};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use voxen_core::WorldConfig;

/// A queued cross-chunk write produced while decorating a neighbouring chunk
/// (e.g. a tree canopy spilling across a chunk boundary).
///
/// Carried as plain data rather than applied immediately, so the decoration
/// pass never needs to lock two chunks at once.
#[derive(Debug, Clone, Copy)]
pub struct PendingWrite {
    /// Target chunk.
    pub coord: ChunkCoord,
    /// Target local position within that chunk.
    pub local: LocalCoord,
    /// Block id to place, if the target cell is still air.
    pub id: BlockId,
}

/// Outcome of a cell query that may fall outside the configured world bound
/// (horizontally or vertically) or hit an unpopulated chunk. Each variant
/// carries its own solid/transparent policy rather than collapsing to one
/// "outside" case, since the horizontal and vertical policies differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellPolicy {
    /// Resolved to an actual voxel in a populated chunk.
    Voxel(BlockId),
    /// Above `CH-1` or below `0`: open sky — not solid, transparent.
    OutsideVerticalRange,
    /// Outside the finite world's horizontal bound: a solid wall, so
    /// boundary chunks never mesh faces looking out into the void.
    OutsideHorizontalBound,
    /// Chunk not yet populated. An internal "UnpopulatedRead" condition:
    /// treated as AIR and logged, never surfaced as an error.
    Unpopulated,
}

/// Owns every loaded chunk and exposes the engine's voxel query/edit API.
pub struct World {
    config: WorldConfig,
    catalog: Arc<BlockCatalog>,
    generator: Generator,
    chunks: RwLock<BTreeMap<ChunkCoord, Arc<RwLock<Chunk>>>>,
}

impl World {
    /// Construct an empty world from a validated configuration.
    ///
    /// Precondition: `config.validate()` has already returned `Ok`; this is
    /// enforced by the caller (the CLI binary) before constructing a `World`,
    /// since an invalid configuration is treated as a fatal startup error.
    pub fn new(config: WorldConfig) -> Self {
        let catalog = Arc::new(BlockCatalog::standard());
        let generator = Generator::new(&config, catalog.clone());
        Self {
            config,
            catalog,
            generator,
            chunks: RwLock::new(BTreeMap::new()),
        }
    }

    /// The configuration this world was built from.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// The block catalog shared by every chunk in this world.
    pub fn catalog(&self) -> &BlockCatalog {
        &self.catalog
    }

    fn dims(&self) -> ChunkDims {
        ChunkDims {
            width: self.config.chunk_width,
            height: self.config.chunk_height,
        }
    }

    /// True if `coord` falls within the configured world bound.
    /// `world_width == 0` means unbounded.
    fn in_world_bound(&self, coord: ChunkCoord) -> bool {
        if self.config.world_width == 0 {
            return true;
        }
        let half = self.config.world_width as i32 / 2;
        (-half..=half).contains(&coord.x) && (-half..=half).contains(&coord.z)
    }

    /// Look up an already-loaded chunk handle without creating it.
    pub fn get_chunk(&self, coord: ChunkCoord) -> Option<Arc<RwLock<Chunk>>> {
        self.chunks.read().get(&coord).cloned()
    }

    /// Ensure a chunk exists and has run every generation pass up through
    /// decoration, running the terrain/cave/ore/decoration passes as needed.
    /// Returns the chunk handle and any cross-chunk writes its decoration
    /// pass produced, for the caller to route to `apply_pending_writes`.
    pub fn ensure_chunk(&self, coord: ChunkCoord) -> (Arc<RwLock<Chunk>>, Vec<PendingWrite>) {
        if !self.in_world_bound(coord) {
            tracing::debug!(%coord, "ensure_chunk: outside world bound, allocating inert chunk");
        }

        let existing = self.get_chunk(coord);
        let handle = existing.unwrap_or_else(|| {
            let chunk = Arc::new(RwLock::new(Chunk::new(coord, self.dims())));
            let mut chunks = self.chunks.write();
            chunks.entry(coord).or_insert(chunk).clone()
        });

        let mut pending = Vec::new();
        {
            let mut chunk = handle.write();
            if !chunk.is_populated() {
                self.generator.generate_terrain(&mut chunk);
            }
            if !chunk.is_carved() {
                self.generator.carve_caves(&mut chunk);
            }
            if !chunk.is_ore_filled() {
                self.generator.fill_ores(&mut chunk);
            }
            if !chunk.is_decorated() {
                pending = self.generator.decorate(&mut chunk);
            }
        }
        (handle, pending)
    }

    /// Apply cross-chunk writes queued by a neighbour's decoration pass.
    /// Targets that are not yet loaded are silently dropped (the spec's
    /// decoration pass only ever targets chunks adjacent to one already
    /// being decorated, so in practice these are loaded by the time the
    /// streaming manager gets around to them).
    pub fn apply_pending_writes(&self, writes: Vec<PendingWrite>) {
        for write in writes {
            if let Some(handle) = self.get_chunk(write.coord) {
                let mut chunk = handle.write();
                chunk.set_local_if_air(write.local, write.id);
            }
        }
    }

    fn resolve(&self, wx: i32, wy: i32, wz: i32) -> CellPolicy {
        if wy < 0 || wy as u32 >= self.config.chunk_height {
            return CellPolicy::OutsideVerticalRange;
        }
        let (cx, lx) = world_to_chunk_local(wx, self.config.chunk_width);
        let (cz, lz) = world_to_chunk_local(wz, self.config.chunk_width);
        let coord = ChunkCoord::new(cx, cz);
        if !self.in_world_bound(coord) {
            return CellPolicy::OutsideHorizontalBound;
        }
        let Some(handle) = self.get_chunk(coord) else {
            return CellPolicy::Unpopulated;
        };
        let chunk = handle.read();
        if !chunk.is_populated() {
            return CellPolicy::Unpopulated;
        }
        let local = LocalCoord::new(lx, wy as u32, lz);
        CellPolicy::Voxel(chunk.get_local(local))
    }

    /// Read the voxel id at a world coordinate. Out-of-bounds and
    /// unpopulated-chunk reads silently resolve to AIR.
    pub fn voxel_at(&self, wx: i32, wy: i32, wz: i32) -> BlockId {
        match self.resolve(wx, wy, wz) {
            CellPolicy::Voxel(id) => id,
            CellPolicy::OutsideVerticalRange
            | CellPolicy::OutsideHorizontalBound
            | CellPolicy::Unpopulated => BLOCK_AIR,
        }
    }

    /// Solidity at a world coordinate. Outside the finite world horizontally
    /// this is solid (keeps boundary chunks from meshing faces into the
    /// void); outside the vertical range it is open sky (not solid).
    pub fn is_solid_at(&self, wx: i32, wy: i32, wz: i32) -> bool {
        match self.resolve(wx, wy, wz) {
            CellPolicy::Voxel(id) => self.catalog.solid(id),
            CellPolicy::OutsideHorizontalBound => true,
            CellPolicy::OutsideVerticalRange | CellPolicy::Unpopulated => false,
        }
    }

    /// Transparency at a world coordinate. Outside the vertical range this is
    /// transparent (open sky); outside the finite world horizontally it is
    /// opaque, matching `is_solid_at`'s solid-wall policy there.
    pub fn is_transparent_at(&self, wx: i32, wy: i32, wz: i32) -> bool {
        match self.resolve(wx, wy, wz) {
            CellPolicy::Voxel(id) => self.catalog.transparent(id),
            CellPolicy::OutsideHorizontalBound => false,
            CellPolicy::OutsideVerticalRange | CellPolicy::Unpopulated => true,
        }
    }

    /// Write a voxel at a world coordinate. Out-of-bounds edits (outside the
    /// vertical range, or outside a finite world's horizontal bound) are
    /// silently ignored. If the target chunk is not yet populated this first
    /// triggers its population. Also dirties the (up to two) neighbour chunks
    /// when the edited cell lies on a chunk boundary.
    pub fn set_voxel(&self, wx: i32, wy: i32, wz: i32, id: BlockId) {
        if wy < 0 || wy as u32 >= self.config.chunk_height {
            return;
        }
        let (cx, lx) = world_to_chunk_local(wx, self.config.chunk_width);
        let (cz, lz) = world_to_chunk_local(wz, self.config.chunk_width);
        let coord = ChunkCoord::new(cx, cz);
        if !self.in_world_bound(coord) {
            return;
        }

        let (handle, writes) = self.ensure_chunk(coord);
        self.apply_pending_writes(writes);

        {
            let mut chunk = handle.write();
            chunk.set_local(LocalCoord::new(lx, wy as u32, lz), id);
        }

        let width = self.config.chunk_width;
        if lx == 0 {
            self.mark_neighbor_dirty(ChunkCoord::new(cx - 1, cz));
        } else if lx == width - 1 {
            self.mark_neighbor_dirty(ChunkCoord::new(cx + 1, cz));
        }
        if lz == 0 {
            self.mark_neighbor_dirty(ChunkCoord::new(cx, cz - 1));
        } else if lz == width - 1 {
            self.mark_neighbor_dirty(ChunkCoord::new(cx, cz + 1));
        }
    }

    fn mark_neighbor_dirty(&self, coord: ChunkCoord) {
        if let Some(handle) = self.get_chunk(coord) {
            handle.write().mark_dirty();
        }
    }

    /// Rebuild a chunk's mesh in place. No-op if the chunk is not loaded.
    pub fn remesh_chunk(&self, coord: ChunkCoord) {
        let Some(handle) = self.get_chunk(coord) else {
            return;
        };
        let built = {
            let chunk = handle.read();
            if !chunk.is_populated() {
                return;
            }
            mesh::mesh_chunk(&chunk, &self.catalog, self)
        };
        handle.write().set_mesh(built);
    }

    /// Cast a ray through the world and report the first solid voxel it hits.
    pub fn raycast(
        &self,
        origin: glam::Vec3,
        direction: glam::Vec3,
        max_distance: f32,
    ) -> Option<crate::raycast::RaycastHit> {
        crate::raycast::cast(self, origin, direction, max_distance)
    }

    /// World coordinate corresponding to a chunk's (0, 0, 0) local corner.
    pub fn chunk_origin(&self, coord: ChunkCoord) -> (i32, i32) {
        (
            chunk_local_to_world(coord.x, 0, self.config.chunk_width),
            chunk_local_to_world(coord.z, 0, self.config.chunk_width),
        )
    }
}

impl VoxelSource for World {
    fn voxel_at(&self, wx: i32, wy: i32, wz: i32) -> BlockId {
        World::voxel_at(self, wx, wy, wz)
    }

    fn is_solid_at(&self, wx: i32, wy: i32, wz: i32) -> bool {
        World::is_solid_at(self, wx, wy, wz)
    }

    fn is_transparent_at(&self, wx: i32, wy: i32, wz: i32) -> bool {
        World::is_transparent_at(self, wx, wy, wz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_world() -> World {
        let mut cfg = WorldConfig::default();
        cfg.chunk_width = 8;
        cfg.chunk_height = 32;
        World::new(cfg)
    }

    #[test]
    fn unpopulated_read_is_silent_air() {
        let world = test_world();
        assert_eq!(world.voxel_at(0, 0, 0), BLOCK_AIR);
        assert!(!world.is_solid_at(0, 0, 0));
    }

    #[test]
    fn out_of_vertical_range_is_open_sky() {
        let world = test_world();
        assert_eq!(world.voxel_at(0, -1, 0), BLOCK_AIR);
        assert!(!world.is_solid_at(0, 100_000, 0));
        assert!(world.is_transparent_at(0, -5, 0));
    }

    #[test]
    fn ensure_chunk_populates_and_set_voxel_round_trips() {
        let world = test_world();
        let (_, _writes) = world.ensure_chunk(ChunkCoord::new(0, 0));
        world.set_voxel(3, 1, 3, 42);
        assert_eq!(world.voxel_at(3, 1, 3), 42);
    }

    #[test]
    fn set_voxel_populates_the_target_chunk_on_demand() {
        let world = test_world();
        // No ensure_chunk call first: set_voxel triggers population itself
        // for a chunk far from the origin.
        world.set_voxel(1000, 1, 1000, 42);
        assert_eq!(world.voxel_at(1000, 1, 1000), 42);
    }

    #[test]
    fn set_voxel_outside_vertical_range_is_ignored() {
        let world = test_world();
        world.set_voxel(0, -1, 0, 42);
        world.set_voxel(0, 1000, 0, 42);
        assert_eq!(world.voxel_at(0, -1, 0), BLOCK_AIR);
    }

    #[test]
    fn set_voxel_outside_finite_world_bound_is_ignored() {
        let mut cfg = WorldConfig::default();
        cfg.chunk_width = 8;
        cfg.chunk_height = 32;
        cfg.world_width = 2; // chunks x,z in [-1, 1]
        let world = World::new(cfg);
        world.set_voxel(1000, 1, 1000, 42);
        assert_eq!(world.voxel_at(1000, 1, 1000), BLOCK_AIR);
        assert!(world.get_chunk(ChunkCoord::new(125, 125)).is_none());
    }
}
