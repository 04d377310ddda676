//! Chunk coordinates, local voxel addressing, and the `Chunk` voxel store.

use crate::mesh::ChunkMesh;
use bitflags::bitflags;
use std::fmt;

/// Block identifier referencing the [`crate::catalog::BlockCatalog`].
pub type BlockId = u16;

/// Reserved id for air.
pub const BLOCK_AIR: BlockId = 0;

/// Horizontal/vertical extent of a chunk, read from `WorldConfig` at startup
/// and threaded through every component that needs to index voxels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkDims {
    /// Horizontal extent (X and Z).
    pub width: u32,
    /// Vertical extent (Y).
    pub height: u32,
}

impl ChunkDims {
    /// Total voxel count per chunk.
    pub fn volume(self) -> usize {
        self.width as usize * self.height as usize * self.width as usize
    }
}

/// Chunk coordinate `(cx, cz)` identifying a column.
///
/// `Ord` is derived (sorting by x then z) so chunks can live in a
/// `BTreeMap` with deterministic iteration order, independent of insertion
/// order or thread scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// Chunk-space X.
    pub x: i32,
    /// Chunk-space Z.
    pub z: i32,
}

impl ChunkCoord {
    /// Construct a chunk coordinate.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Chunk-local voxel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalCoord {
    /// Local X, `0 <= x < CW`.
    pub x: u32,
    /// Local Y, `0 <= y < CH`.
    pub y: u32,
    /// Local Z, `0 <= z < CW`.
    pub z: u32,
}

impl LocalCoord {
    /// Construct a local coordinate.
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// True if this position is within `dims`.
    pub fn in_bounds(self, dims: ChunkDims) -> bool {
        self.x < dims.width && self.y < dims.height && self.z < dims.width
    }

    /// Row-major index into a flat `CW x CH x CW` array, laid out `[x][y][z]`
    /// by convention.
    fn index(self, dims: ChunkDims) -> usize {
        debug_assert!(self.in_bounds(dims));
        (self.y as usize * dims.width as usize + self.z as usize) * dims.width as usize
            + self.x as usize
    }
}

/// Convert a world coordinate to (chunk index, local index) using
/// floor-division semantics, so negative world coordinates wrap into the
/// *preceding* chunk rather than truncating toward zero.
pub fn world_to_chunk_local(w: i32, chunk_width: u32) -> (i32, u32) {
    let cw = chunk_width as i32;
    let chunk = w.div_euclid(cw);
    let local = w.rem_euclid(cw) as u32;
    (chunk, local)
}

/// Inverse of [`world_to_chunk_local`]: recover the world coordinate from a
/// chunk index and local offset.
pub fn chunk_local_to_world(chunk: i32, local: u32, chunk_width: u32) -> i32 {
    chunk * chunk_width as i32 + local as i32
}

bitflags! {
    /// Per-pass completion and mesh-dirtiness flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ChunkFlags: u8 {
        /// Terrain pass has filled `voxels`.
        const POPULATED = 0b0000_0001;
        /// Cave pass has run.
        const CARVED    = 0b0000_0010;
        /// Ore-lode pass has run.
        const ORE_FILLED = 0b0000_0100;
        /// Decoration pass has run.
        const DECORATED = 0b0000_1000;
        /// Voxels changed since the mesh was last built.
        const DIRTY     = 0b0001_0000;
    }
}

/// A fixed-size column of voxels: the unit of streaming and meshing.
pub struct Chunk {
    coord: ChunkCoord,
    dims: ChunkDims,
    voxels: Vec<BlockId>,
    flags: ChunkFlags,
    mesh: ChunkMesh,
}

impl Chunk {
    /// Allocate a fresh, all-AIR, unpopulated chunk.
    pub fn new(coord: ChunkCoord, dims: ChunkDims) -> Self {
        Self {
            coord,
            dims,
            voxels: vec![BLOCK_AIR; dims.volume()],
            flags: ChunkFlags::empty(),
            mesh: ChunkMesh::empty(),
        }
    }

    /// This chunk's coordinate.
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// This chunk's dimensions.
    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    /// True once the terrain pass has run.
    pub fn is_populated(&self) -> bool {
        self.flags.contains(ChunkFlags::POPULATED)
    }

    /// True once the cave pass has run.
    pub fn is_carved(&self) -> bool {
        self.flags.contains(ChunkFlags::CARVED)
    }

    /// True once the ore-lode pass has run.
    pub fn is_ore_filled(&self) -> bool {
        self.flags.contains(ChunkFlags::ORE_FILLED)
    }

    /// True once the decoration pass has run.
    pub fn is_decorated(&self) -> bool {
        self.flags.contains(ChunkFlags::DECORATED)
    }

    /// True when this chunk's mesh needs to be rebuilt before render.
    pub fn is_dirty(&self) -> bool {
        self.flags.contains(ChunkFlags::DIRTY)
    }

    pub(crate) fn mark_populated(&mut self) {
        self.flags.insert(ChunkFlags::POPULATED | ChunkFlags::DIRTY);
    }

    pub(crate) fn mark_carved(&mut self) {
        self.flags.insert(ChunkFlags::CARVED);
    }

    pub(crate) fn mark_ore_filled(&mut self) {
        self.flags.insert(ChunkFlags::ORE_FILLED);
    }

    pub(crate) fn mark_decorated(&mut self) {
        self.flags.insert(ChunkFlags::DECORATED);
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.flags.insert(ChunkFlags::DIRTY);
    }

    /// Read a local voxel. Out-of-range coordinates return AIR rather than failing.
    pub fn get_local(&self, pos: LocalCoord) -> BlockId {
        if !pos.in_bounds(self.dims) {
            return BLOCK_AIR;
        }
        self.voxels[pos.index(self.dims)]
    }

    /// Overwrite a local voxel and mark the chunk dirty if the value actually changed.
    ///
    /// Undefined (but not unsafe) if the chunk has not been populated; callers
    /// must ensure that via `World::ensure_chunk` first.
    pub fn set_local(&mut self, pos: LocalCoord, id: BlockId) {
        if !pos.in_bounds(self.dims) {
            return;
        }
        let idx = pos.index(self.dims);
        if self.voxels[idx] != id {
            self.voxels[idx] = id;
            self.mark_dirty();
        }
    }

    /// Set a local voxel only if it is currently AIR. Used by decoration so
    /// canopy writes never clobber existing blocks (trunks, other trees).
    pub(crate) fn set_local_if_air(&mut self, pos: LocalCoord, id: BlockId) {
        if !pos.in_bounds(self.dims) {
            return;
        }
        let idx = pos.index(self.dims);
        if self.voxels[idx] == BLOCK_AIR && id != BLOCK_AIR {
            self.voxels[idx] = id;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_local_raw(&mut self, pos: LocalCoord, id: BlockId) {
        if !pos.in_bounds(self.dims) {
            return;
        }
        let idx = pos.index(self.dims);
        self.voxels[idx] = id;
    }

    /// Access the current mesh (opaque to everything but the mesher/renderer).
    pub fn mesh(&self) -> &ChunkMesh {
        &self.mesh
    }

    pub(crate) fn set_mesh(&mut self, mesh: ChunkMesh) {
        self.mesh = mesh;
        self.flags.remove(ChunkFlags::DIRTY);
    }

    /// What a renderer collaborator needs to issue a draw call for this
    /// chunk: a world-space placement transform plus the opaque and
    /// transparent vertex/index streams.
    pub fn draw_call(&self) -> ChunkDrawData<'_> {
        let origin_x = chunk_local_to_world(self.coord.x, 0, self.dims.width);
        let origin_z = chunk_local_to_world(self.coord.z, 0, self.dims.width);
        ChunkDrawData {
            model_transform: glam::Mat4::from_translation(glam::Vec3::new(
                origin_x as f32,
                0.0,
                origin_z as f32,
            )),
            opaque: &self.mesh.opaque,
            transparent: &self.mesh.transparent,
        }
    }
}

/// Borrowed view of everything a renderer needs to draw one chunk.
pub struct ChunkDrawData<'a> {
    /// World-space placement transform for this chunk's local-space vertices.
    pub model_transform: glam::Mat4,
    /// Opaque-pass geometry.
    pub opaque: &'a crate::mesh::MeshBuffers,
    /// Transparent-pass geometry.
    pub transparent: &'a crate::mesh::MeshBuffers,
}
