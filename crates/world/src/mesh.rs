//! Greedy face-culling mesher: converts chunk voxel occupancy into triangle geometry.

use crate::catalog::{BlockCatalog, Face};
use crate::chunk::{BlockId, Chunk, ChunkDims, BLOCK_AIR};

/// Anything the mesher can query for solidity/transparency/identity across a
/// chunk boundary. `World` implements this; unit tests use small stand-ins.
///
/// Keeping this a trait (rather than handing the mesher a `&World`) avoids a
/// back-reference from `Chunk`/mesh code into `World`.
pub trait VoxelSource {
    /// Resolve the voxel id at a world-space coordinate.
    fn voxel_at(&self, wx: i32, wy: i32, wz: i32) -> BlockId;
    /// Resolve solidity at a world-space coordinate, including boundary policy.
    fn is_solid_at(&self, wx: i32, wy: i32, wz: i32) -> bool;
    /// Resolve transparency at a world-space coordinate, including boundary policy.
    fn is_transparent_at(&self, wx: i32, wy: i32, wz: i32) -> bool;
}

/// Packed vertex layout produced by the mesher, ready for GPU upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Position in chunk-local coordinates.
    pub position: [f32; 3],
    /// Face normal (unit length, axis-aligned).
    pub normal: [f32; 3],
    /// UV coordinates within the merged quad (`0..w`, `0..h`).
    pub uv: [f32; 2],
    /// Texture atlas index for this face.
    pub texture: u32,
}

/// One stream of mesh geometry (either the opaque or the transparent pass).
#[derive(Debug, Clone, Default)]
pub struct MeshBuffers {
    /// Vertex buffer.
    pub vertices: Vec<MeshVertex>,
    /// Triangle-list index buffer.
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    fn push_quad(&mut self, texture: u32, normal: [f32; 3], corners: [[f32; 3]; 4], uv_w: f32, uv_h: f32, positive: bool) {
        let base = self.vertices.len() as u32;
        let uvs = [[0.0, 0.0], [uv_w, 0.0], [uv_w, uv_h], [0.0, uv_h]];
        for (corner, uv) in corners.into_iter().zip(uvs) {
            self.vertices.push(MeshVertex {
                position: corner,
                normal,
                uv,
                texture,
            });
        }
        // Front-face-outward winding: flip the triangle order for negative faces.
        let indices = if positive {
            [0, 1, 2, 0, 2, 3]
        } else {
            [0, 2, 1, 0, 3, 2]
        };
        for idx in indices {
            self.indices.push(base + idx);
        }
    }

    /// Number of emitted quads (two triangles each).
    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }
}

/// The opaque and transparent vertex streams produced for a single chunk.
#[derive(Debug, Clone, Default)]
pub struct ChunkMesh {
    /// Opaque-pass geometry.
    pub opaque: MeshBuffers,
    /// Transparent-pass geometry (water, glass, leaves, ...).
    pub transparent: MeshBuffers,
}

impl ChunkMesh {
    /// An empty mesh, used for freshly-allocated chunks.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Chunk-local origin of the mesh's coordinate system, matching `Chunk::set_local`'s
/// `[0, CW) x [0, CH) x [0, CW)` convention: world y equals local y directly.
fn chunk_origin(coord: crate::chunk::ChunkCoord, chunk_width: u32) -> (i32, i32) {
    (coord.x * chunk_width as i32, coord.z * chunk_width as i32)
}

/// Whether `x`'s face toward a neighbour with the given (solid, transparent, id)
/// properties should be drawn: a neighbour occludes unless it is non-solid,
/// or it is transparent with a different block id than `x`.
fn face_visible(x_id: BlockId, neighbor_solid: bool, neighbor_transparent: bool, neighbor_id: BlockId) -> bool {
    !neighbor_solid || (neighbor_transparent && neighbor_id != x_id)
}

/// Generate greedy-meshed opaque + transparent buffers for `chunk`.
///
/// Precondition: `chunk.is_populated()`. Cross-boundary neighbour queries go
/// through `source` (typically the owning `World`).
pub fn mesh_chunk(chunk: &Chunk, catalog: &BlockCatalog, source: &dyn VoxelSource) -> ChunkMesh {
    debug_assert!(chunk.is_populated(), "mesh() precondition: chunk must be populated");

    let dims = chunk.dims();
    let (ox, oz) = chunk_origin(chunk.coord(), dims.width);
    let mut mesh = ChunkMesh::empty();

    for face in Face::ALL {
        mesh_face(chunk, catalog, source, dims, ox, oz, face, &mut mesh);
    }

    mesh
}

fn axis_of(face: Face) -> usize {
    match face {
        Face::NegX | Face::PosX => 0,
        Face::NegY | Face::PosY => 1,
        Face::NegZ | Face::PosZ => 2,
    }
}

fn dir_of(face: Face) -> i32 {
    match face {
        Face::PosX | Face::PosY | Face::PosZ => 1,
        Face::NegX | Face::NegY | Face::NegZ => -1,
    }
}

fn axis_size(dims: ChunkDims, axis: usize) -> u32 {
    if axis == 1 {
        dims.height
    } else {
        dims.width
    }
}

#[allow(clippy::too_many_arguments)]
fn mesh_face(
    chunk: &Chunk,
    catalog: &BlockCatalog,
    source: &dyn VoxelSource,
    dims: ChunkDims,
    ox: i32,
    oz: i32,
    face: Face,
    mesh: &mut ChunkMesh,
) {
    let axis = axis_of(face);
    let dir = dir_of(face);
    let u_axis = (axis + 1) % 3;
    let v_axis = (axis + 2) % 3;

    let size_axis = axis_size(dims, axis);
    let size_u = axis_size(dims, u_axis);
    let size_v = axis_size(dims, v_axis);

    let mut mask: Vec<Option<BlockId>> = vec![None; size_u as usize * size_v as usize];

    for slice in 0..size_axis {
        for v in 0..size_v {
            for u in 0..size_u {
                let mut local = [0u32; 3];
                local[axis] = slice;
                local[u_axis] = u;
                local[v_axis] = v;
                let pos = crate::chunk::LocalCoord::new(local[0], local[1], local[2]);
                let voxel_id = chunk.get_local(pos);

                let idx = (v * size_u + u) as usize;
                if catalog.air(voxel_id) {
                    mask[idx] = None;
                    continue;
                }

                let mut nlocal = [local[0] as i32, local[1] as i32, local[2] as i32];
                nlocal[axis] += dir;

                let (neighbor_solid, neighbor_transparent, neighbor_id) =
                    if nlocal[axis] >= 0 && (nlocal[axis] as u32) < size_axis {
                        let npos = crate::chunk::LocalCoord::new(
                            nlocal[0] as u32,
                            nlocal[1] as u32,
                            nlocal[2] as u32,
                        );
                        let nid = chunk.get_local(npos);
                        (catalog.solid(nid), catalog.transparent(nid), nid)
                    } else {
                        let wx = ox + nlocal[0];
                        let wy = nlocal[1];
                        let wz = oz + nlocal[2];
                        (
                            source.is_solid_at(wx, wy, wz),
                            source.is_transparent_at(wx, wy, wz),
                            source.voxel_at(wx, wy, wz),
                        )
                    };

                mask[idx] = if face_visible(voxel_id, neighbor_solid, neighbor_transparent, neighbor_id) {
                    Some(voxel_id)
                } else {
                    None
                };
            }
        }

        greedy_sweep_and_emit(
            &mut mask, size_u, size_v, axis, u_axis, v_axis, slice, dir, catalog, mesh,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn greedy_sweep_and_emit(
    mask: &mut [Option<BlockId>],
    size_u: u32,
    size_v: u32,
    axis: usize,
    u_axis: usize,
    v_axis: usize,
    slice: u32,
    dir: i32,
    catalog: &BlockCatalog,
    mesh: &mut ChunkMesh,
) {
    let mut v = 0u32;
    while v < size_v {
        let mut u = 0u32;
        while u < size_u {
            let idx = (v * size_u + u) as usize;
            if let Some(block_id) = mask[idx] {
                let mut w = 1u32;
                while u + w < size_u && mask[(v * size_u + u + w) as usize] == Some(block_id) {
                    w += 1;
                }

                let mut h = 1u32;
                'grow: while v + h < size_v {
                    for k in 0..w {
                        if mask[((v + h) * size_u + u + k) as usize] != Some(block_id) {
                            break 'grow;
                        }
                    }
                    h += 1;
                }

                emit_quad(axis, u_axis, v_axis, slice, u, v, w, h, dir, block_id, catalog, mesh);

                for dv in 0..h {
                    for du in 0..w {
                        mask[((v + dv) * size_u + u + du) as usize] = None;
                    }
                }
                u += w;
            } else {
                u += 1;
            }
        }
        v += 1;
    }
}

#[allow(clippy::too_many_arguments)]
fn emit_quad(
    axis: usize,
    u_axis: usize,
    v_axis: usize,
    slice: u32,
    u: u32,
    v: u32,
    w: u32,
    h: u32,
    dir: i32,
    block_id: BlockId,
    catalog: &BlockCatalog,
    mesh: &mut ChunkMesh,
) {
    let mut origin = [0f32; 3];
    origin[axis] = slice as f32 + if dir > 0 { 1.0 } else { 0.0 };
    origin[u_axis] = u as f32;
    origin[v_axis] = v as f32;

    let mut du = [0f32; 3];
    du[u_axis] = w as f32;
    let mut dv = [0f32; 3];
    dv[v_axis] = h as f32;

    let add = |a: [f32; 3], b: [f32; 3]| [a[0] + b[0], a[1] + b[1], a[2] + b[2]];
    let v0 = origin;
    let v1 = add(origin, du);
    let v2 = add(add(origin, du), dv);
    let v3 = add(origin, dv);

    let mut normal = [0f32; 3];
    normal[axis] = dir as f32;

    let face = face_for(axis, dir);
    let texture = catalog.texture_of_face(block_id, face);
    let positive = dir > 0;
    let stream = if catalog.transparent(block_id) {
        &mut mesh.transparent
    } else {
        &mut mesh.opaque
    };
    stream.push_quad(texture, normal, [v0, v1, v2, v3], w as f32, h as f32, positive);
}

fn face_for(axis: usize, dir: i32) -> Face {
    match (axis, dir > 0) {
        (0, false) => Face::NegX,
        (0, true) => Face::PosX,
        (1, false) => Face::NegY,
        (1, true) => Face::PosY,
        (2, false) => Face::NegZ,
        (2, true) => Face::PosZ,
        _ => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{ChunkCoord, LocalCoord};

    struct AirSource;
    impl VoxelSource for AirSource {
        fn voxel_at(&self, _wx: i32, _wy: i32, _wz: i32) -> BlockId {
            BLOCK_AIR
        }
        fn is_solid_at(&self, _wx: i32, _wy: i32, _wz: i32) -> bool {
            false
        }
        fn is_transparent_at(&self, _wx: i32, _wy: i32, _wz: i32) -> bool {
            true
        }
    }

    fn dims4() -> ChunkDims {
        ChunkDims { width: 4, height: 4 }
    }

    // S1 Flat world, greedy: CW=4, CH=4, only y=0 is STONE. Expect 5 quads:
    // one 4x4 top, one 4x4 bottom, four 4x1 sides.
    #[test]
    fn flat_slab_produces_five_greedy_quads() {
        let catalog = BlockCatalog::standard();
        let stone = catalog.id_by_name("stone").unwrap();
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), dims4());
        chunk.mark_populated();
        for x in 0..4 {
            for z in 0..4 {
                chunk.set_local(LocalCoord::new(x, 0, z), stone);
            }
        }
        let mesh = mesh_chunk(&chunk, &catalog, &AirSource);
        assert_eq!(mesh.opaque.quad_count(), 5);
        assert!(mesh.transparent.quad_count() == 0);
    }

    #[test]
    fn fully_enclosed_voxel_emits_no_faces() {
        let catalog = BlockCatalog::standard();
        let stone = catalog.id_by_name("stone").unwrap();
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), dims4());
        chunk.mark_populated();
        // Fill the whole chunk solid: every voxel's neighbours are all solid
        // except at the true chunk boundary, where AirSource reports air.
        // To truly test "no faces for fully enclosed", we instead fill with a
        // 3x3x3 solid block centered so every face neighbour is also solid.
        for x in 1..3 {
            for y in 1..3 {
                for z in 1..3 {
                    chunk.set_local(LocalCoord::new(x, y, z), stone);
                }
            }
        }
        let mesh = mesh_chunk(&chunk, &catalog, &AirSource);
        // The 2x2x2 solid cube still has all faces exposed to air around it.
        assert!(mesh.opaque.quad_count() > 0);

        // Now fill the whole 4x4x4 chunk solid: only the outer boundary faces
        // (which see AirSource's "air") should render, no internal faces.
        let mut chunk2 = Chunk::new(ChunkCoord::new(0, 0), dims4());
        chunk2.mark_populated();
        for x in 0..4 {
            for y in 0..4 {
                for z in 0..4 {
                    chunk2.set_local(LocalCoord::new(x, y, z), stone);
                }
            }
        }
        let mesh2 = mesh_chunk(&chunk2, &catalog, &AirSource);
        // 6 faces of a 4x4x4 cube, each greedily merged to one quad.
        assert_eq!(mesh2.opaque.quad_count(), 6);
    }

    #[test]
    fn same_id_transparent_neighbours_cull_different_ids_do_not() {
        let catalog = BlockCatalog::standard();
        let water = catalog.id_by_name("water").unwrap();
        let glass = catalog.id_by_name("glass").unwrap();

        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), dims4());
        chunk.mark_populated();
        chunk.set_local(LocalCoord::new(0, 0, 0), water);
        chunk.set_local(LocalCoord::new(1, 0, 0), water);
        let mesh = mesh_chunk(&chunk, &catalog, &AirSource);
        // Between two adjacent water voxels (same id) the shared face is culled
        // on both sides; only the outward-facing faces remain.
        let water_faces_between = mesh.transparent.quad_count();

        let mut chunk2 = Chunk::new(ChunkCoord::new(0, 0), dims4());
        chunk2.mark_populated();
        chunk2.set_local(LocalCoord::new(0, 0, 0), water);
        chunk2.set_local(LocalCoord::new(1, 0, 0), glass);
        let mesh2 = mesh_chunk(&chunk2, &catalog, &AirSource);
        let mixed_faces = mesh2.transparent.quad_count();

        assert!(mixed_faces > water_faces_between);
    }
}
