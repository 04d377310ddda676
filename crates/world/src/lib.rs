#![warn(missing_docs)]
//! Chunked voxel storage, procedural generation, meshing, and streaming.

mod catalog;
mod chunk;
mod generator;
mod mesh;
mod noise;
mod raycast;
mod streaming;
mod world;

pub use catalog::{BlockCatalog, BlockKind, Face};
pub use chunk::{
    chunk_local_to_world, world_to_chunk_local, BlockId, Chunk, ChunkCoord, ChunkDrawData,
    ChunkDims, ChunkFlags, LocalCoord, BLOCK_AIR,
};
pub use generator::Generator;
pub use mesh::{mesh_chunk, ChunkMesh, MeshBuffers, MeshVertex, VoxelSource};
pub use noise::NoiseService;
pub use raycast::RaycastHit;
pub use streaming::{StreamingManager, TickReport};
pub use world::{PendingWrite, World};
