//! Decoration pass: tree placement, possibly spilling across chunk boundaries.

use super::BlockIds;
use crate::chunk::{
    chunk_local_to_world, world_to_chunk_local, Chunk, ChunkCoord, LocalCoord, BLOCK_AIR,
};
use crate::noise::NoiseService;
use crate::world::PendingWrite;
use rand::Rng;
use voxen_core::WorldConfig;

pub(crate) fn decorate(
    chunk: &mut Chunk,
    noise: &NoiseService,
    config: &WorldConfig,
    ids: &BlockIds,
    world_seed: u64,
) -> Vec<PendingWrite> {
    let dims = chunk.dims();
    let coord = chunk.coord();
    let mut writes = Vec::new();

    for x in 0..dims.width {
        for z in 0..dims.width {
            let Some(h) = topmost_grass(chunk, x, z) else {
                continue;
            };
            let wx = chunk_local_to_world(coord.x, x, dims.width);
            let wz = chunk_local_to_world(coord.z, z, dims.width);

            let zone = noise.noise2(
                wx as f64 + config.tree.zone_offset,
                wz as f64 + config.tree.zone_offset,
                config.tree.zone_freq,
            );
            if zone <= config.tree.zone_threshold {
                continue;
            }
            let placement = noise.noise2(
                wx as f64 + config.tree.placement_offset,
                wz as f64 + config.tree.placement_offset,
                config.tree.placement_freq,
            );
            if placement <= config.tree.placement_threshold {
                continue;
            }

            let position_hash = position_hash(wx, wz);
            let mut rng = voxen_core::scoped_rng(world_seed, position_hash);
            let trunk_height = rng.gen_range(config.tree.min_height..config.tree.max_height);

            plant_tree(chunk, &mut writes, coord, dims, x, h, z, trunk_height, ids);
        }
    }

    writes
}

fn topmost_grass(chunk: &Chunk, x: u32, z: u32) -> Option<u32> {
    let dims = chunk.dims();
    for y in (0..dims.height).rev() {
        let id = chunk.get_local(LocalCoord::new(x, y, z));
        if id != BLOCK_AIR {
            return Some(y);
        }
    }
    None
}

fn position_hash(wx: i32, wz: i32) -> u64 {
    let ux = wx as i64 as u64;
    let uz = wz as i64 as u64;
    ux.wrapping_mul(0x1000_0001).wrapping_add(uz)
}

#[allow(clippy::too_many_arguments)]
fn plant_tree(
    chunk: &mut Chunk,
    writes: &mut Vec<PendingWrite>,
    coord: ChunkCoord,
    dims: crate::chunk::ChunkDims,
    x: u32,
    h: u32,
    z: u32,
    trunk_height: u32,
    ids: &BlockIds,
) {
    let grass = chunk.get_local(LocalCoord::new(x, h, z));
    debug_assert_eq!(grass, ids.grass);

    let top = h + trunk_height;
    if top >= dims.height {
        return; // trunk would poke through the world ceiling; skip this tree
    }

    for dy in 1..=trunk_height {
        chunk.set_local_if_air(LocalCoord::new(x, h + dy, z), ids.log);
    }

    let base = top.saturating_sub(3); // ΔY=0 sits at trunk_top - 3
    for delta_y in 0..=3u32 {
        let y = base + delta_y;
        if y >= dims.height {
            continue;
        }
        for (dx, dz) in canopy_offsets(delta_y) {
            place_leaf(chunk, writes, coord, dims, x, z, y, dx, dz, ids);
        }
    }
}

/// Offsets relative to the trunk column for one canopy layer.
fn canopy_offsets(delta_y: u32) -> Vec<(i32, i32)> {
    match delta_y {
        0 | 1 => square_ring(2),
        2 => square_ring(1),
        _ => vec![(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1)],
    }
}

fn square_ring(radius: i32) -> Vec<(i32, i32)> {
    let mut offsets = Vec::new();
    for dx in -radius..=radius {
        for dz in -radius..=radius {
            if dx == 0 && dz == 0 {
                continue;
            }
            offsets.push((dx, dz));
        }
    }
    offsets
}

#[allow(clippy::too_many_arguments)]
fn place_leaf(
    chunk: &mut Chunk,
    writes: &mut Vec<PendingWrite>,
    coord: ChunkCoord,
    dims: crate::chunk::ChunkDims,
    x: u32,
    z: u32,
    y: u32,
    dx: i32,
    dz: i32,
    ids: &BlockIds,
) {
    let wx = chunk_local_to_world(coord.x, x, dims.width) + dx;
    let wz = chunk_local_to_world(coord.z, z, dims.width) + dz;
    let (target_cx, local_x) = world_to_chunk_local(wx, dims.width);
    let (target_cz, local_z) = world_to_chunk_local(wz, dims.width);
    let target = ChunkCoord::new(target_cx, target_cz);

    if target == coord {
        chunk.set_local_if_air(LocalCoord::new(local_x, y, local_z), ids.leaves);
    } else {
        writes.push(PendingWrite {
            coord: target,
            local: LocalCoord::new(local_x, y, local_z),
            id: ids.leaves,
        });
    }
}
