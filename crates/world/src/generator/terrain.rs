//! Terrain pass: height-map column fill.

use super::BlockIds;
use crate::chunk::{chunk_local_to_world, BlockId, Chunk, LocalCoord, BLOCK_AIR};
use crate::noise::NoiseService;
use voxen_core::WorldConfig;

/// Surface height at a world column, per the height-map formula.
pub(crate) fn surface_height(noise: &NoiseService, config: &WorldConfig, wx: i32, wz: i32) -> i32 {
    let n = noise.noise2(wx as f64, wz as f64, config.biome_freq);
    (n * config.terrain_amp as f64 + config.terrain_base as f64).floor() as i32
}

pub(crate) fn populate(chunk: &mut Chunk, noise: &NoiseService, config: &WorldConfig, ids: &BlockIds) {
    let dims = chunk.dims();
    let coord = chunk.coord();

    for x in 0..dims.width {
        for z in 0..dims.width {
            let wx = chunk_local_to_world(coord.x, x, dims.width);
            let wz = chunk_local_to_world(coord.z, z, dims.width);
            let h = surface_height(noise, config, wx, wz);

            for y in 0..dims.height {
                let wy = y as i32;
                let mut block: BlockId = classify(wy, h, ids);

                if block == BLOCK_AIR && wy <= config.water_level {
                    block = ids.water;
                }
                if block == ids.grass && h <= config.sand_level {
                    block = ids.sand;
                }
                if wy == 0 {
                    block = ids.bedrock;
                }

                chunk.set_local_raw(LocalCoord::new(x, y, z), block);
            }
        }
    }
}

fn classify(wy: i32, h: i32, ids: &BlockIds) -> BlockId {
    if wy > h {
        BLOCK_AIR
    } else if wy == h {
        ids.grass
    } else if wy >= h - 4 {
        ids.dirt
    } else {
        ids.stone
    }
}
