//! Cave pass: composite-noise carving.

use super::BlockIds;
use crate::chunk::{chunk_local_to_world, Chunk, LocalCoord, BLOCK_AIR};
use crate::noise::NoiseService;
use voxen_core::WorldConfig;

pub(crate) fn carve(chunk: &mut Chunk, noise: &NoiseService, config: &WorldConfig, ids: &BlockIds) {
    let dims = chunk.dims();
    let coord = chunk.coord();

    for x in 0..dims.width {
        for z in 0..dims.width {
            let wx = chunk_local_to_world(coord.x, x, dims.width);
            let wz = chunk_local_to_world(coord.z, z, dims.width);

            for y in 1..dims.height.saturating_sub(1) {
                let pos = LocalCoord::new(x, y, z);
                let current = chunk.get_local(pos);
                if current == BLOCK_AIR || current == ids.bedrock {
                    continue;
                }
                let n = noise.cave_noise(
                    wx as f64,
                    y as f64,
                    wz as f64,
                    config.cave_large_freq,
                    config.cave_medium_freq,
                    config.cave_small_freq,
                );
                if n > config.cave_threshold {
                    chunk.set_local_raw(pos, BLOCK_AIR);
                }
            }
        }
    }
}
