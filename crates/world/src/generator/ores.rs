//! Ore-lode pass: noise-gated replacement of stone.

use crate::chunk::{chunk_local_to_world, BlockId, Chunk, LocalCoord};
use crate::noise::NoiseService;
use voxen_core::WorldConfig;

pub(crate) fn fill(chunk: &mut Chunk, noise: &NoiseService, config: &WorldConfig, stone: BlockId) {
    let dims = chunk.dims();
    let coord = chunk.coord();

    // Snapshot which cells were STONE before any lode runs: lodes gate on
    // "the original voxel is STONE", not on what the previous lode left
    // behind, so a later lode can still overwrite an earlier lode's deposit
    // on the same cell.
    let mut was_stone = vec![false; dims.volume()];
    for x in 0..dims.width {
        for y in 0..dims.height {
            for z in 0..dims.width {
                let pos = LocalCoord::new(x, y, z);
                was_stone[cell_index(pos, dims)] = chunk.get_local(pos) == stone;
            }
        }
    }

    for lode in &config.lodes {
        let min_y = lode.min_y.max(0) as u32;
        let max_y = (lode.max_y.max(0) as u32).min(dims.height.saturating_sub(1));
        if min_y > max_y {
            continue;
        }
        for x in 0..dims.width {
            for z in 0..dims.width {
                let wx = chunk_local_to_world(coord.x, x, dims.width);
                let wz = chunk_local_to_world(coord.z, z, dims.width);
                for y in min_y..=max_y {
                    let pos = LocalCoord::new(x, y, z);
                    if !was_stone[cell_index(pos, dims)] {
                        continue;
                    }
                    let n = noise.noise3(wx as f64 + lode.offset, y as f64, wz as f64 + lode.offset, lode.freq);
                    if n > lode.threshold {
                        chunk.set_local_raw(pos, lode.block);
                    }
                }
            }
        }
    }
}

fn cell_index(pos: LocalCoord, dims: crate::chunk::ChunkDims) -> usize {
    (pos.y as usize * dims.width as usize + pos.z as usize) * dims.width as usize + pos.x as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BlockCatalog;
    use crate::chunk::{ChunkCoord, ChunkDims};
    use voxen_core::LodeConfig;

    fn stone_chunk(dims: ChunkDims) -> Chunk {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), dims);
        for x in 0..dims.width {
            for y in 0..dims.height {
                for z in 0..dims.width {
                    chunk.set_local_raw(LocalCoord::new(x, y, z), 1); // stone id in standard catalog
                }
            }
        }
        chunk
    }

    #[test]
    fn lode_with_impossible_threshold_never_fires() {
        let catalog = BlockCatalog::standard();
        let stone = catalog.id_by_name("stone").unwrap();
        let noise = NoiseService::new(5);
        let mut config = WorldConfig::default();
        config.lodes = vec![LodeConfig {
            name: "coal".into(),
            block: catalog.id_by_name("coal_ore").unwrap(),
            freq: 0.1,
            threshold: 2.0,
            offset: 0.0,
            min_y: 0,
            max_y: 10,
        }];
        let dims = ChunkDims { width: 4, height: 16 };
        let mut chunk = stone_chunk(dims);
        fill(&mut chunk, &noise, &config, stone);
        for x in 0..4 {
            for z in 0..4 {
                assert_eq!(chunk.get_local(LocalCoord::new(x, 3, z)), stone);
            }
        }
    }

    #[test]
    fn later_lode_overwrites_earlier_on_same_cell() {
        let catalog = BlockCatalog::standard();
        let stone = catalog.id_by_name("stone").unwrap();
        let coal = catalog.id_by_name("coal_ore").unwrap();
        let iron = catalog.id_by_name("iron_ore").unwrap();
        let noise = NoiseService::new(5);
        let mut config = WorldConfig::default();
        config.lodes = vec![
            LodeConfig {
                name: "coal".into(),
                block: coal,
                freq: 0.1,
                threshold: -1.0, // always fires
                offset: 0.0,
                min_y: 0,
                max_y: 10,
            },
            LodeConfig {
                name: "iron".into(),
                block: iron,
                freq: 0.1,
                threshold: -1.0, // always fires, processed after coal
                offset: 0.0,
                min_y: 0,
                max_y: 10,
            },
        ];
        let dims = ChunkDims { width: 2, height: 16 };
        let mut chunk = stone_chunk(dims);
        fill(&mut chunk, &noise, &config, stone);
        assert_eq!(chunk.get_local(LocalCoord::new(0, 3, 0)), iron);
    }
}
