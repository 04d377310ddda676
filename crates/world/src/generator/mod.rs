//! The four monotone generation passes: terrain, caves, ores, trees.

mod caves;
mod ores;
mod terrain;
mod trees;

use crate::catalog::BlockCatalog;
use crate::chunk::{BlockId, Chunk};
use crate::noise::NoiseService;
use crate::world::PendingWrite;
use std::sync::Arc;
use voxen_core::WorldConfig;

/// The standard block ids the generation passes write, resolved once at
/// startup so passes never re-do name lookups per-voxel.
pub(crate) struct BlockIds {
    pub stone: BlockId,
    pub dirt: BlockId,
    pub grass: BlockId,
    pub sand: BlockId,
    pub water: BlockId,
    pub bedrock: BlockId,
    pub log: BlockId,
    pub leaves: BlockId,
}

impl BlockIds {
    fn resolve(catalog: &BlockCatalog) -> Self {
        let get = |name: &str| {
            catalog
                .id_by_name(name)
                .unwrap_or_else(|| panic!("standard catalog is missing required block '{name}'"))
        };
        Self {
            stone: get("stone"),
            dirt: get("dirt"),
            grass: get("grass"),
            sand: get("sand"),
            water: get("water"),
            bedrock: get("bedrock"),
            log: get("oak_log"),
            leaves: get("oak_leaves"),
        }
    }
}

/// Drives the terrain/cave/ore/decoration passes over a chunk.
pub struct Generator {
    noise: NoiseService,
    config: WorldConfig,
    catalog: Arc<BlockCatalog>,
    ids: BlockIds,
}

impl Generator {
    /// Construct a generator bound to one world's config, catalog, and seed.
    pub fn new(config: &WorldConfig, catalog: Arc<BlockCatalog>) -> Self {
        let ids = BlockIds::resolve(&catalog);
        Self {
            noise: NoiseService::new(config.seed),
            config: config.clone(),
            catalog,
            ids,
        }
    }

    /// Terrain pass: fill `chunk.voxels` from the height-map formula, then
    /// mark it populated. No-op if already populated.
    pub fn generate_terrain(&self, chunk: &mut Chunk) {
        if chunk.is_populated() {
            return;
        }
        terrain::populate(chunk, &self.noise, &self.config, &self.ids);
        chunk.mark_populated();
    }

    /// Cave pass: carve using the composite cave noise. No-op if already carved.
    pub fn carve_caves(&self, chunk: &mut Chunk) {
        if chunk.is_carved() {
            return;
        }
        caves::carve(chunk, &self.noise, &self.config, &self.ids);
        chunk.mark_carved();
    }

    /// Ore-lode pass: replace STONE per the configured lode table. No-op if
    /// already run.
    pub fn fill_ores(&self, chunk: &mut Chunk) {
        if chunk.is_ore_filled() {
            return;
        }
        ores::fill(chunk, &self.noise, &self.config, self.ids.stone);
        chunk.mark_ore_filled();
    }

    /// Decoration pass: plant trees on eligible grass columns, returning any
    /// writes that land in a neighbouring chunk. No-op if already decorated.
    pub fn decorate(&self, chunk: &mut Chunk) -> Vec<PendingWrite> {
        if chunk.is_decorated() {
            return Vec::new();
        }
        let writes = trees::decorate(chunk, &self.noise, &self.config, &self.ids, self.config.seed);
        chunk.mark_decorated();
        writes
    }

    /// The catalog this generator's passes assume.
    pub fn catalog(&self) -> &BlockCatalog {
        &self.catalog
    }
}
