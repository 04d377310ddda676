use crate::error::VoxenError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

const DEFAULT_CONFIG_PATH: &str = "config/world.toml";

/// A single ore lode specification, driving the Generator's ore-lode pass.
///
/// Mirrors the `Lode` struct from the original source (`include/lodes.h`):
/// name, target block, noise shape (frequency/threshold/offset), and the
/// vertical band it is allowed to spawn in.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LodeConfig {
    /// Human-readable identifier, used only for logging/debugging.
    pub name: String,
    /// Block id this lode replaces STONE with.
    pub block: u16,
    /// Noise frequency.
    pub freq: f64,
    /// Noise threshold above which the lode occupies a cell.
    pub threshold: f64,
    /// Per-lode coordinate offset, decorrelating lodes sampled from the same noise field.
    pub offset: f64,
    /// Minimum world Y (inclusive).
    pub min_y: i32,
    /// Maximum world Y (inclusive).
    pub max_y: i32,
}

/// Tree decoration gates and height range.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TreeConfig {
    /// Zone-gate noise frequency.
    pub zone_freq: f64,
    /// Zone-gate noise threshold.
    pub zone_threshold: f64,
    /// Zone-gate coordinate offset.
    pub zone_offset: f64,
    /// Placement-gate noise frequency.
    pub placement_freq: f64,
    /// Placement-gate noise threshold.
    pub placement_threshold: f64,
    /// Placement-gate coordinate offset.
    pub placement_offset: f64,
    /// Minimum trunk height (inclusive).
    pub min_height: u32,
    /// Maximum trunk height (exclusive).
    pub max_height: u32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            zone_freq: 0.01,
            zone_threshold: 0.55,
            zone_offset: 1000.0,
            placement_freq: 0.7,
            placement_threshold: 0.85,
            placement_offset: 2000.0,
            min_height: 4,
            max_height: 7,
        }
    }
}

/// All world-generation and streaming configuration keys, with their defaults.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Horizontal extent of a chunk.
    pub chunk_width: u32,
    /// Vertical extent of a chunk.
    pub chunk_height: u32,
    /// Square world bound in chunks; 0 means infinite (bounds check disabled).
    pub world_width: u32,
    /// Mesh radius in chunks.
    pub render_distance: i32,
    /// Noise seed.
    pub seed: u64,
    /// Terrain height-map noise frequency.
    pub biome_freq: f64,
    /// Terrain base height.
    pub terrain_base: i32,
    /// Terrain height amplitude.
    pub terrain_amp: i32,
    /// Large-scale cave noise frequency.
    pub cave_large_freq: f64,
    /// Medium-scale cave noise frequency.
    pub cave_medium_freq: f64,
    /// Small-scale cave noise frequency.
    pub cave_small_freq: f64,
    /// Cave carve threshold.
    pub cave_threshold: f64,
    /// Ore lode table.
    pub lodes: Vec<LodeConfig>,
    /// Tree decoration gates.
    pub tree: TreeConfig,
    /// Streaming mesh throughput per tick.
    pub mesh_budget_per_tick: usize,
    /// Water fill level (world Y); cells at or below become WATER if air.
    pub water_level: i32,
    /// Sand level (world Y); topmost solid at or below this height becomes SAND.
    pub sand_level: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_width: 16,
            chunk_height: 128,
            world_width: 0,
            render_distance: 8,
            seed: 1234,
            biome_freq: 0.02,
            terrain_base: 32,
            terrain_amp: 52,
            cave_large_freq: 0.02,
            cave_medium_freq: 0.05,
            cave_small_freq: 0.1,
            cave_threshold: 0.6,
            lodes: default_lodes(),
            tree: TreeConfig::default(),
            mesh_budget_per_tick: 2,
            water_level: 24,
            sand_level: 26,
        }
    }
}

fn default_lodes() -> Vec<LodeConfig> {
    vec![
        LodeConfig {
            name: "coal".into(),
            block: 11,
            freq: 0.08,
            threshold: 0.72,
            offset: 0.0,
            min_y: 0,
            max_y: 120,
        },
        LodeConfig {
            name: "iron".into(),
            block: 12,
            freq: 0.09,
            threshold: 0.78,
            offset: 500.0,
            min_y: 0,
            max_y: 64,
        },
        LodeConfig {
            name: "gold".into(),
            block: 13,
            freq: 0.1,
            threshold: 0.82,
            offset: 1500.0,
            min_y: 0,
            max_y: 32,
        },
        LodeConfig {
            name: "diamond".into(),
            block: 14,
            freq: 0.12,
            threshold: 0.88,
            offset: 2500.0,
            min_y: 0,
            max_y: 16,
        },
    ]
}

impl WorldConfig {
    /// Load config from the default path, falling back to defaults on any error.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load config from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<WorldConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    WorldConfig::default()
                }
            },
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound {
                    warn!("World config not found at {}. Using defaults", path.display());
                } else {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                WorldConfig::default()
            }
        }
    }

    /// Validate internal consistency. Called once at startup; a failure is fatal.
    pub fn validate(&self) -> Result<(), VoxenError> {
        if self.chunk_width == 0 || self.chunk_height == 0 {
            return Err(VoxenError::ConfigInvalid(
                "chunk_width and chunk_height must be positive".into(),
            ));
        }
        if self.terrain_base + self.terrain_amp > self.chunk_height as i32 {
            return Err(VoxenError::ConfigInvalid(format!(
                "terrain_base ({}) + terrain_amp ({}) exceeds chunk_height ({})",
                self.terrain_base, self.terrain_amp, self.chunk_height
            )));
        }
        if self.terrain_base < 0 {
            return Err(VoxenError::ConfigInvalid(
                "terrain_base must be non-negative".into(),
            ));
        }
        if self.mesh_budget_per_tick == 0 {
            return Err(VoxenError::ConfigInvalid(
                "mesh_budget_per_tick must be at least 1".into(),
            ));
        }
        for lode in &self.lodes {
            if lode.min_y > lode.max_y {
                return Err(VoxenError::ConfigInvalid(format!(
                    "lode {} has min_y > max_y",
                    lode.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(WorldConfig::default().validate().is_ok());
    }

    #[test]
    fn terrain_exceeding_chunk_height_is_invalid() {
        let mut cfg = WorldConfig::default();
        cfg.terrain_base = 100;
        cfg.terrain_amp = 100;
        cfg.chunk_height = 128;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let cfg = WorldConfig::load_from_path(Path::new("/nonexistent/path/world.toml"));
        assert_eq!(cfg, WorldConfig::default());
    }

    #[test]
    fn malformed_toml_falls_back_to_default() {
        let dir = std::env::temp_dir().join(format!(
            "voxen_config_test_{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "not valid = [ toml").unwrap();
        let cfg = WorldConfig::load_from_path(&path);
        assert_eq!(cfg, WorldConfig::default());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
