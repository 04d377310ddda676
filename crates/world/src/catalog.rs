//! Block catalog: the fixed, read-only registry of block kinds.

use crate::chunk::BlockId;

/// One of the six axis-aligned face directions, used to index `face_textures`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    /// -X
    NegX,
    /// +X
    PosX,
    /// -Y
    NegY,
    /// +Y
    PosY,
    /// -Z
    NegZ,
    /// +Z
    PosZ,
}

impl Face {
    /// All six faces, in a stable order.
    pub const ALL: [Face; 6] = [
        Face::NegX,
        Face::PosX,
        Face::NegY,
        Face::PosY,
        Face::NegZ,
        Face::PosZ,
    ];

    fn index(self) -> usize {
        match self {
            Face::NegX => 0,
            Face::PosX => 1,
            Face::NegY => 2,
            Face::PosY => 3,
            Face::NegZ => 4,
            Face::PosZ => 5,
        }
    }
}

/// A catalog entry: name, per-face texture indices, and the three flags
/// that drive meshing/query policy.
#[derive(Debug, Clone)]
pub struct BlockKind {
    /// Debug/display name.
    pub name: String,
    /// Texture atlas index per face, indexed by [`Face`].
    pub face_textures: [u32; 6],
    /// Whether this block occludes neighbours and collides.
    pub solid: bool,
    /// Whether this block lets light/vision through for mesh-culling purposes.
    pub transparent: bool,
    /// Whether this block is air.
    pub air: bool,
}

impl BlockKind {
    fn new(name: &str, texture: u32, solid: bool, transparent: bool, air: bool) -> Self {
        debug_assert!(!air || (!solid && transparent), "air must be !solid && transparent");
        debug_assert!(!solid || !air, "solid must be !air");
        Self {
            name: name.to_string(),
            face_textures: [texture; 6],
            solid,
            transparent,
            air,
        }
    }
}

/// Fixed ordered registry of block kinds, indexed by [`BlockId`].
///
/// Initialised once at startup and read-only thereafter; its lifetime spans
/// the process (or, in tests, the scope of a single test).
#[derive(Debug, Clone)]
pub struct BlockCatalog {
    kinds: Vec<BlockKind>,
}

impl BlockCatalog {
    /// Build a catalog from an explicit, caller-ordered list of kinds.
    /// `BlockId(0)` must be air; enforced by a debug assertion.
    pub fn new(kinds: Vec<BlockKind>) -> Self {
        debug_assert!(kinds.first().map(|k| k.air).unwrap_or(false), "id 0 must be air");
        Self { kinds }
    }

    /// The standard block set this core's Generator and scenarios rely on:
    /// AIR, STONE, DIRT, GRASS, SAND, GRAVEL, WATER, SNOW, BEDROCK, OAK_LOG,
    /// OAK_LEAVES, COAL_ORE, IRON_ORE, GOLD_ORE, DIAMOND_ORE, GLASS.
    pub fn standard() -> Self {
        Self::new(vec![
            BlockKind::new("air", 0, false, true, true),
            BlockKind::new("stone", 1, true, false, false),
            BlockKind::new("dirt", 2, true, false, false),
            BlockKind::new("grass", 3, true, false, false),
            BlockKind::new("sand", 4, true, false, false),
            BlockKind::new("gravel", 5, true, false, false),
            // Transparent kinds are still `solid = true`: they occlude like any
            // other block unless the neighbour on the far side is air, or is
            // itself transparent with a *different* id.
            BlockKind::new("water", 6, true, true, false),
            BlockKind::new("snow", 7, true, false, false),
            BlockKind::new("bedrock", 8, true, false, false),
            BlockKind::new("oak_log", 9, true, false, false),
            BlockKind::new("oak_leaves", 10, true, true, false),
            BlockKind::new("coal_ore", 11, true, false, false),
            BlockKind::new("iron_ore", 12, true, false, false),
            BlockKind::new("gold_ore", 13, true, false, false),
            BlockKind::new("diamond_ore", 14, true, false, false),
            BlockKind::new("glass", 15, true, true, false),
        ])
    }

    fn kind(&self, id: BlockId) -> Option<&BlockKind> {
        self.kinds.get(id as usize)
    }

    /// Whether `id` is solid. Unknown ids are treated as not solid.
    pub fn solid(&self, id: BlockId) -> bool {
        self.kind(id).map(|k| k.solid).unwrap_or(false)
    }

    /// Whether `id` is transparent. Unknown ids are treated as transparent (safe default).
    pub fn transparent(&self, id: BlockId) -> bool {
        self.kind(id).map(|k| k.transparent).unwrap_or(true)
    }

    /// Whether `id` is air. Unknown ids are treated as air.
    pub fn air(&self, id: BlockId) -> bool {
        self.kind(id).map(|k| k.air).unwrap_or(true)
    }

    /// Texture index for `id`'s given face. Falls back to 0 for unknown ids.
    pub fn texture_of_face(&self, id: BlockId, face: Face) -> u32 {
        self.kind(id)
            .map(|k| k.face_textures[face.index()])
            .unwrap_or(0)
    }

    /// Look up a block id by name (used by tests and the Generator's ore table).
    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.kinds
            .iter()
            .position(|k| k.name == name)
            .map(|i| i as BlockId)
    }
}
