use std::fmt::{self, Display};

/// Numeric block id, `0` always being air.
///
/// Ids without a named constant are kept as they are, so a terrain never
/// loses information about blocks it does not know.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct BlockType(pub u8);

impl BlockType {
    pub const AIR: BlockType = BlockType(0);
    pub const STONE: BlockType = BlockType(1);
    pub const GRASS: BlockType = BlockType(2);
    pub const DIRT: BlockType = BlockType(3);
    pub const COBBLESTONE: BlockType = BlockType(4);
    pub const PLANKS: BlockType = BlockType(5);
    pub const SAPLING: BlockType = BlockType(6);
    pub const BEDROCK: BlockType = BlockType(7);
    pub const FLOWING_WATER: BlockType = BlockType(8);
    pub const WATER: BlockType = BlockType(9);
    pub const FLOWING_LAVA: BlockType = BlockType(10);
    pub const LAVA: BlockType = BlockType(11);
    pub const SAND: BlockType = BlockType(12);
    pub const GRAVEL: BlockType = BlockType(13);
    pub const GOLD_ORE: BlockType = BlockType(14);
    pub const IRON_ORE: BlockType = BlockType(15);
    pub const COAL_ORE: BlockType = BlockType(16);
    pub const LOG: BlockType = BlockType(17);
    pub const LEAVES: BlockType = BlockType(18);
    pub const GLASS: BlockType = BlockType(20);
    pub const SANDSTONE: BlockType = BlockType(24);
    pub const TALL_GRASS: BlockType = BlockType(31);
    pub const SNOW_LAYER: BlockType = BlockType(78);
    pub const ICE: BlockType = BlockType(79);
    pub const CLAY: BlockType = BlockType(82);

    pub fn id(self) -> u8 {
        self.0
    }

    pub fn is_air(self) -> bool {
        self == BlockType::AIR
    }

    pub fn name(self) -> Option<&'static str> {
        let name = match self.0 {
            0 => "air",
            1 => "stone",
            2 => "grass",
            3 => "dirt",
            4 => "cobblestone",
            5 => "planks",
            6 => "sapling",
            7 => "bedrock",
            8 => "flowing_water",
            9 => "water",
            10 => "flowing_lava",
            11 => "lava",
            12 => "sand",
            13 => "gravel",
            14 => "gold_ore",
            15 => "iron_ore",
            16 => "coal_ore",
            17 => "log",
            18 => "leaves",
            20 => "glass",
            24 => "sandstone",
            31 => "tallgrass",
            78 => "snow_layer",
            79 => "ice",
            82 => "clay",
            _ => return None,
        };

        Some(name)
    }
}

impl From<u8> for BlockType {
    fn from(id: u8) -> Self {
        BlockType(id)
    }
}

impl From<BlockType> for u8 {
    fn from(block: BlockType) -> Self {
        block.0
    }
}

impl Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "unknown({})", self.0),
        }
    }
}
