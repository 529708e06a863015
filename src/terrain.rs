use crate::block::BlockType;
use crate::chunk::ChunkBlocks;
use crate::position::RegionChunkPosition;
use crate::{CHUNK_HEIGHT, CHUNK_WIDTH, REGION_CHUNKS, REGION_WIDTH};

/// Blocks along each horizontal side of a terrain.
pub const TERRAIN_WIDTH: usize = REGION_WIDTH * CHUNK_WIDTH;

/// Grid slot of a terrain.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum VoxelChunk {
    /// Never loaded, every block is air.
    Empty,
    Loaded(ChunkBlocks),
}

impl VoxelChunk {
    pub fn is_loaded(&self) -> bool {
        matches!(self, VoxelChunk::Loaded(_))
    }

    pub fn blocks(&self) -> Option<&ChunkBlocks> {
        match self {
            VoxelChunk::Loaded(blocks) => Some(blocks),
            VoxelChunk::Empty => None,
        }
    }

    /// Block at local coordinates, air when empty or out of range.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockType {
        let blocks = match self {
            VoxelChunk::Loaded(blocks) => blocks,
            VoxelChunk::Empty => return BlockType::AIR,
        };

        match (local(x, CHUNK_WIDTH), local(y, CHUNK_HEIGHT), local(z, CHUNK_WIDTH)) {
            (Some(x), Some(y), Some(z)) => blocks.get(x, y, z),
            _ => BlockType::AIR,
        }
    }
}

impl Default for VoxelChunk {
    fn default() -> Self {
        VoxelChunk::Empty
    }
}

fn local(coordinate: i32, size: usize) -> Option<usize> {
    if coordinate >= 0 && (coordinate as usize) < size {
        Some(coordinate as usize)
    } else {
        None
    }
}

/// Fixed 32x32 grid of chunks covering one region.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VoxelTerrain {
    chunks: Vec<VoxelChunk>,
}

impl VoxelTerrain {
    pub fn new() -> Self {
        VoxelTerrain {
            chunks: vec![VoxelChunk::Empty; REGION_CHUNKS],
        }
    }

    fn slot(cx: i32, cz: i32) -> Option<usize> {
        let x = local(cx, REGION_WIDTH)?;
        let z = local(cz, REGION_WIDTH)?;

        Some(RegionChunkPosition::new(x as u8, z as u8).index())
    }

    /// Stores `blocks` at `(cx, cz)`, replacing what was there.
    ///
    /// Returns `false` and leaves the terrain untouched when the coordinates
    /// are outside the grid.
    pub fn add_chunk(&mut self, cx: i32, cz: i32, blocks: ChunkBlocks) -> bool {
        match Self::slot(cx, cz) {
            Some(index) => {
                self.chunks[index] = VoxelChunk::Loaded(blocks);
                true
            }
            None => false,
        }
    }

    pub fn chunk(&self, cx: i32, cz: i32) -> Option<&VoxelChunk> {
        Self::slot(cx, cz).map(|index| &self.chunks[index])
    }

    /// Block at chunk `(cx, cz)` and local `(x, y, z)`.
    ///
    /// Anything outside the grid, the chunk or an empty slot reads as air.
    pub fn get_block(&self, cx: i32, cz: i32, x: i32, y: i32, z: i32) -> BlockType {
        match self.chunk(cx, cz) {
            Some(chunk) => chunk.get_block(x, y, z),
            None => BlockType::AIR,
        }
    }

    /// Block at coordinates relative to the terrain's corner.
    pub fn get_world_block(&self, x: i32, y: i32, z: i32) -> BlockType {
        let width = CHUNK_WIDTH as i32;

        self.get_block(
            x.div_euclid(width),
            z.div_euclid(width),
            x.rem_euclid(width),
            y,
            z.rem_euclid(width),
        )
    }

    pub fn loaded_chunks(&self) -> impl Iterator<Item = (RegionChunkPosition, &ChunkBlocks)> + '_ {
        self.chunks.iter().enumerate().filter_map(|(index, chunk)| {
            chunk
                .blocks()
                .map(|blocks| (RegionChunkPosition::from_index(index), blocks))
        })
    }

    pub fn loaded_count(&self) -> usize {
        self.chunks.iter().filter(|chunk| chunk.is_loaded()).count()
    }

    /// Topmost non-air block of a column.
    pub fn highest_block(&self, cx: i32, cz: i32, x: i32, z: i32) -> Option<i32> {
        let chunk = self.chunk(cx, cz)?;

        (0..CHUNK_HEIGHT as i32)
            .rev()
            .find(|y| !chunk.get_block(x, *y, z).is_air())
    }

    /// Plane of the whole terrain at height `y`.
    pub fn horizontal_slice(&self, y: i32) -> HorizontalSlice {
        let mut blocks = vec![BlockType::AIR; TERRAIN_WIDTH * TERRAIN_WIDTH];

        if let Some(local_y) = local(y, CHUNK_HEIGHT) {
            for (position, chunk) in self.loaded_chunks() {
                let origin_x = position.x as usize * CHUNK_WIDTH;
                let origin_z = position.z as usize * CHUNK_WIDTH;

                for z in 0..CHUNK_WIDTH {
                    let row = (origin_z + z) * TERRAIN_WIDTH + origin_x;

                    for x in 0..CHUNK_WIDTH {
                        blocks[row + x] = chunk.get(x, local_y, z);
                    }
                }
            }
        }

        HorizontalSlice { y, blocks }
    }

    /// Plane along z and y at terrain column `x`.
    pub fn vertical_slice_x(&self, x: i32) -> VerticalSlice {
        let mut blocks = vec![BlockType::AIR; TERRAIN_WIDTH * CHUNK_HEIGHT];

        if local(x, TERRAIN_WIDTH).is_some() {
            for z in 0..TERRAIN_WIDTH {
                for y in 0..CHUNK_HEIGHT {
                    blocks[y * TERRAIN_WIDTH + z] = self.get_world_block(x, y as i32, z as i32);
                }
            }
        }

        VerticalSlice { x, blocks }
    }
}

impl Default for VoxelTerrain {
    fn default() -> Self {
        VoxelTerrain::new()
    }
}

/// Blocks of a terrain at one height, 512x512.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HorizontalSlice {
    y: i32,
    blocks: Vec<BlockType>,
}

impl HorizontalSlice {
    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn width(&self) -> usize {
        TERRAIN_WIDTH
    }

    pub fn get(&self, x: usize, z: usize) -> BlockType {
        if x >= TERRAIN_WIDTH || z >= TERRAIN_WIDTH {
            return BlockType::AIR;
        }

        self.blocks[z * TERRAIN_WIDTH + x]
    }

    /// Rows of the slice, one per z.
    pub fn rows(&self) -> impl Iterator<Item = &[BlockType]> {
        self.blocks.chunks(TERRAIN_WIDTH)
    }
}

/// Blocks of a terrain at one x, 512 wide along z and 256 high.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VerticalSlice {
    x: i32,
    blocks: Vec<BlockType>,
}

impl VerticalSlice {
    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn get(&self, z: usize, y: usize) -> BlockType {
        if z >= TERRAIN_WIDTH || y >= CHUNK_HEIGHT {
            return BlockType::AIR;
        }

        self.blocks[y * TERRAIN_WIDTH + z]
    }
}

#[cfg(test)]
mod tests {
    use crate::block::BlockType;
    use crate::chunk::ChunkBlocks;
    use crate::position::RegionChunkPosition;
    use crate::terrain::{VoxelChunk, VoxelTerrain};

    fn stone_floor() -> ChunkBlocks {
        let mut blocks = ChunkBlocks::new();

        for x in 0..16 {
            for z in 0..16 {
                blocks.set(x, 0, z, BlockType::BEDROCK);
                blocks.set(x, 1, z, BlockType::STONE);
            }
        }

        blocks
    }

    #[test]
    fn test_empty_terrain_is_air() {
        let terrain = VoxelTerrain::new();

        assert_eq!(terrain.loaded_count(), 0);
        assert_eq!(terrain.get_block(0, 0, 0, 0, 0), BlockType::AIR);
        assert_eq!(terrain.get_block(31, 31, 15, 255, 15), BlockType::AIR);
        assert_eq!(terrain.chunk(4, 4), Some(&VoxelChunk::Empty));
    }

    #[test]
    fn test_add_and_query() {
        let mut terrain = VoxelTerrain::new();
        assert!(terrain.add_chunk(3, 7, stone_floor()));

        assert_eq!(terrain.get_block(3, 7, 5, 1, 9), BlockType::STONE);
        assert_eq!(terrain.get_block(3, 7, 5, 0, 9), BlockType::BEDROCK);
        assert_eq!(terrain.get_block(3, 7, 5, 2, 9), BlockType::AIR);
        assert_eq!(terrain.get_block(7, 3, 5, 1, 9), BlockType::AIR);
        assert_eq!(
            terrain.loaded_chunks().map(|(position, _)| position).collect::<Vec<_>>(),
            vec![RegionChunkPosition::new(3, 7)]
        );
    }

    #[test]
    fn test_out_of_range_queries() {
        let mut terrain = VoxelTerrain::new();
        terrain.add_chunk(0, 0, stone_floor());

        assert_eq!(terrain.get_block(0, 0, -1, 1, 0), BlockType::AIR);
        assert_eq!(terrain.get_block(0, 0, 16, 1, 0), BlockType::AIR);
        assert_eq!(terrain.get_block(0, 0, 0, 256, 0), BlockType::AIR);
        assert_eq!(terrain.get_block(0, 0, 0, -1, 0), BlockType::AIR);
        assert_eq!(terrain.get_block(-1, 0, 0, 1, 0), BlockType::AIR);
        assert_eq!(terrain.get_block(0, 32, 0, 1, 0), BlockType::AIR);
    }

    #[test]
    fn test_add_outside_grid() {
        let mut terrain = VoxelTerrain::new();

        assert!(!terrain.add_chunk(32, 0, stone_floor()));
        assert!(!terrain.add_chunk(0, -1, stone_floor()));
        assert_eq!(terrain, VoxelTerrain::new());
    }

    #[test]
    fn test_add_chunk_idempotent() {
        let mut once = VoxelTerrain::new();
        once.add_chunk(9, 2, stone_floor());

        let mut twice = VoxelTerrain::new();
        twice.add_chunk(9, 2, stone_floor());
        twice.add_chunk(9, 2, stone_floor());

        assert_eq!(once, twice);
        assert_eq!(twice.loaded_count(), 1);
    }

    #[test]
    fn test_add_chunk_replaces() {
        let mut terrain = VoxelTerrain::new();
        terrain.add_chunk(1, 1, stone_floor());
        terrain.add_chunk(1, 1, ChunkBlocks::new());

        assert_eq!(terrain.get_block(1, 1, 0, 1, 0), BlockType::AIR);
        assert_eq!(terrain.loaded_count(), 1);
    }

    #[test]
    fn test_world_block() {
        let mut terrain = VoxelTerrain::new();
        terrain.add_chunk(2, 5, stone_floor());

        assert_eq!(terrain.get_world_block(2 * 16 + 4, 1, 5 * 16 + 15), BlockType::STONE);
        assert_eq!(terrain.get_world_block(-1, 1, 0), BlockType::AIR);
    }

    #[test]
    fn test_highest_block() {
        let mut blocks = stone_floor();
        blocks.set(4, 70, 4, BlockType::LEAVES);

        let mut terrain = VoxelTerrain::new();
        terrain.add_chunk(0, 1, blocks);

        assert_eq!(terrain.highest_block(0, 1, 4, 4), Some(70));
        assert_eq!(terrain.highest_block(0, 1, 5, 4), Some(1));
        assert_eq!(terrain.highest_block(1, 1, 5, 4), None);
    }

    #[test]
    fn test_horizontal_slice() {
        let mut terrain = VoxelTerrain::new();
        terrain.add_chunk(1, 2, stone_floor());

        let slice = terrain.horizontal_slice(1);

        assert_eq!(slice.y(), 1);
        assert_eq!(slice.get(16, 32), BlockType::STONE);
        assert_eq!(slice.get(31, 47), BlockType::STONE);
        assert_eq!(slice.get(32, 47), BlockType::AIR);
        assert_eq!(slice.get(15, 32), BlockType::AIR);
        assert_eq!(slice.rows().count(), 512);

        let solid: usize = slice
            .rows()
            .map(|row| row.iter().filter(|block| !block.is_air()).count())
            .sum();
        assert_eq!(solid, 256);

        for y in &[-5, 256, 300] {
            let slice = terrain.horizontal_slice(*y);
            assert!(slice.rows().all(|row| row.iter().all(|block| block.is_air())));
        }
    }

    #[test]
    fn test_vertical_slice() {
        let mut terrain = VoxelTerrain::new();
        terrain.add_chunk(0, 3, stone_floor());

        let slice = terrain.vertical_slice_x(7);

        assert_eq!(slice.x(), 7);
        assert_eq!(slice.get(3 * 16, 0), BlockType::BEDROCK);
        assert_eq!(slice.get(3 * 16 + 15, 1), BlockType::STONE);
        assert_eq!(slice.get(3 * 16 + 16, 1), BlockType::AIR);
        assert_eq!(slice.get(3 * 16, 2), BlockType::AIR);
    }
}
