//! Decodes region files into a randomly queryable voxel terrain.
//!
//! The pipeline locates a chunk's sectors through the region location table,
//! inflates the zlib payload, walks the resulting tag stream lazily for the
//! `Level/Sections/{Y, Blocks}` fields and stores the block ids in a
//! [`VoxelTerrain`].
//!
//! ```no_run
//! use anvil_terrain::{import_region, ImportOptions};
//!
//! let (terrain, report) = import_region("r.0.0.mca", &ImportOptions::default()).unwrap();
//! println!("{} chunks loaded", report.loaded);
//! let block = terrain.get_block(3, 7, 0, 64, 15);
//! ```

pub mod block;
pub mod chunk;
pub mod compression;
pub mod cursor;
pub mod error;
pub mod import;
pub mod position;
pub mod region;
pub mod tag;
pub mod terrain;

#[cfg(test)]
pub(crate) mod testing;

pub use block::BlockType;
pub use chunk::{assemble_chunk, ChunkBlocks};
pub use compression::{decompress_chunk, read_chunk_payload, ChunkPayload, CompressionScheme};
pub use cursor::TagCursor;
pub use error::{ChunkReadError, ImportError, TagDecodeError};
pub use import::{import_region, import_region_bytes, ChunkOutcome, ImportOptions, ImportReport};
pub use position::RegionChunkPosition;
pub use region::{ChunkLocation, Region, RegionLocations};
pub use tag::{NamedTag, TagDecoder, TagType};
pub use terrain::{HorizontalSlice, VerticalSlice, VoxelChunk, VoxelTerrain};

/// Chunks along each side of a region.
pub const REGION_WIDTH: usize = 32;
/// Amount of chunks in region.
pub const REGION_CHUNKS: usize = REGION_WIDTH * REGION_WIDTH;
/// Region sector length in bytes.
pub const REGION_SECTOR_BYTES_LENGTH: u32 = 4096;
/// Location table length in bytes.
pub const REGION_LOCATIONS_BYTES_LENGTH: u64 = 4 * REGION_CHUNKS as u64;
/// Region header length in bytes, location and timestamp tables.
pub const REGION_HEADER_BYTES_LENGTH: u64 = 2 * REGION_LOCATIONS_BYTES_LENGTH;
/// Maximum chunk length in bytes, bounded by the one byte sector count.
pub const CHUNK_MAXIMUM_BYTES_LENGTH: u32 = REGION_SECTOR_BYTES_LENGTH * 255;

/// Chunk width along x and z.
pub const CHUNK_WIDTH: usize = 16;
/// Chunk height along y.
pub const CHUNK_HEIGHT: usize = 256;
/// Vertical sections in a chunk.
pub const CHUNK_SECTIONS: usize = CHUNK_HEIGHT / CHUNK_WIDTH;
/// Blocks in one 16x16x16 section.
pub const SECTION_VOLUME: usize = CHUNK_WIDTH * CHUNK_WIDTH * CHUNK_WIDTH;
/// Blocks in one chunk column.
pub const CHUNK_VOLUME: usize = SECTION_VOLUME * CHUNK_SECTIONS;
