use crate::block::BlockType;
use crate::error::ChunkReadError;
use crate::tag::{TagDecoder, TagType};
use crate::{CHUNK_HEIGHT, CHUNK_SECTIONS, CHUNK_VOLUME, CHUNK_WIDTH, SECTION_VOLUME};
use log::debug;
use std::fmt;

/// Block ids of one 16x256x16 chunk column.
///
/// Blocks are laid out y-major, `index = y * 256 + z * 16 + x`, the same order
/// a section's `Blocks` array uses.
#[derive(Clone, Eq, PartialEq)]
pub struct ChunkBlocks {
    blocks: Box<[BlockType]>,
}

impl ChunkBlocks {
    /// Chunk filled with air.
    pub fn new() -> Self {
        ChunkBlocks {
            blocks: vec![BlockType::AIR; CHUNK_VOLUME].into_boxed_slice(),
        }
    }

    /// Builds a chunk from a full 65536 entry id array.
    pub fn from_ids(ids: &[u8]) -> Option<Self> {
        if ids.len() != CHUNK_VOLUME {
            return None;
        }

        let blocks = ids.iter().map(|id| BlockType(*id)).collect();
        Some(ChunkBlocks { blocks })
    }

    pub fn index(x: usize, y: usize, z: usize) -> usize {
        debug_assert!(CHUNK_WIDTH > x && CHUNK_HEIGHT > y && CHUNK_WIDTH > z);

        y * CHUNK_WIDTH * CHUNK_WIDTH + z * CHUNK_WIDTH + x
    }

    /// Block at local coordinates, which must be in range.
    pub fn get(&self, x: usize, y: usize, z: usize) -> BlockType {
        self.blocks[Self::index(x, y, z)]
    }

    pub fn set(&mut self, x: usize, y: usize, z: usize, block: BlockType) {
        self.blocks[Self::index(x, y, z)] = block;
    }

    /// Copies a section's 4096 ids into its window of the column.
    pub fn copy_section(&mut self, section_y: usize, ids: &[u8]) {
        debug_assert!(CHUNK_SECTIONS > section_y);
        debug_assert_eq!(ids.len(), SECTION_VOLUME);

        let start = section_y * SECTION_VOLUME;
        let window = &mut self.blocks[start..start + SECTION_VOLUME];

        for (block, id) in window.iter_mut().zip(ids) {
            *block = BlockType(*id);
        }
    }

    pub fn as_slice(&self) -> &[BlockType] {
        &self.blocks
    }

    /// Amount of blocks other than air.
    pub fn solid_count(&self) -> usize {
        self.blocks.iter().filter(|block| !block.is_air()).count()
    }
}

impl Default for ChunkBlocks {
    fn default() -> Self {
        ChunkBlocks::new()
    }
}

impl fmt::Debug for ChunkBlocks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkBlocks")
            .field("solid", &self.solid_count())
            .finish()
    }
}

/// Extracts the block array out of a chunk's inflated tag stream.
///
/// Only `Level`, `Sections` and each section's `Y` and `Blocks` are read,
/// everything else is skipped over.
pub fn assemble_chunk(data: &[u8]) -> Result<ChunkBlocks, ChunkReadError> {
    let mut decoder = TagDecoder::new(data);
    let mut blocks = ChunkBlocks::new();

    let root = decoder.enter_root()?;
    expect_type("", TagType::Compound, root.tag_type)?;

    require_child(&mut decoder, "Level", TagType::Compound)?;
    require_child(&mut decoder, "Sections", TagType::List)?;

    let (element, count) = decoder.read_list_header()?;

    // Chunks without sections store an empty list of End.
    if count == 0 {
        return Ok(blocks);
    }

    expect_type("Sections", TagType::Compound, element)?;

    for _ in 0..count {
        read_section(&mut decoder, &mut blocks)?;
    }

    Ok(blocks)
}

/// Positions the decoder on the payload of a child that must exist.
fn require_child(
    decoder: &mut TagDecoder<'_>,
    name: &'static str,
    expected: TagType,
) -> Result<(), ChunkReadError> {
    match decoder.find_child(name)? {
        Some(found) => expect_type(name, expected, found),
        None => Err(ChunkReadError::MissingTag { name }),
    }
}

fn expect_type(name: &'static str, expected: TagType, found: TagType) -> Result<(), ChunkReadError> {
    if expected != found {
        return Err(ChunkReadError::UnexpectedTagType {
            name,
            expected,
            found,
        });
    }

    Ok(())
}

/// Walks one section compound up to its `End`.
///
/// `Y` and `Blocks` may come in any order, so both are picked up in a single
/// pass instead of two lookups.
fn read_section(decoder: &mut TagDecoder<'_>, blocks: &mut ChunkBlocks) -> Result<(), ChunkReadError> {
    let mut section_y = None;
    let mut section_blocks = None;

    loop {
        let tag = decoder.read_named_tag()?;

        if tag.tag_type == TagType::End {
            break;
        }

        if tag.is_named("Y") {
            expect_type("Y", TagType::Byte, tag.tag_type)?;
            section_y = Some(decoder.read_byte()?);
        } else if tag.is_named("Blocks") {
            expect_type("Blocks", TagType::ByteArray, tag.tag_type)?;
            section_blocks = Some(decoder.read_byte_array()?);
        } else {
            decoder.skip_payload(tag.tag_type)?;
        }
    }

    let section_y = section_y.ok_or(ChunkReadError::MissingTag { name: "Y" })?;

    if section_y < 0 || section_y as usize >= CHUNK_SECTIONS {
        debug!(target: "anvil-terrain", "Ignoring section outside of chunk at y {}", section_y);
        return Ok(());
    }

    match section_blocks {
        Some(ids) if ids.len() != SECTION_VOLUME => {
            return Err(ChunkReadError::InvalidBlocksLength { length: ids.len() });
        }
        Some(ids) => blocks.copy_section(section_y as usize, ids),
        None => debug!(target: "anvil-terrain", "Section {} has no blocks", section_y),
    }

    Ok(())
}
