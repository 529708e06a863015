use anvil_terrain::{
    import_region, import_region_bytes, BlockType, ChunkReadError, ImportOptions, Region,
    RegionChunkPosition,
};
use byteorder::{BigEndian, WriteBytesExt};
use nbt::encode::write_zlib_compound_tag;
use nbt::CompoundTag;
use std::io::{Cursor, Write};
use tempfile::NamedTempFile;

/// Chunk compound shaped like the ones the game writes, one section per
/// `(y, block id)` pair.
fn chunk_tag(x_pos: i32, z_pos: i32, sections: &[(i8, i8)]) -> CompoundTag {
    let mut section_tags = Vec::new();

    for (y, block) in sections {
        let mut section = CompoundTag::new();
        section.insert_i8("Y", *y);
        section.insert_i8_vec("Blocks", vec![*block; 4096]);
        section.insert_i8_vec("Data", vec![0; 2048]);
        section.insert_i8_vec("BlockLight", vec![0; 2048]);
        section.insert_i8_vec("SkyLight", vec![-1; 2048]);
        section_tags.push(section);
    }

    let mut level = CompoundTag::new();
    level.insert_i32("xPos", x_pos);
    level.insert_i32("zPos", z_pos);
    level.insert_i64("LastUpdate", 1570215508);
    level.insert_i8_vec("Biomes", vec![1; 256]);
    level.insert_i32_vec("HeightMap", vec![64; 256]);
    level.insert_compound_tag_vec("Sections", section_tags);
    level.insert_compound_tag_vec("Entities", Vec::new());

    let mut root = CompoundTag::new();
    root.insert_i32("DataVersion", 1343);
    root.insert_compound_tag("Level", level);
    root
}

/// Region file with each chunk in its own run of sectors after the header.
fn region_bytes(chunks: Vec<(RegionChunkPosition, u8, Vec<u8>)>) -> Vec<u8> {
    let mut file = vec![0u8; 8192];

    for (position, compression_scheme, compressed) in chunks {
        let start_sector = file.len() / 4096;

        file.write_u32::<BigEndian>(compressed.len() as u32 + 1).unwrap();
        file.write_u8(compression_scheme).unwrap();
        file.write_all(&compressed).unwrap();

        let sectors = (file.len() / 4096 - start_sector) + 1;
        file.resize((start_sector + sectors) * 4096, 0);

        let entry = ((start_sector as u32) << 8) | sectors as u32;
        let offset = position.index() * 4;
        file[offset..offset + 4].copy_from_slice(&entry.to_be_bytes());
    }

    file
}

fn zlib_chunk(tag: CompoundTag) -> Vec<u8> {
    let mut compressed = Vec::new();
    write_zlib_compound_tag(&mut compressed, tag).unwrap();
    compressed
}

#[test]
fn test_stone_section_round_trip() {
    let position = RegionChunkPosition::new(15, 3);
    let data = region_bytes(vec![(position, 2, zlib_chunk(chunk_tag(15, 3, &[(0, 1)])))]);

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&data).unwrap();

    let (terrain, report) = import_region(file.path(), &ImportOptions::default()).unwrap();

    assert_eq!(report.loaded, 1);
    assert!(report.corrupt.is_empty());

    for x in 0..16 {
        for z in 0..16 {
            for y in 0..16 {
                assert_eq!(terrain.get_block(15, 3, x, y, z), BlockType::STONE);
            }

            assert_eq!(terrain.get_block(15, 3, x, 16, z), BlockType::AIR);
        }
    }
}

#[test]
fn test_absent_chunks_are_air() {
    let position = RegionChunkPosition::new(0, 0);
    let data = region_bytes(vec![(position, 2, zlib_chunk(chunk_tag(0, 0, &[(0, 1)])))]);

    let (terrain, report) = import_region_bytes(&data, &ImportOptions::default()).unwrap();

    assert_eq!(report.absent, 1023);

    for cz in 0..32 {
        for cx in 0..32 {
            if (cx, cz) == (0, 0) {
                continue;
            }

            for y in (0..256).step_by(15) {
                assert_eq!(terrain.get_block(cx, cz, 7, y, 7), BlockType::AIR);
            }
        }
    }
}

#[test]
fn test_full_column() {
    let sections: Vec<(i8, i8)> = (0..16).map(|y| (y, y + 1)).collect();
    let position = RegionChunkPosition::new(31, 0);
    let data = region_bytes(vec![(position, 2, zlib_chunk(chunk_tag(31, 0, &sections)))]);

    let mut region = Region::load(Cursor::new(data)).unwrap();
    let blocks = region.read_chunk_blocks(position, 1 << 20).unwrap();

    for y in 0..256 {
        assert_eq!(blocks.get(3, y, 12), BlockType((y / 16) as u8 + 1));
    }
}

#[test]
fn test_unsupported_compression_leaves_chunk_empty() {
    let good = RegionChunkPosition::new(1, 1);
    let gzip = RegionChunkPosition::new(2, 1);
    let data = region_bytes(vec![
        (gzip, 1, zlib_chunk(chunk_tag(2, 1, &[(0, 1)]))),
        (good, 2, zlib_chunk(chunk_tag(1, 1, &[(0, 3)]))),
    ]);

    let (terrain, report) = import_region_bytes(&data, &ImportOptions::default()).unwrap();

    assert_eq!(report.unsupported, vec![(gzip, 1)]);
    assert!(report.corrupt.is_empty());
    assert!(!terrain.chunk(2, 1).unwrap().is_loaded());
    assert_eq!(terrain.get_block(1, 1, 0, 0, 0), BlockType::DIRT);

    let mut region = Region::load(Cursor::new(data)).unwrap();

    match region.read_chunk_data(gzip, 1 << 20) {
        Err(ChunkReadError::UnsupportedCompressionScheme { compression_scheme }) => {
            assert_eq!(compression_scheme, 1)
        }
        result => panic!(
            "Expected `UnsupportedCompressionScheme` but got `{:?}`",
            result.map(|data| data.len())
        ),
    }
}
