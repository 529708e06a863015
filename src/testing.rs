use crate::tag::TagType;
use crate::{REGION_SECTOR_BYTES_LENGTH, SECTION_VOLUME};
use byteorder::{BigEndian, WriteBytesExt};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

/// Writes tag streams by hand, including malformed ones.
pub(crate) struct TagWriter {
    buffer: Vec<u8>,
}

impl TagWriter {
    pub(crate) fn new() -> Self {
        TagWriter { buffer: Vec::new() }
    }

    pub(crate) fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    pub(crate) fn raw(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub(crate) fn header_raw(&mut self, type_id: u8, name: &str) {
        self.buffer.push(type_id);
        self.buffer.write_u16::<BigEndian>(name.len() as u16).unwrap();
        self.buffer.extend_from_slice(name.as_bytes());
    }

    pub(crate) fn header(&mut self, tag_type: TagType, name: &str) {
        self.header_raw(tag_type.id(), name);
    }

    pub(crate) fn begin_compound(&mut self, name: &str) {
        self.header(TagType::Compound, name);
    }

    pub(crate) fn end(&mut self) {
        self.buffer.push(TagType::End.id());
    }

    pub(crate) fn byte(&mut self, name: &str, value: i8) {
        self.header(TagType::Byte, name);
        self.buffer.write_i8(value).unwrap();
    }

    pub(crate) fn short(&mut self, name: &str, value: i16) {
        self.header(TagType::Short, name);
        self.buffer.write_i16::<BigEndian>(value).unwrap();
    }

    pub(crate) fn int(&mut self, name: &str, value: i32) {
        self.header(TagType::Int, name);
        self.buffer.write_i32::<BigEndian>(value).unwrap();
    }

    pub(crate) fn long(&mut self, name: &str, value: i64) {
        self.header(TagType::Long, name);
        self.buffer.write_i64::<BigEndian>(value).unwrap();
    }

    pub(crate) fn float(&mut self, name: &str, value: f32) {
        self.header(TagType::Float, name);
        self.buffer.write_f32::<BigEndian>(value).unwrap();
    }

    pub(crate) fn double(&mut self, name: &str, value: f64) {
        self.header(TagType::Double, name);
        self.buffer.write_f64::<BigEndian>(value).unwrap();
    }

    pub(crate) fn byte_array(&mut self, name: &str, value: &[u8]) {
        self.header(TagType::ByteArray, name);
        self.buffer.write_u32::<BigEndian>(value.len() as u32).unwrap();
        self.buffer.extend_from_slice(value);
    }

    pub(crate) fn string(&mut self, name: &str, value: &str) {
        self.header(TagType::String, name);
        self.buffer.write_u16::<BigEndian>(value.len() as u16).unwrap();
        self.buffer.extend_from_slice(value.as_bytes());
    }

    pub(crate) fn int_array(&mut self, name: &str, value: &[i32]) {
        self.header(TagType::IntArray, name);
        self.buffer.write_u32::<BigEndian>(value.len() as u32).unwrap();

        for item in value {
            self.buffer.write_i32::<BigEndian>(*item).unwrap();
        }
    }

    pub(crate) fn list_header(&mut self, element: TagType, count: u32) {
        self.buffer.push(element.id());
        self.buffer.write_u32::<BigEndian>(count).unwrap();
    }

    pub(crate) fn begin_list(&mut self, name: &str, element: TagType, count: u32) {
        self.header(TagType::List, name);
        self.list_header(element, count);
    }
}

/// Chunk tag stream with one section per `(y, block id)` pair, every block of
/// the section set to that id.
pub(crate) fn chunk_nbt(sections: &[(i8, u8)]) -> Vec<u8> {
    let mut writer = TagWriter::new();
    writer.begin_compound("");
    writer.int("DataVersion", 1343);
    writer.begin_compound("Level");
    writer.int("xPos", 0);
    writer.int("zPos", 0);
    writer.byte_array("Biomes", &[1; 256]);
    writer.begin_list("Sections", TagType::Compound, sections.len() as u32);

    for (y, block) in sections {
        writer.byte_array("BlockLight", &[0; SECTION_VOLUME / 2]);
        writer.byte("Y", *y);
        writer.byte_array("Blocks", &[*block; SECTION_VOLUME]);
        writer.byte_array("Data", &[0; SECTION_VOLUME / 2]);
        writer.end();
    }

    writer.begin_list("Entities", TagType::End, 0);
    writer.end();
    writer.end();
    writer.into_inner()
}

pub(crate) fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Raw chunk entry written at a chunk's sector.
pub(crate) struct RawChunk {
    pub(crate) index: usize,
    pub(crate) compression_scheme: u8,
    pub(crate) data: Vec<u8>,
    /// Overrides the length field, which is otherwise `data.len() + 1`.
    pub(crate) declared_length: Option<u32>,
}

impl RawChunk {
    pub(crate) fn zlib(index: usize, nbt: &[u8]) -> Self {
        RawChunk {
            index,
            compression_scheme: 2,
            data: zlib(nbt),
            declared_length: None,
        }
    }
}

/// Lays chunks out back to back after the header, in the given order.
pub(crate) fn region_file(chunks: &[RawChunk]) -> Vec<u8> {
    let sector = REGION_SECTOR_BYTES_LENGTH as usize;
    let mut file = vec![0u8; 2 * sector];

    for chunk in chunks {
        let start_sector = file.len() / sector;
        let length = chunk
            .declared_length
            .unwrap_or(chunk.data.len() as u32 + 1);

        file.write_u32::<BigEndian>(length).unwrap();
        file.push(chunk.compression_scheme);
        file.extend_from_slice(&chunk.data);

        let sectors = (file.len() - start_sector * sector + sector - 1) / sector;
        file.resize((start_sector + sectors) * sector, 0);

        let entry = ((start_sector as u32) << 8) | sectors as u32;
        let offset = chunk.index * 4;
        file[offset..offset + 4].copy_from_slice(&entry.to_be_bytes());
    }

    file
}
