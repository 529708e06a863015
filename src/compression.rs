use crate::error::ChunkReadError;
use crate::region::ChunkLocation;
use byteorder::{BigEndian, ReadBytesExt};
use flate2::read::ZlibDecoder;
use std::io::{Read, Seek, SeekFrom};

/// Default cap on a chunk's inflated tag stream.
pub const DEFAULT_MAX_INFLATED_LENGTH: usize = 16 * 1024 * 1024;

/// Compression scheme used for chunk.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum CompressionScheme {
    Gzip = 1,
    /// In practice, you will only ever encounter chunks compressed using zlib.
    Zlib = 2,
    Uncompressed = 3,
}

impl CompressionScheme {
    pub fn from_id(compression_scheme: u8) -> Option<CompressionScheme> {
        match compression_scheme {
            1 => Some(CompressionScheme::Gzip),
            2 => Some(CompressionScheme::Zlib),
            3 => Some(CompressionScheme::Uncompressed),
            _ => None,
        }
    }
}

/// Compressed chunk data as stored at the chunk's sectors.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ChunkPayload {
    /// Declared length, counting the compression scheme byte.
    pub length: u32,
    pub compression_scheme: u8,
    /// `length - 1` bytes of compressed tag stream.
    pub data: Vec<u8>,
}

/// Reads the length-prefixed payload stored at `location`.
///
/// The declared length must fit the sectors allocated to the chunk.
pub fn read_chunk_payload<S: Read + Seek>(
    source: &mut S,
    location: &ChunkLocation,
) -> Result<ChunkPayload, ChunkReadError> {
    if location.sector_offset < 2 {
        return Err(ChunkReadError::SectorInHeader {
            sector_offset: location.sector_offset,
        });
    }

    let maximum_length = location.maximum_length();

    source.seek(SeekFrom::Start(location.byte_offset()))?;
    let length = source.read_u32::<BigEndian>()?;

    if length > maximum_length {
        return Err(ChunkReadError::LengthExceedsMaximum {
            length,
            maximum_length,
        });
    }

    if length == 0 {
        return Err(ChunkReadError::EmptyPayload);
    }

    let compression_scheme = source.read_u8()?;
    let mut data = vec![0u8; (length - 1) as usize];
    source.read_exact(&mut data)?;

    Ok(ChunkPayload {
        length,
        compression_scheme,
        data,
    })
}

/// Inflates a zlib payload into its raw tag stream.
///
/// Every other compression scheme is reported as unsupported, even the ones
/// the region format knows about.
pub fn decompress_chunk(
    payload: &ChunkPayload,
    max_inflated_length: usize,
) -> Result<Vec<u8>, ChunkReadError> {
    match CompressionScheme::from_id(payload.compression_scheme) {
        Some(CompressionScheme::Zlib) => inflate(&payload.data, max_inflated_length),
        _ => Err(ChunkReadError::UnsupportedCompressionScheme {
            compression_scheme: payload.compression_scheme,
        }),
    }
}

fn inflate(data: &[u8], max_inflated_length: usize) -> Result<Vec<u8>, ChunkReadError> {
    let limit = (max_inflated_length as u64).saturating_add(1);
    let mut decoder = ZlibDecoder::new(data).take(limit);
    let mut inflated = Vec::new();
    decoder.read_to_end(&mut inflated)?;

    if inflated.len() > max_inflated_length {
        return Err(ChunkReadError::InflatedLengthExceedsMaximum {
            maximum_length: max_inflated_length,
        });
    }

    Ok(inflated)
}
