use crate::position::RegionChunkPosition;
use crate::tag::TagType;
use std::{error::Error, fmt::Display, io};

/// Possible errors while walking a tag stream.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TagDecodeError {
    /// A read would run past the end of the buffer.
    OutOfBounds {
        /// Cursor position at which the read started.
        position: usize,
        /// Amount of bytes the read needed.
        requested: usize,
        /// Buffer length.
        length: usize,
    },
    /// Type byte outside of the known tag kinds.
    UnknownTagType { type_id: u8, position: usize },
    /// Lists and compounds nested deeper than the decoder allows.
    NestingTooDeep { depth: usize },
    /// String payload is not valid UTF-8.
    InvalidString { position: usize },
}

impl Error for TagDecodeError {}

impl Display for TagDecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use TagDecodeError::*;
        match self {
            OutOfBounds {
                position,
                requested,
                length,
            } => write!(
                f,
                "Read of {} bytes at {} runs past buffer end ({})",
                requested, position, length
            ),
            UnknownTagType { type_id, position } => {
                write!(f, "Unknown tag type {} at {}", type_id, position)
            }
            NestingTooDeep { depth } => write!(f, "Tag nesting exceeds depth {}", depth),
            InvalidString { position } => write!(f, "Invalid UTF-8 string at {}", position),
        }
    }
}

/// Possible errors while loading a single chunk.
///
/// None of these are fatal for an import: the chunk is left empty and the
/// remaining chunks are still decoded.
#[derive(Debug)]
pub enum ChunkReadError {
    /// Chunk at specified coordinates inside region not found.
    ChunkNotFound { position: RegionChunkPosition },
    /// Chunk length overlaps declared maximum.
    ///
    /// This should not occur under normal conditions.
    ///
    /// Region file are corrupted.
    LengthExceedsMaximum {
        /// Chunk length.
        length: u32,
        /// Chunk maximum expected length.
        maximum_length: u32,
    },
    /// Location entry points into the region header.
    SectorInHeader { sector_offset: u32 },
    /// Chunk length is zero, so not even the compression scheme byte is present.
    EmptyPayload,
    /// Only zlib compressed chunks are decoded.
    ///
    /// Region file are corrupted, or the chunk was written with gzip or
    /// without compression.
    UnsupportedCompressionScheme {
        /// Compression scheme type id.
        compression_scheme: u8,
    },
    /// Inflated tag stream grew over the configured limit.
    InflatedLengthExceedsMaximum { maximum_length: usize },
    /// I/O Error which happened while were reading or inflating chunk data.
    IOError { io_error: io::Error },
    /// Tag stream is malformed.
    TagDecodeError { tag_decode_error: TagDecodeError },
    /// Required tag is missing from its compound.
    MissingTag { name: &'static str },
    /// Required tag is present but has another type.
    UnexpectedTagType {
        name: &'static str,
        expected: TagType,
        found: TagType,
    },
    /// Section blocks array is not 4096 bytes long.
    InvalidBlocksLength { length: usize },
}

impl ChunkReadError {
    /// Whether the chunk was skipped because of its compression scheme rather
    /// than because its data is damaged.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, ChunkReadError::UnsupportedCompressionScheme { .. })
    }
}

impl From<io::Error> for ChunkReadError {
    fn from(io_error: io::Error) -> Self {
        ChunkReadError::IOError { io_error }
    }
}

impl From<TagDecodeError> for ChunkReadError {
    fn from(tag_decode_error: TagDecodeError) -> Self {
        ChunkReadError::TagDecodeError { tag_decode_error }
    }
}

impl Error for ChunkReadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use ChunkReadError::*;
        match self {
            IOError { io_error } => Some(io_error),
            TagDecodeError { tag_decode_error } => Some(tag_decode_error),
            _ => None,
        }
    }
}

impl Display for ChunkReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ChunkReadError::*;
        match self {
            ChunkNotFound { position } => {
                write!(f, "Chunk {}, {} not found", position.x, position.z)
            }
            LengthExceedsMaximum {
                length,
                maximum_length,
            } => write!(
                f,
                "Chunk length of {} exceeds maximum ({})",
                length, maximum_length
            ),
            SectorInHeader { sector_offset } => {
                write!(f, "Chunk sector {} overlaps region header", sector_offset)
            }
            EmptyPayload => write!(f, "Chunk length is zero"),
            UnsupportedCompressionScheme { compression_scheme } => {
                write!(f, "Unsupported compression scheme: {}", compression_scheme)
            }
            InflatedLengthExceedsMaximum { maximum_length } => write!(
                f,
                "Inflated chunk exceeds maximum ({} bytes)",
                maximum_length
            ),
            IOError { .. } => write!(f, "IO Error"),
            TagDecodeError { .. } => write!(f, "Failed to decode nbt"),
            MissingTag { name } => write!(f, "Missing tag `{}`", name),
            UnexpectedTagType {
                name,
                expected,
                found,
            } => write!(
                f,
                "Tag `{}` has type {:?}, expected {:?}",
                name, found, expected
            ),
            InvalidBlocksLength { length } => {
                write!(f, "Section blocks length of {} is not 4096", length)
            }
        }
    }
}

/// Errors that abort a whole region import.
#[derive(Debug)]
pub enum ImportError {
    /// Region file could not be opened or read.
    IOError { io_error: io::Error },
    /// Worker pool could not be started.
    ThreadPool { message: String },
}

impl From<io::Error> for ImportError {
    fn from(io_error: io::Error) -> Self {
        ImportError::IOError { io_error }
    }
}

impl From<rayon::ThreadPoolBuildError> for ImportError {
    fn from(error: rayon::ThreadPoolBuildError) -> Self {
        ImportError::ThreadPool {
            message: error.to_string(),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ImportError::IOError { io_error } => Some(io_error),
            _ => None,
        }
    }
}

impl Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ImportError::*;
        match self {
            IOError { io_error } => write!(f, "Failed to read region: {}", io_error),
            ThreadPool { message } => write!(f, "Failed to start workers: {}", message),
        }
    }
}
