use crate::chunk::{assemble_chunk, ChunkBlocks};
use crate::compression::{decompress_chunk, read_chunk_payload, ChunkPayload};
use crate::error::ChunkReadError;
use crate::position::RegionChunkPosition;
use crate::{
    CHUNK_MAXIMUM_BYTES_LENGTH, REGION_CHUNKS, REGION_HEADER_BYTES_LENGTH,
    REGION_LOCATIONS_BYTES_LENGTH, REGION_SECTOR_BYTES_LENGTH,
};
use bitvec::prelude::*;
use byteorder::{BigEndian, ReadBytesExt};
use log::debug;
use std::io;
use std::io::{Read, Seek, SeekFrom};

/// Location table entry of one chunk.
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq)]
pub struct ChunkLocation {
    /// Sector index from which starts chunk data, `0` when the chunk is absent.
    pub sector_offset: u32,
    /// Amount of sectors used to store chunk.
    pub sector_count: u8,
    /// Last time in seconds when chunk was modified, `0` if the region has no
    /// timestamp table.
    pub last_modified: u32,
}

impl ChunkLocation {
    pub fn new(sector_offset: u32, sector_count: u8, last_modified: u32) -> Self {
        ChunkLocation {
            sector_offset,
            sector_count,
            last_modified,
        }
    }

    /// Splits a packed `|offset(3)|count(1)|` entry.
    fn from_entry(entry: u32, last_modified: u32) -> Self {
        ChunkLocation::new(entry >> 8, (entry & 0xFF) as u8, last_modified)
    }

    pub fn is_empty(&self) -> bool {
        self.sector_offset == 0
    }

    /// Position of the chunk data from source start.
    pub fn byte_offset(&self) -> u64 {
        self.sector_offset as u64 * REGION_SECTOR_BYTES_LENGTH as u64
    }

    /// Longest payload that fits the allocated sectors.
    pub fn maximum_length(&self) -> u32 {
        (self.sector_count as u32 * REGION_SECTOR_BYTES_LENGTH).min(CHUNK_MAXIMUM_BYTES_LENGTH)
    }

    fn sectors(&self) -> std::ops::Range<usize> {
        let start = self.sector_offset as usize;
        start..start + self.sector_count as usize
    }
}

/// Location table of a region, 32x32 entries.
#[derive(Clone)]
pub struct RegionLocations {
    locations: [ChunkLocation; REGION_CHUNKS],
}

impl RegionLocations {
    /// Table of a region without any chunk.
    pub fn empty() -> Self {
        RegionLocations {
            locations: [Default::default(); REGION_CHUNKS],
        }
    }

    /// First 4KB of source are chunk locations, the next 4KB their
    /// timestamps.
    ///
    /// A source too short for the location table is an empty region. One that
    /// has no timestamp table leaves every timestamp at zero.
    pub fn read<S: Read + Seek>(source: &mut S, source_len: u64) -> Result<Self, io::Error> {
        let mut table = RegionLocations::empty();

        if REGION_LOCATIONS_BYTES_LENGTH > source_len {
            return Ok(table);
        }

        source.seek(SeekFrom::Start(0))?;
        let mut entries = [0u32; REGION_CHUNKS];
        source.read_u32_into::<BigEndian>(&mut entries)?;

        let mut timestamps = [0u32; REGION_CHUNKS];

        if source_len >= REGION_HEADER_BYTES_LENGTH {
            source.read_u32_into::<BigEndian>(&mut timestamps)?;
        }

        for index in 0..REGION_CHUNKS {
            table.locations[index] = ChunkLocation::from_entry(entries[index], timestamps[index]);
        }

        Ok(table)
    }

    pub fn get(&self, position: RegionChunkPosition) -> ChunkLocation {
        self.locations[position.index()]
    }

    /// Byte offset and sector count of a chunk, `None` if it is absent.
    pub fn locate(&self, position: RegionChunkPosition) -> Option<(u64, u8)> {
        let location = self.get(position);

        if location.is_empty() {
            return None;
        }

        Some((location.byte_offset(), location.sector_count))
    }

    pub fn iter(&self) -> impl Iterator<Item = (RegionChunkPosition, ChunkLocation)> + '_ {
        self.locations
            .iter()
            .enumerate()
            .map(|(index, location)| (RegionChunkPosition::from_index(index), *location))
    }

    /// Amount of chunks with a location.
    pub fn present_count(&self) -> usize {
        self.locations.iter().filter(|location| !location.is_empty()).count()
    }

    /// Marks the sectors occupied by the header and every present chunk.
    ///
    /// Sectors past `total_sectors` are not tracked.
    pub fn sector_usage(&self, total_sectors: usize) -> BitVec {
        self.mark_sectors(total_sectors).0
    }

    /// Chunks whose sectors are already claimed by the header or by a chunk
    /// earlier in the table.
    pub fn overlapping_chunks(&self, total_sectors: usize) -> Vec<RegionChunkPosition> {
        self.mark_sectors(total_sectors).1
    }

    fn mark_sectors(&self, total_sectors: usize) -> (BitVec, Vec<RegionChunkPosition>) {
        // First two sectors are used to store the header.
        let mut used_sectors = bitvec![0; total_sectors.max(2)];
        let mut overlapping = Vec::new();

        used_sectors.set(0, true);
        used_sectors.set(1, true);

        for (position, location) in self.iter() {
            if location.is_empty() {
                continue;
            }

            let mut overlaps = false;

            for index in location.sectors() {
                if index >= used_sectors.len() {
                    break;
                }

                overlaps |= used_sectors[index];
                used_sectors.set(index, true);
            }

            if overlaps {
                overlapping.push(position);
            }
        }

        (used_sectors, overlapping)
    }
}

/// Rounds a source length up to whole sectors, never less than the header.
pub fn total_sectors(source_len: u64) -> usize {
    if source_len > REGION_HEADER_BYTES_LENGTH {
        ((source_len + (REGION_SECTOR_BYTES_LENGTH as u64 - 1)) / REGION_SECTOR_BYTES_LENGTH as u64)
            as usize
    } else {
        2
    }
}

/// Region represents a 32x32 group of chunks, read through `S`.
pub struct Region<S> {
    /// Source in which region are stored.
    source: S,
    /// Source length in bytes.
    source_len: u64,
    /// Location table.
    locations: RegionLocations,
}

impl<S> Region<S> {
    pub fn locations(&self) -> &RegionLocations {
        &self.locations
    }

    pub fn locate(&self, position: RegionChunkPosition) -> Option<(u64, u8)> {
        self.locations.locate(position)
    }

    pub fn source_len(&self) -> u64 {
        self.source_len
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: Read + Seek> Region<S> {
    pub fn load(mut source: S) -> Result<Self, io::Error> {
        let source_len = source.len()?;
        let locations = RegionLocations::read(&mut source, source_len)?;

        debug!(
            target: "anvil-terrain",
            "Loaded region header of {} bytes with {} chunks",
            source_len,
            locations.present_count()
        );

        Ok(Region {
            source,
            source_len,
            locations,
        })
    }

    /// Reads the still compressed payload of a chunk.
    pub fn read_chunk_payload(
        &mut self,
        position: RegionChunkPosition,
    ) -> Result<ChunkPayload, ChunkReadError> {
        let location = self.locations.get(position);

        if location.is_empty() {
            return Err(ChunkReadError::ChunkNotFound { position });
        }

        read_chunk_payload(&mut self.source, &location)
    }

    /// Reads and inflates the tag stream of a chunk.
    pub fn read_chunk_data(
        &mut self,
        position: RegionChunkPosition,
        max_inflated_length: usize,
    ) -> Result<Vec<u8>, ChunkReadError> {
        let payload = self.read_chunk_payload(position)?;
        decompress_chunk(&payload, max_inflated_length)
    }

    /// Reads a chunk all the way to its block array.
    pub fn read_chunk_blocks(
        &mut self,
        position: RegionChunkPosition,
        max_inflated_length: usize,
    ) -> Result<ChunkBlocks, ChunkReadError> {
        let data = self.read_chunk_data(position, max_inflated_length)?;
        assemble_chunk(&data)
    }
}

/// Trait adds additional helper methods for `Seek`.
trait SeekExt {
    fn len(&mut self) -> Result<u64, io::Error>;
}

impl<S: Seek> SeekExt for S {
    fn len(&mut self) -> Result<u64, io::Error> {
        let old_pos = self.seek(SeekFrom::Current(0))?;
        let len = self.seek(SeekFrom::End(0))?;

        if old_pos != len {
            self.seek(SeekFrom::Start(old_pos))?;
        }

        Ok(len)
    }
}
