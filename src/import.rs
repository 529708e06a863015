use crate::chunk::{assemble_chunk, ChunkBlocks};
use crate::compression::{decompress_chunk, read_chunk_payload, DEFAULT_MAX_INFLATED_LENGTH};
use crate::error::{ChunkReadError, ImportError};
use crate::position::RegionChunkPosition;
use crate::region::{total_sectors, ChunkLocation, RegionLocations};
use crate::terrain::VoxelTerrain;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Settings of a region import.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Worker threads, `0` lets rayon pick one per logical CPU.
    pub threads: usize,
    /// Cap on a single chunk's inflated tag stream.
    pub max_inflated_length: usize,
    /// Once set, chunks not yet started are skipped.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        ImportOptions {
            threads: 0,
            max_inflated_length: DEFAULT_MAX_INFLATED_LENGTH,
            cancel: None,
        }
    }
}

impl ImportOptions {
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_max_inflated_length(mut self, max_inflated_length: usize) -> Self {
        self.max_inflated_length = max_inflated_length;
        self
    }

    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map_or(false, |cancel| cancel.load(Ordering::Relaxed))
    }
}

/// Result of decoding one chunk slot.
#[derive(Debug)]
pub enum ChunkOutcome {
    Loaded(ChunkBlocks),
    /// Location table holds no entry for the chunk.
    Absent,
    /// Chunk is present but could not be decoded.
    Failed(ChunkReadError),
    /// Import was cancelled before the chunk was started.
    Skipped,
}

/// Summary of a region import.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub loaded: usize,
    pub absent: usize,
    /// Chunks with damaged data, left empty.
    pub corrupt: Vec<(RegionChunkPosition, ChunkReadError)>,
    /// Chunks stored with a compression scheme other than zlib, left empty.
    pub unsupported: Vec<(RegionChunkPosition, u8)>,
    /// Chunks whose sectors collide with another chunk or the header.
    pub overlapping: Vec<RegionChunkPosition>,
    pub skipped: usize,
    pub cancelled: bool,
}

impl ImportReport {
    fn record(&mut self, position: RegionChunkPosition, outcome: &ChunkOutcome) {
        match outcome {
            ChunkOutcome::Loaded(_) => self.loaded += 1,
            ChunkOutcome::Absent => self.absent += 1,
            ChunkOutcome::Skipped => self.skipped += 1,
            ChunkOutcome::Failed(ChunkReadError::UnsupportedCompressionScheme {
                compression_scheme,
            }) => {
                warn!(
                    target: "anvil-terrain",
                    "Chunk {}, {} uses unsupported compression scheme {}",
                    position.x, position.z, compression_scheme
                );
                self.unsupported.push((position, *compression_scheme));
            }
            ChunkOutcome::Failed(_) => {}
        }
    }
}

/// Reads the region file at `path` into a terrain.
///
/// Failing to open or read the file aborts the import. Chunks that fail to
/// decode are left empty and listed in the report.
pub fn import_region<P: AsRef<Path>>(
    path: P,
    options: &ImportOptions,
) -> Result<(VoxelTerrain, ImportReport), ImportError> {
    let path = path.as_ref();
    let mut data = Vec::new();

    {
        let mut file = File::open(path)?;
        file.read_to_end(&mut data)?;
    }

    debug!(
        target: "anvil-terrain",
        "Read {} bytes of region {}",
        data.len(),
        path.display()
    );

    import_region_bytes(&data, options)
}

/// Decodes every chunk of an in-memory region file into a terrain.
///
/// Chunks are decoded in parallel; the terrain is filled on the calling
/// thread once the workers are done.
pub fn import_region_bytes(
    data: &[u8],
    options: &ImportOptions,
) -> Result<(VoxelTerrain, ImportReport), ImportError> {
    let source_len = data.len() as u64;
    let locations = RegionLocations::read(&mut Cursor::new(data), source_len)?;
    let mut report = ImportReport::default();

    report.overlapping = locations.overlapping_chunks(total_sectors(source_len));

    for position in &report.overlapping {
        warn!(
            target: "anvil-terrain",
            "Chunk {}, {} shares sectors with another chunk or the header",
            position.x, position.z
        );
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.threads)
        .build()?;

    let outcomes: Vec<(RegionChunkPosition, ChunkOutcome)> = pool.install(|| {
        RegionChunkPosition::all()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|position| {
                let location = locations.get(position);
                (position, decode_chunk(data, &location, options))
            })
            .collect()
    });

    let mut terrain = VoxelTerrain::new();

    for (position, outcome) in outcomes {
        report.record(position, &outcome);

        match outcome {
            ChunkOutcome::Loaded(blocks) => {
                terrain.add_chunk(position.x as i32, position.z as i32, blocks);
            }
            ChunkOutcome::Failed(error) => {
                if !error.is_unsupported() {
                    warn!(
                        target: "anvil-terrain",
                        "Chunk {}, {} is corrupt: {}",
                        position.x, position.z, error
                    );
                    report.corrupt.push((position, error));
                }
            }
            ChunkOutcome::Absent | ChunkOutcome::Skipped => {}
        }
    }

    report.cancelled = report.skipped > 0;

    info!(
        target: "anvil-terrain",
        "Imported {} chunks, {} absent, {} corrupt, {} unsupported, {} skipped",
        report.loaded,
        report.absent,
        report.corrupt.len(),
        report.unsupported.len(),
        report.skipped
    );

    Ok((terrain, report))
}

/// Runs a single chunk through payload read, inflate and assembly.
fn decode_chunk(data: &[u8], location: &ChunkLocation, options: &ImportOptions) -> ChunkOutcome {
    if location.is_empty() {
        return ChunkOutcome::Absent;
    }

    if options.is_cancelled() {
        return ChunkOutcome::Skipped;
    }

    let blocks = read_chunk_payload(&mut Cursor::new(data), location)
        .and_then(|payload| decompress_chunk(&payload, options.max_inflated_length))
        .and_then(|tags| assemble_chunk(&tags));

    match blocks {
        Ok(blocks) => ChunkOutcome::Loaded(blocks),
        Err(error) => ChunkOutcome::Failed(error),
    }
}
