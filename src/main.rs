//! anvil-terrain: prints a cross-section of a region file's terrain.

use anvil_terrain::compression::DEFAULT_MAX_INFLATED_LENGTH;
use anvil_terrain::terrain::TERRAIN_WIDTH;
use anvil_terrain::{import_region, BlockType, HorizontalSlice, ImportOptions};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

/// Blocks folded into one printed character along each axis.
const DOWNSAMPLE: usize = 4;

#[derive(Parser, Debug)]
#[command(version, about = "Decode a region file and print a horizontal slice of it")]
struct Args {
    /// Region file to read, e.g. r.0.0.mca
    region: PathBuf,

    /// Height of the printed slice.
    #[arg(short, long, default_value_t = 64)]
    y: i32,

    /// Worker threads, 0 for one per CPU.
    #[arg(short, long, default_value_t = 0)]
    threads: usize,

    /// Largest inflated chunk accepted, in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_INFLATED_LENGTH)]
    max_inflated: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let options = ImportOptions::default()
        .with_threads(args.threads)
        .with_max_inflated_length(args.max_inflated);

    let (terrain, report) = import_region(&args.region, &options)
        .with_context(|| format!("Failed to import {}", args.region.display()))?;

    for (position, error) in &report.corrupt {
        log::warn!("Chunk {}, {}: {}", position.x, position.z, error);
    }

    println!(
        "{}: {} chunks loaded, {} absent, {} corrupt, {} unsupported",
        args.region.display(),
        report.loaded,
        report.absent,
        report.corrupt.len(),
        report.unsupported.len()
    );
    println!("Slice at y = {}", args.y);

    print!("{}", render(&terrain.horizontal_slice(args.y)));

    Ok(())
}

/// Draws the slice with one character per `DOWNSAMPLE`² blocks, showing the
/// most common non-air block of each cell.
fn render(slice: &HorizontalSlice) -> String {
    let cells = TERRAIN_WIDTH / DOWNSAMPLE;
    let mut out = String::with_capacity((cells + 1) * cells);

    for cell_z in 0..cells {
        for cell_x in 0..cells {
            let mut counts = [0u16; 256];

            for z in cell_z * DOWNSAMPLE..(cell_z + 1) * DOWNSAMPLE {
                for x in cell_x * DOWNSAMPLE..(cell_x + 1) * DOWNSAMPLE {
                    counts[slice.get(x, z).id() as usize] += 1;
                }
            }

            let block = (1..256)
                .filter(|id| counts[*id] > 0)
                .max_by_key(|id| counts[*id])
                .map_or(BlockType::AIR, |id| BlockType(id as u8));

            out.push(glyph(block));
        }

        out.push('\n');
    }

    out
}

fn glyph(block: BlockType) -> char {
    match block {
        BlockType::AIR => ' ',
        BlockType::STONE | BlockType::COBBLESTONE => '#',
        BlockType::GRASS | BlockType::TALL_GRASS => '"',
        BlockType::DIRT => ':',
        BlockType::BEDROCK => '@',
        BlockType::WATER | BlockType::FLOWING_WATER | BlockType::ICE => '~',
        BlockType::LAVA | BlockType::FLOWING_LAVA => '^',
        BlockType::SAND | BlockType::SANDSTONE => '.',
        BlockType::GRAVEL => ',',
        BlockType::LOG | BlockType::PLANKS => '|',
        BlockType::LEAVES => '*',
        BlockType::SNOW_LAYER => '_',
        _ => '?',
    }
}
