use crate::REGION_WIDTH;

/// Chunk coordinates local to a region, both in `0..32`.
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Hash)]
pub struct RegionChunkPosition {
    pub x: u8,
    pub z: u8,
}

impl RegionChunkPosition {
    pub fn new(x: u8, z: u8) -> RegionChunkPosition {
        debug_assert!(32 > x, "Region chunk x coordinate out of bounds");
        debug_assert!(32 > z, "Region chunk z coordinate out of bounds");

        RegionChunkPosition { x, z }
    }

    /// Wraps world chunk coordinates into the region, like the location
    /// table does.
    pub fn from_chunk_position(chunk_x: i32, chunk_z: i32) -> RegionChunkPosition {
        let x = (chunk_x & 31) as u8;
        let z = (chunk_z & 31) as u8;

        RegionChunkPosition::new(x, z)
    }

    /// Position of the `index`th location table entry.
    pub fn from_index(index: usize) -> RegionChunkPosition {
        debug_assert!(REGION_WIDTH * REGION_WIDTH > index);

        RegionChunkPosition::new((index % REGION_WIDTH) as u8, (index / REGION_WIDTH) as u8)
    }

    /// Index into the location table and the terrain grid.
    pub fn index(&self) -> usize {
        self.x as usize + self.z as usize * REGION_WIDTH
    }

    /// Every position of a region in location table order.
    pub fn all() -> impl Iterator<Item = RegionChunkPosition> {
        (0..REGION_WIDTH * REGION_WIDTH).map(RegionChunkPosition::from_index)
    }
}

#[cfg(test)]
mod tests {
    use crate::position::RegionChunkPosition;

    #[test]
    fn test_wrap_world_coordinates() {
        let position = RegionChunkPosition::from_chunk_position(-1, 33);

        assert_eq!(position, RegionChunkPosition::new(31, 1));
        assert_eq!(position.index(), 31 + 32);
    }

    #[test]
    fn test_index_round_trip() {
        for (index, position) in RegionChunkPosition::all().enumerate() {
            assert_eq!(position.index(), index);
        }

        assert_eq!(RegionChunkPosition::all().count(), 1024);
    }
}
