// Dense 3D voxel grid for the world.
//
// The grid is stored as a flat `Vec<BlockType>` indexed by
// `x + y * size_x + z * size_x * size_y` (x fastest, z slowest), which is the
// same order the blocks are written into the serialized world buffer, so
// export is a straight copy.
//
// Unlike a raw buffer cast, every read and write is bounds-checked and fails
// with `SimError::OutOfBounds`. What out-of-range space *means* for movement
// is decided by the collision layer from `edge_type`; the grid itself never
// invents blocks beyond its edge.
//
// The grid size is fixed at construction. Dimensions must fit in a header
// byte and the total voxel count must fit the fixed-size export buffer.
//
// See also: `collision.rs` for the edge policy, `export.rs` for the buffer
// layout, `maps.rs` for the authoring code that fills the grid.

use crate::error::SimError;
use crate::export::MAX_GRID_VOXELS;
use crate::types::{BlockType, EdgeType, MAX_PORTALS, VoxelCoord};
use cgmath::Point3;
use std::ops::Range;

/// Dense, fixed-size 3D voxel grid.
#[derive(Clone, Debug)]
pub struct VoxelGrid {
    /// Flat storage: index = x + y * size_x + z * size_x * size_y.
    blocks: Vec<BlockType>,
    size_x: u32,
    size_y: u32,
    size_z: u32,
    edge_type: EdgeType,
}

impl VoxelGrid {
    /// Create a grid filled with `Air`.
    pub fn new(
        size_x: u32,
        size_y: u32,
        size_z: u32,
        edge_type: EdgeType,
    ) -> Result<Self, SimError> {
        let size = (size_x, size_y, size_z);
        let dims_ok = [size_x, size_y, size_z]
            .iter()
            .all(|&d| d > 0 && d <= u8::MAX as u32);
        if !dims_ok {
            return Err(SimError::InvalidGridSize { size });
        }
        let total = (size_x as usize) * (size_y as usize) * (size_z as usize);
        if total > MAX_GRID_VOXELS {
            return Err(SimError::InvalidGridSize { size });
        }
        Ok(Self {
            blocks: vec![BlockType::Air; total],
            size_x,
            size_y,
            size_z,
            edge_type,
        })
    }

    pub fn size(&self) -> (u32, u32, u32) {
        (self.size_x, self.size_y, self.size_z)
    }

    /// Grid extent as floats, in axis order. Handy for per-axis range checks
    /// on continuous positions.
    pub fn extent(&self) -> [f32; 3] {
        [self.size_x as f32, self.size_y as f32, self.size_z as f32]
    }

    pub fn edge_type(&self) -> EdgeType {
        self.edge_type
    }

    /// Check whether a coordinate is within bounds.
    pub fn contains(&self, coord: VoxelCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.z >= 0
            && (coord.x as u32) < self.size_x
            && (coord.y as u32) < self.size_y
            && (coord.z as u32) < self.size_z
    }

    /// Check whether a continuous point lies inside `[0, size)` on every
    /// axis. NaN components are outside.
    pub fn contains_point(&self, point: Point3<f32>) -> bool {
        let extent = self.extent();
        (0..3).all(|i| (0.0..extent[i]).contains(&point[i]))
    }

    fn index(&self, coord: VoxelCoord) -> Result<usize, SimError> {
        if !self.contains(coord) {
            return Err(SimError::OutOfBounds {
                coord,
                size: self.size(),
            });
        }
        let sx = self.size_x as usize;
        let sy = self.size_y as usize;
        Ok(coord.x as usize + coord.y as usize * sx + coord.z as usize * sx * sy)
    }

    /// Read a voxel.
    pub fn get(&self, coord: VoxelCoord) -> Result<BlockType, SimError> {
        self.index(coord).map(|i| self.blocks[i])
    }

    /// Write a voxel. Portal blocks must name a valid portal slot.
    pub fn set(&mut self, coord: VoxelCoord, block: BlockType) -> Result<(), SimError> {
        if let BlockType::Portal(i) = block
            && i as usize >= MAX_PORTALS
        {
            return Err(SimError::InvalidPortalIndex(i));
        }
        let i = self.index(coord)?;
        self.blocks[i] = block;
        Ok(())
    }

    /// Read the voxel containing a continuous point.
    pub fn get_at(&self, point: Point3<f32>) -> Result<BlockType, SimError> {
        self.get(VoxelCoord::containing(point))
    }

    /// Write the voxel containing a continuous point.
    pub fn set_at(&mut self, point: Point3<f32>, block: BlockType) -> Result<(), SimError> {
        self.set(VoxelCoord::containing(point), block)
    }

    /// Fill the box `xs × ys × zs` (half-open ranges) with `block`. Fails on
    /// the first out-of-range cell; cells before it stay written.
    pub fn fill_box(
        &mut self,
        xs: Range<i32>,
        ys: Range<i32>,
        zs: Range<i32>,
        block: BlockType,
    ) -> Result<(), SimError> {
        for z in zs {
            for y in ys.clone() {
                for x in xs.clone() {
                    self.set(VoxelCoord::new(x, y, z), block)?;
                }
            }
        }
        Ok(())
    }

    /// All blocks in storage (and export) order.
    pub fn blocks(&self) -> &[BlockType] {
        &self.blocks
    }

    /// Every portal index referenced by at least one cell, ascending.
    pub fn referenced_portals(&self) -> Vec<u8> {
        let mut seen = [false; MAX_PORTALS];
        for block in &self.blocks {
            if let BlockType::Portal(i) = block {
                seen[*i as usize] = true;
            }
        }
        (0..MAX_PORTALS as u8).filter(|&i| seen[i as usize]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_all_air() {
        let grid = VoxelGrid::new(4, 4, 4, EdgeType::Wall).unwrap();
        for x in 0..4 {
            for y in 0..4 {
                for z in 0..4 {
                    assert_eq!(grid.get(VoxelCoord::new(x, y, z)).unwrap(), BlockType::Air);
                }
            }
        }
    }

    #[test]
    fn set_and_get() {
        let mut grid = VoxelGrid::new(8, 8, 8, EdgeType::Wall).unwrap();
        let coord = VoxelCoord::new(3, 5, 2);
        grid.set(coord, BlockType::Wall).unwrap();
        assert_eq!(grid.get(coord).unwrap(), BlockType::Wall);
        // Neighbors are still air.
        assert_eq!(grid.get(VoxelCoord::new(3, 5, 3)).unwrap(), BlockType::Air);
    }

    #[test]
    fn out_of_bounds_read_fails() {
        let grid = VoxelGrid::new(4, 4, 4, EdgeType::Wall).unwrap();
        for coord in [
            VoxelCoord::new(-1, 0, 0),
            VoxelCoord::new(0, -1, 0),
            VoxelCoord::new(4, 0, 0),
            VoxelCoord::new(0, 0, 4),
            VoxelCoord::new(100, 100, 100),
        ] {
            assert!(matches!(
                grid.get(coord),
                Err(SimError::OutOfBounds { .. })
            ));
        }
    }

    #[test]
    fn out_of_bounds_write_fails_and_changes_nothing() {
        let mut grid = VoxelGrid::new(4, 4, 4, EdgeType::Wall).unwrap();
        assert!(grid.set(VoxelCoord::new(4, 0, 0), BlockType::Wall).is_err());
        assert!(grid.blocks().iter().all(|b| *b == BlockType::Air));
    }

    #[test]
    fn float_access_floors() {
        let mut grid = VoxelGrid::new(4, 4, 4, EdgeType::Wall).unwrap();
        grid.set_at(Point3::new(2.9, 0.1, 1.0), BlockType::WallG).unwrap();
        assert_eq!(grid.get(VoxelCoord::new(2, 0, 1)).unwrap(), BlockType::WallG);
        // -0.5 floors to -1, which is out of range.
        assert!(grid.get_at(Point3::new(-0.5, 0.5, 0.5)).is_err());
    }

    #[test]
    fn contains_point_uses_half_open_extent() {
        let grid = VoxelGrid::new(4, 2, 4, EdgeType::Wall).unwrap();
        assert!(grid.contains_point(Point3::new(0.0, 0.0, 0.0)));
        assert!(grid.contains_point(Point3::new(3.99, 1.5, 2.0)));
        assert!(!grid.contains_point(Point3::new(4.0, 1.0, 1.0)));
        assert!(!grid.contains_point(Point3::new(1.0, -0.01, 1.0)));
        assert!(!grid.contains_point(Point3::new(1.0, 1.0, f32::NAN)));
    }

    #[test]
    fn indexing_is_x_fastest_z_slowest() {
        let mut grid = VoxelGrid::new(3, 4, 5, EdgeType::Wall).unwrap();
        grid.set(VoxelCoord::new(1, 2, 3), BlockType::Wall).unwrap();
        let idx = 1 + 2 * 3 + 3 * 3 * 4;
        assert_eq!(grid.blocks()[idx], BlockType::Wall);
        assert_eq!(grid.blocks().iter().filter(|b| b.is_blocking()).count(), 1);
    }

    #[test]
    fn rejects_unstorable_sizes() {
        assert!(VoxelGrid::new(0, 4, 4, EdgeType::Wall).is_err());
        assert!(VoxelGrid::new(256, 1, 1, EdgeType::Wall).is_err());
        // 32 * 16 * 31 voxels do not fit the export buffer next to the portal table.
        assert!(VoxelGrid::new(32, 16, 31, EdgeType::Wall).is_err());
        assert!(VoxelGrid::new(32, 16, 30, EdgeType::Wall).is_ok());
    }

    #[test]
    fn rejects_portal_index_past_last_slot() {
        let mut grid = VoxelGrid::new(4, 4, 4, EdgeType::Wall).unwrap();
        let coord = VoxelCoord::new(0, 0, 0);
        assert!(matches!(
            grid.set(coord, BlockType::Portal(9)),
            Err(SimError::InvalidPortalIndex(9))
        ));
        grid.set(coord, BlockType::Portal(8)).unwrap();
    }

    #[test]
    fn fill_box_is_half_open() {
        let mut grid = VoxelGrid::new(8, 8, 8, EdgeType::Wall).unwrap();
        grid.fill_box(1..3, 0..1, 2..4, BlockType::Wall).unwrap();
        assert_eq!(grid.blocks().iter().filter(|b| b.is_blocking()).count(), 4);
        assert_eq!(grid.get(VoxelCoord::new(3, 0, 2)).unwrap(), BlockType::Air);
        assert!(grid.fill_box(7..9, 0..1, 0..1, BlockType::Wall).is_err());
    }

    #[test]
    fn referenced_portals_are_sorted_and_unique() {
        let mut grid = VoxelGrid::new(8, 8, 8, EdgeType::Wall).unwrap();
        grid.set(VoxelCoord::new(0, 0, 0), BlockType::Portal(2)).unwrap();
        grid.set(VoxelCoord::new(1, 0, 0), BlockType::Portal(0)).unwrap();
        grid.set(VoxelCoord::new(2, 0, 0), BlockType::Portal(2)).unwrap();
        assert_eq!(grid.referenced_portals(), vec![0, 2]);
    }
}
