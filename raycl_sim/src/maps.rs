// Built-in map authoring.
//
// Maps are produced only through the public mutation API (`VoxelGrid::set`,
// `VoxelGrid::fill_box`, `PortalRegistry::set_rows`), exactly as an external
// map producer would. A map that does not fit the configured world size
// fails with `SimError::OutOfBounds` instead of being clipped.
//
// - `Empty`: all air.
// - `Demo`: a column of alternating air and green blocks, and a house in
//   the high-x, low-z corner with a window and a door.
// - `Testmap1`: the demo column, a staircase up the z=0 wall, the house
//   shifted one voxel toward -x, a floor portal into a mirrored universe
//   (portal 0), and a linked pair of standing portals (1 and 2) with pillars,
//   a roof and a back wall.
//
// Both non-empty maps need at least a 32x16x6 world.

use crate::error::SimError;
use crate::grid::VoxelGrid;
use crate::portal::PortalRegistry;
use crate::types::{BlockType, VoxelCoord};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapKind {
    Empty,
    Demo,
    #[default]
    Testmap1,
}

/// Author `kind` into an (assumed empty) grid and registry.
pub fn build(
    kind: MapKind,
    grid: &mut VoxelGrid,
    portals: &mut PortalRegistry,
) -> Result<(), SimError> {
    match kind {
        MapKind::Empty => {}
        MapKind::Demo => {
            column(grid)?;
            house(grid, 0)?;
        }
        MapKind::Testmap1 => {
            column(grid)?;
            staircase(grid)?;
            house(grid, -1)?;
            mirror_floor_portal(grid, portals)?;
            linked_portal_pair(grid, portals)?;
        }
    }
    debug!("built map {kind:?}");
    Ok(())
}

/// Alternating air and green blocks at x=5, z=5.
fn column(grid: &mut VoxelGrid) -> Result<(), SimError> {
    for y in (1..16).step_by(2) {
        grid.set(VoxelCoord::new(5, y, 5), BlockType::WallG)?;
    }
    Ok(())
}

/// One step per voxel along the z=0 wall, rising toward +x.
fn staircase(grid: &mut VoxelGrid) -> Result<(), SimError> {
    for i in 0..10 {
        grid.set(VoxelCoord::new(i + 5, i, 0), BlockType::Wall)?;
    }
    Ok(())
}

/// House in the high-x, low-z corner, shifted by `dx` along x.
fn house(grid: &mut VoxelGrid, dx: i32) -> Result<(), SimError> {
    // Wall facing +z, with a window.
    for x in 25 + dx..32 + dx {
        for y in 0..5 {
            if x != 27 + dx || y != 1 {
                grid.set(VoxelCoord::new(x, y, 5), BlockType::Wall)?;
            }
        }
    }
    // Ceiling.
    grid.fill_box(25 + dx..32 + dx, 5..6, 0..5, BlockType::Wall)?;
    // Front, with a door.
    for z in 0..6 {
        for y in 0..5 {
            if z != 2 || y > 1 {
                grid.set(VoxelCoord::new(24 + dx, y, z), BlockType::Wall)?;
            }
        }
    }
    Ok(())
}

/// Portal 0: a patch of floor looking into a universe mirrored in x.
fn mirror_floor_portal(
    grid: &mut VoxelGrid,
    portals: &mut PortalRegistry,
) -> Result<(), SimError> {
    portals.set_rows(
        0,
        [
            [-1.0, 0.0, 0.0, 20.0],
            [0.0, 1.0, 0.0, 10.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    )?;
    grid.fill_box(8..12, 0..1, 8..12, BlockType::Portal(0))
}

/// Portals 1 and 2: two standing doorways ten voxels apart in x, each
/// leading to the other.
fn linked_portal_pair(
    grid: &mut VoxelGrid,
    portals: &mut PortalRegistry,
) -> Result<(), SimError> {
    grid.fill_box(20..22, 0..3, 20..22, BlockType::Portal(1))?;
    for (x, z) in [(19, 19), (19, 22), (22, 19), (22, 22)] {
        grid.fill_box(x..x + 1, 0..3, z..z + 1, BlockType::Wall)?;
    }
    grid.fill_box(19..23, 3..4, 19..23, BlockType::Wall)?;
    portals.set_rows(1, translate_x(-10.0))?;

    grid.fill_box(10..12, 0..3, 20..22, BlockType::Portal(2))?;
    grid.fill_box(9..10, 0..4, 19..23, BlockType::WallG)?;
    portals.set_rows(2, translate_x(10.0))?;
    Ok(())
}

fn translate_x(dx: f32) -> [[f32; 4]; 4] {
    [
        [1.0, 0.0, 0.0, dx],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EdgeType;
    use cgmath::Point3;

    fn built(kind: MapKind) -> (VoxelGrid, PortalRegistry) {
        let mut grid = VoxelGrid::new(32, 16, 30, EdgeType::Wall).unwrap();
        let mut portals = PortalRegistry::new();
        build(kind, &mut grid, &mut portals).unwrap();
        (grid, portals)
    }

    fn at(grid: &VoxelGrid, x: i32, y: i32, z: i32) -> BlockType {
        grid.get(VoxelCoord::new(x, y, z)).unwrap()
    }

    #[test]
    fn empty_map_is_all_air() {
        let (grid, portals) = built(MapKind::Empty);
        assert!(grid.blocks().iter().all(|b| *b == BlockType::Air));
        assert!(!portals.is_set(0));
    }

    #[test]
    fn demo_column_alternates() {
        let (grid, _) = built(MapKind::Demo);
        assert_eq!(at(&grid, 5, 0, 5), BlockType::Air);
        assert_eq!(at(&grid, 5, 1, 5), BlockType::WallG);
        assert_eq!(at(&grid, 5, 2, 5), BlockType::Air);
        assert_eq!(at(&grid, 5, 15, 5), BlockType::WallG);
    }

    #[test]
    fn demo_house_has_window_and_door() {
        let (grid, _) = built(MapKind::Demo);
        assert_eq!(at(&grid, 26, 1, 5), BlockType::Wall);
        assert_eq!(at(&grid, 27, 1, 5), BlockType::Air);
        assert_eq!(at(&grid, 24, 0, 2), BlockType::Air);
        assert_eq!(at(&grid, 24, 1, 2), BlockType::Air);
        assert_eq!(at(&grid, 24, 2, 2), BlockType::Wall);
        assert_eq!(at(&grid, 28, 5, 3), BlockType::Wall);
        assert_eq!(at(&grid, 31, 4, 5), BlockType::Wall);
    }

    #[test]
    fn testmap_staircase_climbs_along_z0() {
        let (grid, _) = built(MapKind::Testmap1);
        for i in 0..10 {
            assert_eq!(at(&grid, i + 5, i, 0), BlockType::Wall);
            assert_eq!(at(&grid, i + 5, i + 1, 0), BlockType::Air);
        }
    }

    #[test]
    fn testmap_house_is_shifted() {
        let (grid, _) = built(MapKind::Testmap1);
        assert_eq!(at(&grid, 26, 1, 5), BlockType::Air);
        assert_eq!(at(&grid, 23, 3, 0), BlockType::Wall);
        assert_eq!(at(&grid, 31, 0, 5), BlockType::Air);
    }

    #[test]
    fn testmap_portals_are_registered_and_referenced() {
        let (grid, portals) = built(MapKind::Testmap1);
        assert_eq!(grid.referenced_portals(), vec![0, 1, 2]);
        assert!(portals.check_referenced(&grid.referenced_portals()).is_ok());
        assert_eq!(at(&grid, 9, 0, 9), BlockType::Portal(0));
        assert_eq!(at(&grid, 21, 2, 21), BlockType::Portal(1));
        assert_eq!(at(&grid, 10, 0, 20), BlockType::Portal(2));
        assert_eq!(at(&grid, 9, 3, 22), BlockType::WallG);
        assert_eq!(at(&grid, 22, 3, 22), BlockType::Wall);
    }

    #[test]
    fn linked_portals_map_onto_each_other() {
        let (_, portals) = built(MapKind::Testmap1);
        let p = Point3::new(20.5, 1.0, 20.5);
        let there = portals.transform_point(1, p).unwrap();
        assert_eq!(there, Point3::new(10.5, 1.0, 20.5));
        assert_eq!(portals.transform_point(2, there).unwrap(), p);
    }

    #[test]
    fn map_larger_than_world_is_rejected() {
        let mut grid = VoxelGrid::new(16, 16, 16, EdgeType::Wall).unwrap();
        let mut portals = PortalRegistry::new();
        assert!(matches!(
            build(MapKind::Demo, &mut grid, &mut portals),
            Err(SimError::OutOfBounds { .. })
        ));
    }
}
