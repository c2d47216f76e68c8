// State handed to the rendering collaborator after each tick.
//
// Two records:
//
// - The **world buffer**: a fixed `WORLD_BUFFER_SIZE` byte allocation,
//   whatever the grid size, laid out as
//
//     [0..4)            header: size_x, size_y, size_z, edge type byte
//     [4..4+n)          n = size_x*size_y*size_z block bytes, x fastest,
//                       z slowest
//     [4+n..4+n+576)    portal table: 9 slots x 64 bytes, each 16
//                       little-endian f32 in row-major order; unset slots
//                       are zero
//     rest              zero
//
//   The portal table follows the blocks directly, so the largest grid that
//   fits is `MAX_GRID_VOXELS`. `VoxelGrid::new` enforces that bound.
//
// - The **camera pose**: a `#[repr(C)]` plain-old-data record with yaw,
//   pitch, position and both fields of view, uploadable as raw bytes.
//
// A `Frame` bundles both and is only produced between ticks (see
// `World::frame`), so the consumer never reads a half-advanced state.

use crate::grid::VoxelGrid;
use crate::portal::PortalRegistry;
use crate::types::MAX_PORTALS;
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Total size of the serialized world buffer (16 KiB).
pub const WORLD_BUFFER_SIZE: usize = 16 * 1024;
pub const HEADER_SIZE: usize = 4;
/// Bytes per portal slot: a 4x4 matrix of f32.
pub const PORTAL_SLOT_SIZE: usize = 16 * 4;
pub const PORTAL_TABLE_SIZE: usize = MAX_PORTALS * PORTAL_SLOT_SIZE;
/// Largest voxel count whose blocks and portal table fit the buffer.
pub const MAX_GRID_VOXELS: usize = WORLD_BUFFER_SIZE - HEADER_SIZE - PORTAL_TABLE_SIZE;

/// Serialize the grid and portal table into the fixed-size world buffer.
pub fn write_world_buffer(grid: &VoxelGrid, portals: &PortalRegistry) -> Vec<u8> {
    let mut buf = vec![0u8; WORLD_BUFFER_SIZE];
    let (sx, sy, sz) = grid.size();
    // Sizes are validated to fit a byte at grid construction.
    buf[0] = sx as u8;
    buf[1] = sy as u8;
    buf[2] = sz as u8;
    buf[3] = grid.edge_type().to_byte();

    let blocks = grid.blocks();
    let table_start = HEADER_SIZE + blocks.len();
    // `VoxelGrid::set` only stores portals with a slot, so every cell encodes.
    for (dst, block) in buf[HEADER_SIZE..table_start].iter_mut().zip(blocks) {
        *dst = block.to_byte().unwrap_or_default();
    }

    for index in 0..MAX_PORTALS as u8 {
        let Some(matrix) = portals.row_major(index) else {
            continue;
        };
        let slot = table_start + index as usize * PORTAL_SLOT_SIZE;
        for (i, value) in matrix.iter().enumerate() {
            let at = slot + i * 4;
            buf[at..at + 4].copy_from_slice(&value.to_le_bytes());
        }
    }
    buf
}

/// Camera pose as read by the renderer each tick.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct CameraPose {
    pub yaw: f32,
    pub pitch: f32,
    pub position: [f32; 3],
    pub fov_x: f32,
    pub fov_y: f32,
}

impl CameraPose {
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Everything the renderer reads for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub world: Vec<u8>,
    pub camera: CameraPose,
}
