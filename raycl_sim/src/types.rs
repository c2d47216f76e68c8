// Core types shared across the simulation.
//
// Defines spatial coordinates (`VoxelCoord`, `Axis`), the block types that
// occupy grid cells (`BlockType`) and the policy applied beyond the edge of
// the grid (`EdgeType`). Byte encodings here are part of the serialized
// world buffer contract (see `export.rs`), so changing a discriminant is a
// wire-format change for the rendering collaborator.

use cgmath::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A position in the 3D voxel grid. Each component is in voxel units.
///
/// The coordinate system follows the map conventions:
/// - X: east  (positive) / west  (negative)
/// - Y: up    (positive) / down  (negative)
/// - Z: north (positive) / south (negative)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoxelCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The voxel containing a continuous point. Each component is floored,
    /// so `-0.5` lands in voxel `-1`, not `0`.
    pub fn containing(point: Point3<f32>) -> Self {
        Self {
            x: point.x.floor() as i32,
            y: point.y.floor() as i32,
            z: point.z.floor() as i32,
        }
    }

    pub fn get(self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// This coordinate moved `delta` voxels along `axis`, or `None` if the
    /// component would overflow `i32`.
    pub fn offset(self, axis: Axis, delta: i32) -> Option<Self> {
        let mut out = self;
        let component = match axis {
            Axis::X => &mut out.x,
            Axis::Y => &mut out.y,
            Axis::Z => &mut out.z,
        };
        *component = component.checked_add(delta)?;
        Some(out)
    }
}

impl fmt::Display for VoxelCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One of the three grid axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in storage order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Tie-break priority used by the voxel traversal when the ray crosses
    /// several voxel faces at the same parameter: X, then Z, then Y.
    pub const TRAVERSAL_PRIORITY: [Axis; 3] = [Axis::X, Axis::Z, Axis::Y];

    /// Component index into `Point3` / `Vector3` (`x = 0`, `y = 1`, `z = 2`).
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Block types
// ---------------------------------------------------------------------------

/// Number of portal slots. Portal indices are `0..MAX_PORTALS`.
pub const MAX_PORTALS: usize = 9;

/// First byte of the reserved high sub-range that encodes `Portal(i)`.
/// `Portal(i)` is stored as `PORTAL_BYTE_BASE + i`, so the range runs
/// `247..=255`.
pub const PORTAL_BYTE_BASE: u8 = (256 - MAX_PORTALS) as u8;

/// The content of a single voxel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockType {
    /// Empty space. The only non-blocking block.
    #[default]
    Air,
    Wall,
    /// Decorative (green) wall. Collides exactly like `Wall`.
    WallG,
    /// A cell belonging to portal `i`. The transform lives in the
    /// `PortalRegistry` slot with the same index.
    Portal(u8),
}

impl BlockType {
    /// Whether this block stops movement. Everything except `Air` blocks.
    pub fn is_blocking(self) -> bool {
        self != BlockType::Air
    }

    /// Byte value used in the serialized world buffer. `None` for a portal
    /// index with no slot (`i >= MAX_PORTALS`).
    pub fn to_byte(self) -> Option<u8> {
        match self {
            BlockType::Air => Some(0),
            BlockType::Wall => Some(1),
            BlockType::WallG => Some(2),
            BlockType::Portal(i) if (i as usize) < MAX_PORTALS => Some(PORTAL_BYTE_BASE + i),
            BlockType::Portal(_) => None,
        }
    }

    /// Decode a buffer byte. Returns `None` for bytes outside the defined
    /// encodings.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(BlockType::Air),
            1 => Some(BlockType::Wall),
            2 => Some(BlockType::WallG),
            b if b >= PORTAL_BYTE_BASE => Some(BlockType::Portal(b - PORTAL_BYTE_BASE)),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Edge policy
// ---------------------------------------------------------------------------

/// What lies beyond the edge of the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeType {
    /// Out-of-range space is a solid boundary.
    #[default]
    Wall,
    /// Wrap-around through a transform. Declared for the renderer but has no
    /// collision behavior; the resolver reports it as unimplemented.
    PortalTorus,
    /// Out-of-range space is empty and can be moved through.
    SolidAir,
}

impl EdgeType {
    pub fn to_byte(self) -> u8 {
        match self {
            EdgeType::Wall => 0,
            EdgeType::PortalTorus => 1,
            EdgeType::SolidAir => 2,
        }
    }
}
