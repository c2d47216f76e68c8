// Error type for the simulation crate.
//
// Every fallible operation returns `Result<_, SimError>`. Conditions that the
// model deliberately treats as non-errors are handled at their call sites:
// a zero-length traversal direction just never crosses a voxel face, and a
// FOV toggle during a transition is ignored.

use crate::types::VoxelCoord;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Grid access outside `[0, size)` on some axis.
    #[error("voxel {coord} is outside the {}x{}x{} grid", .size.0, .size.1, .size.2)]
    OutOfBounds {
        coord: VoxelCoord,
        size: (u32, u32, u32),
    },

    /// Grid dimensions that cannot be stored or exported.
    #[error("invalid grid size {}x{}x{}", .size.0, .size.1, .size.2)]
    InvalidGridSize { size: (u32, u32, u32) },

    #[error("portal index {0} is out of range")]
    InvalidPortalIndex(u8),

    /// A portal transform that is not an affine homogeneous matrix.
    #[error("portal {index} transform must be finite with bottom row [0, 0, 0, 1]")]
    InvalidTransform { index: u8 },

    /// A grid cell references a portal slot that was never set.
    #[error("grid references portal {0} but its transform was never set")]
    UnsetPortal(u8),

    /// Behavior that is declared in the data model but has no resolver yet.
    #[error("not implemented: {0}")]
    Unimplemented(&'static str),

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
