// Portal transform registry.
//
// Nine slots, each optionally holding a 4x4 homogeneous transform that maps
// a point in the entry portal's frame to the exit frame. Grid cells name a
// slot through `BlockType::Portal(i)`.
//
// Matrix convention: transforms are authored row-major (the way they read on
// the page, translation in the last column), act on column vectors
// (`p' = M * p`), are stored as cgmath's column-major `Matrix4`, and are
// exported row-major again. `set_rows` and `row_major` are the only two
// places that know about the transpose.
//
// Collision does not teleport anything yet: a portal cell reached by a sweep
// is handed to the `PortalHook` in `collision.rs`, whose default reports the
// traversal as unimplemented.

use crate::error::SimError;
use crate::types::MAX_PORTALS;
use cgmath::{Matrix, Matrix4, Point3, Transform};
use log::debug;

/// Indexed collection of portal transforms.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PortalRegistry {
    slots: [Option<Matrix4<f32>>; MAX_PORTALS],
}

impl PortalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set slot `index` from a row-major matrix.
    pub fn set_rows(&mut self, index: u8, rows: [[f32; 4]; 4]) -> Result<(), SimError> {
        // `From<[[f32; 4]; 4]>` reads each inner array as a column.
        self.set(index, Matrix4::from(rows).transpose())
    }

    /// Set slot `index`. The bottom row must be `[0, 0, 0, 1]` and every
    /// entry finite.
    pub fn set(&mut self, index: u8, transform: Matrix4<f32>) -> Result<(), SimError> {
        let slot = self
            .slots
            .get_mut(index as usize)
            .ok_or(SimError::InvalidPortalIndex(index))?;
        let bottom = transform.row(3);
        let affine = bottom.x == 0.0 && bottom.y == 0.0 && bottom.z == 0.0 && bottom.w == 1.0;
        let finite = (0..4).all(|c| (0..4).all(|r| transform[c][r].is_finite()));
        if !affine || !finite {
            return Err(SimError::InvalidTransform { index });
        }
        debug!("portal {index} set");
        *slot = Some(transform);
        Ok(())
    }

    /// The transform in slot `index`, if it has been set.
    pub fn get(&self, index: u8) -> Option<&Matrix4<f32>> {
        self.slots.get(index as usize).and_then(|s| s.as_ref())
    }

    pub fn is_set(&self, index: u8) -> bool {
        self.get(index).is_some()
    }

    /// Map a point through portal `index`.
    pub fn transform_point(&self, index: u8, point: Point3<f32>) -> Option<Point3<f32>> {
        self.get(index).map(|m| m.transform_point(point))
    }

    /// Slot `index` as 16 floats in row-major order, or `None` if unset.
    pub fn row_major(&self, index: u8) -> Option<[f32; 16]> {
        self.get(index).map(|m| {
            let mut out = [0.0; 16];
            for r in 0..4 {
                for c in 0..4 {
                    out[r * 4 + c] = m[c][r];
                }
            }
            out
        })
    }

    /// Ensure every portal index in `referenced` has a transform.
    pub fn check_referenced(&self, referenced: &[u8]) -> Result<(), SimError> {
        match referenced.iter().find(|&&i| !self.is_set(i)) {
            Some(&i) => Err(SimError::UnsetPortal(i)),
            None => Ok(()),
        }
    }
}
