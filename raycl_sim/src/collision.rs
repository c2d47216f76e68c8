// Collision resolution for moving bodies.
//
// `legal_move` takes a body and a proposed position and returns the position
// the body may actually occupy this tick. It is a discrete, per-tick resolver:
// nothing is swept along the path from the old position to the new one, so a
// fast enough body can skip through a thin wall. That limitation is accepted.
//
// A body already outside the grid is refused with `SimError::OutOfBounds`
// (except under `EdgeType::SolidAir`), so results stay inside the grid.
//
// Resolution runs in three stages:
//
//   1. **Edge policy, per axis.** A proposed coordinate outside `[0, size)`
//      is reverted to the body's current coordinate under `EdgeType::Wall`,
//      left alone under `EdgeType::SolidAir` (out-of-range space then reads
//      as empty), and rejected as unimplemented under `EdgeType::PortalTorus`.
//      If every axis was reverted the body stays put with no further checks.
//
//   2. **Staircase climb.** Only for `CollisionMode::Full` bodies that have a
//      foot (`hover_height > 0`) and an axis-aligned up vector. If the foot
//      point lands in a blocking voxel but the voxel one step "up" is free,
//      the foot is snapped onto the top of the blocking voxel and the center
//      is moved with it. This is how a walking body mounts single-voxel steps
//      and how a falling body comes to rest on the floor.
//
//   3. **Foot-to-center sweep.** The center voxel is tested, then every voxel
//      from the foot up to (not including) the center voxel is walked with
//      `trace_segment`. Any blocking voxel rejects the whole move: the body
//      keeps its previous position on all three axes.
//
// `CollisionMode::CenterOnly` skips stages 2 and 3 and only tests the center
// voxel, for bodies without meaningful height such as free-floating cameras.
//
// Portal cells are blocking in the data model, but what a sweep should do on
// reaching one (re-seed the sweep in the exit frame) has not been designed.
// Every portal voxel a sweep touches is therefore routed through a
// `PortalHook`. The default hook reports the traversal as unimplemented;
// `SolidPortals` is an explicit opt-in that treats portals as walls.
//
// See also: `traversal.rs` for the DDA walk, `physics.rs` for the caller that
// turns rejected axes into zeroed velocity.

use crate::error::SimError;
use crate::grid::VoxelGrid;
use crate::physics::PhysicalState;
use crate::portal::PortalRegistry;
use crate::traversal::trace_segment;
use crate::types::{Axis, BlockType, EdgeType, VoxelCoord};
use cgmath::{Matrix4, Point3};
use log::trace;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Distance the foot is pushed past a voxel boundary when stepping onto a
/// block with an inverted (negative) up axis.
pub const CLIMB_EPSILON: f32 = 1e-4;

/// Which collision checks a body gets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionMode {
    /// Foot-to-center sweep with staircase climbing.
    #[default]
    Full,
    /// Only the voxel containing the center is tested.
    CenterOnly,
}

// ---------------------------------------------------------------------------
// Portal extension point
// ---------------------------------------------------------------------------

/// Decides how a collision check treats a portal voxel.
///
/// A later increment that implements portal traversal plugs in here; it
/// receives the slot's transform so it can re-seed the sweep in the exit
/// frame.
pub trait PortalHook: fmt::Debug {
    /// Returns whether the portal voxel at `at` blocks movement.
    fn blocks(
        &self,
        index: u8,
        transform: Option<&Matrix4<f32>>,
        at: VoxelCoord,
    ) -> Result<bool, SimError>;
}

/// Default hook: portal traversal is not implemented, and says so.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnwiredPortals;

impl PortalHook for UnwiredPortals {
    fn blocks(&self, _: u8, _: Option<&Matrix4<f32>>, _: VoxelCoord) -> Result<bool, SimError> {
        Err(SimError::Unimplemented("portal traversal during collision sweeps"))
    }
}

/// Treats every portal voxel as a wall.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolidPortals;

impl PortalHook for SolidPortals {
    fn blocks(&self, _: u8, _: Option<&Matrix4<f32>>, _: VoxelCoord) -> Result<bool, SimError> {
        Ok(true)
    }
}

/// Config-level choice of portal hook.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortalPolicy {
    /// Reaching a portal voxel fails the tick with `SimError::Unimplemented`.
    #[default]
    Unwired,
    /// Portal voxels collide like walls.
    Solid,
}

impl PortalPolicy {
    pub fn hook(self) -> Box<dyn PortalHook> {
        match self {
            PortalPolicy::Unwired => Box::new(UnwiredPortals),
            PortalPolicy::Solid => Box::new(SolidPortals),
        }
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Read-only view of everything collision needs. Borrowed from the `World`
/// for the duration of a tick.
#[derive(Clone, Copy)]
pub struct CollisionContext<'a> {
    pub grid: &'a VoxelGrid,
    pub portals: &'a PortalRegistry,
    pub hook: &'a dyn PortalHook,
}

impl<'a> CollisionContext<'a> {
    pub fn new(grid: &'a VoxelGrid, portals: &'a PortalRegistry, hook: &'a dyn PortalHook) -> Self {
        Self {
            grid,
            portals,
            hook,
        }
    }

    /// Whether the voxel at `coord` blocks movement, applying the edge
    /// policy to out-of-range coordinates.
    pub fn blocking_at(&self, coord: VoxelCoord) -> Result<bool, SimError> {
        if !self.grid.contains(coord) {
            return match self.grid.edge_type() {
                EdgeType::Wall => Ok(true),
                EdgeType::SolidAir => Ok(false),
                EdgeType::PortalTorus => Err(SimError::Unimplemented("torus edge wrap")),
            };
        }
        match self.grid.get(coord)? {
            BlockType::Portal(i) => self.hook.blocks(i, self.portals.get(i), coord),
            block => Ok(block.is_blocking()),
        }
    }

    /// Whether the voxel containing `point` blocks movement.
    pub fn blocking_point(&self, point: Point3<f32>) -> Result<bool, SimError> {
        self.blocking_at(VoxelCoord::containing(point))
    }
}

/// Resolve a proposed move of `body` to `target`. Returns the committed
/// position: `target` (possibly adjusted by a staircase climb or by edge
/// clamping) or the body's current position if the move is rejected.
///
/// Unless the edge is `SolidAir`, a body that is already outside the grid
/// fails with `SimError::OutOfBounds`, since reverting to its position would
/// leave it outside.
pub fn legal_move(
    ctx: &CollisionContext<'_>,
    body: &PhysicalState,
    target: Point3<f32>,
) -> Result<Point3<f32>, SimError> {
    if ctx.grid.edge_type() != EdgeType::SolidAir && !ctx.grid.contains_point(body.position) {
        return Err(SimError::OutOfBounds {
            coord: VoxelCoord::containing(body.position),
            size: ctx.grid.size(),
        });
    }

    let extent = ctx.grid.extent();
    let mut proposed = target;
    let mut reverted_all = true;

    for axis in Axis::ALL {
        let i = axis.index();
        if (0.0..extent[i]).contains(&target[i]) {
            reverted_all = false;
            continue;
        }
        match ctx.grid.edge_type() {
            EdgeType::Wall => proposed[i] = body.position[i],
            EdgeType::SolidAir => reverted_all = false,
            EdgeType::PortalTorus => return Err(SimError::Unimplemented("torus edge wrap")),
        }
    }

    if reverted_all {
        return Ok(body.position);
    }

    let accepted = match body.collision {
        CollisionMode::CenterOnly => (!ctx.blocking_point(proposed)?).then_some(proposed),
        CollisionMode::Full => resolve_with_foot(ctx, body, proposed)?,
    };

    match accepted {
        Some(position) => Ok(position),
        None => {
            trace!("move to {target:?} rejected; staying at {:?}", body.position);
            Ok(body.position)
        }
    }
}

/// Stages 2 and 3 for a full-collision body. `None` means rejected.
fn resolve_with_foot(
    ctx: &CollisionContext<'_>,
    body: &PhysicalState,
    target: Point3<f32>,
) -> Result<Option<Point3<f32>>, SimError> {
    let uy = body.orientation.uy;
    let hover = body.hover_height;
    let mut center = target;
    let mut foot = center - uy * hover;

    if hover > 0.0
        && let Some((axis, sign)) = body.orientation.vertical_axis()
    {
        let i = axis.index();
        let mut probe = foot;
        probe[i] += sign;
        if ctx.blocking_point(foot)? && !ctx.blocking_point(probe)? {
            foot[i] = if sign > 0.0 {
                foot[i].floor() + 1.0
            } else {
                foot[i].floor() - CLIMB_EPSILON
            };
            center = foot + uy * hover;
            trace!("climb: foot snapped to {} on {axis:?}", foot[i]);
        }
    }

    if ctx.blocking_point(center)? {
        return Ok(None);
    }

    let mut blocked = false;
    let mut failure = None;
    trace_segment(foot, center, |step| match ctx.blocking_at(step.voxel) {
        Ok(true) => {
            blocked = true;
            false
        }
        Ok(false) => true,
        Err(e) => {
            failure = Some(e);
            false
        }
    });
    if let Some(e) = failure {
        return Err(e);
    }

    Ok((!blocked).then_some(center))
}
