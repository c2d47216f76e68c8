// Physical state and per-tick integration for simulated bodies.
//
// Every simulated body carries a `PhysicalState`: a continuous position, an
// orientation basis, a hover height (center to foot), a velocity, its own
// gravity vector and a `supported` flag recomputed each tick.
//
// `advance` integrates one tick of explicit Euler:
//
//   velocity += gravity * dt
//   naive     = position + velocity * dt
//   resolved  = legal_move(naive)
//
// then zeroes the velocity on every axis where `resolved != naive` (fully
// inelastic: no bounce, no friction), and sets `supported` iff the vertical
// axis was one of them. `dt` is the caller's elapsed time, so results depend
// on frame timing; there is no fixed-step accumulator.
//
// Gravity and "up" are per body rather than global so that a portal can
// later reorient a body. Staircase climbing and support detection assume the
// up vector is axis-aligned; a tilted body never climbs and is never
// supported.
//
// Walking is not part of the integration. The entity applies its walking
// intent afterwards as a separate `move_to`, so a body resting on the floor
// (whose foot dips a hair below it under gravity every tick) still meets a
// step from exactly floor level and can climb it.
//
// See also: `collision.rs` for `legal_move`, `entity.rs` for the per-tick
// order of integration, jumping and walking.

use crate::collision::{CollisionContext, CollisionMode, legal_move};
use crate::error::SimError;
use crate::types::Axis;
use cgmath::{InnerSpace, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Default per-body gravity, in voxels per second squared.
pub const DEFAULT_GRAVITY: [f32; 3] = [0.0, -10.0, 0.0];

/// A body's local basis. `uy` is "up": the foot hangs below the center along
/// `-uy` and jumps push along `+uy`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    /// Side axis.
    pub ux: Vector3<f32>,
    /// Up axis.
    pub uy: Vector3<f32>,
    /// Forward axis.
    pub uz: Vector3<f32>,
}

impl Orientation {
    pub fn identity() -> Self {
        Self {
            ux: Vector3::unit_x(),
            uy: Vector3::unit_y(),
            uz: Vector3::unit_z(),
        }
    }

    /// The grid axis `uy` lies along and its sign, if exactly one component
    /// of `uy` is non-zero.
    pub fn vertical_axis(&self) -> Option<(Axis, f32)> {
        let mut found = None;
        for axis in Axis::ALL {
            let c = self.uy[axis.index()];
            if c != 0.0 {
                if found.is_some() {
                    return None;
                }
                found = Some((axis, c.signum()));
            }
        }
        found
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::identity()
    }
}

/// Position, motion and collision shape of one body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicalState {
    pub position: Point3<f32>,
    pub orientation: Orientation,
    /// Distance from the center to the foot sample point along `-uy`.
    pub hover_height: f32,
    /// Rendering hint only. Collision treats bodies as a foot-to-center segment.
    pub radius: f32,
    pub velocity: Vector3<f32>,
    pub gravity: Vector3<f32>,
    /// Whether vertical motion was blocked last tick. Gates jumping.
    pub supported: bool,
    pub collision: CollisionMode,
}

impl PhysicalState {
    /// A body at rest at `position` with identity orientation and default
    /// gravity.
    pub fn new(position: Point3<f32>, hover_height: f32, radius: f32) -> Self {
        Self {
            position,
            orientation: Orientation::identity(),
            hover_height,
            radius,
            velocity: Vector3::new(0.0, 0.0, 0.0),
            gravity: DEFAULT_GRAVITY.into(),
            supported: false,
            collision: CollisionMode::Full,
        }
    }

    /// The foot sample point.
    pub fn foot(&self) -> Point3<f32> {
        self.position - self.orientation.uy * self.hover_height
    }

    /// Integrate one tick of `t` milliseconds. On error the body is left
    /// exactly as it was.
    pub fn advance(&mut self, ctx: &CollisionContext<'_>, t: f32) -> Result<(), SimError> {
        let dt = t / 1000.0;
        let mut velocity = self.velocity + self.gravity * dt;
        let naive = self.position + velocity * dt;
        let resolved = legal_move(ctx, self, naive)?;

        for axis in Axis::ALL {
            let i = axis.index();
            if resolved[i] != naive[i] {
                velocity[i] = 0.0;
            }
        }
        self.supported = self
            .orientation
            .vertical_axis()
            .is_some_and(|(axis, _)| resolved[axis.index()] != naive[axis.index()]);
        self.velocity = velocity;
        self.position = resolved;
        Ok(())
    }

    /// Move directly toward `target` without integrating velocity. Returns
    /// whether the body moved.
    pub fn move_to(
        &mut self,
        ctx: &CollisionContext<'_>,
        target: Point3<f32>,
    ) -> Result<bool, SimError> {
        let resolved = legal_move(ctx, self, target)?;
        let moved = resolved != self.position;
        self.position = resolved;
        Ok(moved)
    }

    /// Set the velocity component along `uy` to `speed`. Only allowed while
    /// supported; returns whether the jump happened.
    pub fn jump(&mut self, speed: f32) -> bool {
        if !self.supported {
            return false;
        }
        let uy = self.orientation.uy;
        self.velocity += uy * (speed - self.velocity.dot(uy));
        self.supported = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::UnwiredPortals;
    use crate::grid::VoxelGrid;
    use crate::portal::PortalRegistry;
    use crate::types::{BlockType, EdgeType, VoxelCoord};

    const TICK_MS: f32 = 30.0;

    fn with_ctx<R>(grid: &VoxelGrid, f: impl FnOnce(&CollisionContext<'_>) -> R) -> R {
        let portals = PortalRegistry::new();
        let ctx = CollisionContext::new(grid, &portals, &UnwiredPortals);
        f(&ctx)
    }

    fn floor_grid() -> VoxelGrid {
        VoxelGrid::new(10, 10, 10, EdgeType::Wall).unwrap()
    }

    #[test]
    fn identity_orientation_is_y_up() {
        let o = Orientation::identity();
        assert_eq!(o.vertical_axis(), Some((Axis::Y, 1.0)));
    }

    #[test]
    fn tilted_orientation_has_no_vertical_axis() {
        let mut o = Orientation::identity();
        o.uy = Vector3::new(0.0, 0.8, 0.6);
        assert_eq!(o.vertical_axis(), None);
        o.uy = Vector3::new(0.0, 0.0, -1.0);
        assert_eq!(o.vertical_axis(), Some((Axis::Z, -1.0)));
    }

    #[test]
    fn free_fall_accelerates() {
        let grid = floor_grid();
        let mut body = PhysicalState::new(Point3::new(5.5, 8.5, 5.5), 1.5, 0.25);
        with_ctx(&grid, |ctx| {
            body.advance(ctx, TICK_MS).unwrap();
        });
        assert!((body.velocity.y - -0.3).abs() < 1e-6);
        assert!(body.position.y < 8.5);
        assert!(!body.supported);
    }

    #[test]
    fn lands_on_floor_and_becomes_supported() {
        let grid = floor_grid();
        let mut body = PhysicalState::new(Point3::new(5.5, 3.0, 5.5), 1.5, 0.25);
        with_ctx(&grid, |ctx| {
            for _ in 0..100 {
                body.advance(ctx, TICK_MS).unwrap();
            }
        });
        assert!(body.supported);
        assert_eq!(body.velocity.y, 0.0);
        assert!((body.foot().y - 0.0).abs() < 1e-5);
    }

    #[test]
    fn resting_body_stays_put() {
        let grid = floor_grid();
        let mut body = PhysicalState::new(Point3::new(5.5, 1.5, 5.5), 1.5, 0.25);
        with_ctx(&grid, |ctx| {
            for _ in 0..10 {
                body.advance(ctx, TICK_MS).unwrap();
                assert_eq!(body.position, Point3::new(5.5, 1.5, 5.5));
                assert!(body.supported);
            }
        });
    }

    #[test]
    fn blocked_axes_lose_velocity() {
        let mut grid = floor_grid();
        grid.set(VoxelCoord::new(6, 1, 5), BlockType::Wall).unwrap();
        grid.set(VoxelCoord::new(6, 0, 5), BlockType::Wall).unwrap();
        let mut body = PhysicalState::new(Point3::new(5.9, 1.5, 5.5), 1.5, 0.25);
        body.velocity = Vector3::new(5.0, 0.0, 0.0);
        with_ctx(&grid, |ctx| {
            body.advance(ctx, TICK_MS).unwrap();
        });
        assert_eq!(body.position, Point3::new(5.9, 1.5, 5.5));
        assert_eq!(body.velocity.x, 0.0);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn jump_requires_support() {
        let mut body = PhysicalState::new(Point3::new(1.5, 5.0, 1.5), 1.5, 0.25);
        assert!(!body.jump(5.0));
        assert_eq!(body.velocity.y, 0.0);
        body.supported = true;
        assert!(body.jump(5.0));
        assert_eq!(body.velocity.y, 5.0);
        assert!(!body.supported);
        assert!(!body.jump(5.0));
    }

    #[test]
    fn jump_then_fall_back_to_floor() {
        let grid = floor_grid();
        let mut body = PhysicalState::new(Point3::new(5.5, 1.5, 5.5), 1.5, 0.25);
        with_ctx(&grid, |ctx| {
            body.advance(ctx, TICK_MS).unwrap();
            assert!(body.jump(5.0));
            let mut peak: f32 = 0.0;
            for _ in 0..100 {
                body.advance(ctx, TICK_MS).unwrap();
                peak = peak.max(body.position.y);
            }
            assert!(peak > 2.5);
        });
        assert!(body.supported);
        assert!((body.position.y - 1.5).abs() < 1e-5);
    }

    #[test]
    fn move_to_reports_whether_it_moved() {
        let mut grid = floor_grid();
        grid.set(VoxelCoord::new(3, 0, 1), BlockType::Wall).unwrap();
        grid.set(VoxelCoord::new(3, 1, 1), BlockType::Wall).unwrap();
        let mut body = PhysicalState::new(Point3::new(1.5, 1.5, 1.5), 1.5, 0.25);
        with_ctx(&grid, |ctx| {
            assert!(body.move_to(ctx, Point3::new(2.5, 1.5, 1.5)).unwrap());
            assert!(!body.move_to(ctx, Point3::new(3.5, 1.5, 1.5)).unwrap());
        });
        assert_eq!(body.position, Point3::new(2.5, 1.5, 1.5));
    }
}
