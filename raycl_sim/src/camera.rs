// Camera orientation and field-of-view transitions.
//
// A `CameraState` is a component attached to the player entity, not a body
// of its own: it has no position (the pose export borrows the entity's) and
// never collides. It holds yaw (unbounded), pitch (clamped to exactly
// [-π/2, π/2]) and a two-state FOV machine.
//
// FOV states:
// - **Idle**: `fov == target_fov`.
// - **Transitioning**: `toggle_fov` was accepted at one of the two
//   set-points; `fov` interpolates linearly from `prev_fov` to `target_fov`
//   over `FOV_TRANSITION_MS` of accumulated tick time and snaps exactly onto
//   the target when the counter reaches it.
//
// `toggle_fov` while transitioning (or while idle at a value that is not a
// set-point) is ignored and returns `false`.

use log::debug;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Narrow default field of view (90°).
pub const FOV_DEFAULT: f32 = FRAC_PI_2;
/// Full-circle field of view.
pub const FOV_FULL: f32 = TAU;
/// Duration of one FOV transition, in milliseconds.
pub const FOV_TRANSITION_MS: f32 = 1000.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    /// Rotation about the vertical axis, radians. Unbounded.
    pub yaw: f32,
    /// Rotation above/below the horizon, radians, in `[-π/2, π/2]`.
    pub pitch: f32,
    fov: f32,
    prev_fov: f32,
    target_fov: f32,
    /// Elapsed transition time, ms.
    fov_trans_count: f32,
}

impl CameraState {
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            fov: FOV_DEFAULT,
            prev_fov: FOV_DEFAULT,
            target_fov: FOV_DEFAULT,
            fov_trans_count: 0.0,
        }
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn target_fov(&self) -> f32 {
        self.target_fov
    }

    pub fn is_transitioning(&self) -> bool {
        self.fov != self.target_fov
    }

    /// Horizontal field of view.
    pub fn fov_x(&self) -> f32 {
        self.fov
    }

    /// Vertical field of view: the same value, capped at π.
    pub fn fov_y(&self) -> f32 {
        self.fov.min(PI)
    }

    /// Start a transition to the other set-point. Returns whether a
    /// transition was started.
    pub fn toggle_fov(&mut self) -> bool {
        if self.is_transitioning() {
            return false;
        }
        let target = if self.fov == FOV_DEFAULT {
            FOV_FULL
        } else if self.fov == FOV_FULL {
            FOV_DEFAULT
        } else {
            return false;
        };
        debug!("fov transition {} -> {target}", self.fov);
        self.prev_fov = self.fov;
        self.target_fov = target;
        self.fov_trans_count = 0.0;
        true
    }

    /// Advance the FOV transition by `t` milliseconds.
    pub fn advance(&mut self, t: f32) {
        if !self.is_transitioning() {
            return;
        }
        self.fov_trans_count += t;
        if self.fov_trans_count >= FOV_TRANSITION_MS {
            self.fov = self.target_fov;
            self.prev_fov = self.fov;
            self.fov_trans_count = 0.0;
            debug!("fov transition done at {}", self.fov);
        } else {
            self.fov = self.prev_fov
                + self.fov_trans_count * (self.target_fov - self.prev_fov) / FOV_TRANSITION_MS;
        }
    }

    /// Apply a pointer delta. `sensitivity` is radians per pointer unit.
    pub fn rotate(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        self.yaw += sensitivity * dx;
        self.pitch = (self.pitch + sensitivity * dy).clamp(-FRAC_PI_2, FRAC_PI_2);
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new()
    }
}
