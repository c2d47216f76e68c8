// Input contract between the windowing layer and the simulation.
//
// Key events arrive as single-character identifiers and pointer motion as
// relative deltas, delivered before the next `advance`. Keys are tracked as
// a held set and resolved once per tick into a `MovementIntent`. Movement
// uses yaw only, so looking up or down never changes where the player walks.
//
// Key map:
//   w / s     forward / back
//   a / d     strafe left / right
//   space / n up / down (a jump when physics is enabled)
//   o         toggle the wide field of view (edge-triggered on key down)
//
// Anything else is ignored.

use cgmath::Vector3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    Up,
    Down,
    ToggleFov,
}

impl Key {
    pub fn from_char(c: char) -> Option<Key> {
        match c {
            'w' => Some(Key::Forward),
            's' => Some(Key::Back),
            'a' => Some(Key::StrafeLeft),
            'd' => Some(Key::StrafeRight),
            ' ' => Some(Key::Up),
            'n' => Some(Key::Down),
            'o' => Some(Key::ToggleFov),
            _ => None,
        }
    }
}

/// One event from the input poll.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyDown(char),
    KeyUp(char),
    PointerMotion { dx: f32, dy: f32 },
}

/// Keys currently held down.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeldKeys {
    keys: BTreeSet<Key>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the key was not already held.
    pub fn press(&mut self, key: Key) -> bool {
        self.keys.insert(key)
    }

    /// Releasing a key that is not held is a no-op.
    pub fn release(&mut self, key: Key) {
        self.keys.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// The held keys turned into one tick's worth of motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementIntent {
    /// Displacement in the horizontal (x, z) plane. `y` is always zero.
    pub horizontal: Vector3<f32>,
    /// Signed vertical distance from the up/down keys.
    pub vertical: f32,
    /// Whether the up key is held.
    pub up: bool,
}

impl MovementIntent {
    /// Resolve held keys at heading `yaw` for a tick of `t` milliseconds at
    /// `walk_speed` voxels per second.
    pub fn resolve(held: &HeldKeys, yaw: f32, walk_speed: f32, t: f32) -> Self {
        let dist = walk_speed * t / 1000.0;
        let (sin, cos) = yaw.sin_cos();
        let forward = Vector3::new(sin, 0.0, cos);
        let left = Vector3::new(-cos, 0.0, sin);

        let mut horizontal = Vector3::new(0.0, 0.0, 0.0);
        let mut vertical = 0.0;
        if held.is_held(Key::Forward) {
            horizontal += forward * dist;
        }
        if held.is_held(Key::Back) {
            horizontal -= forward * dist;
        }
        if held.is_held(Key::StrafeLeft) {
            horizontal += left * dist;
        }
        if held.is_held(Key::StrafeRight) {
            horizontal -= left * dist;
        }
        if held.is_held(Key::Up) {
            vertical += dist;
        }
        if held.is_held(Key::Down) {
            vertical -= dist;
        }

        Self {
            horizontal,
            vertical,
            up: held.is_held(Key::Up),
        }
    }
}
