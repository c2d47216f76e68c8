// Simulated entities.
//
// An `Entity` is a plain record of capability components: every entity has
// a `PhysicalState` body, and an entity that can be looked through also has
// a `CameraState`. The player is simply the entity with a camera. Behavior
// is written against the components it needs rather than inherited.
//
// Per-tick order (`Entity::advance`):
//   1. camera FOV transition
//   2. held keys resolved into a `MovementIntent` at the camera's yaw
//   3. physics on:  integrate gravity, jump if the up key is held, then
//                   walk horizontally as a direct move
//      physics off: one direct move of the walk plus the vertical offset
//
// A failed tick restores the body to its pre-tick state before returning
// the error.
//
// See also: `world.rs`, which owns the entities and supplies the collision
// context and `MotionRules`.

use crate::camera::CameraState;
use crate::collision::CollisionContext;
use crate::error::SimError;
use crate::input::{HeldKeys, InputEvent, Key, MovementIntent};
use crate::physics::PhysicalState;
use cgmath::Vector3;
use serde::{Deserialize, Serialize};

/// Identifier for an entity, assigned by the world in spawn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// World-wide movement parameters, taken from the config.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionRules {
    pub physics_enabled: bool,
    pub walk_speed: f32,
    pub jump_speed: f32,
    /// Radians of rotation per pointer unit.
    pub pointer_sensitivity: f32,
}

#[derive(Clone, Debug)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub body: PhysicalState,
    pub camera: Option<CameraState>,
    pub held: HeldKeys,
}

impl Entity {
    pub fn new(id: EntityId, name: impl Into<String>, body: PhysicalState) -> Self {
        Self {
            id,
            name: name.into(),
            body,
            camera: None,
            held: HeldKeys::new(),
        }
    }

    pub fn with_camera(mut self) -> Self {
        self.camera = Some(CameraState::new());
        self
    }

    /// Heading used for movement. Entities without a camera face +z.
    pub fn yaw(&self) -> f32 {
        self.camera.as_ref().map_or(0.0, |c| c.yaw)
    }

    pub fn handle_input(&mut self, event: InputEvent, rules: &MotionRules) {
        match event {
            InputEvent::KeyDown(c) => {
                let Some(key) = Key::from_char(c) else {
                    return;
                };
                let newly_pressed = self.held.press(key);
                if key == Key::ToggleFov
                    && newly_pressed
                    && let Some(camera) = &mut self.camera
                {
                    camera.toggle_fov();
                }
            }
            InputEvent::KeyUp(c) => {
                if let Some(key) = Key::from_char(c) {
                    self.held.release(key);
                }
            }
            InputEvent::PointerMotion { dx, dy } => {
                if let Some(camera) = &mut self.camera {
                    camera.rotate(dx, dy, rules.pointer_sensitivity);
                }
            }
        }
    }

    /// Advance this entity by `t` milliseconds.
    pub fn advance(
        &mut self,
        ctx: &CollisionContext<'_>,
        t: f32,
        rules: &MotionRules,
    ) -> Result<(), SimError> {
        if let Some(camera) = &mut self.camera {
            camera.advance(t);
        }
        let intent = MovementIntent::resolve(&self.held, self.yaw(), rules.walk_speed, t);

        let saved = self.body.clone();
        let result = if rules.physics_enabled {
            self.step_physics(ctx, t, &intent, rules.jump_speed)
        } else {
            let offset = intent.horizontal + Vector3::new(0.0, intent.vertical, 0.0);
            self.walk(ctx, offset)
        };
        if result.is_err() {
            self.body = saved;
        }
        result
    }

    fn step_physics(
        &mut self,
        ctx: &CollisionContext<'_>,
        t: f32,
        intent: &MovementIntent,
        jump_speed: f32,
    ) -> Result<(), SimError> {
        self.body.advance(ctx, t)?;
        if intent.up {
            self.body.jump(jump_speed);
        }
        self.walk(ctx, intent.horizontal)
    }

    fn walk(&mut self, ctx: &CollisionContext<'_>, offset: Vector3<f32>) -> Result<(), SimError> {
        if offset == Vector3::new(0.0, 0.0, 0.0) {
            return Ok(());
        }
        let target = self.body.position + offset;
        self.body.move_to(ctx, target)?;
        Ok(())
    }
}
