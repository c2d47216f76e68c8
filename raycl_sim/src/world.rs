// The world: sole owner of the grid, portals and entities.
//
// `World` is the single source of truth for a session. It owns the voxel
// grid, the portal registry, the portal hook chosen by config, the motion
// rules and an ordered list of entities (the player first). Nothing else
// holds the grid; entities see it only through the `CollisionContext`
// borrowed for the duration of `advance`.
//
// Setup: `with_config` builds an empty grid of the configured size, authors
// the configured map into it, then hands off to `from_parts`, which checks
// that every portal cell refers to a set transform and spawns the player.
// Spawn points outside the grid are refused unless the edge is `SolidAir`.
//
// Tick: `advance(t)` forwards the caller's elapsed milliseconds to every
// entity in spawn order. Entities are independent (they do not collide with
// each other), so one entity's failure does not stop the others; the first
// error is returned after all have run. The renderer reads `frame()` only
// between ticks.
//
// See also: `entity.rs` for the per-entity tick order, `config.rs` for the
// tunables, `export.rs` for the frame layout.

use crate::collision::{CollisionContext, PortalHook};
use crate::config::WorldConfig;
use crate::entity::{Entity, EntityId, MotionRules};
use crate::error::SimError;
use crate::export::{CameraPose, Frame, write_world_buffer};
use crate::grid::VoxelGrid;
use crate::input::InputEvent;
use crate::maps;
use crate::physics::PhysicalState;
use crate::portal::PortalRegistry;
use crate::types::{BlockType, EdgeType, VoxelCoord};
use cgmath::{Point3, Vector3};
use log::{debug, warn};

pub struct World {
    config: WorldConfig,
    grid: VoxelGrid,
    portals: PortalRegistry,
    hook: Box<dyn PortalHook>,
    gravity: Vector3<f32>,
    rules: MotionRules,
    /// Spawn order. The player is always at index 0 and entities are never
    /// removed.
    entities: Vec<Entity>,
    next_id: u32,
    tick: u64,
    elapsed_ms: f64,
}

impl World {
    /// A world built from the default config.
    pub fn new() -> Result<Self, SimError> {
        Self::with_config(WorldConfig::default())
    }

    pub fn with_config(config: WorldConfig) -> Result<Self, SimError> {
        let (sx, sy, sz) = config.world_size;
        let mut grid = VoxelGrid::new(sx, sy, sz, config.edge_type)?;
        let mut portals = PortalRegistry::new();
        maps::build(config.map, &mut grid, &mut portals)?;
        Self::from_parts(config, grid, portals)
    }

    /// Assemble a world around an already-authored grid and registry. The
    /// grid's own size wins over `config.world_size`.
    pub fn from_parts(
        config: WorldConfig,
        grid: VoxelGrid,
        portals: PortalRegistry,
    ) -> Result<Self, SimError> {
        portals.check_referenced(&grid.referenced_portals())?;

        let rules = MotionRules {
            physics_enabled: config.physics_enabled,
            walk_speed: config.walk_speed,
            jump_speed: config.jump_speed,
            pointer_sensitivity: config.pointer_sensitivity,
        };
        let mut world = Self {
            hook: config.portal_policy.hook(),
            gravity: config.gravity.into(),
            rules,
            grid,
            portals,
            entities: Vec::new(),
            next_id: 0,
            tick: 0,
            elapsed_ms: 0.0,
            config,
        };
        let spawn = world.config.player_spawn.into();
        world.spawn("player", spawn, true)?;
        debug!(
            "world {:?} ready, edge {:?}, physics {}",
            world.grid.size(),
            world.grid.edge_type(),
            world.rules.physics_enabled
        );
        Ok(world)
    }

    // -----------------------------------------------------------------------
    // Setup
    // -----------------------------------------------------------------------

    /// Write one voxel. A portal block must refer to a portal that is
    /// already set.
    pub fn set_block(&mut self, coord: VoxelCoord, block: BlockType) -> Result<(), SimError> {
        if let BlockType::Portal(i) = block
            && !self.portals.is_set(i)
        {
            return Err(SimError::UnsetPortal(i));
        }
        self.grid.set(coord, block)
    }

    /// Set portal `index` from a row-major matrix.
    pub fn set_portal(&mut self, index: u8, rows: [[f32; 4]; 4]) -> Result<(), SimError> {
        self.portals.set_rows(index, rows)
    }

    /// Add an entity with the configured body shape and world gravity. The
    /// position must be inside the grid unless the edge is `SolidAir`.
    pub fn spawn(
        &mut self,
        name: &str,
        position: Point3<f32>,
        with_camera: bool,
    ) -> Result<EntityId, SimError> {
        if self.grid.edge_type() != EdgeType::SolidAir && !self.grid.contains_point(position) {
            return Err(SimError::OutOfBounds {
                coord: VoxelCoord::containing(position),
                size: self.grid.size(),
            });
        }
        let id = EntityId(self.next_id);
        self.next_id += 1;
        let mut body = PhysicalState::new(
            position,
            self.config.player_hover_height,
            self.config.player_radius,
        );
        body.gravity = self.gravity;
        let mut entity = Entity::new(id, name, body);
        if with_camera {
            entity = entity.with_camera();
        }
        debug!("spawned {name} ({id:?}) at {position:?}");
        self.entities.push(entity);
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Deliver one input event to the player.
    pub fn handle_input(&mut self, event: InputEvent) {
        let rules = self.rules;
        if let Some(player) = self.entities.first_mut() {
            player.handle_input(event, &rules);
        }
    }

    /// Advance every entity by `t` milliseconds.
    pub fn advance(&mut self, t: f32) -> Result<(), SimError> {
        let ctx = CollisionContext::new(&self.grid, &self.portals, self.hook.as_ref());
        let mut first_error = None;
        for entity in &mut self.entities {
            if let Err(e) = entity.advance(&ctx, t, &self.rules) {
                warn!("tick {}: {} ({:?}) failed: {e}", self.tick, entity.name, entity.id);
                first_error.get_or_insert(e);
            }
        }
        self.tick += 1;
        self.elapsed_ms += f64::from(t);
        first_error.map_or(Ok(()), Err)
    }

    // -----------------------------------------------------------------------
    // Readers
    // -----------------------------------------------------------------------

    pub fn player(&self) -> &Entity {
        &self.entities[0]
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    pub fn portals(&self) -> &PortalRegistry {
        &self.portals
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Number of completed `advance` calls.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Sum of all `t` passed to `advance`.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// The player's camera pose.
    pub fn camera_pose(&self) -> CameraPose {
        let player = self.player();
        let camera = player.camera.clone().unwrap_or_default();
        let p = player.body.position;
        CameraPose {
            yaw: camera.yaw,
            pitch: camera.pitch,
            position: [p.x, p.y, p.z],
            fov_x: camera.fov_x(),
            fov_y: camera.fov_y(),
        }
    }

    /// Snapshot of everything the renderer reads.
    pub fn frame(&self) -> Frame {
        Frame {
            world: write_world_buffer(&self.grid, &self.portals),
            camera: self.camera_pose(),
        }
    }
}
