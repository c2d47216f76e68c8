// raycl_sim: voxel world, physics and collision library.
//
// This crate holds the authoritative simulation for a first-person voxel
// world: grid storage and bounds policy, ray/voxel traversal, collision
// with staircase climbing, gravity integration, the camera FOV state machine
// and the portal transform registry. It has no windowing or GPU
// dependencies; the renderer is a read-only consumer of `export::Frame`.
//
// Module overview:
// - `world.rs`:     World: owns everything, drives `advance(t)`.
// - `grid.rs`:      Dense 3D voxel grid with bounds-checked access.
// - `traversal.rs`: Amanatides–Woo voxel stepping (X, Z, Y tie-break).
// - `collision.rs`: `legal_move`, edge policy, climb rule, portal hook.
// - `portal.rs`:    PortalRegistry: nine 4x4 transforms.
// - `physics.rs`:   PhysicalState: velocity integration, support, jump.
// - `camera.rs`:    CameraState: yaw/pitch and FOV transitions.
// - `input.rs`:     Key map, held keys, movement intent.
// - `entity.rs`:    Entity: body + optional camera components.
// - `maps.rs`:      Built-in maps (Demo, Testmap1).
// - `export.rs`:    Serialized world buffer and camera pose.
// - `config.rs`:    WorldConfig: all tunable parameters.
// - `error.rs`:     SimError.
// - `types.rs`:     VoxelCoord, Axis, BlockType, EdgeType.
//
// The library logs through the `log` facade and never installs a logger;
// that is the binary's job (see `raycl_headless`).
//
// Elapsed time always comes from the caller. No system time, no randomness,
// no `HashMap` in simulation state, so identical inputs give identical runs.

pub mod camera;
pub mod collision;
pub mod config;
pub mod entity;
pub mod error;
pub mod export;
pub mod grid;
pub mod input;
pub mod maps;
pub mod physics;
pub mod portal;
pub mod traversal;
pub mod types;
pub mod world;

pub use config::WorldConfig;
pub use error::SimError;
pub use world::World;
