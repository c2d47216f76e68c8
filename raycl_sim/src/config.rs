// Data-driven world configuration.
//
// All tunable simulation parameters live in `WorldConfig`, loaded from JSON
// at startup. The simulation reads movement speeds, gravity, spawn point and
// world shape from here rather than from constants; only the fixed contract
// values (FOV transition length, traversal step cap, export buffer size,
// portal slot count) are hard-coded in their modules.
//
// Every field has a default, so a config file only needs the fields it
// changes.
//
// See also: `world.rs`, which builds a `World` from a `WorldConfig`, and
// `maps.rs` for the `MapKind` choices.

use crate::collision::PortalPolicy;
use crate::error::SimError;
use crate::maps::MapKind;
use crate::types::EdgeType;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World dimensions in voxels (x, y, z). Each must be in 1..=255 and the
    /// product must fit the export buffer.
    pub world_size: (u32, u32, u32),

    /// What lies beyond the grid.
    pub edge_type: EdgeType,

    /// Which built-in map to author into the grid.
    pub map: MapKind,

    /// Gravity integration and jumping. When off, the up/down keys move the
    /// player directly.
    pub physics_enabled: bool,

    /// Gravity for newly spawned bodies, voxels/s².
    pub gravity: [f32; 3],

    /// Walking speed, voxels/s.
    pub walk_speed: f32,

    /// Velocity along the up axis set by a jump, voxels/s.
    pub jump_speed: f32,

    /// Radians of camera rotation per pointer unit.
    pub pointer_sensitivity: f32,

    /// Player center at spawn.
    pub player_spawn: [f32; 3],

    /// Distance from the player's center down to its foot.
    pub player_hover_height: f32,

    /// Player radius. Not used by collision.
    pub player_radius: f32,

    /// How collision treats portal cells.
    pub portal_policy: PortalPolicy,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            world_size: (32, 16, 30),
            edge_type: EdgeType::Wall,
            map: MapKind::Testmap1,
            physics_enabled: true,
            gravity: [0.0, -10.0, 0.0],
            walk_speed: 4.0,
            jump_speed: 5.0,
            pointer_sensitivity: PI / 1000.0,
            player_spawn: [0.5, 1.5, 0.5],
            player_hover_height: 1.5,
            player_radius: 0.25,
            portal_policy: PortalPolicy::Unwired,
        }
    }
}

impl WorldConfig {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
