// The tick loop.
//
// For each tick: deliver that tick's scripted events, `advance` the world by
// `tick_ms`, then snapshot the frame. A failed tick is logged and counted;
// the loop keeps going, since errors are local to the tick.

use crate::script::Script;
use log::{debug, warn};
use raycl_sim::World;
use raycl_sim::export::Frame;

/// Tick interval, ms.
pub const TICK_MS: f32 = 30.0;

#[derive(Clone, Debug)]
pub struct RunReport {
    pub ticks: u64,
    pub failed_ticks: u64,
    /// Snapshot taken after the last tick (or before the first, if no ticks
    /// ran).
    pub last_frame: Frame,
}

pub fn run(world: &mut World, script: &Script, ticks: u64, tick_ms: f32) -> RunReport {
    let mut failed_ticks = 0;
    let mut last_frame = world.frame();
    for tick in 0..ticks {
        for event in script.events_at(tick) {
            world.handle_input(*event);
        }
        if let Err(e) = world.advance(tick_ms) {
            warn!("tick {tick} failed: {e}");
            failed_ticks += 1;
        }
        last_frame = world.frame();
        let pose = &last_frame.camera;
        debug!(
            "tick {tick}: pos ({:.3}, {:.3}, {:.3}) yaw {:.3} pitch {:.3} fov {:.3}",
            pose.position[0], pose.position[1], pose.position[2], pose.yaw, pose.pitch, pose.fov_x
        );
    }
    RunReport {
        ticks,
        failed_ticks,
        last_frame,
    }
}
