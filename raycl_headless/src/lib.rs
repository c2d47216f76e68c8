// raycl_headless: scripted tick driver for the raycl voxel world.
//
// Stands in for the windowing layer and the renderer: replays a timeline of
// input events against a `World`, advances it at a fixed cadence, and takes
// a frame snapshot after every tick, exactly where a renderer would read.
//
// Module overview:
// - `script.rs`: Input timeline (tick-stamped `InputEvent`s), JSON loadable,
//                with a built-in demo walk up the staircase.
// - `runner.rs`: The tick loop and its `RunReport`.
//
// The binary (`main.rs`) adds argument parsing, logger setup and file
// output. The library API exists so the loop can be driven from tests.

pub mod runner;
pub mod script;

pub use runner::{RunReport, TICK_MS, run};
pub use script::Script;
