// Input timelines.
//
// A `Script` is a list of input events stamped with the tick before which
// they are delivered. Events for the same tick are delivered in list order.
// Scripts are plain JSON, e.g.
//
//   { "events": [ { "tick": 0, "event": { "KeyDown": "w" } },
//                 { "tick": 5, "event": { "PointerMotion": { "dx": 10.0, "dy": 0.0 } } } ] }

use raycl_sim::SimError;
use raycl_sim::input::InputEvent;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptEvent {
    pub tick: u64,
    pub event: InputEvent,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub events: Vec<ScriptEvent>,
}

impl Script {
    /// Walk right along the z=0 wall (up the staircase in the default map),
    /// widen the field of view, look down a little and jump once.
    pub fn demo() -> Self {
        let at = |tick, event| ScriptEvent { tick, event };
        Self {
            events: vec![
                at(0, InputEvent::KeyDown('d')),
                at(30, InputEvent::KeyDown('o')),
                at(31, InputEvent::KeyUp('o')),
                at(40, InputEvent::PointerMotion { dx: 0.0, dy: -50.0 }),
                at(60, InputEvent::KeyDown(' ')),
                at(62, InputEvent::KeyUp(' ')),
                at(110, InputEvent::KeyUp('d')),
            ],
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Events to deliver before tick `tick`.
    pub fn events_at(&self, tick: u64) -> impl Iterator<Item = &InputEvent> {
        self.events.iter().filter(move |e| e.tick == tick).map(|e| &e.event)
    }
}
