//! Serializable action definitions.
//!
//! Hosts can describe action trees as JSON and build them at load time. Callbacks carry host
//! closures and are therefore not scriptable.
//!
//! ```json
//! { "type": "sequence", "actions": [
//!     { "type": "by", "property": "position", "duration": 1.0,
//!       "value": { "type": "Vec2", "data": [10.0, 0.0] }, "easing": "quad_out" },
//!     { "type": "delay", "duration": 0.5 },
//!     { "type": "repeat", "times": 2,
//!       "action": { "type": "to", "property": "opacity", "duration": 0.25,
//!                   "value": { "type": "Float", "data": 0.0 } } }
//! ] }
//! ```

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::easing::Easing;
use crate::error::ActionError;
use crate::property::Property;
use crate::value::Value;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionDef {
    By {
        property: Property,
        duration: f32,
        value: Value,
        #[serde(default)]
        easing: Easing,
    },
    To {
        property: Property,
        duration: f32,
        value: Value,
        #[serde(default)]
        easing: Easing,
    },
    Delay {
        duration: f32,
    },
    Sequence {
        actions: Vec<ActionDef>,
    },
    Spawn {
        actions: Vec<ActionDef>,
    },
    Repeat {
        times: u32,
        action: Box<ActionDef>,
    },
    RepeatForever {
        action: Box<ActionDef>,
    },
}

impl ActionDef {
    /// Build a runnable action, applying the same construction checks as the typed API.
    pub fn build(&self) -> Result<Action, ActionError> {
        Ok(match self {
            Self::By {
                property,
                duration,
                value,
                easing,
            } => Action::by(*property, *duration, value.clone())?.with_easing(*easing),
            Self::To {
                property,
                duration,
                value,
                easing,
            } => Action::to(*property, *duration, value.clone())?.with_easing(*easing),
            Self::Delay { duration } => Action::delay(*duration)?,
            Self::Sequence { actions } => Action::sequence(build_all(actions)?),
            Self::Spawn { actions } => Action::spawn(build_all(actions)?),
            Self::Repeat { times, action } => Action::repeat(action.build()?, *times),
            Self::RepeatForever { action } => Action::repeat_forever(action.build()?)?,
        })
    }
}

fn build_all(defs: &[ActionDef]) -> Result<Vec<Action>, ActionError> {
    defs.iter().map(ActionDef::build).collect()
}

/// Public API: parse a JSON action script into a runnable action tree.
pub fn parse_action_json(s: &str) -> Result<Action, ActionError> {
    let def: ActionDef = serde_json::from_str(s)?;
    def.build()
}
