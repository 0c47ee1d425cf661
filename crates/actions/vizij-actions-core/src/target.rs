//! Target accessor and resolver traits.
//!
//! The runner owns no target state. Hosts (Bevy, wasm, tests) implement [`Target`] on whatever
//! stores their node properties and hand a [`TargetResolver`] into `ActionRunner::update`, which
//! maps the runner's stable [`TargetId`]s back to live objects for the duration of one frame.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::ActionError;
use crate::ids::TargetId;
use crate::property::Property;
use crate::value::Value;

/// Property accessors an action needs from the object it animates.
pub trait Target {
    fn get_property(&self, property: Property) -> Result<Value, ActionError>;
    fn set_property(&mut self, property: Property, value: Value) -> Result<(), ActionError>;
}

/// Maps runner target ids to live targets for the duration of an update.
/// Returning `None` for a registered id means the host lost the target without notifying.
pub trait TargetResolver {
    fn resolve(&mut self, target: TargetId) -> Option<&mut dyn Target>;
}

impl<T: Target> TargetResolver for HashMap<TargetId, T> {
    fn resolve(&mut self, target: TargetId) -> Option<&mut dyn Target> {
        self.get_mut(&target).map(|t| t as &mut dyn Target)
    }
}

/// Plain property bag implementing [`Target`] for every standard property plus custom slots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyNode {
    pub position: [f32; 2],
    pub rotation: f32,
    pub scale: [f32; 2],
    pub opacity: f32,
    pub color: [f32; 4],
    pub frame: i32,
    #[serde(default)]
    pub custom: HashMap<u32, Value>,
}

impl Default for PropertyNode {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0],
            rotation: 0.0,
            scale: [1.0, 1.0],
            opacity: 1.0,
            color: [1.0, 1.0, 1.0, 1.0],
            frame: 0,
            custom: HashMap::new(),
        }
    }
}

impl PropertyNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(position: [f32; 2]) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_custom(mut self, slot: u32, value: Value) -> Self {
        self.custom.insert(slot, value);
        self
    }
}

impl Target for PropertyNode {
    fn get_property(&self, property: Property) -> Result<Value, ActionError> {
        match property {
            Property::Position => Ok(Value::Vec2(self.position)),
            Property::Rotation => Ok(Value::Float(self.rotation)),
            Property::ScaleX => Ok(Value::Float(self.scale[0])),
            Property::ScaleY => Ok(Value::Float(self.scale[1])),
            Property::Opacity => Ok(Value::Float(self.opacity)),
            Property::Color => Ok(Value::ColorRgba(self.color)),
            Property::Frame => Ok(Value::Frame(self.frame)),
            Property::Custom(slot) => self
                .custom
                .get(&slot)
                .cloned()
                .ok_or(ActionError::UnsupportedProperty { property }),
        }
    }

    fn set_property(&mut self, property: Property, value: Value) -> Result<(), ActionError> {
        if let Property::Custom(slot) = property {
            let slot_value = self
                .custom
                .get_mut(&slot)
                .ok_or(ActionError::UnsupportedProperty { property })?;
            if slot_value.kind() != value.kind() {
                return Err(ActionError::ValueKindMismatch {
                    expected: slot_value.kind(),
                    actual: value.kind(),
                });
            }
            *slot_value = value;
            return Ok(());
        }

        match (property, value) {
            (Property::Position, Value::Vec2(v)) => self.position = v,
            (Property::Rotation, Value::Float(v)) => self.rotation = v,
            (Property::ScaleX, Value::Float(v)) => self.scale[0] = v,
            (Property::ScaleY, Value::Float(v)) => self.scale[1] = v,
            (Property::Opacity, Value::Float(v)) => self.opacity = v,
            (Property::Color, Value::ColorRgba(v)) => self.color = v,
            (Property::Frame, Value::Frame(v)) => self.frame = v,
            (property, value) => {
                return Err(ActionError::ValueKindMismatch {
                    expected: property
                        .value_kind()
                        .unwrap_or_else(|| value.kind()),
                    actual: value.kind(),
                })
            }
        }
        Ok(())
    }
}
