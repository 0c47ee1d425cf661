//! Names of the properties actions can drive.

use serde::{Deserialize, Serialize};

use crate::value::ValueKind;

/// A named, independently mutable property on a target.
///
/// The engine never interprets a property; it only reads the current value, interpolates and
/// writes it back.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Position,
    Rotation,
    ScaleX,
    ScaleY,
    Opacity,
    Color,
    Frame,
    /// Host-defined slot; its value kind is whatever the host stores there.
    Custom(u32),
}

impl Property {
    /// Kind a standard property holds. `Custom` slots have no fixed kind.
    #[inline]
    pub fn value_kind(&self) -> Option<ValueKind> {
        match self {
            Self::Position => Some(ValueKind::Vec2),
            Self::Rotation | Self::ScaleX | Self::ScaleY | Self::Opacity => Some(ValueKind::Float),
            Self::Color => Some(ValueKind::ColorRgba),
            Self::Frame => Some(ValueKind::Frame),
            Self::Custom(_) => None,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Rotation => "rotation",
            Self::ScaleX => "scale_x",
            Self::ScaleY => "scale_y",
            Self::Opacity => "opacity",
            Self::Color => "color",
            Self::Frame => "frame",
            Self::Custom(_) => "custom",
        }
    }
}
