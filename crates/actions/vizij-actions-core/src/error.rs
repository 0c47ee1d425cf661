//! Error types for action construction, reversal and ticking.

use serde::{Deserialize, Serialize};

use crate::ids::{InstanceId, TargetId};
use crate::property::Property;
use crate::value::ValueKind;

/// Errors produced by the action engine.
///
/// Construction errors (`InvalidDuration`, `ZeroDurationRepeat`) surface before an action is
/// ever attached to a runner. Tick-time errors abort only the action that produced them.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ActionError {
    /// Negative or non-finite duration supplied to a constructor
    #[error("Invalid duration: {duration}")]
    InvalidDuration { duration: f32 },

    /// Repeating a zero-duration child forever would never yield back to the frame
    #[error("Cannot repeat a zero-duration action forever")]
    ZeroDurationRepeat,

    /// Reversal requested for an action without a known inverse
    #[error("Irreversible action: {reason}")]
    IrreversibleAction { reason: String },

    /// Target handle is unknown or was destroyed
    #[error("Unknown target: {target:?}")]
    UnknownTarget { target: TargetId },

    /// No running action matches the handle (finished, stopped or never attached)
    #[error("Action not found: {instance:?} on {target:?}")]
    ActionNotFound {
        target: TargetId,
        instance: InstanceId,
    },

    /// Tick delta was negative or non-finite
    #[error("Invalid tick delta: {delta}")]
    InvalidDelta { delta: f32 },

    /// Value kinds do not line up (e.g. a Vec2 delta applied to a scalar property)
    #[error("Value kind mismatch: expected {expected:?}, got {actual:?}")]
    ValueKindMismatch {
        expected: ValueKind,
        actual: ValueKind,
    },

    /// The target does not expose the requested property
    #[error("Unsupported property: {property:?}")]
    UnsupportedProperty { property: Property },

    /// Action script could not be parsed
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

impl ActionError {
    /// Check whether the error was raised while building an action
    #[inline]
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDuration { .. } | Self::ZeroDurationRepeat | Self::Serialization { .. }
        )
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidDuration { .. } | Self::ZeroDurationRepeat => "construction",
            Self::IrreversibleAction { .. } => "reversal",
            Self::UnknownTarget { .. }
            | Self::ActionNotFound { .. }
            | Self::UnsupportedProperty { .. } => "target",
            Self::InvalidDelta { .. } | Self::ValueKindMismatch { .. } => "runtime",
            Self::Serialization { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for ActionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}
