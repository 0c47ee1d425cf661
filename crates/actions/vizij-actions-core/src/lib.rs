#![allow(dead_code)]
//! Vizij Actions Core (engine-agnostic)
//!
//! Time-driven, composable, reversible actions that mutate properties of host-owned targets.
//! Leaf actions (By/To tweens, delays, callbacks) are combined with sequence, spawn and repeat
//! combinators, attached to targets through an [`ActionRunner`], and advanced once per frame by
//! [`ActionRunner::update`].

pub mod action;
pub mod config;
pub mod easing;
pub mod error;
pub mod ids;
pub mod outputs;
pub mod property;
pub mod runner;
pub mod script;
pub mod target;
pub mod value;

// Re-exports for consumers (adapters)
pub use action::{
    Action, ActionState, Callback, Delay, Repeat, RepeatCount, Sequence, Spawn, Tween, TweenMode,
    TIME_EPSILON,
};
pub use config::Config;
pub use easing::Easing;
pub use error::ActionError;
pub use ids::{ActionHandle, InstanceId, Tag, TargetId};
pub use outputs::{ActionEvent, FinishedAction, Outputs};
pub use property::Property;
pub use runner::ActionRunner;
pub use script::{parse_action_json, ActionDef};
pub use target::{PropertyNode, Target, TargetResolver};
pub use value::{Value, ValueKind};

pub type Result<T> = core::result::Result<T, ActionError>;
