//! Interpolating leaves (By/To tweens) and time-only delays.

use serde::{Deserialize, Serialize};

use super::{advance_clock, validate_duration, ActionState};
use crate::easing::Easing;
use crate::error::ActionError;
use crate::property::Property;
use crate::target::Target;
use crate::value::Value;

/// How a tween's end value is derived from the start value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TweenMode {
    /// Relative: final = start + delta
    By(Value),
    /// Absolute: final = end, delta = end - start
    To(Value),
}

impl TweenMode {
    #[inline]
    pub fn value(&self) -> &Value {
        match self {
            Self::By(v) | Self::To(v) => v,
        }
    }
}

/// Interpolates one property of a target over `duration` seconds.
///
/// The start value is read lazily on the first tick, so a By-tween queued behind another action
/// composes with whatever that action left behind.
#[derive(Clone, Debug)]
pub struct Tween {
    property: Property,
    mode: TweenMode,
    duration: f32,
    easing: Easing,
    elapsed: f32,
    state: ActionState,
    start: Option<Value>,
    delta: Option<Value>,
}

impl Tween {
    pub fn new(
        property: Property,
        mode: TweenMode,
        duration: f32,
        easing: Easing,
    ) -> Result<Self, ActionError> {
        let duration = validate_duration(duration)?;
        if let Some(expected) = property.value_kind() {
            let actual = mode.value().kind();
            if expected != actual {
                return Err(ActionError::ValueKindMismatch { expected, actual });
            }
        }
        Ok(Self {
            property,
            mode,
            duration,
            easing,
            elapsed: 0.0,
            state: ActionState::Pending,
            start: None,
            delta: None,
        })
    }

    #[inline]
    pub fn property(&self) -> Property {
        self.property
    }

    #[inline]
    pub fn mode(&self) -> &TweenMode {
        &self.mode
    }

    #[inline]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[inline]
    pub fn state(&self) -> ActionState {
        self.state
    }

    /// Value captured from the target on the first tick of the current run.
    #[inline]
    pub fn start_value(&self) -> Option<&Value> {
        self.start.as_ref()
    }

    pub(crate) fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    fn capture(&mut self, target: &dyn Target) -> Result<(), ActionError> {
        let start = target.get_property(self.property)?;
        let target_value = self.mode.value();
        if start.kind() != target_value.kind() {
            return Err(ActionError::ValueKindMismatch {
                expected: start.kind(),
                actual: target_value.kind(),
            });
        }
        let delta = match &self.mode {
            TweenMode::By(delta) => delta.clone(),
            TweenMode::To(end) => end.sub(&start)?,
        };
        self.start = Some(start);
        self.delta = Some(delta);
        Ok(())
    }

    fn value_at(&self, eased: f32) -> Result<Value, ActionError> {
        match (&self.start, &self.delta) {
            (Some(start), Some(delta)) => start.add_scaled(delta, eased),
            // capture() always fills both before the first write
            _ => Ok(self.mode.value().clone()),
        }
    }

    pub(crate) fn advance(&mut self, dt: f32, target: &mut dyn Target) -> Result<f32, ActionError> {
        if self.state == ActionState::Finished {
            return Ok(dt);
        }
        if self.state == ActionState::Pending {
            self.capture(target)?;
            self.state = ActionState::Running;
        }

        let leftover = advance_clock(&mut self.elapsed, self.duration, dt);
        let finished = self.elapsed >= self.duration;
        let value = match (&self.mode, finished) {
            (TweenMode::To(end), true) => end.clone(),
            (TweenMode::By(_), true) => self.value_at(1.0)?,
            (_, false) => self.value_at(self.easing.ease(self.elapsed / self.duration))?,
        };
        target.set_property(self.property, value)?;

        if finished {
            self.state = ActionState::Finished;
        }
        Ok(leftover)
    }

    pub(crate) fn reset(&mut self) {
        self.elapsed = 0.0;
        self.state = ActionState::Pending;
        self.start = None;
        self.delta = None;
    }

    pub(crate) fn reverse(&self) -> Result<Self, ActionError> {
        let mode = match &self.mode {
            TweenMode::By(delta) => TweenMode::By(delta.neg()),
            TweenMode::To(_) => match &self.start {
                Some(start) => TweenMode::To(start.clone()),
                None => {
                    return Err(ActionError::IrreversibleAction {
                        reason: format!(
                            "To-action on {} has not captured a start value",
                            self.property.name()
                        ),
                    })
                }
            },
        };
        Ok(Self {
            property: self.property,
            mode,
            duration: self.duration,
            easing: self.easing,
            elapsed: 0.0,
            state: ActionState::Pending,
            start: None,
            delta: None,
        })
    }
}

/// Waits for `duration` seconds without touching the target.
#[derive(Clone, Debug)]
pub struct Delay {
    duration: f32,
    elapsed: f32,
    state: ActionState,
}

impl Delay {
    pub fn new(duration: f32) -> Result<Self, ActionError> {
        Ok(Self {
            duration: validate_duration(duration)?,
            elapsed: 0.0,
            state: ActionState::Pending,
        })
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[inline]
    pub fn state(&self) -> ActionState {
        self.state
    }

    pub(crate) fn advance(&mut self, dt: f32) -> f32 {
        if self.state == ActionState::Finished {
            return dt;
        }
        self.state = ActionState::Running;
        let leftover = advance_clock(&mut self.elapsed, self.duration, dt);
        if self.elapsed >= self.duration {
            self.state = ActionState::Finished;
        }
        leftover
    }

    pub(crate) fn reset(&mut self) {
        self.elapsed = 0.0;
        self.state = ActionState::Pending;
    }
}
