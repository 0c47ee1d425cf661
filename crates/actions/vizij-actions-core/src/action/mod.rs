//! Actions: time-bounded, composable, reversible mutations of target properties.
//!
//! [`Action`] is a closed set of variants. Every variant advances through
//! `Pending -> Running -> Finished` once per run, and every variant knows how to compute its own
//! reversal, so the reversal algebra is defined exhaustively by the `match` in
//! [`Action::reverse`].
//!
//! Time is `f32` seconds. When a leaf's remaining time is within [`TIME_EPSILON`] of the incoming
//! delta it snaps to its full duration, and leftover deltas at or below the same epsilon are
//! dropped. Because the rule is applied at every level, many small ticks and one large tick
//! finish an action tree at the same instant.

pub mod callback;
pub mod combinators;
pub mod tween;

use serde::{Deserialize, Serialize};

pub use callback::Callback;
pub use combinators::{Repeat, RepeatCount, Sequence, Spawn};
pub use tween::{Delay, Tween, TweenMode};

use crate::easing::Easing;
use crate::error::ActionError;
use crate::property::Property;
use crate::target::Target;
use crate::value::Value;

/// Sub-frame rounding tolerance in seconds.
pub const TIME_EPSILON: f32 = 1e-6;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionState {
    Pending,
    Running,
    Finished,
}

impl ActionState {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Finished => "finished",
        }
    }
}

pub(crate) fn validate_duration(duration: f32) -> Result<f32, ActionError> {
    if !duration.is_finite() || duration < 0.0 {
        return Err(ActionError::InvalidDuration { duration });
    }
    Ok(duration)
}

/// Advance a leaf clock by `dt`, returning the unused part of `dt`.
pub(crate) fn advance_clock(elapsed: &mut f32, duration: f32, dt: f32) -> f32 {
    let remaining = duration - *elapsed;
    if dt + TIME_EPSILON >= remaining {
        *elapsed = duration;
        let leftover = dt - remaining;
        if leftover > TIME_EPSILON {
            leftover
        } else {
            0.0
        }
    } else {
        *elapsed += dt;
        0.0
    }
}

/// A runnable action tree.
#[derive(Clone, Debug)]
pub enum Action {
    Tween(Tween),
    Delay(Delay),
    Sequence(Sequence),
    Spawn(Spawn),
    Repeat(Repeat),
    Callback(Callback),
}

impl Action {
    /// Relative tween: final = start + `delta`.
    pub fn by(property: Property, duration: f32, delta: Value) -> Result<Self, ActionError> {
        Tween::new(property, TweenMode::By(delta), duration, Easing::Linear).map(Self::Tween)
    }

    /// Absolute tween toward `end`.
    pub fn to(property: Property, duration: f32, end: Value) -> Result<Self, ActionError> {
        Tween::new(property, TweenMode::To(end), duration, Easing::Linear).map(Self::Tween)
    }

    /// Instantly set a property (a zero-duration To-tween).
    pub fn place(property: Property, value: Value) -> Result<Self, ActionError> {
        Self::to(property, 0.0, value)
    }

    pub fn delay(duration: f32) -> Result<Self, ActionError> {
        Delay::new(duration).map(Self::Delay)
    }

    pub fn sequence(children: Vec<Action>) -> Self {
        Self::Sequence(Sequence::new(children))
    }

    pub fn spawn(children: Vec<Action>) -> Self {
        Self::Spawn(Spawn::new(children))
    }

    pub fn repeat(inner: Action, times: u32) -> Self {
        Self::Repeat(Repeat::times(inner, times))
    }

    pub fn repeat_forever(inner: Action) -> Result<Self, ActionError> {
        Repeat::forever(inner).map(Self::Repeat)
    }

    pub fn callback(func: impl Fn() + Send + Sync + 'static) -> Self {
        Self::Callback(Callback::new(func))
    }

    pub fn move_by(duration: f32, delta: [f32; 2]) -> Result<Self, ActionError> {
        Self::by(Property::Position, duration, Value::Vec2(delta))
    }

    pub fn move_to(duration: f32, position: [f32; 2]) -> Result<Self, ActionError> {
        Self::to(Property::Position, duration, Value::Vec2(position))
    }

    pub fn rotate_by(duration: f32, degrees: f32) -> Result<Self, ActionError> {
        Self::by(Property::Rotation, duration, Value::Float(degrees))
    }

    pub fn rotate_to(duration: f32, degrees: f32) -> Result<Self, ActionError> {
        Self::to(Property::Rotation, duration, Value::Float(degrees))
    }

    /// Both scale axes, as a spawn over `ScaleX` and `ScaleY`.
    pub fn scale_by(duration: f32, dx: f32, dy: f32) -> Result<Self, ActionError> {
        Ok(Self::spawn(vec![
            Self::by(Property::ScaleX, duration, Value::Float(dx))?,
            Self::by(Property::ScaleY, duration, Value::Float(dy))?,
        ]))
    }

    pub fn scale_to(duration: f32, sx: f32, sy: f32) -> Result<Self, ActionError> {
        Ok(Self::spawn(vec![
            Self::to(Property::ScaleX, duration, Value::Float(sx))?,
            Self::to(Property::ScaleY, duration, Value::Float(sy))?,
        ]))
    }

    pub fn fade_to(duration: f32, opacity: f32) -> Result<Self, ActionError> {
        Self::to(Property::Opacity, duration, Value::Float(opacity))
    }

    pub fn fade_in(duration: f32) -> Result<Self, ActionError> {
        Self::fade_to(duration, 1.0)
    }

    pub fn fade_out(duration: f32) -> Result<Self, ActionError> {
        Self::fade_to(duration, 0.0)
    }

    pub fn tint_by(duration: f32, delta: [f32; 4]) -> Result<Self, ActionError> {
        Self::by(Property::Color, duration, Value::ColorRgba(delta))
    }

    pub fn tint_to(duration: f32, color: [f32; 4]) -> Result<Self, ActionError> {
        Self::to(Property::Color, duration, Value::ColorRgba(color))
    }

    /// Step the visual frame index by `frames` over `duration`.
    pub fn frames_by(duration: f32, frames: i32) -> Result<Self, ActionError> {
        Self::by(Property::Frame, duration, Value::Frame(frames))
    }

    /// Apply an easing curve to every interpolating leaf in this tree.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.set_easing(easing);
        self
    }

    fn set_easing(&mut self, easing: Easing) {
        match self {
            Self::Tween(t) => t.set_easing(easing),
            Self::Sequence(s) => s.children_mut().iter_mut().for_each(|c| c.set_easing(easing)),
            Self::Spawn(s) => s.children_mut().iter_mut().for_each(|c| c.set_easing(easing)),
            Self::Repeat(r) => r.inner_mut().set_easing(easing),
            Self::Delay(_) | Self::Callback(_) => {}
        }
    }

    /// Advance by `dt` seconds and report whether the action has finished.
    ///
    /// Ticking a finished action is a no-op that returns `true`.
    pub fn tick(&mut self, dt: f32, target: &mut dyn Target) -> Result<bool, ActionError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(ActionError::InvalidDelta { delta: dt });
        }
        self.advance(dt, target)?;
        Ok(self.is_finished())
    }

    /// Advance by `dt`, returning the part of `dt` this action did not need.
    pub(crate) fn advance(&mut self, dt: f32, target: &mut dyn Target) -> Result<f32, ActionError> {
        match self {
            Self::Tween(t) => t.advance(dt, target),
            Self::Delay(d) => Ok(d.advance(dt)),
            Self::Sequence(s) => s.advance(dt, target),
            Self::Spawn(s) => s.advance(dt, target),
            Self::Repeat(r) => r.advance(dt, target),
            Self::Callback(c) => Ok(c.advance(dt)),
        }
    }

    /// Return this action and its whole subtree to `Pending`, dropping captured start values.
    pub(crate) fn reset(&mut self) {
        match self {
            Self::Tween(t) => t.reset(),
            Self::Delay(d) => d.reset(),
            Self::Sequence(s) => s.reset(),
            Self::Spawn(s) => s.reset(),
            Self::Repeat(r) => r.reset(),
            Self::Callback(c) => c.reset(),
        }
    }

    /// Independent copy of this tree with all run state cleared.
    pub fn fresh(&self) -> Self {
        let mut copy = self.clone();
        copy.reset();
        copy
    }

    /// Compute the action that undoes this one when run from the state it leaves behind.
    ///
    /// The source is never modified. To-tweens are only reversible once they have captured a
    /// start value; callbacks reverse to themselves.
    pub fn reverse(&self) -> Result<Self, ActionError> {
        Ok(match self {
            Self::Tween(t) => Self::Tween(t.reverse()?),
            Self::Delay(d) => Self::Delay(Delay::new(d.duration())?),
            Self::Sequence(s) => Self::Sequence(s.reverse()?),
            Self::Spawn(s) => Self::Spawn(s.reverse()?),
            Self::Repeat(r) => Self::Repeat(r.reverse()?),
            Self::Callback(c) => Self::Callback(c.reverse()),
        })
    }

    /// Total duration in seconds; infinite for repeat-forever trees.
    pub fn duration(&self) -> f32 {
        match self {
            Self::Tween(t) => t.duration(),
            Self::Delay(d) => d.duration(),
            Self::Sequence(s) => s.duration(),
            Self::Spawn(s) => s.duration(),
            Self::Repeat(r) => r.duration(),
            Self::Callback(_) => 0.0,
        }
    }

    /// Seconds consumed in the current run.
    pub fn elapsed(&self) -> f32 {
        match self {
            Self::Tween(t) => t.elapsed(),
            Self::Delay(d) => d.elapsed(),
            Self::Sequence(s) => s.elapsed(),
            Self::Spawn(s) => s.elapsed(),
            Self::Repeat(r) => r.elapsed(),
            Self::Callback(_) => 0.0,
        }
    }

    pub fn state(&self) -> ActionState {
        match self {
            Self::Tween(t) => t.state(),
            Self::Delay(d) => d.state(),
            Self::Sequence(s) => s.state(),
            Self::Spawn(s) => s.state(),
            Self::Repeat(r) => r.state(),
            Self::Callback(c) => c.state(),
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.state() == ActionState::Finished
    }

    /// Normalized progress of the current run in [0,1].
    /// Repeat-forever trees report the progress of their current iteration.
    pub fn progress(&self) -> f32 {
        if self.is_finished() {
            return 1.0;
        }
        match self {
            Self::Repeat(r) if r.count() == RepeatCount::Forever => r.inner().progress(),
            _ => {
                let duration = self.duration();
                if duration > 0.0 {
                    (self.elapsed() / duration).clamp(0.0, 1.0)
                } else {
                    0.0
                }
            }
        }
    }

    /// Short variant name for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Tween(t) => match t.mode() {
                TweenMode::By(_) => "by",
                TweenMode::To(_) => "to",
            },
            Self::Delay(_) => "delay",
            Self::Sequence(_) => "sequence",
            Self::Spawn(_) => "spawn",
            Self::Repeat(r) => match r.count() {
                RepeatCount::Times(_) => "repeat",
                RepeatCount::Forever => "repeat_forever",
            },
            Self::Callback(_) => "callback",
        }
    }
}
