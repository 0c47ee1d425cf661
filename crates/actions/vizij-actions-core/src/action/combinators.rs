//! Sequence, spawn and repeat combinators.
//!
//! Combinators own their children by value; cloning a combinator deep-clones the whole subtree,
//! so two runs of one template never share `elapsed` or captured start values.

use serde::{Deserialize, Serialize};

use super::{Action, ActionState, TIME_EPSILON};
use crate::error::ActionError;
use crate::target::Target;

/// Children run strictly in order. Time left over when a child finishes is handed to the next
/// child within the same tick.
#[derive(Clone, Debug)]
pub struct Sequence {
    children: Vec<Action>,
    current: usize,
    elapsed: f32,
    state: ActionState,
}

impl Sequence {
    pub fn new(children: Vec<Action>) -> Self {
        Self {
            children,
            current: 0,
            elapsed: 0.0,
            state: ActionState::Pending,
        }
    }

    #[inline]
    pub fn children(&self) -> &[Action] {
        &self.children
    }

    /// Index of the child currently receiving time.
    #[inline]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[inline]
    pub fn state(&self) -> ActionState {
        self.state
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn duration(&self) -> f32 {
        self.children.iter().map(Action::duration).sum()
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Action] {
        &mut self.children
    }

    pub(crate) fn advance(&mut self, dt: f32, target: &mut dyn Target) -> Result<f32, ActionError> {
        if self.state == ActionState::Finished {
            return Ok(dt);
        }
        self.state = ActionState::Running;

        let mut remaining = dt;
        while let Some(child) = self.children.get_mut(self.current) {
            remaining = child.advance(remaining, target)?;
            if !child.is_finished() {
                self.elapsed += dt;
                return Ok(0.0);
            }
            self.current += 1;
        }

        self.state = ActionState::Finished;
        self.elapsed += dt - remaining;
        Ok(remaining)
    }

    pub(crate) fn reset(&mut self) {
        self.children.iter_mut().for_each(Action::reset);
        self.current = 0;
        self.elapsed = 0.0;
        self.state = ActionState::Pending;
    }

    /// Reverse the order and reverse each child.
    pub(crate) fn reverse(&self) -> Result<Self, ActionError> {
        let children = self
            .children
            .iter()
            .rev()
            .map(Action::reverse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(children))
    }
}

/// Children run concurrently from a shared start; finished children hold their final value.
#[derive(Clone, Debug)]
pub struct Spawn {
    children: Vec<Action>,
    elapsed: f32,
    state: ActionState,
}

impl Spawn {
    pub fn new(children: Vec<Action>) -> Self {
        Self {
            children,
            elapsed: 0.0,
            state: ActionState::Pending,
        }
    }

    #[inline]
    pub fn children(&self) -> &[Action] {
        &self.children
    }

    #[inline]
    pub fn state(&self) -> ActionState {
        self.state
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn duration(&self) -> f32 {
        self.children
            .iter()
            .map(Action::duration)
            .fold(0.0, f32::max)
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Action] {
        &mut self.children
    }

    pub(crate) fn advance(&mut self, dt: f32, target: &mut dyn Target) -> Result<f32, ActionError> {
        if self.state == ActionState::Finished {
            return Ok(dt);
        }
        self.state = ActionState::Running;

        // The spawn finishes together with its slowest child, so its leftover is the smallest
        // leftover among children that finished during this tick.
        let mut leftover = dt;
        let mut all_finished = true;
        for child in self.children.iter_mut() {
            if child.is_finished() {
                continue;
            }
            let child_leftover = child.advance(dt, target)?;
            if child.is_finished() {
                leftover = leftover.min(child_leftover);
            } else {
                all_finished = false;
            }
        }

        if all_finished {
            self.state = ActionState::Finished;
            self.elapsed += dt - leftover;
            Ok(leftover)
        } else {
            self.elapsed += dt;
            Ok(0.0)
        }
    }

    pub(crate) fn reset(&mut self) {
        self.children.iter_mut().for_each(Action::reset);
        self.elapsed = 0.0;
        self.state = ActionState::Pending;
    }

    pub(crate) fn reverse(&self) -> Result<Self, ActionError> {
        let children = self
            .children
            .iter()
            .map(Action::reverse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(children))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatCount {
    Times(u32),
    Forever,
}

/// Runs one child repeatedly, resetting it (and re-capturing its start values) between
/// iterations.
#[derive(Clone, Debug)]
pub struct Repeat {
    inner: Box<Action>,
    count: RepeatCount,
    completed: u32,
    elapsed: f32,
    state: ActionState,
}

impl Repeat {
    pub fn new(inner: Action, count: RepeatCount) -> Result<Self, ActionError> {
        match count {
            RepeatCount::Times(n) => Ok(Self::times(inner, n)),
            RepeatCount::Forever => Self::forever(inner),
        }
    }

    pub fn times(inner: Action, n: u32) -> Self {
        Self {
            inner: Box::new(inner),
            count: RepeatCount::Times(n),
            completed: 0,
            elapsed: 0.0,
            state: ActionState::Pending,
        }
    }

    /// Fails for a zero-duration child, which would loop forever inside a single tick.
    pub fn forever(inner: Action) -> Result<Self, ActionError> {
        if inner.duration() <= TIME_EPSILON {
            return Err(ActionError::ZeroDurationRepeat);
        }
        Ok(Self {
            inner: Box::new(inner),
            count: RepeatCount::Forever,
            completed: 0,
            elapsed: 0.0,
            state: ActionState::Pending,
        })
    }

    #[inline]
    pub fn inner(&self) -> &Action {
        &self.inner
    }

    #[inline]
    pub fn count(&self) -> RepeatCount {
        self.count
    }

    /// Iterations completed in the current run.
    #[inline]
    pub fn completed(&self) -> u32 {
        self.completed
    }

    #[inline]
    pub fn state(&self) -> ActionState {
        self.state
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn duration(&self) -> f32 {
        match self.count {
            RepeatCount::Times(n) => self.inner.duration() * n as f32,
            RepeatCount::Forever => f32::INFINITY,
        }
    }

    pub(crate) fn inner_mut(&mut self) -> &mut Action {
        &mut self.inner
    }

    pub(crate) fn advance(&mut self, dt: f32, target: &mut dyn Target) -> Result<f32, ActionError> {
        if self.state == ActionState::Finished {
            return Ok(dt);
        }
        if self.count == RepeatCount::Times(0) {
            self.state = ActionState::Finished;
            return Ok(dt);
        }
        self.state = ActionState::Running;

        let mut remaining = dt;
        loop {
            let incoming = remaining;
            remaining = self.inner.advance(remaining, target)?;
            if !self.inner.is_finished() {
                self.elapsed += dt;
                return Ok(0.0);
            }
            self.completed = self.completed.saturating_add(1);
            if let RepeatCount::Times(n) = self.count {
                if self.completed >= n {
                    self.state = ActionState::Finished;
                    self.elapsed += dt - remaining;
                    return Ok(remaining);
                }
            }
            self.inner.reset();
            // A forever iteration that consumed no time would spin; the next tick resumes it.
            if self.count == RepeatCount::Forever && remaining >= incoming {
                self.elapsed += dt;
                return Ok(0.0);
            }
        }
    }

    pub(crate) fn reset(&mut self) {
        self.inner.reset();
        self.completed = 0;
        self.elapsed = 0.0;
        self.state = ActionState::Pending;
    }

    pub(crate) fn reverse(&self) -> Result<Self, ActionError> {
        Ok(Self {
            inner: Box::new(self.inner.reverse()?),
            count: self.count,
            completed: 0,
            elapsed: 0.0,
            state: ActionState::Pending,
        })
    }
}
