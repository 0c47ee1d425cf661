//! Output contracts from the runner.
//!
//! Property writes go straight to the targets during the tick pass; outputs carry only the
//! discrete events of the update, in tick order.

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::ActionError;
use crate::ids::{ActionHandle, Tag, TargetId};

/// Discrete signals emitted while stepping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ActionEvent {
    /// The action completed and was detached.
    Finished {
        handle: ActionHandle,
        tag: Option<Tag>,
    },
    /// The action's tick failed; it was detached and will not be ticked again.
    Failed {
        handle: ActionHandle,
        tag: Option<Tag>,
        error: ActionError,
    },
    /// The resolver no longer produced this target; all of its actions were dropped.
    TargetLost { target: TargetId, dropped: usize },
}

/// An action that finished during the update, with the start values it captured.
#[derive(Clone, Debug)]
pub struct FinishedAction {
    pub handle: ActionHandle,
    pub tag: Option<Tag>,
    pub action: Action,
}

/// Outputs returned by `ActionRunner::update()`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub events: Vec<ActionEvent>,
    /// Events discarded because `Config::max_events_per_tick` was reached.
    #[serde(default)]
    pub dropped_events: usize,
    /// Instances that finished this update, kept until the next update (not capped).
    #[serde(skip)]
    pub finished_actions: Vec<FinishedAction>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
        self.dropped_events = 0;
        self.finished_actions.clear();
    }

    /// Push unless the per-tick cap is reached.
    #[inline]
    pub fn push_event(&mut self, event: ActionEvent, cap: usize) {
        if self.events.len() < cap {
            self.events.push(event);
        } else {
            self.dropped_events += 1;
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Handles of actions that finished this update.
    pub fn finished(&self) -> impl Iterator<Item = ActionHandle> + '_ {
        self.events.iter().filter_map(|e| match e {
            ActionEvent::Finished { handle, .. } => Some(*handle),
            _ => None,
        })
    }

    /// The finished instance behind `handle`, if it completed this update.
    pub fn finished_action(&self, handle: ActionHandle) -> Option<&Action> {
        self.finished_actions
            .iter()
            .find(|f| f.handle == handle)
            .map(|f| &f.action)
    }

    /// Actions that failed this update, with their errors.
    pub fn failed(&self) -> impl Iterator<Item = (ActionHandle, &ActionError)> + '_ {
        self.events.iter().filter_map(|e| match e {
            ActionEvent::Failed { handle, error, .. } => Some((*handle, error)),
            _ => None,
        })
    }
}
