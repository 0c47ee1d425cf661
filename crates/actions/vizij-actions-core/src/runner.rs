//! ActionRunner: owns running action instances per target and advances them each frame.
//!
//! Methods:
//! - register_target / destroy_target (explicit lifetime notifications)
//! - run (tag replacement), stop / stop_by_tag / stop_all
//! - pause_target / resume_target / pause_all / resume_targets
//! - update (one synchronous tick pass over every unpaused target)
//!
//! Targets are advanced in registration order and, per target, actions in attachment order.
//! Callbacks run inside the tick pass and cannot reach the runner, so a tick never observes a
//! half-applied stop or run.

use hashbrown::HashSet;
use log::{debug, trace, warn};

use crate::action::Action;
use crate::config::Config;
use crate::error::ActionError;
use crate::ids::{ActionHandle, IdAllocator, InstanceId, Tag, TargetId};
use crate::outputs::{ActionEvent, FinishedAction, Outputs};
use crate::target::TargetResolver;

/// One attached action instance.
#[derive(Debug)]
struct RunningAction {
    instance: InstanceId,
    tag: Option<Tag>,
    action: Action,
}

/// Per-target bookkeeping.
#[derive(Debug)]
struct TargetSlot {
    id: TargetId,
    paused: bool,
    actions: Vec<RunningAction>,
}

impl TargetSlot {
    fn position(&self, instance: InstanceId) -> Option<usize> {
        self.actions.iter().position(|r| r.instance == instance)
    }
}

#[derive(Debug)]
pub struct ActionRunner {
    cfg: Config,
    ids: IdAllocator,
    slots: Vec<TargetSlot>,
    destroyed: HashSet<TargetId>,

    // Per-update outputs
    outputs: Outputs,
}

impl Default for ActionRunner {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl ActionRunner {
    /// Create a new runner with the given config.
    pub fn new(cfg: Config) -> Self {
        Self {
            slots: Vec::with_capacity(cfg.target_capacity),
            cfg,
            ids: IdAllocator::new(),
            destroyed: HashSet::new(),
            outputs: Outputs::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Register a new target; the id is never reused.
    pub fn register_target(&mut self) -> TargetId {
        let id = self.ids.alloc_target();
        self.slots.push(TargetSlot {
            id,
            paused: false,
            actions: Vec::with_capacity(self.cfg.actions_per_target),
        });
        debug!("registered target {id:?}");
        id
    }

    /// Whether `target` is registered and not destroyed.
    #[inline]
    pub fn is_registered(&self, target: TargetId) -> bool {
        self.slots.iter().any(|s| s.id == target)
    }

    /// All live targets in registration order.
    pub fn target_ids(&self) -> Vec<TargetId> {
        self.slots.iter().map(|s| s.id).collect()
    }

    fn unknown(target: TargetId) -> ActionError {
        ActionError::UnknownTarget { target }
    }

    fn slot(&self, target: TargetId) -> Result<&TargetSlot, ActionError> {
        self.slots
            .iter()
            .find(|s| s.id == target)
            .ok_or_else(|| Self::unknown(target))
    }

    fn slot_mut(&mut self, target: TargetId) -> Result<&mut TargetSlot, ActionError> {
        self.slots
            .iter_mut()
            .find(|s| s.id == target)
            .ok_or_else(|| Self::unknown(target))
    }

    /// Drop every entry for `target` synchronously. Called when the host destroys the target.
    /// Returns the number of actions dropped.
    pub fn destroy_target(&mut self, target: TargetId) -> Result<usize, ActionError> {
        let idx = self
            .slots
            .iter()
            .position(|s| s.id == target)
            .ok_or_else(|| Self::unknown(target))?;
        let slot = self.slots.remove(idx);
        self.destroyed.insert(target);
        debug!(
            "destroyed target {target:?}, dropped {} action(s)",
            slot.actions.len()
        );
        Ok(slot.actions.len())
    }

    /// Whether `target` was destroyed (as opposed to never registered).
    #[inline]
    pub fn is_destroyed(&self, target: TargetId) -> bool {
        self.destroyed.contains(&target)
    }

    /// Attach `action` to `target`.
    ///
    /// The action is reset before attachment so it always starts a fresh run. When `tag` is
    /// already running on the target, the earlier action is removed without finishing (last
    /// writer wins). Untagged actions never collide.
    pub fn run(
        &mut self,
        target: TargetId,
        mut action: Action,
        tag: Option<Tag>,
    ) -> Result<ActionHandle, ActionError> {
        self.slot(target)?;
        let instance = self.ids.alloc_instance();
        let slot = self.slot_mut(target)?;

        if let Some(tag) = tag {
            let before = slot.actions.len();
            slot.actions.retain(|r| r.tag != Some(tag));
            if slot.actions.len() != before {
                debug!("tag {tag:?} on {target:?} replaced by {instance:?}");
            }
        }

        action.reset();
        debug!(
            "run {} ({:?}) on {target:?} tag={tag:?}",
            action.kind_name(),
            instance
        );
        slot.actions.push(RunningAction {
            instance,
            tag,
            action,
        });
        Ok(ActionHandle { target, instance })
    }

    /// Remove a running action without finishing it. No completion side effects fire and the
    /// target keeps whatever value the last executed tick wrote.
    ///
    /// Returns `Ok(false)` if the action already finished or was stopped.
    pub fn stop(&mut self, handle: ActionHandle) -> Result<bool, ActionError> {
        let slot = self.slot_mut(handle.target)?;
        match slot.position(handle.instance) {
            Some(idx) => {
                slot.actions.remove(idx);
                debug!("stopped {:?} on {:?}", handle.instance, handle.target);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Stop every action on `target` carrying `tag`. Returns how many were removed.
    pub fn stop_by_tag(&mut self, target: TargetId, tag: Tag) -> Result<usize, ActionError> {
        let slot = self.slot_mut(target)?;
        let before = slot.actions.len();
        slot.actions.retain(|r| r.tag != Some(tag));
        let removed = before - slot.actions.len();
        debug!("stopped {removed} action(s) tagged {tag:?} on {target:?}");
        Ok(removed)
    }

    /// Stop every action on `target`. Returns how many were removed.
    pub fn stop_all(&mut self, target: TargetId) -> Result<usize, ActionError> {
        let slot = self.slot_mut(target)?;
        let removed = slot.actions.len();
        slot.actions.clear();
        debug!("stopped all {removed} action(s) on {target:?}");
        Ok(removed)
    }

    /// Paused targets keep their actions (and their state) but receive no ticks.
    pub fn pause_target(&mut self, target: TargetId) -> Result<(), ActionError> {
        self.slot_mut(target)?.paused = true;
        debug!("paused {target:?}");
        Ok(())
    }

    pub fn resume_target(&mut self, target: TargetId) -> Result<(), ActionError> {
        self.slot_mut(target)?.paused = false;
        debug!("resumed {target:?}");
        Ok(())
    }

    pub fn is_paused(&self, target: TargetId) -> Result<bool, ActionError> {
        Ok(self.slot(target)?.paused)
    }

    /// Pause every target that currently has running actions and is not already paused.
    /// Returns the targets paused by this call, for use with [`Self::resume_targets`].
    pub fn pause_all(&mut self) -> Vec<TargetId> {
        let mut paused = Vec::new();
        for slot in self.slots.iter_mut() {
            if !slot.paused && !slot.actions.is_empty() {
                slot.paused = true;
                paused.push(slot.id);
            }
        }
        debug!("paused {} target(s)", paused.len());
        paused
    }

    /// Resume the given targets; ids that are no longer registered are skipped.
    pub fn resume_targets(&mut self, targets: &[TargetId]) {
        for slot in self.slots.iter_mut() {
            if targets.contains(&slot.id) {
                slot.paused = false;
            }
        }
    }

    /// Whether the action behind `handle` is still attached.
    pub fn is_running(&self, handle: ActionHandle) -> bool {
        self.slot(handle.target)
            .map(|s| s.position(handle.instance).is_some())
            .unwrap_or(false)
    }

    /// Inspect a running action.
    pub fn action(&self, handle: ActionHandle) -> Option<&Action> {
        let slot = self.slot(handle.target).ok()?;
        slot.position(handle.instance).map(|i| &slot.actions[i].action)
    }

    /// The running action carrying `tag` on `target`, if any.
    pub fn action_by_tag(&self, target: TargetId, tag: Tag) -> Option<&Action> {
        self.slot(target)
            .ok()?
            .actions
            .iter()
            .find(|r| r.tag == Some(tag))
            .map(|r| &r.action)
    }

    /// Number of actions attached to `target`.
    pub fn running_count(&self, target: TargetId) -> Result<usize, ActionError> {
        Ok(self.slot(target)?.actions.len())
    }

    /// Number of actions attached across all targets.
    pub fn total_running(&self) -> usize {
        self.slots.iter().map(|s| s.actions.len()).sum()
    }

    /// Reverse the instance behind `handle`, using whatever start values it has captured.
    ///
    /// Works for attached actions and for actions that finished during the most recent update.
    pub fn reverse_running(&self, handle: ActionHandle) -> Result<Action, ActionError> {
        let slot = self.slot(handle.target)?;
        match slot.position(handle.instance) {
            Some(idx) => slot.actions[idx].action.reverse(),
            None => self
                .outputs
                .finished_action(handle)
                .ok_or(ActionError::ActionNotFound {
                    target: handle.target,
                    instance: handle.instance,
                })?
                .reverse(),
        }
    }

    /// Take the instances that finished during the most recent update.
    pub fn take_finished(&mut self) -> Vec<FinishedAction> {
        std::mem::take(&mut self.outputs.finished_actions)
    }

    /// Outputs of the most recent update.
    #[inline]
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    /// Advance every unpaused target's actions by `dt` seconds.
    ///
    /// Finished instances are handed back in [`Outputs::finished_actions`] so captured start
    /// values stay available for reversal. A zero delta is a no-op. A failing action is detached
    /// and reported as [`ActionEvent::Failed`]; the rest of the frame still runs. Targets the resolver can no
    /// longer produce are treated as destroyed and reported as [`ActionEvent::TargetLost`].
    pub fn update(
        &mut self,
        dt: f32,
        resolver: &mut dyn TargetResolver,
    ) -> Result<&Outputs, ActionError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(ActionError::InvalidDelta { delta: dt });
        }
        self.outputs.clear();

        let dt = match self.cfg.max_frame_delta {
            Some(max) if dt > max => {
                trace!("clamping delta {dt} to {max}");
                max
            }
            _ => dt,
        };
        if dt == 0.0 {
            return Ok(&self.outputs);
        }

        let cap = self.cfg.max_events_per_tick;
        let mut lost: Vec<TargetId> = Vec::new();
        let mut ticked = 0usize;

        for slot in self.slots.iter_mut() {
            if slot.paused || slot.actions.is_empty() {
                continue;
            }
            let slot_id = slot.id;
            let target = match resolver.resolve(slot_id) {
                Some(t) => t,
                None => {
                    lost.push(slot_id);
                    continue;
                }
            };
            ticked += 1;

            let mut i = 0;
            while i < slot.actions.len() {
                let running = &mut slot.actions[i];
                let handle = ActionHandle {
                    target: slot_id,
                    instance: running.instance,
                };
                match running.action.tick(dt, &mut *target) {
                    Ok(false) => i += 1,
                    Ok(true) => {
                        let RunningAction { tag, action, .. } = slot.actions.remove(i);
                        self.outputs
                            .push_event(ActionEvent::Finished { handle, tag }, cap);
                        self.outputs
                            .finished_actions
                            .push(FinishedAction { handle, tag, action });
                    }
                    Err(error) => {
                        warn!(
                            "aborting {} {:?} on {:?}: {error} [{}]",
                            running.action.kind_name(),
                            running.instance,
                            slot_id,
                            error.category()
                        );
                        let tag = running.tag;
                        slot.actions.remove(i);
                        self.outputs
                            .push_event(ActionEvent::Failed { handle, tag, error }, cap);
                    }
                }
            }
        }

        for target in lost {
            warn!("resolver lost {target:?}; dropping its actions");
            if let Some(idx) = self.slots.iter().position(|s| s.id == target) {
                let slot = self.slots.remove(idx);
                self.destroyed.insert(target);
                self.outputs.push_event(
                    ActionEvent::TargetLost {
                        target,
                        dropped: slot.actions.len(),
                    },
                    cap,
                );
            }
        }

        if self.outputs.dropped_events > 0 {
            warn!(
                "event cap {cap} reached; dropped {} event(s)",
                self.outputs.dropped_events
            );
        }
        trace!("update dt={dt} ticked {ticked} target(s)");
        Ok(&self.outputs)
    }
}
