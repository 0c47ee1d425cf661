use std::fmt;
use std::sync::Arc;

use super::ActionState;

/// Zero-duration leaf that invokes a host procedure once per run.
///
/// Clones share the procedure; each clone still fires at most once per run of its own.
#[derive(Clone)]
pub struct Callback {
    func: Arc<dyn Fn() + Send + Sync>,
    state: ActionState,
}

impl Callback {
    pub fn new(func: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            func: Arc::new(func),
            state: ActionState::Pending,
        }
    }

    #[inline]
    pub fn state(&self) -> ActionState {
        self.state
    }

    pub(crate) fn advance(&mut self, dt: f32) -> f32 {
        if self.state != ActionState::Finished {
            (self.func)();
            self.state = ActionState::Finished;
        }
        dt
    }

    pub(crate) fn reset(&mut self) {
        self.state = ActionState::Pending;
    }

    /// No natural inverse exists for a side effect; the reversal fires the same procedure.
    pub(crate) fn reverse(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
            state: ActionState::Pending,
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
