//! Identifiers and simple allocators for targets and running actions.

use serde::{Deserialize, Serialize};

/// Stable identity of a target registered with the runner.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u32);

/// Monotonic identity of one attached action instance.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub u64);

/// Integer key used to replace or cancel a specific running action on a target.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Tag(pub i32);

/// Handle returned by `ActionRunner::run`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ActionHandle {
    pub target: TargetId,
    pub instance: InstanceId,
}

/// Monotonic allocator for TargetId and InstanceId.
/// Ids are never reused, so a destroyed target's id stays dead.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_target: u32,
    next_instance: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_target(&mut self) -> TargetId {
        let id = TargetId(self.next_target);
        self.next_target = self.next_target.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_instance(&mut self) -> InstanceId {
        let id = InstanceId(self.next_instance);
        self.next_instance = self.next_instance.wrapping_add(1);
        id
    }
}
