//! Generational handles for scheduled tasks
//!
//! A handle stays valid until its task fires or is cancelled. Slots are
//! reused, so the generation detects a stale handle pointing at a slot that
//! now holds a different task.

use core::fmt;

/// Handle to a task queued in a [`Scheduler`](crate::Scheduler)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle {
    /// Lower 32 bits: slot index, upper 32 bits: generation
    bits: u64,
}

impl TaskHandle {
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self {
            bits: (generation as u64) << 32 | index as u64,
        }
    }

    /// A handle that never refers to a live task
    #[inline]
    pub const fn null() -> Self {
        Self { bits: u64::MAX }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        self.bits == u64::MAX
    }

    #[inline]
    pub const fn index(&self) -> u32 {
        self.bits as u32
    }

    #[inline]
    pub const fn generation(&self) -> u32 {
        (self.bits >> 32) as u32
    }
}

impl Default for TaskHandle {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "TaskHandle(null)")
        } else {
            write!(f, "TaskHandle({}v{})", self.index(), self.generation())
        }
    }
}
