//! Cancellable deferred tasks
//!
//! The scheduler is polled by its owner once per tick. Tasks whose due time
//! has been reached are returned in due order (ties keep scheduling order),
//! and a cancelled handle can never fire afterwards.

use crate::handle::TaskHandle;
use crate::Millis;

struct ScheduledTask<T> {
    due: Millis,
    seq: u64,
    payload: T,
}

struct Slot<T> {
    generation: u32,
    task: Option<ScheduledTask<T>>,
}

/// Queue of payloads waiting for a point in time
pub struct Scheduler<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    next_seq: u64,
    pending: usize,
}

impl<T> Scheduler<T> {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            next_seq: 0,
            pending: 0,
        }
    }

    /// Queue `payload` to fire once `now >= due`
    pub fn schedule(&mut self, due: Millis, payload: T) -> TaskHandle {
        let task = ScheduledTask {
            due,
            seq: self.next_seq,
            payload,
        };
        self.next_seq += 1;
        self.pending += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.task = Some(task);
            TaskHandle::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                task: Some(task),
            });
            TaskHandle::new(index, 0)
        }
    }

    /// Queue `payload` to fire `delay` milliseconds after `now`
    pub fn schedule_after(&mut self, now: Millis, delay: Millis, payload: T) -> TaskHandle {
        self.schedule(now + delay.max(0.0), payload)
    }

    /// Cancel a task, returning its payload if it had not fired yet
    pub fn cancel(&mut self, handle: TaskHandle) -> Option<T> {
        if handle.is_null() {
            return None;
        }
        let index = handle.index();
        let slot = self.slots.get_mut(index as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        let task = slot.task.take()?;
        self.release(index);
        Some(task.payload)
    }

    /// Whether the task behind `handle` is still waiting
    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        if handle.is_null() {
            return false;
        }
        self.slots
            .get(handle.index() as usize)
            .map(|slot| slot.generation == handle.generation() && slot.task.is_some())
            .unwrap_or(false)
    }

    /// Remove and return every payload due at `now`, earliest first
    pub fn drain_due(&mut self, now: Millis) -> Vec<T> {
        let mut due: Vec<(u32, Millis, u64)> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                slot.task
                    .as_ref()
                    .filter(|task| task.due <= now)
                    .map(|task| (index as u32, task.due, task.seq))
            })
            .collect();
        due.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.2.cmp(&b.2)));

        let mut fired = Vec::with_capacity(due.len());
        for (index, _, _) in due {
            if let Some(task) = self.slots[index as usize].task.take() {
                self.release(index);
                fired.push(task.payload);
            }
        }
        fired
    }

    /// Cancel everything, returning how many tasks were dropped
    pub fn cancel_all(&mut self) -> usize {
        let mut dropped = 0;
        for index in 0..self.slots.len() {
            if self.slots[index].task.take().is_some() {
                self.release(index as u32);
                dropped += 1;
            }
        }
        if dropped > 0 {
            log::debug!("Cancelled {} scheduled task(s)", dropped);
        }
        dropped
    }

    /// Number of tasks waiting
    pub fn len(&self) -> usize {
        self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending == 0
    }

    fn release(&mut self, index: u32) {
        let slot = &mut self.slots[index as usize];
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        self.pending -= 1;
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
