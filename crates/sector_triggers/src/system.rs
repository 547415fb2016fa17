//! Trigger evaluation

use crate::action::{ActionEffect, NarrativeEvent};
use crate::trigger::Trigger;
use sector_core::{Localizer, Millis, Scheduler, TaskHandle};
use sector_math::Vec3;
use std::collections::HashSet;

/// Receiver of everything a trigger fires
pub trait TriggerHandler {
    /// Dispatch one action effect
    fn execute(&mut self, trigger_id: &str, effect: &ActionEffect);
    /// Present narrative text
    fn narrate(&mut self, event: NarrativeEvent);
}

/// Action waiting for its delay to elapse
#[derive(Debug, Clone)]
struct PendingAction {
    trigger_id: String,
    effect: ActionEffect,
}

/// What happened during one evaluation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationSummary {
    /// Triggers that fired a first entry
    pub fired: usize,
    /// Reset-on-exit triggers re-armed because the player left
    pub rearmed: usize,
    /// Refresh actions re-sent while continuously inside
    pub refreshed: usize,
    /// Actions queued behind a delay
    pub scheduled: usize,
}

/// Evaluates trigger zones against the player each tick
///
/// Holds no gameplay knowledge: every effect goes to the [`TriggerHandler`].
/// Delayed actions live in an owned scheduler and are dispatched by
/// [`TriggerEngine::pump`]; [`TriggerEngine::cancel_pending`] drops them when
/// the session is torn down.
pub struct TriggerEngine {
    delayed: Scheduler<PendingAction>,
    warned_malformed: HashSet<String>,
}

impl TriggerEngine {
    /// Create a new trigger engine
    pub fn new() -> Self {
        Self {
            delayed: Scheduler::new(),
            warned_malformed: HashSet::new(),
        }
    }

    /// Evaluate every trigger in list order against the player position
    pub fn evaluate(
        &mut self,
        player_pos: Vec3,
        triggers: &mut [Trigger],
        now: Millis,
        localizer: &dyn Localizer,
        handler: &mut dyn TriggerHandler,
    ) -> EvaluationSummary {
        let mut summary = EvaluationSummary::default();
        let point = player_pos.xz();

        for trigger in triggers.iter_mut() {
            if trigger.is_spent() {
                continue;
            }

            if trigger.zone().is_none() && self.warned_malformed.insert(trigger.id.clone()) {
                log::warn!("Trigger '{}' has no size or radius and can never fire", trigger.id);
            }
            let inside = trigger.contains(point);

            if trigger.triggered {
                if trigger.reset_on_exit && !inside {
                    trigger.triggered = false;
                    summary.rearmed += 1;
                    log::debug!("Trigger '{}' re-armed", trigger.id);
                    continue;
                }

                if let Some(interval) = trigger.repeat() {
                    if now - trigger.last_trigger_time > interval {
                        trigger.triggered = false;
                    } else {
                        continue;
                    }
                } else if !trigger.reset_on_exit {
                    continue;
                }
            }

            if !inside {
                continue;
            }

            if trigger.triggered {
                // Still inside a reset-on-exit zone: refresh UI actions only
                for action in &trigger.actions {
                    if action.effect.kind().refreshes_while_inside() {
                        handler.execute(&trigger.id, &action.effect);
                        summary.refreshed += 1;
                    }
                }
                continue;
            }

            trigger.triggered = true;
            trigger.last_trigger_time = now;
            summary.fired += 1;
            log::debug!("Trigger '{}' fired at {:.0}ms", trigger.id, now);

            for action in &trigger.actions {
                match action.effective_delay() {
                    Some(delay) => {
                        self.schedule(now, delay, &trigger.id, action.effect.clone());
                        summary.scheduled += 1;
                    }
                    None => handler.execute(&trigger.id, &action.effect),
                }
            }

            if let Some(key) = &trigger.content {
                let text = localizer.translate(key);
                handler.narrate(NarrativeEvent::new(trigger.id.clone(), trigger.kind, text));
            }
        }

        summary
    }

    /// Dispatch delayed actions that are due, returning how many fired
    pub fn pump(&mut self, now: Millis, handler: &mut dyn TriggerHandler) -> usize {
        let due = self.delayed.drain_due(now);
        let count = due.len();
        for pending in due {
            handler.execute(&pending.trigger_id, &pending.effect);
        }
        count
    }

    /// Drop every delayed action that has not fired yet
    pub fn cancel_pending(&mut self) -> usize {
        self.delayed.cancel_all()
    }

    /// Number of delayed actions waiting
    pub fn pending_count(&self) -> usize {
        self.delayed.len()
    }

    fn schedule(
        &mut self,
        now: Millis,
        delay: Millis,
        trigger_id: &str,
        effect: ActionEffect,
    ) -> TaskHandle {
        self.delayed.schedule_after(
            now,
            delay,
            PendingAction {
                trigger_id: trigger_id.to_string(),
                effect,
            },
        )
    }
}

impl Default for TriggerEngine {
    fn default() -> Self {
        Self::new()
    }
}
