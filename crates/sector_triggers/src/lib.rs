//! Sector Triggers - Zone Trigger System
//!
//! Ground-plane trigger zones that fire typed actions and narrative text when
//! the player walks into them.
//!
//! # Features
//!
//! - Rotated rectangles and circles
//! - One-shot, repeat-interval and reset-on-exit lifecycles
//! - Per-action delays through cancellable scheduled tasks
//! - Narrative text with read-speed display duration
//! - Authored list order is the firing order for overlapping zones
//!
//! # Example
//!
//! ```ignore
//! use sector_triggers::prelude::*;
//!
//! let mut triggers = vec![
//!     Trigger::circle("gate_note", Vec2::new(10.0, 10.0), 5.0)
//!         .with_content("sector1.gate_note")
//!         .with_action(ActionEffect::PlaySound { sound: "radio".into() }),
//! ];
//! let mut engine = TriggerEngine::new();
//! engine.evaluate(player_pos, &mut triggers, now, &localizer, &mut handler);
//! ```

pub mod action;
pub mod error;
pub mod system;
pub mod trigger;
pub mod zone;

pub mod prelude {
    pub use crate::action::{ActionEffect, ActionKind, NarrativeEvent, TriggerAction};
    pub use crate::error::TriggerError;
    pub use crate::system::{EvaluationSummary, TriggerEngine, TriggerHandler};
    pub use crate::trigger::{Trigger, TriggerKind, ZoneSize};
    pub use crate::zone::TriggerZone;
    pub use sector_math::Vec2;
}

pub use prelude::*;
