//! # sector_core - Mission Core Primitives
//!
//! Shared building blocks for the mission runtime:
//! - Collaborator traits (localization, sound, actor animation) that hosts
//!   implement and hand to the runtime explicitly
//! - A cancellable task scheduler with generational handles, used for every
//!   deferred effect (delayed trigger actions, boss intro window, cinematic
//!   exit beat)
//!
//! Nothing in this crate holds global state; every mission session owns its
//! own scheduler and collaborators.

pub mod handle;
pub mod schedule;
pub mod services;

pub use handle::*;
pub use schedule::*;
pub use services::*;

/// Milliseconds on the host clock
pub type Millis = f64;

pub mod prelude {
    pub use crate::handle::TaskHandle;
    pub use crate::schedule::Scheduler;
    pub use crate::services::{Animator, KeyLocalizer, Localizer, PoseFlags, SoundSink};
    pub use crate::Millis;
}
