//! Sector Cinematic - Dialogue Sequencer
//!
//! Drives scripted conversations between the player and another actor.
//!
//! # Features
//!
//! - Timed dialogue lines (typing time plus a fixed reading buffer)
//! - Orbiting, dollying camera around the speakers' midpoint, eased with
//!   exponential smoothing, or a per-line camera shot
//! - Case-insensitive speaker resolution with roster fallback
//! - Speech-bubble screen placement with edge clamping and tail selection
//! - Inline script events fired when a line ends
//!
//! # Example
//!
//! ```ignore
//! use sector_cinematic::prelude::*;
//!
//! let mut cinematic = CinematicState::start(&script, speakers, &cast, &camera, now, &config, &localizer);
//! let sequencer = CinematicSequencer::new(config);
//! match sequencer.advance(&mut cinematic, &mut camera, &cast, now, delta, frame, &mut hooks) {
//!     CinematicTick::Finished { exit_trigger } => { /* hand control back */ }
//!     _ => {}
//! }
//! ```

pub mod actor;
pub mod bubble;
pub mod camera;
pub mod script;
pub mod sequencer;
pub mod state;

pub mod prelude {
    pub use crate::actor::{Actor, ActorKind, Cast, Speakers};
    pub use crate::bubble::{BubbleLayout, BubblePlacement, BubbleTail};
    pub use crate::camera::{Camera, CameraShot, Viewport};
    pub use crate::script::{Framing, Script, ScriptLine};
    pub use crate::sequencer::{CinematicHooks, CinematicSequencer, CinematicTick, SequencerConfig};
    pub use crate::state::CinematicState;
}

pub use prelude::*;
