//! Sector Mission - Mission Loop Orchestration
//!
//! Runs one combat sector: the per-frame loop that decides which mode owns
//! the tick and drives triggers, conversations, player vitals and the boss
//! lifecycle around a host that renders and simulates enemies.
//!
//! # Features
//!
//! - Explicit mode machine (boss intro, death, concluding, paused,
//!   cinematic, interaction, normal) with strict priority
//! - Cancellable timers for the boss intro, death sequence, victory grace and
//!   cinematic exit beat; all dropped on teardown
//! - Sector content loading from JSON with load-time validation
//! - TOML configuration with environment overrides
//! - Player HP with invulnerability window, stamina, obstacle push-out
//! - Clue pickup, XP rewards, camera shake and pan
//!
//! # Example
//!
//! ```ignore
//! use sector_mission::prelude::*;
//!
//! let sector = SectorDefinition::load_file("data/sectors/camp_road.json", Validation::Strict)?;
//! let mut mission = MissionLoop::new(sector, MissionConfig::load(), host);
//! mission.start(now);
//!
//! // Every frame
//! let report = mission.tick(now, delta, MoveInput::walk(direction));
//!
//! // Leaving the sector
//! mission.shutdown();
//! ```

pub mod config;
pub mod definition;
pub mod error;
pub mod fx;
pub mod host;
pub mod mode;
pub mod movement;
pub mod session;
pub mod state;
pub mod vitals;

pub mod prelude {
    pub use crate::config::{CameraConfig, MissionConfig, PlayerConfig, TimingConfig};
    pub use crate::definition::{
        ActorDefinition, BossDefinition, ClueDefinition, SectorDefinition, Validation,
    };
    pub use crate::error::MissionError;
    pub use crate::fx::CameraFx;
    pub use crate::host::{FrameView, MissionHost, WorldReport, WorldStep};
    pub use crate::mode::MissionMode;
    pub use crate::movement::{MoveInput, Obstacle};
    pub use crate::session::{FrameReport, MissionLoop, BOSS_START_EVENT};
    pub use crate::state::{
        EnemySnapshot, MissionCounters, MissionOutcome, MissionReport, MissionRuntimeState,
    };
    pub use crate::vitals::{DamageOutcome, PlayerVitals};
}

pub use prelude::*;
