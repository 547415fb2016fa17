//! Sector content loading
//!
//! A sector file is JSON:
//!
//! ```json
//! {
//!   "id": "sector1",
//!   "player_spawn": {"x": 0.0, "y": 0.0},
//!   "triggers": [{"id": "gate", "position": {"x": 4.0, "y": 4.0}, "radius": 2.0,
//!                 "actions": [{"type": "START_CINEMATIC", "script": "meet_loke"}]}],
//!   "scripts": [{"id": "meet_loke", "counterpart": "Loke", "lines": []}],
//!   "cast": [{"name": "Loke", "position": {"x": 5.0, "y": 5.0}}],
//!   "boss": {"enemy_type": "TANK", "position": {"x": 0.0, "y": -30.0}, "kill_threshold": 20}
//! }
//! ```

use crate::error::{MissionError, Result};
use crate::movement::Obstacle;
use sector_cinematic::{Actor, ActorKind, Script};
use sector_math::Vec2;
use sector_triggers::{ActionEffect, Trigger};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

fn default_clue_radius() -> f32 {
    1.5
}

fn default_scale() -> f32 {
    1.0
}

/// How strictly trigger geometry is checked on load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validation {
    /// Geometry problems are load errors
    Strict,
    /// Geometry problems are logged and the trigger is kept (it never fires)
    #[default]
    Lenient,
}

/// Readable collectible
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClueDefinition {
    pub id: String,
    pub position: Vec2,
    /// Pickup radius
    #[serde(default = "default_clue_radius")]
    pub radius: f32,
    /// Text key shown when the clue is read
    pub content: String,
}

/// Non-player actor placed in the sector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorDefinition {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub position: Vec2,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub kind: ActorKind,
}

impl ActorDefinition {
    pub fn to_actor(&self) -> Actor {
        Actor {
            name: self.name.clone(),
            aliases: self.aliases.clone(),
            position: self.position.to_vec3(0.0),
            scale: self.scale,
            kind: self.kind,
        }
    }
}

/// Sector boss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossDefinition {
    pub enemy_type: String,
    pub position: Vec2,
    /// Spawn once this many enemies are down; `None` spawns only via `boss_start`
    #[serde(default)]
    pub kill_threshold: Option<u32>,
}

/// Static content of one sector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorDefinition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub player_spawn: Vec2,
    #[serde(default)]
    pub triggers: Vec<Trigger>,
    #[serde(default)]
    pub scripts: Vec<Script>,
    #[serde(default)]
    pub clues: Vec<ClueDefinition>,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    #[serde(default)]
    pub cast: Vec<ActorDefinition>,
    #[serde(default)]
    pub boss: Option<BossDefinition>,
}

impl SectorDefinition {
    /// Create an empty sector
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            player_spawn: Vec2::ZERO,
            triggers: Vec::new(),
            scripts: Vec::new(),
            clues: Vec::new(),
            obstacles: Vec::new(),
            cast: Vec::new(),
            boss: None,
        }
    }

    /// Add a trigger
    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.triggers.push(trigger);
        self
    }

    /// Add a script
    pub fn with_script(mut self, script: Script) -> Self {
        self.scripts.push(script);
        self
    }

    /// Add a clue
    pub fn with_clue(mut self, clue: ClueDefinition) -> Self {
        self.clues.push(clue);
        self
    }

    /// Add an obstacle
    pub fn with_obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    /// Add an actor
    pub fn with_actor(mut self, actor: ActorDefinition) -> Self {
        self.cast.push(actor);
        self
    }

    /// Set the boss
    pub fn with_boss(mut self, boss: BossDefinition) -> Self {
        self.boss = Some(boss);
        self
    }

    /// Set the spawn point
    pub fn with_spawn(mut self, spawn: Vec2) -> Self {
        self.player_spawn = spawn;
        self
    }

    /// Parse and validate a sector from JSON text
    pub fn from_json_str(json: &str, validation: Validation) -> Result<Self> {
        let sector: Self = serde_json::from_str(json)?;
        sector.validate(validation)?;
        Ok(sector)
    }

    /// Load and validate a sector file
    pub fn load_file(path: impl AsRef<Path>, validation: Validation) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let sector = Self::from_json_str(&content, validation)?;
        log::info!(
            "Loaded sector '{}' from {} ({} triggers, {} scripts)",
            sector.id,
            path.display(),
            sector.triggers.len(),
            sector.scripts.len()
        );
        Ok(sector)
    }

    /// Look up a script by id
    pub fn script(&self, id: &str) -> Option<&Script> {
        self.scripts.iter().find(|script| script.id == id)
    }

    /// Check cross references and trigger geometry
    pub fn validate(&self, validation: Validation) -> Result<()> {
        let mut ids = HashSet::new();
        for trigger in &self.triggers {
            if !ids.insert(trigger.id.as_str()) {
                return Err(MissionError::DuplicateTrigger(trigger.id.clone()));
            }

            if let Err(e) = trigger.validate() {
                match validation {
                    Validation::Strict => return Err(e.into()),
                    Validation::Lenient => log::warn!("Sector '{}': {}", self.id, e),
                }
            }

            for action in &trigger.actions {
                if let ActionEffect::StartCinematic { script } = &action.effect {
                    if self.script(script).is_none() {
                        return Err(MissionError::UnknownScript {
                            trigger: trigger.id.clone(),
                            script: script.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
