//! Mission runtime state

use crate::config::PlayerConfig;
use crate::definition::{ClueDefinition, SectorDefinition};
use crate::fx::CameraFx;
use crate::movement::Obstacle;
use crate::vitals::PlayerVitals;
use sector_core::Millis;
use sector_math::{Vec2, Vec3};
use sector_triggers::Trigger;
use serde::{Deserialize, Serialize};

/// Enemy as reported by the world after a step
#[derive(Debug, Clone, PartialEq)]
pub struct EnemySnapshot {
    pub id: u64,
    pub kind: String,
    pub position: Vec2,
    pub hp: f32,
    pub is_boss: bool,
}

/// Running totals for the mission report
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionCounters {
    pub kills: u32,
    pub damage_dealt: f32,
    pub damage_taken: f32,
    pub xp: u32,
    pub sp: u32,
}

/// Clue plus whether it has been picked up
#[derive(Debug, Clone, PartialEq)]
pub struct ClueState {
    pub definition: ClueDefinition,
    pub collected: bool,
}

/// How a mission ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionOutcome {
    /// Boss defeated and grace period elapsed
    Victory,
    /// Player died
    Died,
    /// Ended from outside (quit, retreat)
    Aborted,
}

/// Summary handed to the host when the mission concludes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionReport {
    pub sector_id: String,
    pub outcome: MissionOutcome,
    pub counters: MissionCounters,
    pub clues: Vec<String>,
    /// Milliseconds from start to conclusion
    pub elapsed: Millis,
}

/// Everything that changes during a mission.
///
/// Owned by the mission loop; collaborators only see it through
/// read-only views and host callbacks.
#[derive(Debug, Clone)]
pub struct MissionRuntimeState {
    pub sector_id: String,
    pub player_position: Vec3,
    pub vitals: PlayerVitals,
    pub enemies: Vec<EnemySnapshot>,
    pub obstacles: Vec<Obstacle>,
    pub triggers: Vec<Trigger>,
    pub clues: Vec<ClueState>,
    /// Clue ids in pickup order
    pub collected_clues: Vec<String>,
    pub counters: MissionCounters,

    pub is_dead: bool,
    pub boss_spawned: bool,
    /// Boss intro camera lock in progress
    pub boss_intro: bool,
    pub boss_defeated: bool,
    /// Grace period after the boss fell has elapsed
    pub victory_ready: bool,
    /// Death animation delay has elapsed
    pub death_sequence_done: bool,
    /// Mission end requested from outside
    pub end_requested: bool,
    pub interaction_open: bool,
    /// Trigger that opened the current interaction
    pub interaction_source: Option<String>,
    /// Triggers whose UI was closed while the player is still inside
    pub dismissed_interactions: Vec<String>,
    /// Clue currently being read
    pub clue_open: Option<String>,
    pub paused: bool,
    pub running: bool,

    /// Player speech animation runs until this time
    pub speech_until: Millis,
    /// Player thinking animation runs until this time
    pub thinking_until: Millis,
    pub started_at: Millis,
    pub camera_fx: CameraFx,
    pub outcome: Option<MissionOutcome>,
}

impl MissionRuntimeState {
    pub fn new(sector: &SectorDefinition, player: &PlayerConfig) -> Self {
        let mut triggers = sector.triggers.clone();
        for trigger in &mut triggers {
            trigger.reset();
        }

        Self {
            sector_id: sector.id.clone(),
            player_position: sector.player_spawn.to_vec3(0.0),
            vitals: PlayerVitals::new(player.max_hp, player.max_stamina),
            enemies: Vec::new(),
            obstacles: sector.obstacles.clone(),
            triggers,
            clues: sector
                .clues
                .iter()
                .map(|clue| ClueState {
                    definition: clue.clone(),
                    collected: false,
                })
                .collect(),
            collected_clues: Vec::new(),
            counters: MissionCounters::default(),
            is_dead: false,
            boss_spawned: false,
            boss_intro: false,
            boss_defeated: false,
            victory_ready: false,
            death_sequence_done: false,
            end_requested: false,
            interaction_open: false,
            interaction_source: None,
            dismissed_interactions: Vec::new(),
            clue_open: None,
            paused: false,
            running: false,
            speech_until: 0.0,
            thinking_until: 0.0,
            started_at: 0.0,
            camera_fx: CameraFx::new(),
            outcome: None,
        }
    }

    /// Player position on the ground plane
    pub fn player_ground(&self) -> Vec2 {
        self.player_position.xz()
    }

    pub fn is_speaking(&self, now: Millis) -> bool {
        now < self.speech_until
    }

    pub fn is_thinking(&self, now: Millis) -> bool {
        now < self.thinking_until
    }

    /// Add experience and skill points
    pub fn gain_xp(&mut self, xp: u32, sp: u32) {
        self.counters.xp += xp;
        self.counters.sp += sp;
    }

    /// Pick up the first uncollected clue within reach of the player
    pub fn collect_clue(&mut self) -> Option<ClueDefinition> {
        let point = self.player_ground();
        let clue = self.clues.iter_mut().find(|clue| {
            let radius = clue.definition.radius;
            !clue.collected && point.distance_squared(clue.definition.position) < radius * radius
        })?;

        clue.collected = true;
        self.collected_clues.push(clue.definition.id.clone());
        self.clue_open = Some(clue.definition.id.clone());
        Some(clue.definition.clone())
    }

    /// Forget dismissed interactions whose trigger the player has left
    pub fn prune_dismissed(&mut self) {
        let point = self.player_ground();
        let triggers = &self.triggers;
        self.dismissed_interactions.retain(|id| {
            triggers
                .iter()
                .any(|trigger| trigger.id == *id && trigger.contains(point))
        });
    }

    pub fn report(&self, outcome: MissionOutcome, now: Millis) -> MissionReport {
        MissionReport {
            sector_id: self.sector_id.clone(),
            outcome,
            counters: self.counters,
            clues: self.collected_clues.clone(),
            elapsed: (now - self.started_at).max(0.0),
        }
    }
}
