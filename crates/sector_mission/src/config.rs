//! Mission configuration
//!
//! Timing, tuning and presentation constants for a mission session.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables: `SECTOR_VIEWPORT=1280x720`, `SECTOR_DEBUG=1`
//! 2. Config file named by `SECTOR_CONFIG`, else `sector.toml` or
//!    `config/sector.toml`
//! 3. Built-in defaults
//!
//! # Example Config File
//!
//! ```toml
//! debug = false
//!
//! [viewport]
//! width = 1920
//! height = 1080
//!
//! [timing]
//! boss_intro = 4000       # ms camera lock after the boss spawns
//! cinematic_exit_delay = 1000
//!
//! [player]
//! name = "Robert"
//! walk_speed = 4.0        # units per second
//!
//! [cinematic]
//! camera_lerp = 0.05
//! ```

use crate::error::Result;
use sector_cinematic::{SequencerConfig, Viewport};
use sector_core::Millis;
use sector_math::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file locations tried when `SECTOR_CONFIG` is not set
const DEFAULT_CONFIG_PATHS: &[&str] = &["sector.toml", "config/sector.toml"];

/// Fixed delays of the mission state machine (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Camera lock after the boss first spawns
    pub boss_intro: Millis,
    /// Beat between a conversation ending and its exit trigger firing
    pub cinematic_exit_delay: Millis,
    /// Death animation before the mission concludes
    pub death_delay: Millis,
    /// Time between the boss falling and victory
    pub boss_defeat_grace: Millis,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            boss_intro: 4000.0,
            cinematic_exit_delay: 1000.0,
            death_delay: 3000.0,
            boss_defeat_grace: 3000.0,
        }
    }
}

/// Player tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Canonical name used for speaker matching
    pub name: String,
    /// Alternative names scripts may use for the player
    pub aliases: Vec<String>,
    /// Units per second
    pub walk_speed: f32,
    /// Units per second while sprinting
    pub run_speed: f32,
    /// Collision radius against obstacles
    pub radius: f32,
    pub max_hp: f32,
    pub max_stamina: f32,
    /// Stamina per second spent sprinting
    pub stamina_drain: f32,
    /// Stamina per second recovered when not sprinting
    pub stamina_regen: f32,
    /// Invulnerability after a hit (milliseconds)
    pub invulnerability: Millis,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            name: "Robert".to_string(),
            aliases: vec!["Player".to_string()],
            walk_speed: 4.0,
            run_speed: 7.0,
            radius: 0.5,
            max_hp: 100.0,
            max_stamina: 100.0,
            stamina_drain: 25.0,
            stamina_regen: 15.0,
            invulnerability: 1000.0,
        }
    }
}

/// Gameplay camera tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Offset from the player while following
    pub follow_offset: Vec3,
    /// Smoothing factor while following
    pub follow_lerp: f32,
    /// Offset from the boss during the intro
    pub boss_intro_offset: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            follow_offset: Vec3::new(0.0, 12.0, 10.0),
            follow_lerp: 0.1,
            boss_intro_offset: Vec3::new(0.0, 4.0, 9.0),
        }
    }
}

/// Complete mission configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    pub viewport: Viewport,
    pub timing: TimingConfig,
    pub player: PlayerConfig,
    pub camera: CameraConfig,
    pub cinematic: SequencerConfig,
    /// Verbose per-frame logging
    pub debug: bool,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            timing: TimingConfig::default(),
            player: PlayerConfig::default(),
            camera: CameraConfig::default(),
            cinematic: SequencerConfig::default(),
            debug: false,
        }
    }
}

impl MissionConfig {
    /// Load configuration from all sources
    pub fn load() -> Self {
        let mut config = Self::default();

        let explicit = std::env::var("SECTOR_CONFIG").ok().filter(|p| !p.is_empty());
        let candidates: Vec<String> = match explicit {
            Some(path) => vec![path],
            None => DEFAULT_CONFIG_PATHS.iter().map(|p| p.to_string()).collect(),
        };

        for path in &candidates {
            if !Path::new(path).exists() {
                continue;
            }
            match Self::load_from_file(path) {
                Ok(loaded) => {
                    config = loaded;
                    log::info!("Loaded mission config from {}", path);
                    break;
                }
                Err(e) => log::warn!("Ignoring config {}: {}", path, e),
            }
        }

        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `SECTOR_*` overrides read through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("SECTOR_VIEWPORT") {
            match parse_resolution(&value) {
                Some((width, height)) => {
                    self.viewport = Viewport::new(width, height);
                    log::info!("Viewport from env: {}x{}", width, height);
                }
                None => log::warn!("Ignoring SECTOR_VIEWPORT={}", value),
            }
        }

        if let Some(value) = lookup("SECTOR_DEBUG") {
            self.debug = value.is_empty() || value == "1" || value.eq_ignore_ascii_case("true");
        }
    }

    /// Log the effective configuration
    pub fn log_summary(&self) {
        log::info!("Mission configuration:");
        log::info!("  Viewport: {}x{}", self.viewport.width, self.viewport.height);
        log::info!(
            "  Boss intro: {:.0}ms, exit beat: {:.0}ms, death: {:.0}ms, victory grace: {:.0}ms",
            self.timing.boss_intro,
            self.timing.cinematic_exit_delay,
            self.timing.death_delay,
            self.timing.boss_defeat_grace
        );
        log::info!(
            "  Player: {} ({} HP, walk {}, run {})",
            self.player.name,
            self.player.max_hp,
            self.player.walk_speed,
            self.player.run_speed
        );
        if self.debug {
            log::info!("  Debug logging enabled");
        }
    }
}

/// Parse `WIDTHxHEIGHT`
fn parse_resolution(value: &str) -> Option<(f32, f32)> {
    let (w, h) = value.trim().split_once(['x', 'X'])?;
    let width: u32 = w.trim().parse().ok()?;
    let height: u32 = h.trim().parse().ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    Some((width as f32, height as f32))
}
