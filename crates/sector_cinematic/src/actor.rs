//! Actors taking part in a conversation

use sector_math::Vec3;
use serde::{Deserialize, Serialize};

/// Bubble anchor height above a door or other inert scenery
pub const SCENERY_BUBBLE_HEIGHT: f32 = 2.4;
/// Bubble anchor height per unit of actor scale
pub const ACTOR_BUBBLE_HEIGHT: f32 = 2.0;

/// What kind of object is speaking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    /// Animated character
    Animated,
    /// Door, radio or other inert scenery that can "speak"
    Door,
}

impl Default for ActorKind {
    fn default() -> Self {
        Self::Animated
    }
}

/// An actor as seen by the sequencer
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    /// Canonical name
    pub name: String,
    /// Alternative names used in scripts
    pub aliases: Vec<String>,
    /// World position (feet)
    pub position: Vec3,
    /// Uniform model scale
    pub scale: f32,
    /// Animated actor or scenery
    pub kind: ActorKind,
}

impl Actor {
    /// Create an animated actor
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            position,
            scale: 1.0,
            kind: ActorKind::Animated,
        }
    }

    /// Create a door-type speaker
    pub fn door(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            kind: ActorKind::Door,
            ..Self::new(name, position)
        }
    }

    /// Add an alias
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Set scale
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Case-insensitive match against the name and aliases
    pub fn matches(&self, speaker: &str) -> bool {
        let speaker = speaker.trim();
        same_name(&self.name, speaker) || self.aliases.iter().any(|alias| same_name(alias, speaker))
    }

    /// World point the speech bubble points at
    pub fn bubble_anchor(&self) -> Vec3 {
        let height = match self.kind {
            ActorKind::Door => SCENERY_BUBBLE_HEIGHT,
            ActorKind::Animated => ACTOR_BUBBLE_HEIGHT * self.scale,
        };
        self.position + Vec3::new(0.0, height, 0.0)
    }
}

/// Compare names ignoring case, folding non-ASCII letters too
fn same_name(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

/// Names filling the two speaker slots of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Speakers {
    pub player: String,
    pub counterpart: String,
}

impl Speakers {
    pub fn new(player: impl Into<String>, counterpart: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            counterpart: counterpart.into(),
        }
    }
}

/// Everyone present in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct Cast {
    /// The player actor
    pub player: Actor,
    /// Other actors (counterpart, family members, scenery speakers)
    pub members: Vec<Actor>,
}

impl Cast {
    pub fn new(player: Actor) -> Self {
        Self {
            player,
            members: Vec::new(),
        }
    }

    /// Add a member
    pub fn with_member(mut self, actor: Actor) -> Self {
        self.members.push(actor);
        self
    }

    /// Find a member by name or alias (not the player)
    pub fn member(&self, name: &str) -> Option<&Actor> {
        self.members.iter().find(|actor| actor.matches(name))
    }

    /// Player first, then members
    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        std::iter::once(&self.player).chain(self.members.iter())
    }

    /// Resolve who is speaking a line
    ///
    /// The player wins on a name or alias match. Otherwise the counterpart
    /// slot is used: the counterpart itself if it matches, else a roster
    /// member with that name, else the counterpart as fallback.
    pub fn resolve_speaker(&self, speaker: &str, speakers: &Speakers) -> Option<&Actor> {
        if self.player.matches(speaker) || same_name(&speakers.player, speaker.trim()) {
            return Some(&self.player);
        }

        let counterpart = self.member(&speakers.counterpart);
        if counterpart.map(|actor| actor.matches(speaker)).unwrap_or(false) {
            return counterpart;
        }

        match self.member(speaker) {
            Some(actor) => Some(actor),
            None => {
                log::debug!(
                    "No actor named '{}', falling back to counterpart '{}'",
                    speaker,
                    speakers.counterpart
                );
                counterpart
            }
        }
    }
}
