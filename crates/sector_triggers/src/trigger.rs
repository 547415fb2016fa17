//! Trigger definitions

use crate::action::{ActionEffect, TriggerAction};
use crate::error::TriggerError;
use crate::zone::TriggerZone;
use sector_core::Millis;
use sector_math::Vec2;
use serde::{Deserialize, Serialize};

/// How narrative content of a trigger is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerKind {
    /// Spoken by the player in a speech bubble
    Speech,
    /// Generic on-screen narrative
    Info,
    /// Silent gameplay trigger
    Event,
}

impl Default for TriggerKind {
    fn default() -> Self {
        Self::Info
    }
}

impl TriggerKind {
    /// Sound cue played with narrative of this kind
    pub fn audio_cue(&self) -> &'static str {
        match self {
            Self::Speech => "speech_start",
            Self::Info | Self::Event => "narrative_reveal",
        }
    }
}

/// Rectangle dimensions on the ground plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneSize {
    pub width: f32,
    pub depth: f32,
}

/// A zone that fires actions when the player enters it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    /// Unique id within the sector
    pub id: String,
    /// Centre on the ground plane
    pub position: Vec2,
    /// Rectangle size (exclusive with `radius`)
    #[serde(default)]
    pub size: Option<ZoneSize>,
    /// Circle radius (exclusive with `size`)
    #[serde(default)]
    pub radius: Option<f32>,
    /// Rectangle rotation in radians
    #[serde(default)]
    pub rotation: f32,
    /// Actions in dispatch order
    #[serde(default)]
    pub actions: Vec<TriggerAction>,
    /// Narrative text key
    #[serde(default)]
    pub content: Option<String>,
    /// Presentation of `content`
    #[serde(default, rename = "type")]
    pub kind: TriggerKind,
    /// Re-arm when the player leaves the zone
    #[serde(default)]
    pub reset_on_exit: bool,
    /// Cooldown before the trigger can fire again (milliseconds)
    #[serde(default)]
    pub repeat_interval: Option<Millis>,
    /// Whether the trigger has fired and not re-armed yet
    #[serde(skip)]
    pub triggered: bool,
    /// Host time of the last firing
    #[serde(skip)]
    pub last_trigger_time: Millis,
}

impl Trigger {
    fn base(id: impl Into<String>, position: Vec2) -> Self {
        Self {
            id: id.into(),
            position,
            size: None,
            radius: None,
            rotation: 0.0,
            actions: Vec::new(),
            content: None,
            kind: TriggerKind::default(),
            reset_on_exit: false,
            repeat_interval: None,
            triggered: false,
            last_trigger_time: 0.0,
        }
    }

    /// Create a circular trigger
    pub fn circle(id: impl Into<String>, position: Vec2, radius: f32) -> Self {
        let mut trigger = Self::base(id, position);
        trigger.radius = Some(radius);
        trigger
    }

    /// Create a rectangular trigger
    pub fn rect(id: impl Into<String>, position: Vec2, width: f32, depth: f32) -> Self {
        let mut trigger = Self::base(id, position);
        trigger.size = Some(ZoneSize { width, depth });
        trigger
    }

    /// Set rotation (rectangles only)
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Append an action dispatched on entry
    pub fn with_action(mut self, effect: ActionEffect) -> Self {
        self.actions.push(TriggerAction::new(effect));
        self
    }

    /// Append an action dispatched `delay` ms after entry
    pub fn with_delayed_action(mut self, effect: ActionEffect, delay: Millis) -> Self {
        self.actions.push(TriggerAction::delayed(effect, delay));
        self
    }

    /// Set narrative content
    pub fn with_content(mut self, key: impl Into<String>) -> Self {
        self.content = Some(key.into());
        self
    }

    /// Set presentation kind
    pub fn with_kind(mut self, kind: TriggerKind) -> Self {
        self.kind = kind;
        self
    }

    /// Re-arm when the player leaves
    pub fn reset_on_exit(mut self) -> Self {
        self.reset_on_exit = true;
        self
    }

    /// Fire again after a cooldown while the player stays inside
    pub fn with_repeat_interval(mut self, interval: Millis) -> Self {
        self.repeat_interval = Some(interval);
        self
    }

    /// Resolved shape, `None` when the geometry is malformed.
    /// A rectangle wins when both shapes are given.
    pub fn zone(&self) -> Option<TriggerZone> {
        match (self.size, self.radius) {
            (Some(size), _) => Some(TriggerZone::rect(size.width, size.depth, self.rotation)),
            (None, Some(radius)) => Some(TriggerZone::circle(radius)),
            (None, None) => None,
        }
    }

    /// Whether `point` lies inside the zone. Malformed zones contain nothing.
    pub fn contains(&self, point: Vec2) -> bool {
        self.zone()
            .map(|zone| zone.contains(self.position, point))
            .unwrap_or(false)
    }

    /// Positive repeat interval, if any
    pub fn repeat(&self) -> Option<Millis> {
        self.repeat_interval.filter(|interval| *interval > 0.0)
    }

    /// A fired one-shot that can never fire again
    pub fn is_spent(&self) -> bool {
        self.triggered && !self.reset_on_exit && self.repeat().is_none()
    }

    /// Clear runtime state
    pub fn reset(&mut self) {
        self.triggered = false;
        self.last_trigger_time = 0.0;
    }

    /// Check the definition for geometry problems
    pub fn validate(&self) -> Result<(), TriggerError> {
        match (self.size, self.radius) {
            (None, None) => Err(TriggerError::MalformedGeometry(self.id.clone())),
            (Some(_), Some(_)) => Err(TriggerError::AmbiguousGeometry(self.id.clone())),
            (Some(size), None) if size.width <= 0.0 || size.depth <= 0.0 => {
                Err(TriggerError::InvalidSize {
                    id: self.id.clone(),
                    width: size.width,
                    depth: size.depth,
                })
            }
            (None, Some(radius)) if radius <= 0.0 => Err(TriggerError::InvalidRadius {
                id: self.id.clone(),
                radius,
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_creation() {
        let trigger = Trigger::circle("well", Vec2::new(1.0, 2.0), 3.0)
            .with_content("sector1.well")
            .with_kind(TriggerKind::Speech)
            .reset_on_exit();

        assert_eq!(trigger.zone(), Some(TriggerZone::circle(3.0)));
        assert!(trigger.reset_on_exit);
        assert!(!trigger.triggered);
        assert!(trigger.validate().is_ok());
    }

    #[test]
    fn test_spent_one_shot() {
        let mut trigger = Trigger::circle("a", Vec2::ZERO, 1.0);
        assert!(!trigger.is_spent());
        trigger.triggered = true;
        assert!(trigger.is_spent());

        let mut repeating = Trigger::circle("b", Vec2::ZERO, 1.0).with_repeat_interval(1000.0);
        repeating.triggered = true;
        assert!(!repeating.is_spent());

        // A zero interval does not count as repeating
        let mut zero = Trigger::circle("c", Vec2::ZERO, 1.0).with_repeat_interval(0.0);
        zero.triggered = true;
        assert!(zero.is_spent());
    }

    #[test]
    fn test_malformed_geometry() {
        let mut trigger = Trigger::circle("broken", Vec2::ZERO, 1.0);
        trigger.radius = None;

        assert_eq!(trigger.zone(), None);
        assert!(!trigger.contains(Vec2::ZERO));
        assert_eq!(
            trigger.validate(),
            Err(TriggerError::MalformedGeometry("broken".to_string()))
        );
    }

    #[test]
    fn test_ambiguous_geometry_prefers_rect() {
        let mut trigger = Trigger::rect("both", Vec2::ZERO, 2.0, 2.0);
        trigger.radius = Some(50.0);

        assert!(!trigger.contains(Vec2::new(10.0, 0.0)));
        assert!(matches!(
            trigger.validate(),
            Err(TriggerError::AmbiguousGeometry(_))
        ));
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            Trigger::rect("flat", Vec2::ZERO, 0.0, 2.0).validate(),
            Err(TriggerError::InvalidSize { .. })
        ));
        assert!(matches!(
            Trigger::circle("dot", Vec2::ZERO, -1.0).validate(),
            Err(TriggerError::InvalidRadius { .. })
        ));
    }

    #[test]
    fn test_deserialize_from_sector_json() {
        let json = r#"{
            "id": "cabin_door",
            "position": {"x": 4.0, "y": -2.0},
            "size": {"width": 3.0, "depth": 1.5},
            "rotation": 0.5,
            "type": "SPEECH",
            "content": "sector1.cabin",
            "resetOnExit": true,
            "actions": [{"type": "OPEN_UI", "screen": "cabin_loot"}]
        }"#;
        let trigger: Trigger = serde_json::from_str(json).unwrap();

        assert_eq!(trigger.kind, TriggerKind::Speech);
        assert!(trigger.reset_on_exit);
        assert_eq!(trigger.repeat_interval, None);
        assert_eq!(trigger.actions.len(), 1);
        assert!(!trigger.triggered);
        assert!(trigger.validate().is_ok());
    }
}
