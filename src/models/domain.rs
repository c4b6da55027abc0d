use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// A profile shown on one card of the deck
///
/// Only `id` takes part in deck logic; the remaining fields are display payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Candidate {
    #[validate(length(min = 1))]
    #[serde(default = "generate_id")]
    pub id: String,
    #[validate(length(min = 1))]
    pub name: String,
    pub age: u8,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "photoUrl", default)]
    pub photo_url: Option<String>,
}

impl Candidate {
    /// Create a candidate with a freshly generated id
    pub fn new(name: impl Into<String>, age: u8) -> Self {
        Self::with_id(generate_id(), name, age)
    }

    pub fn with_id(id: impl Into<String>, name: impl Into<String>, age: u8) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age,
            message: None,
            photo_url: None,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn photo(mut self, photo_url: impl Into<String>) -> Self {
        self.photo_url = Some(photo_url.into());
        self
    }
}

fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// User intent for the current (or previously decided) candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Nope,
    Like,
    Redo,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Nope => "nope",
            Action::Like => "like",
            Action::Redo => "redo",
        };
        f.write_str(name)
    }
}

/// Broadcast message; every card compares `target_id` against its own candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutedEvent {
    #[serde(rename = "targetId")]
    pub target_id: String,
    pub action: Action,
}

impl RoutedEvent {
    pub fn new(target_id: impl Into<String>, action: Action) -> Self {
        Self {
            target_id: target_id.into(),
            action,
        }
    }
}

/// Completion signal a card sends back to the deck once its animation is dispatched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CardOutcome {
    Removed { id: String, liked: bool },
    Reset { id: String },
}

impl CardOutcome {
    pub fn id(&self) -> &str {
        match self {
            CardOutcome::Removed { id, .. } | CardOutcome::Reset { id } => id,
        }
    }

    pub fn is_redo(&self) -> bool {
        matches!(self, CardOutcome::Reset { .. })
    }
}

/// 2D card displacement in points
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub width: f64,
    pub height: f64,
}

impl Offset {
    pub const ZERO: Offset = Offset {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// How the rendering surface should move to a new frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    Immediate,
    Smooth,
}

/// Where a card is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum CardPhase {
    Resting,
    Dragging,
    Removed { liked: bool },
}

impl CardPhase {
    pub fn is_removed(&self) -> bool {
        matches!(self, CardPhase::Removed { .. })
    }
}

/// Visual properties derived from a card's offset, consumed by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualFrame {
    #[serde(rename = "offsetX")]
    pub offset_x: f64,
    #[serde(rename = "offsetY")]
    pub offset_y: f64,
    pub scale: f64,
    #[serde(rename = "angleDegrees")]
    pub angle_degrees: f64,
    #[serde(rename = "likeOpacity")]
    pub like_opacity: f64,
    #[serde(rename = "nopeOpacity")]
    pub nope_opacity: f64,
    pub transition: Transition,
}

impl VisualFrame {
    pub fn offset(&self) -> Offset {
        Offset::new(self.offset_x, self.offset_y)
    }
}
