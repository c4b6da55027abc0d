use serde::{Deserialize, Serialize};
use crate::models::domain::{RoutedEvent, VisualFrame};
use crate::models::requests::SessionStep;

/// What a single replayed step did
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: SessionStep,
    #[serde(rename = "routedEvent")]
    pub routed_event: Option<RoutedEvent>,
    #[serde(rename = "cardId")]
    pub card_id: Option<String>,
    pub frame: Option<VisualFrame>,
    #[serde(rename = "currentIndex")]
    pub current_index: usize,
}

/// Result of replaying a full script
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub steps: Vec<StepRecord>,
    #[serde(rename = "finalIndex")]
    pub final_index: usize,
    pub exhausted: bool,
    #[serde(rename = "generatedAt")]
    pub generated_at: chrono::DateTime<chrono::Utc>,
}
