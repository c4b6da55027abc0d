use std::path::{Path, PathBuf};
use thiserror::Error;
use crate::core::CardStack;
use crate::models::{SessionReport, SessionStep, StepRecord};

/// Errors that can occur while loading a session script
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Script parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read a JSON array of [`SessionStep`]s
pub fn load_script<P: AsRef<Path>>(path: P) -> Result<Vec<SessionStep>, ReplayError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&raw)?)
}

/// Feed every step into the stack, in order, recording what each one did
pub fn replay(stack: &mut CardStack, steps: &[SessionStep]) -> SessionReport {
    let records = steps
        .iter()
        .map(|step| {
            let record = apply_step(stack, step);
            tracing::debug!(?step, index = record.current_index, "step replayed");
            record
        })
        .collect();

    SessionReport {
        steps: records,
        final_index: stack.current_index(),
        exhausted: stack.deck().is_exhausted(),
        generated_at: chrono::Utc::now(),
    }
}

fn apply_step(stack: &mut CardStack, step: &SessionStep) -> StepRecord {
    let mut routed_event = None;
    let mut card_id = None;
    let mut frame = None;

    match step {
        SessionStep::Tap { action } => {
            routed_event = stack.tap(*action);
            if let Some(event) = &routed_event {
                frame = stack.frame(&event.target_id);
                card_id = Some(event.target_id.clone());
            }
        }
        SessionStep::DragChanged { id, dx, dy } => {
            card_id = resolve_target(stack, id.as_deref());
            frame = card_id.as_deref().and_then(|id| stack.drag_changed(id, *dx, *dy));
        }
        SessionStep::DragEnded { id, dx, dy } => {
            card_id = resolve_target(stack, id.as_deref());
            frame = card_id.as_deref().and_then(|id| stack.drag_ended(id, *dx, *dy));
        }
        SessionStep::Resize { width } => {
            stack.resize(*width);
            card_id = stack.top_card().map(|candidate| candidate.id.clone());
            frame = card_id.as_deref().and_then(|id| stack.frame(id));
        }
        SessionStep::Unmount { id } => {
            stack.unmount(id);
            card_id = Some(id.clone());
        }
    }

    StepRecord {
        step: step.clone(),
        routed_event,
        card_id,
        frame,
        current_index: stack.current_index(),
    }
}

/// Explicit id, or the current top card
fn resolve_target(stack: &CardStack, id: Option<&str>) -> Option<String> {
    match id {
        Some(id) => Some(id.to_string()),
        None => stack.top_card().map(|candidate| candidate.id.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MotionThresholds;
    use crate::models::{Action, Candidate};

    fn stack() -> CardStack {
        CardStack::new(
            vec![
                Candidate::with_id("a", "Aoi", 24),
                Candidate::with_id("b", "Ren", 27),
            ],
            400.0,
            MotionThresholds::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_replay_drag_defaults_to_top_card() {
        let mut stack = stack();
        let steps = vec![
            SessionStep::DragChanged { id: None, dx: 300.0, dy: 10.0 },
            SessionStep::DragEnded { id: None, dx: 300.0, dy: 10.0 },
            SessionStep::DragEnded { id: None, dx: -20.0, dy: 0.0 },
        ];

        let report = replay(&mut stack, &steps);

        assert_eq!(report.steps[1].card_id.as_deref(), Some("a"));
        assert_eq!(report.steps[1].current_index, 1);
        assert_eq!(report.steps[2].card_id.as_deref(), Some("b"));
        assert_eq!(report.final_index, 1);
        assert!(!report.exhausted);
    }

    #[test]
    fn test_script_parsing() {
        let json = r#"[
            {"type": "tap", "action": "like"},
            {"type": "drag_changed", "dx": -10, "dy": 3},
            {"type": "resize", "width": 320},
            {"type": "unmount", "id": "a"}
        ]"#;
        let steps: Vec<SessionStep> = serde_json::from_str(json).unwrap();

        assert_eq!(steps[0], SessionStep::Tap { action: Action::Like });
        assert_eq!(steps[1], SessionStep::DragChanged { id: None, dx: -10.0, dy: 3.0 });
        assert_eq!(steps[3], SessionStep::Unmount { id: "a".to_string() });
    }
}
