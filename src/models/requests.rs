use serde::{Deserialize, Serialize};
use crate::models::domain::Action;

/// One scripted input replayed against a card stack
///
/// Steps that take an optional `id` target the current top card when it is omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionStep {
    Tap {
        action: Action,
    },
    DragChanged {
        #[serde(default)]
        id: Option<String>,
        dx: f64,
        dy: f64,
    },
    DragEnded {
        #[serde(default)]
        id: Option<String>,
        dx: f64,
        dy: f64,
    },
    Resize {
        width: f64,
    },
    Unmount {
        id: String,
    },
}
