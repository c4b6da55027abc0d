// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Action, Candidate, CardOutcome, CardPhase, Offset, RoutedEvent, Transition, VisualFrame};
pub use requests::SessionStep;
pub use responses::{SessionReport, StepRecord};
