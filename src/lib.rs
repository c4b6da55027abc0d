//! Swipe Deck - headless swipeable card stack
//!
//! This library provides the state behind a Tinder-style card stack: the
//! drag-to-motion transform that animates a card, and the deck controller that
//! keeps the "current candidate" cursor in step with Nope/Like/Redo actions
//! routed to cards over a typed event bus.

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::core::{CardMotionEngine, CardStack, DeckController, EventBus, MotionThresholds, Subscription};
pub use crate::models::{Action, Candidate, CardOutcome, Offset, RoutedEvent, VisualFrame};
pub use crate::services::{CandidateProvider, JsonFileProvider, StaticProvider};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let stack = CardStack::new(vec![Candidate::new("Aoi", 24)], 390.0, MotionThresholds::default()).unwrap();
        assert!(stack.tap(Action::Like).is_some());
        assert_eq!(stack.current_index(), 1);
    }
}
