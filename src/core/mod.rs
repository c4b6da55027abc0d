// Core exports
pub mod bus;
pub mod deck;
pub mod engine;
pub mod motion;
pub mod stack;

pub use bus::{EventBus, Subscription};
pub use deck::DeckController;
pub use engine::{CardMotionEngine, OutcomeSink};
pub use motion::{MotionThresholds, Release, ThresholdError};
pub use stack::CardStack;
