// Service exports
pub mod provider;
pub mod replay;

pub use provider::{CandidateProvider, JsonFileProvider, ProviderError, StaticProvider};
pub use replay::{load_script, replay, ReplayError};
