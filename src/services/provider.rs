use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use validator::Validate;
use crate::models::Candidate;

/// Errors that can occur while ingesting candidates
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid candidate at position {index}: {source}")]
    Invalid {
        index: usize,
        #[source]
        source: validator::ValidationErrors,
    },

    #[error("Duplicate candidate id: {0}")]
    DuplicateId(String),

    #[error("No candidates supplied")]
    Empty,
}

/// Supplies the immutable candidate list a deck is built from
pub trait CandidateProvider {
    fn candidates(&self) -> Result<Vec<Candidate>, ProviderError>;
}

/// Candidates held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    candidates: Vec<Candidate>,
}

impl StaticProvider {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }
}

impl CandidateProvider for StaticProvider {
    fn candidates(&self) -> Result<Vec<Candidate>, ProviderError> {
        validate_candidates(&self.candidates)?;
        Ok(self.candidates.clone())
    }
}

/// Candidates read from a JSON array on disk
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CandidateProvider for JsonFileProvider {
    fn candidates(&self) -> Result<Vec<Candidate>, ProviderError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| ProviderError::Io {
            path: self.path.clone(),
            source,
        })?;
        let candidates = parse_candidates(&raw)?;
        tracing::info!(path = %self.path.display(), count = candidates.len(), "candidates loaded");
        Ok(candidates)
    }
}

/// Parse and validate a JSON array of candidates
pub fn parse_candidates(json: &str) -> Result<Vec<Candidate>, ProviderError> {
    let candidates: Vec<Candidate> = serde_json::from_str(json)?;
    validate_candidates(&candidates)?;
    Ok(candidates)
}

/// Require a non-empty list of valid candidates with unique ids
pub fn validate_candidates(candidates: &[Candidate]) -> Result<(), ProviderError> {
    if candidates.is_empty() {
        return Err(ProviderError::Empty);
    }

    for (index, candidate) in candidates.iter().enumerate() {
        candidate
            .validate()
            .map_err(|source| ProviderError::Invalid { index, source })?;
    }

    ensure_unique_ids(candidates)
}

/// Reject the first id that appears twice
pub fn ensure_unique_ids(candidates: &[Candidate]) -> Result<(), ProviderError> {
    let mut seen = HashSet::with_capacity(candidates.len());
    match candidates.iter().find(|candidate| !seen.insert(candidate.id.as_str())) {
        Some(duplicate) => Err(ProviderError::DuplicateId(duplicate.id.clone())),
        None => Ok(()),
    }
}
