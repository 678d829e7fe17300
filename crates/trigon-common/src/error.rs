use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unsupported predicate: {0}")]
    UnsupportedPredicate(String),

    #[error("Score join miss: evidence type {evidence_type}, idx {idx}")]
    JoinIntegrity { evidence_type: String, idx: u64 },

    #[error("Stale write discarded: slot generation {write_generation} < current {current_generation}")]
    StaleGeneration {
        write_generation: u64,
        current_generation: u64,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
