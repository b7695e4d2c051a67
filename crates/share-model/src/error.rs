//! Error types for share-model

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid proficiency rank: {rank}")]
    InvalidRank { rank: u8 },

    #[error("Unknown skill: {skill}")]
    UnknownSkill { skill: String },

    #[error("Invalid actor source: {0}")]
    InvalidSource(#[from] serde_json::Error),
}
