//! Error types for share-core

use std::path::PathBuf;

use share_model::ActorIdentity;

/// Result type for share-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in share-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document a pass or write targets no longer exists
    #[error("Actor not found: {identity}")]
    ActorNotFound { identity: ActorIdentity },

    /// Pending host events kept coming back to the same actor
    #[error("World did not settle: {actor} revisited {visits} times")]
    Unsettled { actor: ActorIdentity, visits: usize },

    /// Settings file not found at expected path
    #[error("Settings not found at {path}")]
    SettingsNotFound { path: PathBuf },

    // Transparent wrappers for underlying crate errors
    /// Host error from share-host
    #[error(transparent)]
    Host(#[from] share_host::Error),

    /// Document model error from share-model
    #[error(transparent)]
    Model(#[from] share_model::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}
