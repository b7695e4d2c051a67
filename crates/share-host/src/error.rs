//! Error types for share-host

use share_model::{ActorId, ActorIdentity, CombatantId, ItemId, SceneId};

/// Result type for share-host operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by host document operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A write or lookup targeted a document that does not exist
    #[error("Actor not found: {identity}")]
    ActorNotFound { identity: ActorIdentity },

    #[error("Actor already exists: {id}")]
    DuplicateActor { id: ActorId },

    #[error("Scene not found: {id}")]
    SceneNotFound { id: SceneId },

    #[error("Item {item} not found on {actor}")]
    ItemNotFound { actor: ActorIdentity, item: ItemId },

    #[error("Combatant not found: {id}")]
    CombatantNotFound { id: CombatantId },

    #[error("No active encounter")]
    NoEncounter,

    /// A change could not be applied to the document source
    #[error(transparent)]
    Model(#[from] share_model::Error),
}

impl Error {
    pub fn actor_not_found(identity: &ActorIdentity) -> Self {
        Self::ActorNotFound {
            identity: identity.clone(),
        }
    }
}
