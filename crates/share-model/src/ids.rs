//! Document identifiers
//!
//! Every host document is addressed by an opaque string id. The newtypes keep
//! actor, scene, token, item and combatant ids from being mixed up.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! document_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing id
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh 16 character id
            pub fn random() -> Self {
                let mut id = uuid::Uuid::new_v4().simple().to_string();
                id.truncate(16);
                Self(id)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

document_id!(
    /// Id of a world-level actor document
    ActorId
);
document_id!(
    /// Id of a scene
    SceneId
);
document_id!(
    /// Id of a token placed in a scene
    TokenId
);
document_id!(
    /// Id of an item embedded in an actor
    ItemId
);
document_id!(
    /// Id of a combatant in an encounter
    CombatantId
);

/// A token placed in a specific scene
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenRef {
    pub scene: SceneId,
    pub token: TokenId,
}

impl TokenRef {
    pub fn new(scene: impl Into<SceneId>, token: impl Into<TokenId>) -> Self {
        Self {
            scene: scene.into(),
            token: token.into(),
        }
    }
}

impl fmt::Display for TokenRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.scene, self.token)
    }
}

/// Identity of an actor instance
///
/// A persistent actor lives in the world directory. A token-bound actor is
/// the synthetic instance owned by an unlinked token and is only reachable
/// through its scene. Identities are lookup keys, never ownership handles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActorIdentity {
    Persistent(ActorId),
    TokenBound { scene: SceneId, token: TokenId },
}

impl ActorIdentity {
    pub fn persistent(id: impl Into<ActorId>) -> Self {
        Self::Persistent(id.into())
    }

    pub fn token_bound(scene: impl Into<SceneId>, token: impl Into<TokenId>) -> Self {
        Self::TokenBound {
            scene: scene.into(),
            token: token.into(),
        }
    }

    pub fn is_token_bound(&self) -> bool {
        matches!(self, Self::TokenBound { .. })
    }
}

impl From<TokenRef> for ActorIdentity {
    fn from(token: TokenRef) -> Self {
        Self::TokenBound {
            scene: token.scene,
            token: token.token,
        }
    }
}

impl fmt::Display for ActorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Persistent(id) => write!(f, "Actor.{}", id),
            Self::TokenBound { scene, token } => write!(f, "Scene.{}.Token.{}", scene, token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_ids_are_distinct() {
        let a = ActorId::random();
        let b = ActorId::random();
        assert_eq!(a.as_str().len(), 16);
        assert_ne!(a, b);
    }

    #[test]
    fn test_identity_display() {
        assert_eq!(ActorIdentity::persistent("abc").to_string(), "Actor.abc");
        assert_eq!(
            ActorIdentity::token_bound("s1", "t1").to_string(),
            "Scene.s1.Token.t1"
        );
    }

    #[test]
    fn test_identity_serde_shapes() {
        let json = serde_json::to_value(ActorIdentity::persistent("abc")).unwrap();
        assert_eq!(json, serde_json::json!("abc"));

        let json = serde_json::to_value(ActorIdentity::token_bound("s1", "t1")).unwrap();
        assert_eq!(json, serde_json::json!({"scene": "s1", "token": "t1"}));

        let parsed: ActorIdentity =
            serde_json::from_value(serde_json::json!({"scene": "s1", "token": "t1"})).unwrap();
        assert!(parsed.is_token_bound());
    }
}
