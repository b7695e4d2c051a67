//! Scenes and placed tokens

use serde::{Deserialize, Serialize};

use share_model::{Actor, ActorId, SceneId, TokenId, TokenRef};

/// A token placed in a scene
///
/// Linked tokens share the world actor. Unlinked tokens own a synthetic
/// actor instance built from the world actor's source at placement time.
#[derive(Debug, Clone)]
pub struct Token {
    pub id: TokenId,
    pub actor_id: ActorId,
    pub actor_link: bool,
    /// Synthetic actor of an unlinked token
    pub actor: Option<Actor>,
}

impl Token {
    pub fn linked(id: impl Into<TokenId>, actor_id: impl Into<ActorId>) -> Self {
        Self {
            id: id.into(),
            actor_id: actor_id.into(),
            actor_link: true,
            actor: None,
        }
    }

    /// An unlinked token owning a copy of `base`
    pub fn unlinked(scene: &SceneId, id: impl Into<TokenId>, base: &Actor) -> Self {
        let id = id.into();
        let mut actor = Actor::new(base.id.clone(), base.source.clone());
        actor.token = Some(TokenRef::new(scene.clone(), id.clone()));
        Self {
            id,
            actor_id: base.id.clone(),
            actor_link: false,
            actor: Some(actor),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub id: SceneId,
    pub name: String,
    pub tokens: Vec<Token>,
}

/// Scene layout as written in scenario files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPlacement {
    pub id: TokenId,
    pub actor: ActorId,
    #[serde(default)]
    pub linked: Option<bool>,
}

impl Scene {
    pub fn new(id: impl Into<SceneId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tokens: Vec::new(),
        }
    }

    pub fn token(&self, id: &TokenId) -> Option<&Token> {
        self.tokens.iter().find(|t| &t.id == id)
    }

    pub fn token_mut(&mut self, id: &TokenId) -> Option<&mut Token> {
        self.tokens.iter_mut().find(|t| &t.id == id)
    }

    /// First linked token of a world actor
    pub fn linked_token_of(&self, actor: &ActorId) -> Option<&Token> {
        self.tokens
            .iter()
            .find(|t| t.actor_link && &t.actor_id == actor)
    }

    pub fn tokens_of<'a>(&'a self, actor: &'a ActorId) -> impl Iterator<Item = &'a Token> {
        self.tokens.iter().filter(move |t| &t.actor_id == actor)
    }
}
