//! Actor instance identity

use share_model::{Actor, ActorIdentity};

/// Identity of an actor instance
///
/// Instances bound to a placed token are addressed through their scene and
/// token, every other instance by its world actor id.
pub fn identity_of(actor: &Actor) -> ActorIdentity {
    match &actor.token {
        Some(token) => ActorIdentity::from(token.clone()),
        None => ActorIdentity::Persistent(actor.id.clone()),
    }
}

pub fn same_identity(a: &ActorIdentity, b: &ActorIdentity) -> bool {
    a == b
}
