//! Configuration accessor and validity predicates
//!
//! Validity is re-checked on every access. Nothing here is cached: a master
//! that gains a master of its own, or a slave moved into a compendium, stops
//! being valid immediately.

use serde_json::Value;
use share_host::World;
use share_model::{Actor, ActorId};

use crate::config::{CONFIG_FLAG, MASTER_FLAG, ShareConfig};

/// Traits that disqualify a character from being a master
const EXCLUDED_MASTER_TRAITS: [&str; 2] = ["eidolon", "minion"];

/// Parsed configuration of an actor; malformed blobs read as absent
pub fn config_of(actor: &Actor) -> Option<ShareConfig> {
    actor.flag(CONFIG_FLAG).and_then(ShareConfig::from_flag)
}

/// Raw `config.master` id, without validating the configuration blob
pub fn configured_master_id(actor: &Actor) -> Option<ActorId> {
    actor
        .flag(MASTER_FLAG)
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(ActorId::new)
}

/// Whether an actor may act as a master
///
/// `exclude` is the id of the candidate slave, which can never be its own
/// master.
pub fn is_valid_master(actor: &Actor, exclude: Option<&ActorId>) -> bool {
    !actor.id.is_empty()
        && actor.source.pack.is_none()
        && actor.source.prototype_token.actor_link
        && actor.token.is_none()
        && exclude.is_none_or(|id| id != &actor.id)
        && actor.is_character()
        && !EXCLUDED_MASTER_TRAITS.iter().any(|t| actor.has_trait(t))
        && configured_master_id(actor).is_none()
}

/// Whether an actor may act as a slave
pub fn is_valid_slave(actor: &Actor) -> bool {
    !actor.id.is_empty() && actor.source.pack.is_none() && actor.is_creature()
}

/// Valid master and configuration of an actor
///
/// The master is always resolved as a world actor. Absence is the normal
/// answer for every actor that is not a slave.
pub fn master_and_config_of<'w, W>(world: &'w W, actor: &Actor) -> Option<(&'w Actor, ShareConfig)>
where
    W: World + ?Sized,
{
    let config = config_of(actor)?;
    let master = world.actor(config.master_id()?)?;
    is_valid_master(master, Some(&actor.id)).then_some((master, config))
}

pub fn master_of<'w, W>(world: &'w W, actor: &Actor) -> Option<&'w Actor>
where
    W: World + ?Sized,
{
    master_and_config_of(world, actor).map(|(master, _)| master)
}
