//! SyncEngine implementation
//!
//! The SyncEngine reacts to the preparation phases of creatures and to the
//! lifecycle events of their documents. It owns the relationship store and
//! reads everything else from the [`World`] it is handed.

use std::fmt;

use serde_json::Value;
use tracing::debug;

use share_host::World;
use share_model::{Actor, ActorIdentity, flags, patch};

use crate::Result;
use crate::access::{configured_master_id, is_valid_slave, master_and_config_of, master_of};
use crate::config::{MASTER_FLAG, ShareCategory};
use crate::identity::identity_of;
use crate::mirror;
use crate::store::RelationshipStore;

const HP_PATH: &str = "system.attributes.hp";
const HERO_POINTS_PATH: &str = "system.resources.heroPoints";

/// Role an actor played in one full-data pass
///
/// Decided once per pass: an actor with slaves is a master for the whole
/// pass, and never mirrors anything itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassRole {
    /// The actor has slaves; each of them must be reset
    Master { slaves: Vec<ActorIdentity> },
    /// The actor mirrored data from its master
    Slave { master: share_model::ActorId },
    /// Neither
    Plain,
}

impl fmt::Display for PassRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Master { slaves } => write!(f, "master of {}", slaves.len()),
            Self::Slave { master } => write!(f, "slave of {}", master),
            Self::Plain => write!(f, "plain"),
        }
    }
}

/// Engine for master/slave synchronization
#[derive(Debug, Default)]
pub struct SyncEngine {
    store: RelationshipStore,
}

impl SyncEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &RelationshipStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut RelationshipStore {
        &mut self.store
    }

    /// Registered slaves of a master, freshly resolved
    ///
    /// Dangling identities and actors that are no longer valid slaves are
    /// dropped. With a category, only slaves that enabled it are returned.
    /// Token-bound instances never have slaves.
    pub fn slaves_of<'w, W>(
        &self,
        world: &'w W,
        master: &Actor,
        category: Option<ShareCategory>,
    ) -> Vec<&'w Actor>
    where
        W: World + ?Sized,
    {
        if master.token.is_some() {
            return Vec::new();
        }
        self.store
            .slaves(&master.id)
            .iter()
            .filter_map(|identity| world.resolve(identity))
            .filter(|slave| is_valid_slave(slave) && slave.id != master.id)
            .filter(|slave| {
                category.is_none_or(|category| {
                    crate::access::config_of(slave)
                        .is_some_and(|config| config.enabled(category, slave.kind()))
                })
            })
            .collect()
    }

    /// Base-data phase, after the host's own base computation
    ///
    /// Registers the actor under its valid master. Returns whether a new
    /// registration happened.
    pub fn on_base_data<W>(&mut self, world: &W, actor: &Actor) -> bool
    where
        W: World + ?Sized,
    {
        if !actor.is_creature() {
            return false;
        }
        let Some(master) = master_of(world, actor) else {
            return false;
        };
        let slave = identity_of(actor);
        let registered = self.store.register(&master.id, slave.clone());
        if registered {
            debug!(master = %master.id, slave = %slave, "Registered slave");
        }
        registered
    }

    /// Weapon part of the derived-data phase
    ///
    /// Character slaves with `weapon` get the runes of their master's best
    /// weapon on every weapon they carry. Unlike the other phases this one
    /// also runs while the world is still starting up.
    pub fn on_weapon_data<W>(&self, world: &W, actor: &mut Actor)
    where
        W: World + ?Sized,
    {
        if !actor.is_character() {
            return;
        }
        let Some((master, config)) = master_and_config_of(world, actor) else {
            return;
        };
        if !config.enabled(ShareCategory::Weapon, actor.kind()) {
            return;
        }
        let Some(runes) = mirror::select_weapon(master)
            .and_then(|item| item.weapon())
            .map(|weapon| weapon.runes.clone())
        else {
            return;
        };
        let changed = mirror::copy_weapon_runes(actor, &runes);
        debug!(actor = %actor.name(), weapons = changed, "Copied weapon runes");
    }

    /// Derived-data phase, before the host's own derived computation
    ///
    /// Slaves with `armor` receive deferred potency modifiers for armor class
    /// and saving throws.
    pub fn on_derived_data<W>(&self, world: &W, actor: &mut Actor)
    where
        W: World + ?Sized,
    {
        if !world.is_ready() || !actor.is_creature() {
            return;
        }
        let Some((master, config)) = master_and_config_of(world, actor) else {
            return;
        };
        if !config.enabled(ShareCategory::Armor, actor.kind()) {
            return;
        }
        for bonus in mirror::potency_bonuses(master) {
            let selector = bonus.selector;
            actor.synthetics.push(selector, bonus.into_modifier());
        }
    }

    /// Full-data phase, after the host finished preparing the actor
    pub fn on_full_data<W>(&self, world: &W, actor: &mut Actor) -> PassRole
    where
        W: World + ?Sized,
    {
        if !world.is_ready() || !actor.is_creature() {
            return PassRole::Plain;
        }

        let slaves: Vec<ActorIdentity> = self
            .slaves_of(world, actor, None)
            .into_iter()
            .map(identity_of)
            .collect();
        if !slaves.is_empty() {
            return PassRole::Master { slaves };
        }

        let Some((master, config)) = master_and_config_of(world, actor) else {
            return PassRole::Plain;
        };
        let kind = actor.kind();

        if config.enabled(ShareCategory::Health, kind) {
            actor.data.hp = master.data.hp;
        }
        if config.enabled(ShareCategory::Hero, kind) {
            actor.data.hero_points = master.data.hero_points;
        }
        if config.enabled(ShareCategory::Skills, kind) {
            mirror::mirror_skills(actor, master);
        }

        PassRole::Slave {
            master: master.id.clone(),
        }
    }

    /// Persisted update of an actor
    ///
    /// A change of `config.master` drops the actor from every entry except
    /// its current valid master. Hit point and hero point changes of a slave
    /// are pushed up to its master.
    pub fn on_update_actor<W>(
        &mut self,
        world: &mut W,
        target: &ActorIdentity,
        changed: &Value,
    ) -> Result<()>
    where
        W: World + ?Sized,
    {
        let Some(actor) = world.resolve(target) else {
            return Ok(());
        };
        if !world.is_primary_updater(actor) || !actor.is_creature() {
            return Ok(());
        }

        if patch::touches(changed, &flags::flag_path(MASTER_FLAG)) {
            let keep = master_of(world, actor).map(|master| master.id.clone());
            let removed = self.store.retain_under(target, keep.as_ref());
            debug!(slave = %target, removed, "Master link changed");
        }

        let Some((master, config)) = master_and_config_of(world, actor) else {
            return Ok(());
        };
        let kind = actor.kind();
        let master = ActorIdentity::Persistent(master.id.clone());

        let mut upward = Vec::new();
        if config.enabled(ShareCategory::Health, kind)
            && let Some(hp) = patch::get_property(changed, HP_PATH)
        {
            upward.push(patch::nested(HP_PATH, hp.clone()));
        }
        if config.enabled(ShareCategory::Hero, kind)
            && let Some(hero) = patch::get_property(changed, HERO_POINTS_PATH)
        {
            upward.push(patch::nested(HERO_POINTS_PATH, hero.clone()));
        }

        for update in upward {
            debug!(slave = %target, master = %master, "Pushing update to master");
            world.update_actor(&master, update)?;
        }
        Ok(())
    }

    /// Deletion of a world actor
    ///
    /// Unregisters the actor from its master, forgets its own slaves and
    /// unsets `config.master` on every remaining actor that pointed at it.
    /// Returns the number of actors whose link was removed.
    pub fn on_delete_actor<W>(&mut self, world: &mut W, actor: &Actor) -> Result<usize>
    where
        W: World + ?Sized,
    {
        if !world.is_primary_updater(actor) || !actor.is_creature() {
            return Ok(0);
        }

        if let Some(master) = master_of(world, actor) {
            let master = master.id.clone();
            self.store.unregister(&master, &identity_of(actor));
        }
        self.store.remove_master(&actor.id);

        let orphans: Vec<ActorIdentity> = world
            .identities()
            .into_iter()
            .filter(|identity| {
                world
                    .resolve(identity)
                    .and_then(configured_master_id)
                    .is_some_and(|id| id == actor.id)
            })
            .collect();

        for orphan in &orphans {
            debug!(slave = %orphan, master = %actor.id, "Unlinking slave of deleted master");
            world.unset_flag(orphan, MASTER_FLAG)?;
        }
        Ok(orphans.len())
    }
}
