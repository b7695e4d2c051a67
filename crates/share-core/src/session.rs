//! Session: the hook dispatcher
//!
//! A [`Session`] owns a [`World`] and a [`SyncEngine`]. It runs each actor's
//! preparation pipeline in phase order, calls the active interception points
//! at their place in that pipeline, and drains the host's pending lifecycle
//! events until the world settles.
//!
//! Failures inside an interception point never abort the host computation
//! around it. They are logged with the phase and actor and swallowed.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use share_host::{HostEvent, RemainingDuration, ResetOptions, World};
use share_model::{Actor, ActorId, ActorIdentity, CombatantId, Item, ItemId};

use crate::engine::{PassRole, SyncEngine};
use crate::form::{ConfigForm, ConfigSubmission};
use crate::hooks::{HookEvent, Interceptors, Phase};
use crate::settings::ShareSettings;
use crate::turn::{self, TurnReport};
use crate::{Error, Result, duration};

/// How often one actor may be revisited by a single [`Session::settle`]
pub const MAX_SETTLE_VISITS: usize = 64;

/// Hook dispatcher around a host world
#[derive(Debug)]
pub struct Session<W: World> {
    world: W,
    engine: SyncEngine,
    settings: ShareSettings,
    hooks: Interceptors,
    preparing: HashSet<ActorIdentity>,
}

impl<W: World> Session<W> {
    /// Create a session; interception points follow `settings.enabled`
    pub fn new(world: W, settings: ShareSettings) -> Self {
        let mut hooks = Interceptors::new();
        hooks.toggle_all(settings.enabled);
        info!(enabled = settings.enabled, "Share session started");
        Self {
            world,
            engine: SyncEngine::new(),
            settings,
            hooks,
            preparing: HashSet::new(),
        }
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn into_world(self) -> W {
        self.world
    }

    pub fn engine(&self) -> &SyncEngine {
        &self.engine
    }

    pub fn settings(&self) -> &ShareSettings {
        &self.settings
    }

    pub fn hooks(&self) -> &Interceptors {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut Interceptors {
        &mut self.hooks
    }

    /// Run one preparation pass of an actor instance
    ///
    /// A pass already running for the same identity is not re-entered; the
    /// nested request reports [`PassRole::Plain`].
    pub fn prepare(&mut self, identity: &ActorIdentity) -> Result<PassRole> {
        if !self.preparing.insert(identity.clone()) {
            debug!(actor = %identity, "Pass already running");
            return Ok(PassRole::Plain);
        }
        let result = self.run_pass(identity);
        self.preparing.remove(identity);
        result
    }

    fn run_pass(&mut self, identity: &ActorIdentity) -> Result<PassRole> {
        let mut actor = self
            .world
            .resolve(identity)
            .cloned()
            .ok_or_else(|| Error::ActorNotFound {
                identity: identity.clone(),
            })?;

        self.world.prepare_base_data(&mut actor);
        if self.hooks.is_active(Phase::ActorPrepareBaseData) {
            self.engine.on_base_data(&self.world, &actor);
        }
        if self.hooks.is_active(Phase::WeaponPrepareBaseData) {
            self.engine.on_weapon_data(&self.world, &mut actor);
        }
        if self.hooks.is_active(Phase::ActorPrepareDerivedData) {
            self.engine.on_derived_data(&self.world, &mut actor);
        }
        self.world.prepare_derived_data(&mut actor);

        let role = if self.hooks.is_active(Phase::ActorPrepareData) {
            self.engine.on_full_data(&self.world, &mut actor)
        } else {
            PassRole::Plain
        };
        debug!(actor = %identity, role = %role, "Prepared actor");

        self.world.commit_prepared(actor)?;
        if let PassRole::Master { slaves } = &role {
            for slave in slaves {
                self.world.reset_actor(slave, ResetOptions::default());
            }
        }
        Ok(role)
    }

    /// Prepare every actor instance of the world, then settle
    pub fn prepare_all(&mut self) -> Result<Vec<(ActorIdentity, PassRole)>> {
        let mut roles = Vec::new();
        for identity in self.world.identities() {
            match self.prepare(&identity) {
                Ok(role) => roles.push((identity, role)),
                Err(e) => {
                    warn!(
                        phase = %Phase::ActorPrepareData,
                        actor = %identity,
                        error = %e,
                        "Preparation failed"
                    );
                }
            }
        }
        self.settle()?;
        Ok(roles)
    }

    /// Persist a change of an actor's source
    pub fn update_actor(
        &mut self,
        target: &ActorIdentity,
        changes: serde_json::Value,
    ) -> Result<()> {
        self.world.update_actor(target, changes)?;
        self.settle()
    }

    /// Delete a world actor
    pub fn delete_actor(&mut self, id: &ActorId) -> Result<()> {
        self.world.delete_actor(id)?;
        self.settle()
    }

    pub fn start_turn(&mut self, combatant: &CombatantId) -> Result<TurnReport> {
        let report = if self.hooks.is_active(Phase::CombatantStartTurn) {
            turn::on_turn_start(&self.engine, &mut self.world, combatant)?
        } else {
            self.world.start_turn(combatant)?;
            TurnReport::new(combatant, share_host::EncounterEvent::TurnStart)
        };
        self.settle()?;
        Ok(report)
    }

    pub fn end_turn(&mut self, combatant: &CombatantId) -> Result<TurnReport> {
        let report = if self.hooks.is_active(Phase::CombatantEndTurn) {
            turn::on_turn_end(&self.engine, &mut self.world, combatant)?
        } else {
            self.world.end_turn(combatant)?;
            TurnReport::new(combatant, share_host::EncounterEvent::TurnEnd)
        };
        self.settle()?;
        Ok(report)
    }

    /// Reset every actor taking part in the encounter
    ///
    /// Returns the actors that were reset.
    pub fn reset_encounter_actors(&mut self) -> Result<Vec<ActorIdentity>> {
        let actors = if self.hooks.is_active(Phase::EncounterResetActors) {
            turn::encounter_actors_to_reset(&self.engine, &self.world)
        } else {
            turn::combatant_actors(&self.world)
        };
        turn::reset_actors(&mut self.world, &actors);
        self.settle()?;
        Ok(actors)
    }

    /// Remaining duration of an effect carried by `owner`
    pub fn remaining_duration(
        &self,
        owner: &ActorIdentity,
        effect: &ItemId,
    ) -> Result<RemainingDuration> {
        let actor = self
            .world
            .resolve(owner)
            .ok_or_else(|| Error::ActorNotFound {
                identity: owner.clone(),
            })?;
        let item = find_item(actor, effect).ok_or_else(|| share_host::Error::ItemNotFound {
            actor: owner.clone(),
            item: effect.clone(),
        })?;

        if self.hooks.is_active(Phase::EffectRemainingDuration) {
            Ok(duration::remaining_duration(&self.world, actor, item))
        } else {
            Ok(self.world.remaining_duration(actor, item, None))
        }
    }

    /// Configuration form of an actor, if it may be configured at all
    pub fn config_form(&self, identity: &ActorIdentity) -> Option<ConfigForm> {
        if !self.hooks.is_active(Phase::ConfigSheetRender) {
            return None;
        }
        let actor = self.world.resolve(identity)?;
        ConfigForm::build(&self.engine, &self.world, actor)
    }

    /// Persist a submitted configuration form
    pub fn submit_config(
        &mut self,
        identity: &ActorIdentity,
        submission: ConfigSubmission,
    ) -> Result<()> {
        self.world.update_actor(identity, submission.into_change())?;
        self.settle()
    }

    /// Drain pending host events in order until none is left
    ///
    /// # Errors
    ///
    /// Returns `Unsettled` when the events keep revisiting one actor more
    /// than [`MAX_SETTLE_VISITS`] times.
    pub fn settle(&mut self) -> Result<()> {
        let mut visits: HashMap<ActorIdentity, usize> = HashMap::new();
        while let Some(event) = self.world.pop_event() {
            let actor = event_target(&event);
            let count = visits.entry(actor.clone()).or_default();
            *count += 1;
            if *count > MAX_SETTLE_VISITS {
                return Err(Error::Unsettled {
                    actor,
                    visits: *count,
                });
            }
            self.dispatch(event);
        }
        Ok(())
    }

    fn dispatch(&mut self, event: HostEvent) {
        match event {
            HostEvent::ResetRequested { target } => {
                if self.world.resolve(&target).is_none() {
                    debug!(actor = %target, "Reset of a vanished actor skipped");
                    return;
                }
                if let Err(e) = self.prepare(&target) {
                    warn!(
                        phase = %Phase::ActorPrepareData,
                        actor = %target,
                        error = %e,
                        "Phase failed"
                    );
                }
            }
            HostEvent::Updated { target, changed } => {
                if !self.hooks.is_listening(HookEvent::UpdateActor) {
                    return;
                }
                if let Err(e) = self.engine.on_update_actor(&mut self.world, &target, &changed) {
                    warn!(
                        phase = %HookEvent::UpdateActor,
                        actor = %target,
                        error = %e,
                        "Phase failed"
                    );
                }
            }
            HostEvent::Deleted { actor } => {
                if !self.hooks.is_listening(HookEvent::DeleteActor) {
                    return;
                }
                if let Err(e) = self.engine.on_delete_actor(&mut self.world, &actor) {
                    warn!(
                        phase = %HookEvent::DeleteActor,
                        actor = %actor.id,
                        error = %e,
                        "Phase failed"
                    );
                }
            }
        }
    }
}

fn event_target(event: &HostEvent) -> ActorIdentity {
    match event {
        HostEvent::ResetRequested { target } | HostEvent::Updated { target, .. } => target.clone(),
        HostEvent::Deleted { actor } => ActorIdentity::Persistent(actor.id.clone()),
    }
}

fn find_item<'a>(actor: &'a Actor, id: &ItemId) -> Option<&'a Item> {
    actor
        .items
        .iter()
        .chain(actor.source.items.iter())
        .find(|item| &item.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use share_host::MemoryWorld;
    use share_model::{ActorKind, ActorSource, HitPoints};

    fn world() -> MemoryWorld {
        let mut world = MemoryWorld::new();
        let mut master = ActorSource::new("Kyra", ActorKind::Character);
        master.prototype_token.actor_link = true;
        master.system.attributes.hp = HitPoints {
            value: 30,
            max: 30,
            temp: 0,
        };
        world.insert_actor(Actor::new("master", master)).unwrap();

        let mut slave = ActorSource::new("Wolf", ActorKind::Npc);
        slave.flags = json!({
            "toolbelt": {"share": {"config": {"master": "master", "health": true}}}
        });
        slave.system.attributes.hp = HitPoints {
            value: 12,
            max: 12,
            temp: 0,
        };
        world.insert_actor(Actor::new("slave", slave)).unwrap();
        world
    }

    fn enabled() -> ShareSettings {
        ShareSettings { enabled: true }
    }

    #[test]
    fn test_prepare_all_mirrors_health() {
        let mut session = Session::new(world(), enabled());

        session.prepare_all().unwrap();

        let slave = session.world().actor(&ActorId::new("slave")).unwrap();
        assert_eq!(slave.data.hp.value, 30);
        assert_eq!(slave.data.hp.max, 30);
        assert!(
            session
                .engine()
                .store()
                .contains(&ActorId::new("master"), &ActorIdentity::persistent("slave"))
        );
    }

    #[test]
    fn test_disabled_session_is_inert() {
        let mut session = Session::new(world(), ShareSettings::default());

        let roles = session.prepare_all().unwrap();

        assert!(roles.iter().all(|(_, role)| *role == PassRole::Plain));
        assert!(session.engine().store().is_empty());
        let slave = session.world().actor(&ActorId::new("slave")).unwrap();
        assert_eq!(slave.data.hp.value, 12);
    }

    #[test]
    fn test_master_resets_its_slaves() {
        let mut session = Session::new(world(), enabled());
        session.prepare_all().unwrap();

        session
            .update_actor(
                &ActorIdentity::persistent("master"),
                json!({"system.attributes.hp.value": 20}),
            )
            .unwrap();

        let slave = session.world().actor(&ActorId::new("slave")).unwrap();
        assert_eq!(slave.data.hp.value, 20);
    }

    #[test]
    fn test_slave_damage_reaches_master() {
        let mut session = Session::new(world(), enabled());
        session.prepare_all().unwrap();

        session
            .update_actor(
                &ActorIdentity::persistent("slave"),
                json!({"system": {"attributes": {"hp": {"value": 8}}}}),
            )
            .unwrap();

        let master = session.world().actor(&ActorId::new("master")).unwrap();
        assert_eq!(master.source.system.attributes.hp.value, 8);
        assert_eq!(master.data.hp.value, 8);
        let slave = session.world().actor(&ActorId::new("slave")).unwrap();
        assert_eq!(slave.data.hp.value, 8);
    }

    #[test]
    fn test_prepare_unknown_actor() {
        let mut session = Session::new(world(), enabled());
        let result = session.prepare(&ActorIdentity::persistent("ghost"));
        assert!(matches!(result, Err(Error::ActorNotFound { .. })));
    }

    #[test]
    fn test_config_form_needs_active_hook() {
        let session = Session::new(world(), ShareSettings::default());
        assert!(
            session
                .config_form(&ActorIdentity::persistent("slave"))
                .is_none()
        );

        let session = Session::new(world(), enabled());
        assert!(
            session
                .config_form(&ActorIdentity::persistent("slave"))
                .is_some()
        );
    }

    #[test]
    fn test_remaining_duration_of_missing_item() {
        let session = Session::new(world(), enabled());
        let result =
            session.remaining_duration(&ActorIdentity::persistent("slave"), &ItemId::new("x"));
        assert!(matches!(
            result,
            Err(Error::Host(share_host::Error::ItemNotFound { .. }))
        ));
    }
}
