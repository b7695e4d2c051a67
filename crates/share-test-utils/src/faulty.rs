//! A world that fails on demand.
//!
//! [`FaultyWorld`] wraps a [`MemoryWorld`] and behaves exactly like it,
//! except for the actors it was told to fail on.

use std::collections::HashSet;

use serde_json::Value;
use share_host::{
    Encounter, EncounterEvent, Error, HostEvent, MemoryWorld, RemainingDuration, Result, World,
};
use share_model::{
    Actor, ActorId, ActorIdentity, CombatantId, Item, ItemId, SceneId, TokenId, TokenRef,
};

#[derive(Debug)]
pub struct FaultyWorld {
    inner: MemoryWorld,
    failing_writes: HashSet<ActorIdentity>,
    failing_effects: HashSet<ActorIdentity>,
    restless: HashSet<ActorIdentity>,
}

impl FaultyWorld {
    pub fn new(inner: MemoryWorld) -> Self {
        Self {
            inner,
            failing_writes: HashSet::new(),
            failing_effects: HashSet::new(),
            restless: HashSet::new(),
        }
    }

    /// Source writes to `actor` fail as if the document had vanished
    pub fn fail_writes(mut self, actor: &str) -> Self {
        self.failing_writes.insert(ActorIdentity::persistent(actor));
        self
    }

    /// Effect events delivered to `actor` fail
    pub fn fail_effects(mut self, actor: &str) -> Self {
        self.failing_effects.insert(ActorIdentity::persistent(actor));
        self
    }

    /// Every reset of `actor` requests another one
    pub fn restless(mut self, actor: &str) -> Self {
        self.restless.insert(ActorIdentity::persistent(actor));
        self
    }

    pub fn inner(&self) -> &MemoryWorld {
        &self.inner
    }
}

impl World for FaultyWorld {
    fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    fn is_gm(&self) -> bool {
        self.inner.is_gm()
    }

    fn is_primary_updater(&self, actor: &Actor) -> bool {
        self.inner.is_primary_updater(actor)
    }

    fn actor(&self, id: &ActorId) -> Option<&Actor> {
        self.inner.actor(id)
    }

    fn token_actor(&self, scene: &SceneId, token: &TokenId) -> Option<&Actor> {
        self.inner.token_actor(scene, token)
    }

    fn actor_ids(&self) -> Vec<ActorId> {
        self.inner.actor_ids()
    }

    fn identities(&self) -> Vec<ActorIdentity> {
        self.inner.identities()
    }

    fn commit_prepared(&mut self, actor: Actor) -> Result<()> {
        self.inner.commit_prepared(actor)
    }

    fn update_actor(&mut self, target: &ActorIdentity, changes: Value) -> Result<()> {
        if self.failing_writes.contains(target) {
            return Err(Error::actor_not_found(target));
        }
        self.inner.update_actor(target, changes)
    }

    fn delete_actor(&mut self, id: &ActorId) -> Result<()> {
        self.inner.delete_actor(id)
    }

    fn request_reset(&mut self, target: &ActorIdentity) {
        self.inner.request_reset(target)
    }

    fn render_sheet(&mut self, target: &ActorIdentity) {
        self.inner.render_sheet(target)
    }

    fn refresh_token_bars(&mut self, target: &ActorIdentity) {
        self.inner.refresh_token_bars(target)
    }

    fn prepare_base_data(&self, actor: &mut Actor) {
        self.inner.prepare_base_data(actor)
    }

    fn prepare_derived_data(&self, actor: &mut Actor) {
        self.inner.prepare_derived_data(actor)
    }

    fn encounter(&self) -> Option<&Encounter> {
        self.inner.encounter()
    }

    fn start_turn(&mut self, combatant: &CombatantId) -> Result<()> {
        self.inner.start_turn(combatant)
    }

    fn end_turn(&mut self, combatant: &CombatantId) -> Result<()> {
        self.inner.end_turn(combatant)
    }

    fn linked_token(&self, actor: &Actor, scene: &SceneId) -> Option<TokenRef> {
        self.inner.linked_token(actor, scene)
    }

    fn rule_turn_start(
        &mut self,
        actor: &ActorIdentity,
        rule: usize,
        updates: &mut Value,
    ) -> Result<()> {
        self.inner.rule_turn_start(actor, rule, updates)
    }

    fn effect_encounter_event(
        &mut self,
        actor: &ActorIdentity,
        effect: &ItemId,
        event: EncounterEvent,
    ) -> Result<()> {
        if self.failing_effects.contains(actor) {
            return Err(Error::ItemNotFound {
                actor: actor.clone(),
                item: effect.clone(),
            });
        }
        self.inner.effect_encounter_event(actor, effect, event)
    }

    fn condition_end_turn(
        &mut self,
        actor: &ActorIdentity,
        condition: &ItemId,
        token: Option<&TokenRef>,
    ) -> Result<()> {
        self.inner.condition_end_turn(actor, condition, token)
    }

    fn remaining_duration(
        &self,
        owner: &Actor,
        effect: &Item,
        master: Option<&Actor>,
    ) -> RemainingDuration {
        self.inner.remaining_duration(owner, effect, master)
    }

    fn pop_event(&mut self) -> Option<HostEvent> {
        let event = self.inner.pop_event()?;
        if let HostEvent::ResetRequested { target } = &event
            && self.restless.contains(target)
        {
            self.inner.request_reset(target);
        }
        Some(event)
    }
}
