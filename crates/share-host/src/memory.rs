//! In-memory host
//!
//! [`MemoryWorld`] keeps every document in process memory and records the
//! collaborator calls it receives in a journal, so callers can observe what
//! the share engine asked the host to do.

use std::collections::VecDeque;

use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use share_model::{
    Actor, ActorId, ActorIdentity, ActorSource, CombatantId, Item, ItemId, RuleElement, SceneId,
    TokenId, TokenRef, patch,
};

use crate::duration::calculate_remaining_duration;
use crate::encounter::{Combatant, Encounter};
use crate::error::{Error, Result};
use crate::prepare;
use crate::scene::{Scene, Token};
use crate::world::{EncounterEvent, HostEvent, RemainingDuration, World};

const HP_VALUE_PATH: &str = "system.attributes.hp.value";

/// Collaborator call recorded by [`MemoryWorld`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "kebab-case")]
pub enum JournalEntry {
    SheetRendered {
        actor: ActorIdentity,
    },
    TokenBarsRefreshed {
        actor: ActorIdentity,
    },
    TurnStarted {
        combatant: CombatantId,
    },
    TurnEnded {
        combatant: CombatantId,
    },
    RuleTurnStart {
        actor: ActorIdentity,
        rule: usize,
    },
    EffectEvent {
        actor: ActorIdentity,
        effect: ItemId,
        event: EncounterEvent,
    },
    ConditionEndTurn {
        actor: ActorIdentity,
        condition: ItemId,
        token: Option<TokenRef>,
    },
}

/// Complete in-memory [`World`]
#[derive(Debug)]
pub struct MemoryWorld {
    ready: bool,
    gm: bool,
    actors: Vec<Actor>,
    scenes: Vec<Scene>,
    encounter: Option<Encounter>,
    events: VecDeque<HostEvent>,
    journal: Vec<JournalEntry>,
}

impl Default for MemoryWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryWorld {
    /// A ready world seen by a game master
    pub fn new() -> Self {
        Self {
            ready: true,
            gm: true,
            actors: Vec::new(),
            scenes: Vec::new(),
            encounter: None,
            events: VecDeque::new(),
            journal: Vec::new(),
        }
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    pub fn set_gm(&mut self, gm: bool) {
        self.gm = gm;
    }

    /// Add a world actor under its own id
    pub fn insert_actor(&mut self, actor: Actor) -> Result<()> {
        if self.actors.iter().any(|a| a.id == actor.id) {
            return Err(Error::DuplicateActor { id: actor.id });
        }
        self.actors.push(actor);
        Ok(())
    }

    /// Add a world actor under a generated id
    pub fn create_actor(&mut self, source: ActorSource) -> ActorId {
        let id = ActorId::random();
        self.actors.push(Actor::new(id.clone(), source));
        id
    }

    pub fn add_scene(&mut self, scene: Scene) {
        self.scenes.push(scene);
    }

    /// Place a token of a world actor
    ///
    /// `linked` defaults to the actor's prototype token setting.
    pub fn place_token(
        &mut self,
        scene: &SceneId,
        token: impl Into<TokenId>,
        actor: &ActorId,
        linked: Option<bool>,
    ) -> Result<TokenRef> {
        let base = self
            .actors
            .iter()
            .find(|a| &a.id == actor)
            .ok_or_else(|| Error::actor_not_found(&ActorIdentity::Persistent(actor.clone())))?;
        let linked = linked.unwrap_or(base.source.prototype_token.actor_link);
        let token = if linked {
            Token::linked(token, actor.clone())
        } else {
            Token::unlinked(scene, token, base)
        };
        let reference = TokenRef::new(scene.clone(), token.id.clone());

        let scene = self
            .scenes
            .iter_mut()
            .find(|s| &s.id == scene)
            .ok_or_else(|| Error::SceneNotFound { id: scene.clone() })?;
        scene.tokens.push(token);
        Ok(reference)
    }

    pub fn start_encounter(&mut self, scene: &SceneId) -> Result<&mut Encounter> {
        if !self.scenes.iter().any(|s| &s.id == scene) {
            return Err(Error::SceneNotFound { id: scene.clone() });
        }
        Ok(self.encounter.insert(Encounter::new(scene.clone())))
    }

    /// Seat an actor instance in the active encounter
    pub fn add_combatant(
        &mut self,
        id: impl Into<CombatantId>,
        actor: ActorIdentity,
        initiative: Option<i32>,
    ) -> Result<()> {
        let actor = self.canonical(&actor);
        if self.resolve(&actor).is_none() {
            return Err(Error::actor_not_found(&actor));
        }
        let encounter = self.encounter.as_mut().ok_or(Error::NoEncounter)?;
        encounter.add_combatant(Combatant {
            id: id.into(),
            actor,
            initiative,
        });
        Ok(())
    }

    pub fn journal(&self) -> &[JournalEntry] {
        &self.journal
    }

    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter()
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Linked tokens act as their world actor
    fn canonical(&self, identity: &ActorIdentity) -> ActorIdentity {
        if let ActorIdentity::TokenBound { scene, token } = identity
            && let Some(token) = self.scene_token(scene, token)
            && token.actor_link
        {
            return ActorIdentity::Persistent(token.actor_id.clone());
        }
        identity.clone()
    }

    fn scene_token(&self, scene: &SceneId, token: &TokenId) -> Option<&Token> {
        self.scenes
            .iter()
            .find(|s| &s.id == scene)
            .and_then(|s| s.token(token))
    }

    fn resolve_mut(&mut self, identity: &ActorIdentity) -> Option<&mut Actor> {
        match self.canonical(identity) {
            ActorIdentity::Persistent(id) => self.actors.iter_mut().find(|a| a.id == id),
            ActorIdentity::TokenBound { scene, token } => self
                .scenes
                .iter_mut()
                .find(|s| s.id == scene)
                .and_then(|s| s.token_mut(&token))
                .and_then(|t| t.actor.as_mut()),
        }
    }

    fn item(&self, actor: &ActorIdentity, item: &ItemId) -> Result<&Item> {
        let owner = self
            .resolve(actor)
            .ok_or_else(|| Error::actor_not_found(actor))?;
        owner
            .source
            .items
            .iter()
            .find(|i| &i.id == item)
            .ok_or_else(|| Error::ItemNotFound {
                actor: actor.clone(),
                item: item.clone(),
            })
    }

    fn seated(&self, combatant: &CombatantId) -> Result<&Combatant> {
        let encounter = self.encounter.as_ref().ok_or(Error::NoEncounter)?;
        encounter
            .combatant(combatant)
            .ok_or_else(|| Error::CombatantNotFound {
                id: combatant.clone(),
            })
    }
}

fn instance_identity(actor: &Actor) -> ActorIdentity {
    match &actor.token {
        Some(token) => ActorIdentity::from(token.clone()),
        None => ActorIdentity::Persistent(actor.id.clone()),
    }
}

impl World for MemoryWorld {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn is_gm(&self) -> bool {
        self.gm
    }

    fn is_primary_updater(&self, _actor: &Actor) -> bool {
        self.gm
    }

    fn actor(&self, id: &ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| &a.id == id)
    }

    fn token_actor(&self, scene: &SceneId, token: &TokenId) -> Option<&Actor> {
        let token = self.scene_token(scene, token)?;
        if token.actor_link {
            self.actor(&token.actor_id)
        } else {
            token.actor.as_ref()
        }
    }

    fn actor_ids(&self) -> Vec<ActorId> {
        self.actors.iter().map(|a| a.id.clone()).collect()
    }

    fn identities(&self) -> Vec<ActorIdentity> {
        let world = self.actors.iter().map(|a| ActorIdentity::Persistent(a.id.clone()));
        let tokens = self.scenes.iter().flat_map(|scene| {
            scene
                .tokens
                .iter()
                .filter(|t| !t.actor_link && t.actor.is_some())
                .map(|t| ActorIdentity::token_bound(scene.id.clone(), t.id.clone()))
        });
        world.chain(tokens).collect()
    }

    fn commit_prepared(&mut self, actor: Actor) -> Result<()> {
        let identity = instance_identity(&actor);
        let slot = self
            .resolve_mut(&identity)
            .ok_or_else(|| Error::actor_not_found(&identity))?;
        *slot = actor;
        Ok(())
    }

    fn update_actor(&mut self, target: &ActorIdentity, changes: Value) -> Result<()> {
        let target = self.canonical(target);
        let actor = self
            .resolve_mut(&target)
            .ok_or_else(|| Error::actor_not_found(&target))?;
        actor.apply_change(&changes)?;
        debug!(actor = %target, "Persisted actor update");

        self.request_reset(&target);
        self.events.push_back(HostEvent::Updated {
            target,
            changed: patch::expand_object(changes),
        });
        Ok(())
    }

    fn delete_actor(&mut self, id: &ActorId) -> Result<()> {
        let index = self
            .actors
            .iter()
            .position(|a| &a.id == id)
            .ok_or_else(|| Error::actor_not_found(&ActorIdentity::Persistent(id.clone())))?;
        let actor = self.actors.remove(index);
        for scene in &mut self.scenes {
            scene.tokens.retain(|t| !(t.actor_link && &t.actor_id == id));
        }
        if let Some(encounter) = &mut self.encounter {
            encounter
                .combatants
                .retain(|c| c.actor != ActorIdentity::Persistent(id.clone()));
        }
        self.events.push_back(HostEvent::Deleted {
            actor: Box::new(actor),
        });
        Ok(())
    }

    fn request_reset(&mut self, target: &ActorIdentity) {
        let target = self.canonical(target);
        let queued = self.events.iter().any(|event| {
            matches!(event, HostEvent::ResetRequested { target: queued } if *queued == target)
        });
        if !queued {
            self.events.push_back(HostEvent::ResetRequested { target });
        }
    }

    fn render_sheet(&mut self, target: &ActorIdentity) {
        let actor = self.canonical(target);
        self.journal.push(JournalEntry::SheetRendered { actor });
    }

    fn refresh_token_bars(&mut self, target: &ActorIdentity) {
        let actor = self.canonical(target);
        self.journal.push(JournalEntry::TokenBarsRefreshed { actor });
    }

    fn prepare_base_data(&self, actor: &mut Actor) {
        prepare::prepare_base_data(actor);
    }

    fn prepare_derived_data(&self, actor: &mut Actor) {
        prepare::prepare_derived_data(actor);
    }

    fn encounter(&self) -> Option<&Encounter> {
        self.encounter.as_ref()
    }

    fn start_turn(&mut self, combatant: &CombatantId) -> Result<()> {
        self.seated(combatant)?;
        if let Some(encounter) = &mut self.encounter {
            encounter.set_turn(combatant);
        }
        self.journal.push(JournalEntry::TurnStarted {
            combatant: combatant.clone(),
        });
        Ok(())
    }

    fn end_turn(&mut self, combatant: &CombatantId) -> Result<()> {
        self.seated(combatant)?;
        self.journal.push(JournalEntry::TurnEnded {
            combatant: combatant.clone(),
        });
        Ok(())
    }

    fn linked_token(&self, actor: &Actor, scene: &SceneId) -> Option<TokenRef> {
        if actor.token.is_some() {
            return None;
        }
        self.scenes
            .iter()
            .find(|s| &s.id == scene)?
            .linked_token_of(&actor.id)
            .map(|t| TokenRef::new(scene.clone(), t.id.clone()))
    }

    fn rule_turn_start(
        &mut self,
        actor: &ActorIdentity,
        rule: usize,
        updates: &mut Value,
    ) -> Result<()> {
        let owner = self
            .resolve(actor)
            .ok_or_else(|| Error::actor_not_found(actor))?;
        if let Some(RuleElement::FastHealing { value }) = owner.source.system.rules.get(rule) {
            let hp = owner.source.system.attributes.hp;
            let current = patch::get_property(updates, HP_VALUE_PATH)
                .and_then(Value::as_i64)
                .and_then(|v| i32::try_from(v).ok())
                .unwrap_or(hp.value);
            let healed = (current + value).min(hp.max);
            patch::merge_object(updates, &patch::nested(HP_VALUE_PATH, json!(healed)));
        }
        let actor = self.canonical(actor);
        self.journal.push(JournalEntry::RuleTurnStart { actor, rule });
        Ok(())
    }

    fn effect_encounter_event(
        &mut self,
        actor: &ActorIdentity,
        effect: &ItemId,
        event: EncounterEvent,
    ) -> Result<()> {
        self.item(actor, effect)?;
        let actor = self.canonical(actor);
        self.journal.push(JournalEntry::EffectEvent {
            actor,
            effect: effect.clone(),
            event,
        });
        Ok(())
    }

    fn condition_end_turn(
        &mut self,
        actor: &ActorIdentity,
        condition: &ItemId,
        token: Option<&TokenRef>,
    ) -> Result<()> {
        let frightened = self
            .item(actor, condition)?
            .slug
            .as_deref()
            .is_some_and(|slug| slug == "frightened");
        if frightened && let Some(owner) = self.resolve_mut(actor) {
            let mut expired = false;
            if let Some(item) = owner.source.items.iter_mut().find(|i| &i.id == condition)
                && let share_model::ItemSystem::Condition(system) = &mut item.system
            {
                let value = system.value.unwrap_or(1).saturating_sub(1);
                system.value = Some(value);
                expired = value == 0;
            }
            if expired {
                owner.source.items.retain(|i| &i.id != condition);
            }
            self.request_reset(actor);
        }
        let actor = self.canonical(actor);
        self.journal.push(JournalEntry::ConditionEndTurn {
            actor,
            condition: condition.clone(),
            token: token.cloned(),
        });
        Ok(())
    }

    fn remaining_duration(
        &self,
        owner: &Actor,
        effect: &Item,
        master: Option<&Actor>,
    ) -> RemainingDuration {
        let origin = instance_identity(master.unwrap_or(owner));
        match effect.effect() {
            Some(system) => calculate_remaining_duration(system, &origin, self.encounter.as_ref()),
            None => RemainingDuration {
                expired: false,
                remaining: None,
            },
        }
    }

    fn pop_event(&mut self) -> Option<HostEvent> {
        self.events.pop_front()
    }
}
