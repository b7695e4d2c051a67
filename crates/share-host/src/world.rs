//! Host contract
//!
//! The share engine never owns documents. Everything it reads or writes goes
//! through a [`World`]: document resolution, persisted writes, presentation
//! refreshes, the host's own preparation phases and its encounter handlers.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use share_model::{
    Actor, ActorId, ActorIdentity, CombatantId, Item, ItemId, SceneId, TokenId, TokenRef, flags,
};

use crate::encounter::Encounter;
use crate::error::Result;

/// Encounter events delivered to effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EncounterEvent {
    TurnStart,
    TurnEnd,
}

impl fmt::Display for EncounterEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TurnStart => write!(f, "turn-start"),
            Self::TurnEnd => write!(f, "turn-end"),
        }
    }
}

/// What a reset refreshes besides prepared data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetOptions {
    pub sheets: bool,
    pub tokens: bool,
}

impl Default for ResetOptions {
    fn default() -> Self {
        Self {
            sheets: true,
            tokens: true,
        }
    }
}

/// Result of the host's remaining-duration calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainingDuration {
    pub expired: bool,
    /// Rounds left, `None` for unlimited or encounter-long effects
    pub remaining: Option<i64>,
}

/// Lifecycle notifications queued by the host after persisted writes
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// A document's source changed; `changed` is the expanded change
    Updated {
        target: ActorIdentity,
        changed: Value,
    },
    /// A world actor was deleted
    Deleted { actor: Box<Actor> },
    /// Prepared data must be rebuilt
    ResetRequested { target: ActorIdentity },
}

/// The host document model as seen by the share engine
pub trait World {
    /// Whether the host finished its startup sequence
    fn is_ready(&self) -> bool;

    /// Whether the current user is a game master
    fn is_gm(&self) -> bool;

    /// Whether the current user is the one expected to react to changes of
    /// this actor
    fn is_primary_updater(&self, actor: &Actor) -> bool;

    /// World-level actor by id
    fn actor(&self, id: &ActorId) -> Option<&Actor>;

    /// Actor instance of a token; the world actor for linked tokens
    fn token_actor(&self, scene: &SceneId, token: &TokenId) -> Option<&Actor>;

    /// Resolve an identity to a live actor instance
    fn resolve(&self, identity: &ActorIdentity) -> Option<&Actor> {
        match identity {
            ActorIdentity::Persistent(id) => self.actor(id),
            ActorIdentity::TokenBound { scene, token } => self.token_actor(scene, token),
        }
    }

    /// Ids of the world actors, in directory order
    fn actor_ids(&self) -> Vec<ActorId>;

    /// Every actor instance: world actors first, then unlinked token actors
    fn identities(&self) -> Vec<ActorIdentity>;

    /// Store the result of a preparation pass
    fn commit_prepared(&mut self, actor: Actor) -> Result<()>;

    /// Persist a depth-partial change to an actor's source
    fn update_actor(&mut self, target: &ActorIdentity, changes: Value) -> Result<()>;

    /// Persist a tool flag
    fn set_flag(&mut self, target: &ActorIdentity, key: &str, value: Value) -> Result<()> {
        self.update_actor(target, flags::set_flag_change(key, value))
    }

    /// Remove a tool flag
    fn unset_flag(&mut self, target: &ActorIdentity, key: &str) -> Result<()> {
        self.update_actor(target, flags::unset_flag_change(key))
    }

    /// Delete a world actor
    fn delete_actor(&mut self, id: &ActorId) -> Result<()>;

    /// Queue a rebuild of an actor's prepared data
    fn request_reset(&mut self, target: &ActorIdentity);

    /// Reset an actor and refresh what `options` asks for
    fn reset_actor(&mut self, target: &ActorIdentity, options: ResetOptions) {
        self.request_reset(target);
        if options.sheets {
            self.render_sheet(target);
        }
        if options.tokens {
            self.refresh_token_bars(target);
        }
    }

    fn render_sheet(&mut self, target: &ActorIdentity);

    /// Mark the health bars of an actor's active tokens dirty
    fn refresh_token_bars(&mut self, target: &ActorIdentity);

    /// Host base-data computation
    fn prepare_base_data(&self, actor: &mut Actor);

    /// Host derived-data computation
    fn prepare_derived_data(&self, actor: &mut Actor);

    /// The active encounter
    fn encounter(&self) -> Option<&Encounter>;

    /// Host turn-start logic of a combatant
    fn start_turn(&mut self, combatant: &CombatantId) -> Result<()>;

    /// Host turn-end logic of a combatant
    fn end_turn(&mut self, combatant: &CombatantId) -> Result<()>;

    /// First linked token of an actor in a scene
    fn linked_token(&self, actor: &Actor, scene: &SceneId) -> Option<TokenRef>;

    /// Let one of the actor's rule elements propose turn-start updates
    fn rule_turn_start(
        &mut self,
        actor: &ActorIdentity,
        rule: usize,
        updates: &mut Value,
    ) -> Result<()>;

    /// Deliver an encounter event to an effect
    fn effect_encounter_event(
        &mut self,
        actor: &ActorIdentity,
        effect: &ItemId,
        event: EncounterEvent,
    ) -> Result<()>;

    /// Run a condition's end-of-turn handler
    fn condition_end_turn(
        &mut self,
        actor: &ActorIdentity,
        condition: &ItemId,
        token: Option<&TokenRef>,
    ) -> Result<()>;

    /// Remaining duration of an effect, measured against `master`'s turn when
    /// given and against the owner's otherwise
    fn remaining_duration(
        &self,
        owner: &Actor,
        effect: &Item,
        master: Option<&Actor>,
    ) -> RemainingDuration;

    /// Next queued lifecycle event
    fn pop_event(&mut self) -> Option<HostEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(EncounterEvent::TurnStart, "turn-start")]
    #[case(EncounterEvent::TurnEnd, "turn-end")]
    fn test_encounter_event_names(#[case] event: EncounterEvent, #[case] name: &str) {
        assert_eq!(event.to_string(), name);
        assert_eq!(
            serde_json::to_value(event).unwrap(),
            Value::String(name.to_string())
        );
    }

    #[test]
    fn test_default_reset_refreshes_everything() {
        let options = ResetOptions::default();
        assert!(options.sheets);
        assert!(options.tokens);
    }
}
