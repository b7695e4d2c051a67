//! Turn event dispatcher
//!
//! When a master's combatant starts or ends its turn, slaves that share
//! `turn` and are not seated in the encounter themselves get the same
//! processing: rule element updates and effect events at turn start,
//! condition end-of-turn handling and effect events at turn end.

use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use share_host::{EncounterEvent, ResetOptions, World};
use share_model::{Actor, ActorIdentity, CombatantId, ItemId, SceneId, TokenRef, patch};

use crate::Result;
use crate::config::ShareCategory;
use crate::engine::SyncEngine;
use crate::identity::identity_of;

/// Options used when the encounter resets its actors
pub const ENCOUNTER_RESET: ResetOptions = ResetOptions {
    sheets: false,
    tokens: true,
};

/// Outcome of one turn transition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnReport {
    pub combatant: CombatantId,
    pub event: EncounterEvent,
    /// Slaves that received the turn processing
    pub processed: Vec<ActorIdentity>,
    /// Slaves skipped because they act on their own turn
    pub skipped: Vec<ActorIdentity>,
    /// Slaves whose processing failed, with the error message
    pub failed: Vec<(ActorIdentity, String)>,
}

impl TurnReport {
    pub fn new(combatant: &CombatantId, event: EncounterEvent) -> Self {
        Self {
            combatant: combatant.clone(),
            event,
            processed: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
        }
    }
}

/// Snapshot of what one slave needs for its turn processing
struct SlaveTurn {
    identity: ActorIdentity,
    rules: usize,
    effects: Vec<ItemId>,
    conditions: Vec<ItemId>,
    token: Option<TokenRef>,
    familiar: Option<(ActorIdentity, Vec<ItemId>)>,
}

impl SlaveTurn {
    fn capture<W>(world: &W, slave: &Actor, scene: &SceneId) -> Self
    where
        W: World + ?Sized,
    {
        let familiar = slave
            .source
            .familiar
            .as_ref()
            .filter(|_| slave.is_character())
            .and_then(|id| world.actor(id))
            .map(|familiar| (identity_of(familiar), effect_ids(familiar)));
        Self {
            identity: identity_of(slave),
            rules: slave.source.system.rules.len(),
            effects: effect_ids(slave),
            conditions: slave.active_conditions().map(|c| c.id.clone()).collect(),
            token: world.linked_token(slave, scene),
            familiar,
        }
    }
}

fn effect_ids(actor: &Actor) -> Vec<ItemId> {
    actor.effects().map(|e| e.id.clone()).collect()
}

/// Slaves of a combatant's actor eligible for turn processing
///
/// Returns the captured slaves and the ones skipped because they are seated.
fn eligible_slaves<W>(
    engine: &SyncEngine,
    world: &W,
    combatant: &CombatantId,
) -> (Vec<SlaveTurn>, Vec<ActorIdentity>)
where
    W: World + ?Sized,
{
    let Some(encounter) = world.encounter() else {
        return (Vec::new(), Vec::new());
    };
    let Some(actor) = encounter
        .combatant(combatant)
        .and_then(|c| world.resolve(&c.actor))
        .filter(|actor| actor.is_creature())
    else {
        return (Vec::new(), Vec::new());
    };

    let mut eligible = Vec::new();
    let mut skipped = Vec::new();
    for slave in engine.slaves_of(world, actor, Some(ShareCategory::Turn)) {
        let identity = identity_of(slave);
        if encounter.is_seated(&identity) {
            skipped.push(identity);
        } else {
            eligible.push(SlaveTurn::capture(world, slave, &encounter.scene));
        }
    }
    (eligible, skipped)
}

/// Combatant turn start
///
/// The host's own turn-start logic runs first and its failure is returned.
/// A failing slave is logged and recorded without stopping the others.
pub fn on_turn_start<W>(
    engine: &SyncEngine,
    world: &mut W,
    combatant: &CombatantId,
) -> Result<TurnReport>
where
    W: World + ?Sized,
{
    world.start_turn(combatant)?;

    let mut report = TurnReport::new(combatant, EncounterEvent::TurnStart);
    let (slaves, skipped) = eligible_slaves(engine, world, combatant);
    report.skipped = skipped;

    for slave in slaves {
        match start_slave_turn(world, &slave) {
            Ok(()) => report.processed.push(slave.identity),
            Err(e) => {
                warn!(
                    phase = "combatant-start-turn",
                    actor = %slave.identity,
                    error = %e,
                    "Slave turn start failed"
                );
                report.failed.push((slave.identity, e.to_string()));
            }
        }
    }
    debug!(
        combatant = %combatant,
        processed = report.processed.len(),
        skipped = report.skipped.len(),
        "Turn start dispatched"
    );
    Ok(report)
}

fn start_slave_turn<W>(world: &mut W, slave: &SlaveTurn) -> Result<()>
where
    W: World + ?Sized,
{
    let event = EncounterEvent::TurnStart;
    let mut updates = json!({});
    for rule in 0..slave.rules {
        world.rule_turn_start(&slave.identity, rule, &mut updates)?;
    }
    if !patch::is_empty_change(&updates) {
        world.update_actor(&slave.identity, updates)?;
    }
    fire_effects(world, slave, event)
}

/// Combatant turn end
///
/// The host's own turn-end logic runs first and its failure is returned.
pub fn on_turn_end<W>(
    engine: &SyncEngine,
    world: &mut W,
    combatant: &CombatantId,
) -> Result<TurnReport>
where
    W: World + ?Sized,
{
    world.end_turn(combatant)?;

    let mut report = TurnReport::new(combatant, EncounterEvent::TurnEnd);
    let (slaves, skipped) = eligible_slaves(engine, world, combatant);
    report.skipped = skipped;

    for slave in slaves {
        match end_slave_turn(world, &slave) {
            Ok(()) => report.processed.push(slave.identity),
            Err(e) => {
                warn!(
                    phase = "combatant-end-turn",
                    actor = %slave.identity,
                    error = %e,
                    "Slave turn end failed"
                );
                report.failed.push((slave.identity, e.to_string()));
            }
        }
    }
    debug!(
        combatant = %combatant,
        processed = report.processed.len(),
        skipped = report.skipped.len(),
        "Turn end dispatched"
    );
    Ok(report)
}

fn end_slave_turn<W>(world: &mut W, slave: &SlaveTurn) -> Result<()>
where
    W: World + ?Sized,
{
    for condition in &slave.conditions {
        world.condition_end_turn(&slave.identity, condition, slave.token.as_ref())?;
    }
    fire_effects(world, slave, EncounterEvent::TurnEnd)
}

fn fire_effects<W>(world: &mut W, slave: &SlaveTurn, event: EncounterEvent) -> Result<()>
where
    W: World + ?Sized,
{
    for effect in &slave.effects {
        world.effect_encounter_event(&slave.identity, effect, event)?;
    }
    if let Some((familiar, effects)) = &slave.familiar {
        for effect in effects {
            world.effect_encounter_event(familiar, effect, event)?;
        }
    }
    Ok(())
}

/// Actors the encounter resets
///
/// Every combatant's actor, plus the familiar and `turn` slaves of character
/// combatants. Each actor appears once.
pub fn encounter_actors_to_reset<W>(engine: &SyncEngine, world: &W) -> Vec<ActorIdentity>
where
    W: World + ?Sized,
{
    let Some(encounter) = world.encounter() else {
        return Vec::new();
    };

    let mut actors: Vec<ActorIdentity> = Vec::new();
    let mut push = |identity: ActorIdentity| {
        if !actors.contains(&identity) {
            actors.push(identity);
        }
    };

    for combatant in &encounter.combatants {
        let Some(actor) = world.resolve(&combatant.actor) else {
            continue;
        };
        push(identity_of(actor));
        if !actor.is_character() {
            continue;
        }
        if let Some(familiar) = actor.source.familiar.as_ref().and_then(|id| world.actor(id)) {
            push(identity_of(familiar));
        }
        for slave in engine.slaves_of(world, actor, Some(ShareCategory::Turn)) {
            push(identity_of(slave));
        }
    }
    actors
}

/// Default encounter reset: only the combatants' own actors
pub fn combatant_actors<W>(world: &W) -> Vec<ActorIdentity>
where
    W: World + ?Sized,
{
    let Some(encounter) = world.encounter() else {
        return Vec::new();
    };
    let mut actors: Vec<ActorIdentity> = Vec::new();
    for combatant in &encounter.combatants {
        if let Some(actor) = world.resolve(&combatant.actor) {
            let identity = identity_of(actor);
            if !actors.contains(&identity) {
                actors.push(identity);
            }
        }
    }
    actors
}

/// Reset actors without re-rendering their sheets
pub fn reset_actors<W>(world: &mut W, actors: &[ActorIdentity])
where
    W: World + ?Sized,
{
    for actor in actors {
        world.reset_actor(actor, ENCOUNTER_RESET);
    }
}
