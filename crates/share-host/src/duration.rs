//! Effect duration bookkeeping

use share_model::{ActorIdentity, DurationUnit, EffectSystem, Expiry};

use crate::encounter::Encounter;
use crate::world::RemainingDuration;

/// Remaining rounds of an effect
///
/// `origin` is the actor whose turn marks the effect boundary. When the last
/// round is reached the expiry mode decides whether the effect is already
/// over at the origin's turn.
pub fn calculate_remaining_duration(
    effect: &EffectSystem,
    origin: &ActorIdentity,
    encounter: Option<&Encounter>,
) -> RemainingDuration {
    let duration = &effect.duration;
    if duration.unit == DurationUnit::Encounter {
        return RemainingDuration {
            expired: encounter.is_none(),
            remaining: None,
        };
    }
    let Some(unit) = duration.unit.rounds().filter(|_| duration.value >= 0) else {
        return RemainingDuration {
            expired: false,
            remaining: None,
        };
    };

    let now = encounter.map(|e| e.round).unwrap_or(0);
    let remaining = effect.start.round + duration.value * unit - now;
    let mut result = RemainingDuration {
        expired: remaining <= 0,
        remaining: Some(remaining),
    };

    let current = encounter.and_then(|e| e.combatants.get(e.turn));
    if remaining == 0
        && let Some(current) = current
    {
        let start_initiative = effect.start.initiative.unwrap_or(0);
        let current_initiative = current.initiative.unwrap_or(0);
        let at_origin_turn = start_initiative == current_initiative && &current.actor == origin;
        result.expired = match duration.expiry {
            Some(Expiry::TurnStart) => at_origin_turn,
            Some(Expiry::TurnEnd) => !at_origin_turn && current_initiative < start_initiative,
            None => true,
        };
    }
    result
}
