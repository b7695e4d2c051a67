//! Encounters and combatants

use serde::{Deserialize, Serialize};

use share_model::{ActorIdentity, CombatantId, SceneId};

/// A creature seated in an encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub actor: ActorIdentity,
    #[serde(default)]
    pub initiative: Option<i32>,
}

/// The active combat encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    pub scene: SceneId,
    #[serde(default = "first_round")]
    pub round: i64,
    /// Index of the combatant whose turn it is
    #[serde(default)]
    pub turn: usize,
    /// Combatants in turn order
    #[serde(default)]
    pub combatants: Vec<Combatant>,
}

fn first_round() -> i64 {
    1
}

impl Encounter {
    pub fn new(scene: impl Into<SceneId>) -> Self {
        Self {
            scene: scene.into(),
            round: first_round(),
            turn: 0,
            combatants: Vec::new(),
        }
    }

    /// Seat a combatant, keeping turn order by initiative (highest first)
    pub fn add_combatant(&mut self, combatant: Combatant) {
        let position = self
            .combatants
            .iter()
            .position(|seated| seated.initiative < combatant.initiative)
            .unwrap_or(self.combatants.len());
        self.combatants.insert(position, combatant);
    }

    pub fn combatant(&self, id: &CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| &c.id == id)
    }

    /// The combatant seated for an actor instance
    pub fn combatant_for(&self, actor: &ActorIdentity) -> Option<&Combatant> {
        self.combatants.iter().find(|c| &c.actor == actor)
    }

    pub fn is_seated(&self, actor: &ActorIdentity) -> bool {
        self.combatant_for(actor).is_some()
    }

    /// Move the turn marker to a combatant
    pub fn set_turn(&mut self, id: &CombatantId) -> bool {
        match self.combatants.iter().position(|c| &c.id == id) {
            Some(index) => {
                self.turn = index;
                true
            }
            None => false,
        }
    }
}
