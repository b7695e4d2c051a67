//! Scenario files
//!
//! A scenario describes a world (actors, scenes, an optional encounter) and
//! the steps to replay against it:
//!
//! ```toml
//! [share]
//! enabled = true
//!
//! [[actors]]
//! id = "kyra"
//! [actors.source]
//! name = "Kyra"
//! type = "character"
//! prototypeToken = { actorLink = true }
//!
//! [[scenes]]
//! id = "arena"
//! name = "Arena"
//! tokens = [{ id = "t-kyra", actor = "kyra" }]
//!
//! [[steps]]
//! action = "update"
//! target = "kyra"
//! changes = { "system.attributes.hp.value" = 12 }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use share_core::{ShareCategory, ShareSettings};
use share_host::{MemoryWorld, Scene, TokenPlacement};
use share_model::{Actor, ActorId, ActorIdentity, ActorSource, CombatantId, ItemId, SceneId};

use crate::error::{CliError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub share: ShareSettings,
    #[serde(default)]
    pub actors: Vec<ActorSpec>,
    #[serde(default)]
    pub scenes: Vec<SceneSpec>,
    #[serde(default)]
    pub encounter: Option<EncounterSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActorSpec {
    /// Generated when absent
    #[serde(default)]
    pub id: Option<ActorId>,
    pub source: ActorSource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneSpec {
    pub id: SceneId,
    pub name: String,
    #[serde(default)]
    pub tokens: Vec<TokenPlacement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EncounterSpec {
    pub scene: SceneId,
    #[serde(default)]
    pub round: Option<i64>,
    #[serde(default)]
    pub combatants: Vec<CombatantSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CombatantSpec {
    pub id: CombatantId,
    /// Actor id, or `scene/token`
    pub actor: String,
    #[serde(default)]
    pub initiative: Option<i32>,
}

/// One replayed action
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
    Prepare {
        target: String,
    },
    Update {
        target: String,
        changes: Value,
    },
    Delete {
        actor: ActorId,
    },
    StartTurn {
        combatant: CombatantId,
    },
    EndTurn {
        combatant: CombatantId,
    },
    ResetEncounter,
    Configure {
        target: String,
        #[serde(default)]
        master: Option<ActorId>,
        #[serde(default)]
        categories: BTreeMap<ShareCategory, bool>,
    },
    Duration {
        target: String,
        effect: ItemId,
    },
}

impl Scenario {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::user(format!(
                "Scenario not found: {}",
                path.display()
            )));
        }
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Build the in-memory world this scenario starts from
    pub fn build_world(&self) -> Result<MemoryWorld> {
        let mut world = MemoryWorld::new();
        for spec in &self.actors {
            match &spec.id {
                Some(id) => world.insert_actor(Actor::new(id.clone(), spec.source.clone()))?,
                None => {
                    world.create_actor(spec.source.clone());
                }
            }
        }

        for spec in &self.scenes {
            world.add_scene(Scene::new(spec.id.clone(), spec.name.clone()));
            for placement in &spec.tokens {
                world.place_token(
                    &spec.id,
                    placement.id.clone(),
                    &placement.actor,
                    placement.linked,
                )?;
            }
        }

        if let Some(spec) = &self.encounter {
            let encounter = world.start_encounter(&spec.scene)?;
            if let Some(round) = spec.round {
                encounter.round = round;
            }
            for combatant in &spec.combatants {
                world.add_combatant(
                    combatant.id.clone(),
                    parse_target(&combatant.actor)?,
                    combatant.initiative,
                )?;
            }
        }
        Ok(world)
    }
}

/// Parse `actor-id` or `scene/token`
pub fn parse_target(target: &str) -> Result<ActorIdentity> {
    match target.split_once('/') {
        Some((scene, token)) if !scene.is_empty() && !token.is_empty() => {
            Ok(ActorIdentity::token_bound(scene, token))
        }
        Some(_) => Err(CliError::user(format!("Invalid target: {target}"))),
        None if target.is_empty() => Err(CliError::user("Empty target")),
        None => Ok(ActorIdentity::persistent(target)),
    }
}
