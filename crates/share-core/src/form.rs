//! Creature configuration form
//!
//! The data behind the share dialog of a character or NPC sheet, and the
//! conversion of a submitted form into one persisted flag update.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use share_host::World;
use share_model::{Actor, ActorId, flags, patch};

use crate::access::{config_of, configured_master_id, is_valid_master};
use crate::config::{CONFIG_FLAG, MASTER_FLAG, ShareCategory};
use crate::engine::SyncEngine;

/// One selectable master
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MasterOption {
    pub value: ActorId,
    pub label: String,
}

/// Toggle of one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    pub category: ShareCategory,
    pub label: String,
    pub hint: String,
    pub checked: bool,
    /// Form input name, the full flag path of the toggle
    pub input: String,
}

/// Configuration form of one creature
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigForm {
    /// Form input name of the master selector
    pub master_input: String,
    /// Currently stored master id, whether valid or not
    pub master_id: Option<ActorId>,
    pub masters: Vec<MasterOption>,
    pub groups: Vec<CategoryGroup>,
}

impl ConfigForm {
    /// Build the form for `actor`
    ///
    /// Only the game master configures sharing, and only on played creatures.
    /// An actor that already has slaves cannot pick a master, which keeps
    /// master chains out of the form.
    pub fn build<W>(engine: &SyncEngine, world: &W, actor: &Actor) -> Option<Self>
    where
        W: World + ?Sized,
    {
        if !world.is_gm() || actor.id.is_empty() || actor.source.pack.is_some() {
            return None;
        }
        if !actor.is_creature() {
            return None;
        }

        let masters = if engine.slaves_of(world, actor, None).is_empty() {
            world
                .actor_ids()
                .iter()
                .filter_map(|id| world.actor(id))
                .filter(|candidate| is_valid_master(candidate, Some(&actor.id)))
                .map(|candidate| MasterOption {
                    value: candidate.id.clone(),
                    label: candidate.name().to_string(),
                })
                .collect()
        } else {
            Vec::new()
        };

        let config = config_of(actor).unwrap_or_default();
        let groups = ShareCategory::allowed_for(actor.kind())
            .iter()
            .map(|&category| CategoryGroup {
                category,
                label: category.label(),
                hint: category.hint(),
                checked: config.category(category),
                input: flags::flag_path(&category.flag_key()),
            })
            .collect();

        Some(Self {
            master_input: flags::flag_path(MASTER_FLAG),
            master_id: configured_master_id(actor),
            masters,
            groups,
        })
    }
}

/// Values submitted through the configuration form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSubmission {
    /// Selected master, `None` or empty to unlink
    #[serde(default)]
    pub master: Option<ActorId>,
    #[serde(default)]
    pub categories: BTreeMap<ShareCategory, bool>,
}

impl ConfigSubmission {
    /// The single change persisting this submission
    pub fn into_change(self) -> Value {
        let mut config = Map::new();
        for (category, checked) in self.categories {
            config.insert(category.key().to_string(), Value::Bool(checked));
        }
        match self.master.filter(|id| !id.is_empty()) {
            Some(id) => config.insert("master".to_string(), Value::String(id.to_string())),
            None => config.insert(patch::deletion_key("master"), Value::Null),
        };
        patch::nested(&flags::flag_path(CONFIG_FLAG), Value::Object(config))
    }
}
