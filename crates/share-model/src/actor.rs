//! Actor documents
//!
//! An [`Actor`] carries its persisted [`ActorSource`] plus the data derived
//! from it on every preparation pass. Prepared data is disposable: a reset
//! rebuilds it from the source.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::flags;
use crate::patch;
use crate::ids::{ActorId, TokenRef};
use crate::item::Item;
use crate::modifier::Synthetics;
use crate::skill::{Attribute, ProficiencyRank, Skill, Statistic};

/// Actor document type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    Character,
    Npc,
    Familiar,
    Hazard,
    Loot,
    Vehicle,
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Character => "character",
            Self::Npc => "npc",
            Self::Familiar => "familiar",
            Self::Hazard => "hazard",
            Self::Loot => "loot",
            Self::Vehicle => "vehicle",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPoints {
    pub value: i32,
    pub max: i32,
    #[serde(default)]
    pub temp: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueAndMax {
    pub value: i32,
    pub max: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrototypeToken {
    #[serde(default)]
    pub actor_link: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Details {
    #[serde(default)]
    pub level: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Traits {
    #[serde(default)]
    pub value: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScore {
    #[serde(rename = "mod")]
    pub modifier: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(default)]
    pub hp: HitPoints,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resources {
    #[serde(default)]
    pub hero_points: ValueAndMax,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSource {
    #[serde(default)]
    pub rank: ProficiencyRank,
}

/// Rule elements with encounter behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "key")]
pub enum RuleElement {
    /// Regain hit points at the start of each turn
    FastHealing { value: i32 },
    /// Free-form note, inert during encounters
    Note { text: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemSource {
    #[serde(default)]
    pub details: Details,
    #[serde(default)]
    pub traits: Traits,
    #[serde(default)]
    pub abilities: BTreeMap<Attribute, AbilityScore>,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub resources: Resources,
    #[serde(default)]
    pub skills: BTreeMap<Skill, SkillSource>,
    #[serde(default)]
    pub rules: Vec<RuleElement>,
}

/// Persisted actor data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorSource {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ActorKind,
    /// Compendium the document belongs to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack: Option<String>,
    #[serde(default)]
    pub prototype_token: PrototypeToken,
    #[serde(default)]
    pub system: SystemSource,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub familiar: Option<ActorId>,
    #[serde(default = "empty_flags")]
    pub flags: Value,
}

fn empty_flags() -> Value {
    Value::Object(Default::default())
}

impl ActorSource {
    pub fn new(name: impl Into<String>, kind: ActorKind) -> Self {
        Self {
            name: name.into(),
            kind,
            pack: None,
            prototype_token: PrototypeToken::default(),
            system: SystemSource::default(),
            items: Vec::new(),
            familiar: None,
            flags: empty_flags(),
        }
    }
}

/// Saving throws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Save {
    Fortitude,
    Reflex,
    Will,
}

impl Save {
    pub const ALL: [Save; 3] = [Save::Fortitude, Save::Reflex, Save::Will];

    pub fn attribute(&self) -> Attribute {
        match self {
            Self::Fortitude => Attribute::Con,
            Self::Reflex => Attribute::Dex,
            Self::Will => Attribute::Wis,
        }
    }
}

/// Data derived on each preparation pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedData {
    pub hp: HitPoints,
    pub hero_points: ValueAndMax,
    pub skills: BTreeMap<Skill, Statistic>,
    pub ac: i32,
    pub saves: BTreeMap<Save, i32>,
}

/// A live actor instance
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: ActorId,
    /// Token owning this instance, for token-bound actors
    pub token: Option<TokenRef>,
    pub source: ActorSource,
    /// Prepared copies of the embedded items
    pub items: Vec<Item>,
    pub data: PreparedData,
    pub synthetics: Synthetics,
}

impl Actor {
    pub fn new(id: impl Into<ActorId>, source: ActorSource) -> Self {
        Self {
            id: id.into(),
            token: None,
            items: source.items.clone(),
            source,
            data: PreparedData::default(),
            synthetics: Synthetics::default(),
        }
    }

    /// Deep-merge a depth-partial change into the persisted source
    ///
    /// Dotted keys are expanded first. Prepared data is left untouched until
    /// the next preparation pass.
    pub fn apply_change(&mut self, changed: &Value) -> crate::Result<()> {
        let mut source = serde_json::to_value(&self.source)?;
        patch::merge_object(&mut source, &patch::expand_object(changed.clone()));
        self.source = serde_json::from_value(source)?;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.source.name
    }

    pub fn kind(&self) -> ActorKind {
        self.source.kind
    }

    pub fn is_of_type(&self, kinds: &[ActorKind]) -> bool {
        kinds.contains(&self.source.kind)
    }

    pub fn is_character(&self) -> bool {
        self.kind() == ActorKind::Character
    }

    /// Characters and NPCs, the only actors that take part in sharing
    pub fn is_creature(&self) -> bool {
        self.is_of_type(&[ActorKind::Character, ActorKind::Npc])
    }

    pub fn level(&self) -> u8 {
        self.source.system.details.level
    }

    pub fn has_trait(&self, name: &str) -> bool {
        self.source.system.traits.value.iter().any(|t| t == name)
    }

    pub fn attribute_mod(&self, attribute: Attribute) -> i32 {
        self.source
            .system
            .abilities
            .get(&attribute)
            .map(|score| score.modifier)
            .unwrap_or(0)
    }

    /// Rank recorded in the source data
    pub fn source_rank(&self, skill: Skill) -> ProficiencyRank {
        self.source
            .system
            .skills
            .get(&skill)
            .map(|s| s.rank)
            .unwrap_or_default()
    }

    /// Rank of the prepared statistic, falling back to the source rank
    pub fn skill_rank(&self, skill: Skill) -> ProficiencyRank {
        self.data
            .skills
            .get(&skill)
            .map(|s| s.rank)
            .unwrap_or_else(|| self.source_rank(skill))
    }

    /// Read a tool flag (`flags.toolbelt.share.<key>`)
    pub fn flag(&self, key: &str) -> Option<&Value> {
        flags::get_flag(&self.source.flags, key)
    }

    pub fn weapons(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| item.weapon().is_some())
    }

    pub fn worn_armor(&self) -> Option<&Item> {
        self.items
            .iter()
            .find(|item| item.armor().is_some_and(|armor| armor.worn))
    }

    pub fn equipment(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| item.is_equipment())
    }

    pub fn effects(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| item.effect().is_some())
    }

    pub fn active_conditions(&self) -> impl Iterator<Item = &Item> {
        self.items
            .iter()
            .filter(|item| item.condition().is_some_and(|c| c.active))
    }
}
