//! Embedded items: weapons, armor, equipment, effects and conditions

use serde::{Deserialize, Serialize};

use crate::ids::ItemId;

/// An item embedded in an actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub system: ItemSystem,
}

/// Type-specific item data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemSystem {
    Weapon(WeaponSystem),
    Armor(ArmorSystem),
    Equipment(EquipmentSystem),
    Effect(EffectSystem),
    Condition(ConditionSystem),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeaponRunes {
    #[serde(default)]
    pub potency: u8,
    #[serde(default)]
    pub striking: u8,
    #[serde(default)]
    pub property: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeaponSystem {
    #[serde(default)]
    pub invested: bool,
    #[serde(default)]
    pub runes: WeaponRunes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmorRunes {
    #[serde(default)]
    pub potency: u8,
    #[serde(default)]
    pub resilient: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmorSystem {
    #[serde(default)]
    pub worn: bool,
    #[serde(default)]
    pub invested: bool,
    #[serde(default)]
    pub runes: ArmorRunes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSystem {
    #[serde(default)]
    pub invested: bool,
}

/// When in a turn an effect expires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Expiry {
    TurnStart,
    TurnEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Rounds,
    Minutes,
    Hours,
    Days,
    Unlimited,
    Encounter,
}

impl DurationUnit {
    /// Length of one unit in rounds, if the unit is finite
    pub fn rounds(self) -> Option<i64> {
        match self {
            Self::Rounds => Some(1),
            Self::Minutes => Some(10),
            Self::Hours => Some(600),
            Self::Days => Some(14_400),
            Self::Unlimited | Self::Encounter => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectDuration {
    pub value: i64,
    pub unit: DurationUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<Expiry>,
}

impl Default for EffectDuration {
    fn default() -> Self {
        Self {
            value: -1,
            unit: DurationUnit::Unlimited,
            expiry: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectStart {
    /// Encounter round the effect started in
    #[serde(default)]
    pub round: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiative: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectSystem {
    #[serde(default)]
    pub duration: EffectDuration,
    #[serde(default)]
    pub start: EffectStart,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSystem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u8>,
    #[serde(default = "active_default")]
    pub active: bool,
}

fn active_default() -> bool {
    true
}

impl Default for ConditionSystem {
    fn default() -> Self {
        Self {
            value: None,
            active: true,
        }
    }
}

impl Item {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, system: ItemSystem) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: None,
            system,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn is_invested(&self) -> bool {
        match &self.system {
            ItemSystem::Weapon(weapon) => weapon.invested,
            ItemSystem::Armor(armor) => armor.invested,
            ItemSystem::Equipment(equipment) => equipment.invested,
            ItemSystem::Effect(_) | ItemSystem::Condition(_) => false,
        }
    }

    pub fn weapon(&self) -> Option<&WeaponSystem> {
        match &self.system {
            ItemSystem::Weapon(weapon) => Some(weapon),
            _ => None,
        }
    }

    pub fn weapon_mut(&mut self) -> Option<&mut WeaponSystem> {
        match &mut self.system {
            ItemSystem::Weapon(weapon) => Some(weapon),
            _ => None,
        }
    }

    pub fn armor(&self) -> Option<&ArmorSystem> {
        match &self.system {
            ItemSystem::Armor(armor) => Some(armor),
            _ => None,
        }
    }

    pub fn effect(&self) -> Option<&EffectSystem> {
        match &self.system {
            ItemSystem::Effect(effect) => Some(effect),
            _ => None,
        }
    }

    pub fn condition(&self) -> Option<&ConditionSystem> {
        match &self.system {
            ItemSystem::Condition(condition) => Some(condition),
            _ => None,
        }
    }

    pub fn is_equipment(&self) -> bool {
        matches!(self.system, ItemSystem::Equipment(_))
    }
}
