//! Document model for the actor share tool
//!
//! This crate holds the host documents the share engine reads and writes:
//! actors with their persisted source and prepared data, embedded items,
//! skills, modifiers, and the dotted-path helpers used for partial updates.

pub mod actor;
pub mod error;
pub mod flags;
pub mod ids;
pub mod item;
pub mod modifier;
pub mod patch;
pub mod skill;

pub use actor::{
    Actor, ActorKind, ActorSource, HitPoints, PreparedData, RuleElement, Save, ValueAndMax,
};
pub use error::{Error, Result};
pub use ids::{ActorId, ActorIdentity, CombatantId, ItemId, SceneId, TokenId, TokenRef};
pub use item::{
    ArmorRunes, ArmorSystem, ConditionSystem, DurationUnit, EffectDuration, EffectStart,
    EffectSystem, EquipmentSystem, Expiry, Item, ItemSystem, WeaponRunes, WeaponSystem,
};
pub use modifier::{
    DeferredModifier, DeferredValueParams, Modifier, ModifierType, Synthetics, sluggify,
    stacked_total,
};
pub use skill::{Attribute, ProficiencyRank, Skill, Statistic};
