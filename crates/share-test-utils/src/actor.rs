//! [`ActorBuilder`] for share test scenarios.

use serde_json::{Map, Value, json};
use share_model::actor::{AbilityScore, SkillSource};
use share_model::{
    Actor, ActorId, ActorKind, ActorSource, ArmorRunes, ArmorSystem, Attribute, ConditionSystem,
    EffectSystem, EquipmentSystem, HitPoints, Item, ItemSystem, ProficiencyRank, RuleElement,
    Skill, ValueAndMax, WeaponRunes, WeaponSystem,
};

/// Fluent builder of world actors.
///
/// # Example
///
/// ```rust
/// use share_test_utils::ActorBuilder;
///
/// let wolf = ActorBuilder::npc("wolf")
///     .hp(20, 20)
///     .share("kyra", &["health", "turn"])
///     .build();
/// assert!(wolf.flag("config.health").is_some());
/// ```
pub struct ActorBuilder {
    id: ActorId,
    source: ActorSource,
}

impl ActorBuilder {
    /// A character with a linked prototype token, as player characters are.
    pub fn character(id: &str) -> Self {
        Self::new(id, ActorKind::Character).linked(true)
    }

    pub fn npc(id: &str) -> Self {
        Self::new(id, ActorKind::Npc)
    }

    pub fn familiar(id: &str) -> Self {
        Self::new(id, ActorKind::Familiar)
    }

    /// Named after its id, capitalised.
    pub fn new(id: &str, kind: ActorKind) -> Self {
        let mut name = id.to_string();
        if let Some(first) = name.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        Self {
            id: ActorId::new(id),
            source: ActorSource::new(name, kind),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.source.name = name.to_string();
        self
    }

    pub fn linked(mut self, linked: bool) -> Self {
        self.source.prototype_token.actor_link = linked;
        self
    }

    pub fn level(mut self, level: u8) -> Self {
        self.source.system.details.level = level;
        self
    }

    pub fn pack(mut self, pack: &str) -> Self {
        self.source.pack = Some(pack.to_string());
        self
    }

    pub fn with_trait(mut self, name: &str) -> Self {
        self.source.system.traits.value.push(name.to_string());
        self
    }

    pub fn hp(mut self, value: i32, max: i32) -> Self {
        self.source.system.attributes.hp = HitPoints {
            value,
            max,
            temp: 0,
        };
        self
    }

    pub fn hero_points(mut self, value: i32) -> Self {
        self.source.system.resources.hero_points = ValueAndMax { value, max: 3 };
        self
    }

    pub fn ability(mut self, attribute: Attribute, modifier: i32) -> Self {
        self.source
            .system
            .abilities
            .insert(attribute, AbilityScore { modifier });
        self
    }

    pub fn skill(mut self, skill: Skill, rank: ProficiencyRank) -> Self {
        self.source.system.skills.insert(skill, SkillSource { rank });
        self
    }

    pub fn rule(mut self, rule: RuleElement) -> Self {
        self.source.system.rules.push(rule);
        self
    }

    pub fn item(mut self, item: Item) -> Self {
        self.source.items.push(item);
        self
    }

    pub fn familiar_of(mut self, familiar: &str) -> Self {
        self.source.familiar = Some(ActorId::new(familiar));
        self
    }

    /// Share configuration naming `master` with the given category keys on.
    pub fn share(mut self, master: &str, categories: &[&str]) -> Self {
        let mut config = Map::new();
        config.insert("master".into(), Value::String(master.to_string()));
        for category in categories {
            config.insert((*category).to_string(), Value::Bool(true));
        }
        self.source.flags = json!({"toolbelt": {"share": {"config": config}}});
        self
    }

    /// Raw flags object, for malformed configurations.
    pub fn flags(mut self, flags: Value) -> Self {
        self.source.flags = flags;
        self
    }

    pub fn build(self) -> Actor {
        Actor::new(self.id, self.source)
    }
}

/// Invested weapon with a +1 potency rune.
pub fn weapon(id: &str, striking: u8, property: &[&str]) -> Item {
    Item::new(
        id,
        id,
        ItemSystem::Weapon(WeaponSystem {
            invested: true,
            runes: WeaponRunes {
                potency: 1,
                striking,
                property: property.iter().map(|p| p.to_string()).collect(),
            },
        }),
    )
}

/// Worn and invested armor.
pub fn armor(name: &str, potency: u8, resilient: u8) -> Item {
    Item::new(
        "armor",
        name,
        ItemSystem::Armor(ArmorSystem {
            worn: true,
            invested: true,
            runes: ArmorRunes { potency, resilient },
        }),
    )
}

/// Invested bands of force of the given slug.
pub fn bracers(slug: &str) -> Item {
    Item::new(
        slug,
        "Bands of Force",
        ItemSystem::Equipment(EquipmentSystem { invested: true }),
    )
    .with_slug(slug)
}

pub fn effect(id: &str, name: &str) -> Item {
    Item::new(id, name, ItemSystem::Effect(EffectSystem::default()))
}

pub fn condition(id: &str, name: &str, value: Option<u8>) -> Item {
    Item::new(
        id,
        name,
        ItemSystem::Condition(ConditionSystem {
            value,
            active: true,
        }),
    )
    .with_slug(name.to_lowercase())
}
