//! Host preparation phases
//!
//! The host rebuilds prepared data from the source on every pass. Base data
//! copies persisted values, derived data computes statistics and applies the
//! synthetic modifiers collected so far.

use share_model::{
    Actor, Attribute, DeferredValueParams, Modifier, ModifierType, PreparedData, Save, Skill,
    Statistic, stacked_total,
};

const BASE_AC: i32 = 10;

/// Reset prepared data from the source
pub fn prepare_base_data(actor: &mut Actor) {
    actor.items = actor.source.items.clone();
    actor.synthetics.clear();
    actor.data = PreparedData {
        hp: actor.source.system.attributes.hp,
        hero_points: actor.source.system.resources.hero_points,
        ..PreparedData::default()
    };
}

/// Compute skills, armor class and saving throws
pub fn prepare_derived_data(actor: &mut Actor) {
    let level = actor.level();
    actor.data.skills = Skill::ALL
        .into_iter()
        .map(|skill| {
            let attribute_mod = actor.attribute_mod(skill.attribute());
            let statistic = Statistic::skill(skill, level, attribute_mod, actor.source_rank(skill));
            (skill, statistic)
        })
        .collect();

    let params = DeferredValueParams::default();
    let armor = actor.worn_armor().and_then(|item| {
        item.armor()
            .map(|armor| (item.name.clone(), armor.runes.potency, armor.runes.resilient))
    });

    let mut ac_modifiers = vec![attribute_modifier(actor, Attribute::Dex)];
    if let Some((name, potency, _)) = &armor
        && *potency > 0
    {
        ac_modifiers.push(Modifier::new(
            "armor-potency",
            name.clone(),
            i32::from(*potency),
            ModifierType::Item,
        ));
    }
    ac_modifiers.extend(actor.synthetics.resolve("ac", &params));
    actor.data.ac = BASE_AC + stacked_total(&ac_modifiers);

    let synthetic_saves = actor.synthetics.resolve("saving-throw", &params);
    actor.data.saves = Save::ALL
        .into_iter()
        .map(|save| {
            let mut modifiers = vec![attribute_modifier(actor, save.attribute())];
            if let Some((name, _, resilient)) = &armor
                && *resilient > 0
            {
                modifiers.push(Modifier::new(
                    "armor-resilient",
                    name.clone(),
                    i32::from(*resilient),
                    ModifierType::Item,
                ));
            }
            modifiers.extend(synthetic_saves.iter().cloned());
            (save, stacked_total(&modifiers))
        })
        .collect();
}

fn attribute_modifier(actor: &Actor, attribute: Attribute) -> Modifier {
    Modifier::new(
        format!("{}-modifier", attribute),
        format!("PF2E.Ability.{}", attribute),
        actor.attribute_mod(attribute),
        ModifierType::Ability,
    )
}
