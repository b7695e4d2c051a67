//! Master-to-slave mirroring of prepared data
//!
//! Everything here reads the master's committed data and writes the slave's
//! in-flight prepared data. Nothing is persisted.

use share_model::{
    Actor, DeferredModifier, Item, Modifier, ModifierType, Skill, Statistic, WeaponRunes, sluggify,
};

/// Bands of force slugs, weakest first; the bonus is the position plus one
pub const BANDS_OF_FORCE_SLUGS: [&str; 3] =
    ["bands-of-force", "bands-of-force-greater", "bands-of-force-major"];

/// Selectors that receive the armor potency bonus
pub const POTENCY_SELECTORS: [&str; 2] = ["ac", "saving-throw"];

/// Best invested weapon of the master carrying property runes
///
/// Ranked by property rune count, then striking rune. Ties keep item order.
pub fn select_weapon(master: &Actor) -> Option<&Item> {
    master
        .weapons()
        .filter(|item| item.is_invested())
        .filter(|item| item.weapon().is_some_and(|w| !w.runes.property.is_empty()))
        .min_by_key(|item| {
            let runes = item.weapon().map(|w| &w.runes);
            (
                std::cmp::Reverse(runes.map_or(0, |r| r.property.len())),
                std::cmp::Reverse(runes.map_or(0, |r| r.striking)),
            )
        })
}

/// Copy potency, striking and property runes onto every weapon of a slave
///
/// Returns the number of weapons changed.
pub fn copy_weapon_runes(slave: &mut Actor, runes: &WeaponRunes) -> usize {
    let mut changed = 0;
    for item in &mut slave.items {
        if let Some(weapon) = item.weapon_mut() {
            weapon.runes = runes.clone();
            changed += 1;
        }
    }
    changed
}

/// One potency bonus ready to be injected into a slave's synthetics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PotencyBonus {
    pub selector: &'static str,
    pub label: String,
    pub slug: String,
    pub value: i32,
}

impl PotencyBonus {
    /// Deferred factory building the `potency` modifier
    pub fn into_modifier(self) -> DeferredModifier {
        DeferredModifier::new(move |params| {
            let mut modifier = Modifier::new(
                self.slug.clone(),
                self.label.clone(),
                self.value,
                ModifierType::Potency,
            );
            if let Some(options) = &params.test {
                modifier.test(options);
            }
            Some(modifier)
        })
    }
}

/// Highest ranked invested bands of force of the master, with their bonus
pub fn select_bracers(master: &Actor) -> Option<(&Item, i32)> {
    master
        .equipment()
        .filter(|item| item.is_invested())
        .filter_map(|item| {
            let slug = item.slug.as_deref()?;
            let index = BANDS_OF_FORCE_SLUGS.iter().position(|s| *s == slug)?;
            Some((item, index as i32 + 1))
        })
        .max_by_key(|(_, bonus)| *bonus)
}

/// Potency bonuses a slave receives from its master's armor and bracers
///
/// Per selector the larger of the armor rune and the bracer bonus wins. The
/// label follows the armor only when its rune is strictly larger. Selectors
/// where both are zero are skipped.
pub fn potency_bonuses(master: &Actor) -> Vec<PotencyBonus> {
    let armor = master
        .worn_armor()
        .filter(|item| item.is_invested())
        .and_then(|item| item.armor().map(|system| (item, system)));
    let bracers = select_bracers(master);
    let bracer_bonus = bracers.map_or(0, |(_, bonus)| bonus);

    POTENCY_SELECTORS
        .into_iter()
        .filter_map(|selector| {
            let armor_bonus = armor.map_or(0, |(_, system)| {
                i32::from(match selector {
                    "ac" => system.runes.potency,
                    _ => system.runes.resilient,
                })
            });
            if armor_bonus == 0 && bracer_bonus == 0 {
                return None;
            }
            let source = match (armor, bracers) {
                (Some((item, _)), _) if armor_bonus > bracer_bonus => item,
                (_, Some((item, _))) => item,
                (Some((item, _)), None) => item,
                (None, None) => return None,
            };
            Some(PotencyBonus {
                selector,
                label: source.name.clone(),
                slug: sluggify(&source.name),
                value: armor_bonus.max(bracer_bonus),
            })
        })
        .collect()
}

/// Raise a slave's skills to its master's ranks
///
/// Skills the slave is already better at are left alone. Returns the skills
/// that were rebuilt.
pub fn mirror_skills(slave: &mut Actor, master: &Actor) -> Vec<Skill> {
    let level = slave.level();
    let mut mirrored = Vec::new();
    for skill in Skill::ALL {
        let rank = master.skill_rank(skill);
        if slave.skill_rank(skill) > rank {
            continue;
        }
        let attribute_mod = slave.attribute_mod(skill.attribute());
        slave
            .data
            .skills
            .insert(skill, Statistic::skill(skill, level, attribute_mod, rank));
        mirrored.push(skill);
    }
    mirrored
}
