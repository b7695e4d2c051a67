//! Modifiers and deferred modifier factories
//!
//! Rule processing appends deferred factories to an actor's synthetic
//! modifier lists. The host invokes them later, while building checks.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Bonus or penalty category, used for stacking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierType {
    Ability,
    Proficiency,
    Circumstance,
    Item,
    Potency,
    Status,
    Untyped,
}

/// A single numeric modifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    pub slug: String,
    pub label: String,
    pub modifier: i32,
    #[serde(rename = "type")]
    pub kind: ModifierType,
    /// Roll options that must all be present for the modifier to apply
    #[serde(default)]
    pub predicate: Vec<String>,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

fn enabled_default() -> bool {
    true
}

impl Modifier {
    pub fn new(
        slug: impl Into<String>,
        label: impl Into<String>,
        modifier: i32,
        kind: ModifierType,
    ) -> Self {
        Self {
            slug: slug.into(),
            label: label.into(),
            modifier,
            kind,
            predicate: Vec::new(),
            enabled: true,
        }
    }

    /// Re-evaluate `enabled` against a set of roll options
    pub fn test(&mut self, roll_options: &[String]) {
        self.enabled = self
            .predicate
            .iter()
            .all(|option| roll_options.contains(option));
    }
}

/// Total of a modifier list after stacking rules
///
/// Typed bonuses of the same type do not stack: only the highest bonus and
/// the lowest penalty of each type count. Untyped modifiers always stack.
pub fn stacked_total(modifiers: &[Modifier]) -> i32 {
    let mut untyped = 0;
    let mut bonuses: BTreeMap<ModifierType, i32> = BTreeMap::new();
    let mut penalties: BTreeMap<ModifierType, i32> = BTreeMap::new();

    for modifier in modifiers.iter().filter(|m| m.enabled) {
        if modifier.kind == ModifierType::Untyped {
            untyped += modifier.modifier;
        } else if modifier.modifier >= 0 {
            let best = bonuses.entry(modifier.kind).or_insert(0);
            *best = (*best).max(modifier.modifier);
        } else {
            let worst = penalties.entry(modifier.kind).or_insert(0);
            *worst = (*worst).min(modifier.modifier);
        }
    }

    untyped + bonuses.values().sum::<i32>() + penalties.values().sum::<i32>()
}

/// Parameters handed to a deferred modifier factory
#[derive(Debug, Clone, Default)]
pub struct DeferredValueParams {
    /// Roll options to test the produced modifier against
    pub test: Option<Vec<String>>,
}

type ModifierFactory = dyn Fn(&DeferredValueParams) -> Option<Modifier> + Send + Sync;

/// A modifier produced lazily at check-building time
#[derive(Clone)]
pub struct DeferredModifier(Arc<ModifierFactory>);

impl DeferredModifier {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&DeferredValueParams) -> Option<Modifier> + Send + Sync + 'static,
    {
        Self(Arc::new(factory))
    }

    pub fn resolve(&self, params: &DeferredValueParams) -> Option<Modifier> {
        (self.0)(params)
    }
}

impl fmt::Debug for DeferredModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DeferredModifier")
    }
}

/// Synthetic modifier lists keyed by selector (`ac`, `saving-throw`, ...)
#[derive(Debug, Clone, Default)]
pub struct Synthetics {
    modifiers: BTreeMap<String, Vec<DeferredModifier>>,
}

impl Synthetics {
    pub fn push(&mut self, selector: impl Into<String>, modifier: DeferredModifier) {
        self.modifiers.entry(selector.into()).or_default().push(modifier);
    }

    pub fn get(&self, selector: &str) -> &[DeferredModifier] {
        self.modifiers.get(selector).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolve every factory registered under `selector`
    pub fn resolve(&self, selector: &str, params: &DeferredValueParams) -> Vec<Modifier> {
        self.get(selector)
            .iter()
            .filter_map(|factory| factory.resolve(params))
            .collect()
    }

    pub fn clear(&mut self) {
        self.modifiers.clear();
    }
}

/// Lower-case, dash separated slug of a label
pub fn sluggify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    for c in label.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
