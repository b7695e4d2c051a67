//! Persisted share configuration
//!
//! A slave stores its configuration under `flags.toolbelt.share.config`:
//! the id of its master plus one toggle per mirrored category.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use share_model::{ActorId, ActorKind, flags};

/// Flag key of the configuration blob
pub const CONFIG_FLAG: &str = "config";

/// Flag key of the configured master id
pub const MASTER_FLAG: &str = "config.master";

/// Mirrored categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareCategory {
    /// Hit points, both ways
    Health,
    /// Turn-start and turn-end processing while the master acts
    Turn,
    /// Skill proficiency ranks
    Skills,
    /// Hero points, both ways
    Hero,
    /// Weapon runes
    Weapon,
    /// Armor and bracer potency
    Armor,
}

impl ShareCategory {
    /// Categories a character slave may enable, in display order
    pub const CHARACTER: [ShareCategory; 6] = [
        ShareCategory::Health,
        ShareCategory::Turn,
        ShareCategory::Skills,
        ShareCategory::Hero,
        ShareCategory::Weapon,
        ShareCategory::Armor,
    ];

    /// Categories an NPC slave may enable, in display order
    pub const NPC: [ShareCategory; 3] = [
        ShareCategory::Health,
        ShareCategory::Turn,
        ShareCategory::Armor,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Turn => "turn",
            Self::Skills => "skills",
            Self::Hero => "hero",
            Self::Weapon => "weapon",
            Self::Armor => "armor",
        }
    }

    /// Categories available to an actor kind
    pub fn allowed_for(kind: ActorKind) -> &'static [ShareCategory] {
        match kind {
            ActorKind::Character => &Self::CHARACTER,
            ActorKind::Npc => &Self::NPC,
            _ => &[],
        }
    }

    /// Flag key of this category's toggle
    pub fn flag_key(&self) -> String {
        format!("{CONFIG_FLAG}.{}", self.key())
    }

    /// Localization key of the form label
    pub fn label(&self) -> String {
        format!("{}.{}.config.{}.label", flags::MODULE_ID, flags::TOOL, self.key())
    }

    /// Localization key of the form hint
    pub fn hint(&self) -> String {
        format!("{}.{}.config.{}.hint", flags::MODULE_ID, flags::TOOL, self.key())
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::CHARACTER.into_iter().find(|c| c.key() == s)
    }
}

impl fmt::Display for ShareCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Configuration blob of a slave
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master: Option<ActorId>,
    #[serde(default)]
    pub health: bool,
    #[serde(default)]
    pub turn: bool,
    #[serde(default)]
    pub skills: bool,
    #[serde(default)]
    pub hero: bool,
    #[serde(default)]
    pub weapon: bool,
    #[serde(default)]
    pub armor: bool,
}

impl ShareConfig {
    /// Parse a stored blob; malformed blobs read as absent
    pub fn from_flag(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Configured master id, if any and non-empty
    pub fn master_id(&self) -> Option<&ActorId> {
        self.master.as_ref().filter(|id| !id.is_empty())
    }

    /// Stored toggle, regardless of actor kind
    pub fn category(&self, category: ShareCategory) -> bool {
        match category {
            ShareCategory::Health => self.health,
            ShareCategory::Turn => self.turn,
            ShareCategory::Skills => self.skills,
            ShareCategory::Hero => self.hero,
            ShareCategory::Weapon => self.weapon,
            ShareCategory::Armor => self.armor,
        }
    }

    pub fn set(&mut self, category: ShareCategory, enabled: bool) {
        let toggle = match category {
            ShareCategory::Health => &mut self.health,
            ShareCategory::Turn => &mut self.turn,
            ShareCategory::Skills => &mut self.skills,
            ShareCategory::Hero => &mut self.hero,
            ShareCategory::Weapon => &mut self.weapon,
            ShareCategory::Armor => &mut self.armor,
        };
        *toggle = enabled;
    }

    /// Whether a category is on and available to `kind`
    ///
    /// A stored toggle for a category the kind cannot use is ignored.
    pub fn enabled(&self, category: ShareCategory, kind: ActorKind) -> bool {
        ShareCategory::allowed_for(kind).contains(&category) && self.category(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_parse_full_blob() {
        let config = ShareConfig::from_flag(&json!({
            "master": "m1",
            "health": true,
            "skills": true
        }))
        .unwrap();

        assert_eq!(config.master_id(), Some(&ActorId::new("m1")));
        assert!(config.health);
        assert!(config.skills);
        assert!(!config.turn);
    }

    #[test]
    fn test_malformed_blob_is_absent() {
        assert_eq!(ShareConfig::from_flag(&json!({"health": "yes"})), None);
        assert_eq!(ShareConfig::from_flag(&json!("m1")), None);
    }

    #[test]
    fn test_empty_master_is_none() {
        let config = ShareConfig::from_flag(&json!({"master": ""})).unwrap();
        assert_eq!(config.master_id(), None);
    }

    #[rstest]
    #[case(ShareCategory::Health, true)]
    #[case(ShareCategory::Turn, true)]
    #[case(ShareCategory::Armor, true)]
    #[case(ShareCategory::Skills, false)]
    #[case(ShareCategory::Hero, false)]
    #[case(ShareCategory::Weapon, false)]
    fn test_npc_categories(#[case] category: ShareCategory, #[case] expected: bool) {
        let mut config = ShareConfig::default();
        config.set(category, true);

        assert_eq!(config.enabled(category, ActorKind::Npc), expected);
        assert!(config.enabled(category, ActorKind::Character));
        assert!(!config.enabled(category, ActorKind::Familiar));
    }

    #[test]
    fn test_category_names() {
        assert_eq!(ShareCategory::parse("hero"), Some(ShareCategory::Hero));
        assert_eq!(ShareCategory::parse("mana"), None);
        assert_eq!(ShareCategory::Armor.flag_key(), "config.armor");
        assert_eq!(
            ShareCategory::Health.label(),
            "toolbelt.share.config.health.label"
        );
    }
}
