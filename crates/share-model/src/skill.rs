//! Attributes, skills, proficiency ranks and skill statistics

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::modifier::{Modifier, ModifierType};

/// The six character attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

impl Attribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Dex => "dex",
            Self::Con => "con",
            Self::Int => "int",
            Self::Wis => "wis",
            Self::Cha => "cha",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Proficiency rank, from untrained (0) to legendary (4)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum ProficiencyRank {
    #[default]
    Untrained,
    Trained,
    Expert,
    Master,
    Legendary,
}

impl ProficiencyRank {
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Proficiency bonus at the given creature level
    pub fn bonus(self, level: u8) -> i32 {
        match self {
            Self::Untrained => 0,
            rank => i32::from(level) + 2 * i32::from(rank.value()),
        }
    }
}

impl TryFrom<u8> for ProficiencyRank {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Untrained),
            1 => Ok(Self::Trained),
            2 => Ok(Self::Expert),
            3 => Ok(Self::Master),
            4 => Ok(Self::Legendary),
            other => Err(Error::InvalidRank { rank: other }),
        }
    }
}

impl From<ProficiencyRank> for u8 {
    fn from(rank: ProficiencyRank) -> Self {
        rank.value()
    }
}

/// The sixteen core skills
///
/// Source data keys skills by their three letter abbreviation; prepared
/// statistics are keyed by the long slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Skill {
    #[serde(rename = "acr")]
    Acrobatics,
    #[serde(rename = "arc")]
    Arcana,
    #[serde(rename = "ath")]
    Athletics,
    #[serde(rename = "cra")]
    Crafting,
    #[serde(rename = "dec")]
    Deception,
    #[serde(rename = "dip")]
    Diplomacy,
    #[serde(rename = "itm")]
    Intimidation,
    #[serde(rename = "med")]
    Medicine,
    #[serde(rename = "nat")]
    Nature,
    #[serde(rename = "occ")]
    Occultism,
    #[serde(rename = "prf")]
    Performance,
    #[serde(rename = "rel")]
    Religion,
    #[serde(rename = "soc")]
    Society,
    #[serde(rename = "ste")]
    Stealth,
    #[serde(rename = "sur")]
    Survival,
    #[serde(rename = "thi")]
    Thievery,
}

impl Skill {
    pub const ALL: [Skill; 16] = [
        Skill::Acrobatics,
        Skill::Arcana,
        Skill::Athletics,
        Skill::Crafting,
        Skill::Deception,
        Skill::Diplomacy,
        Skill::Intimidation,
        Skill::Medicine,
        Skill::Nature,
        Skill::Occultism,
        Skill::Performance,
        Skill::Religion,
        Skill::Society,
        Skill::Stealth,
        Skill::Survival,
        Skill::Thievery,
    ];

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::Acrobatics => "acr",
            Self::Arcana => "arc",
            Self::Athletics => "ath",
            Self::Crafting => "cra",
            Self::Deception => "dec",
            Self::Diplomacy => "dip",
            Self::Intimidation => "itm",
            Self::Medicine => "med",
            Self::Nature => "nat",
            Self::Occultism => "occ",
            Self::Performance => "prf",
            Self::Religion => "rel",
            Self::Society => "soc",
            Self::Stealth => "ste",
            Self::Survival => "sur",
            Self::Thievery => "thi",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Acrobatics => "acrobatics",
            Self::Arcana => "arcana",
            Self::Athletics => "athletics",
            Self::Crafting => "crafting",
            Self::Deception => "deception",
            Self::Diplomacy => "diplomacy",
            Self::Intimidation => "intimidation",
            Self::Medicine => "medicine",
            Self::Nature => "nature",
            Self::Occultism => "occultism",
            Self::Performance => "performance",
            Self::Religion => "religion",
            Self::Society => "society",
            Self::Stealth => "stealth",
            Self::Survival => "survival",
            Self::Thievery => "thievery",
        }
    }

    /// Localization key of the skill label
    pub fn label(&self) -> String {
        format!("PF2E.Skill.{}", capitalize(self.slug()))
    }

    /// Key attribute of the skill
    pub fn attribute(&self) -> Attribute {
        match self {
            Self::Acrobatics | Self::Stealth | Self::Thievery => Attribute::Dex,
            Self::Athletics => Attribute::Str,
            Self::Arcana | Self::Crafting | Self::Occultism | Self::Society => Attribute::Int,
            Self::Medicine | Self::Nature | Self::Religion | Self::Survival => Attribute::Wis,
            Self::Deception | Self::Diplomacy | Self::Intimidation | Self::Performance => {
                Attribute::Cha
            }
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Skill {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Skill::ALL
            .into_iter()
            .find(|skill| skill.slug() == s || skill.abbreviation() == s)
            .ok_or_else(|| Error::UnknownSkill {
                skill: s.to_string(),
            })
    }
}

/// A prepared skill statistic and its trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistic {
    pub slug: String,
    pub label: String,
    pub attribute: Attribute,
    pub rank: ProficiencyRank,
    pub domains: Vec<String>,
    pub modifiers: Vec<Modifier>,
    /// Total check modifier
    #[serde(rename = "mod")]
    pub total: i32,
}

impl Statistic {
    /// Build a skill statistic for a creature
    ///
    /// The attribute modifier always comes from the creature that owns the
    /// statistic. Only the rank may come from elsewhere.
    pub fn skill(skill: Skill, level: u8, attribute_mod: i32, rank: ProficiencyRank) -> Self {
        let attribute = skill.attribute();
        let modifiers = vec![
            Modifier::new(
                format!("{}-modifier", attribute),
                format!("PF2E.Ability.{}", attribute),
                attribute_mod,
                ModifierType::Ability,
            ),
            Modifier::new(
                "proficiency",
                "PF2E.ProficiencyLabel",
                rank.bonus(level),
                ModifierType::Proficiency,
            ),
        ];
        let total = modifiers.iter().filter(|m| m.enabled).map(|m| m.modifier).sum();

        Self {
            slug: skill.slug().to_string(),
            label: skill.label(),
            attribute,
            rank,
            domains: vec![
                skill.slug().to_string(),
                format!("{}-based", attribute),
                "skill-check".to_string(),
                "all".to_string(),
            ],
            modifiers,
            total,
        }
    }
}
