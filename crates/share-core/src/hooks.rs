//! Interception points
//!
//! The share tool runs inside the host's own phases. Each place it hooks into
//! is a [`Phase`] (wrapped around, or overriding, a host computation) or a
//! [`HookEvent`] (a lifecycle notification it listens to). All of them are
//! registered up front and switched on or off together from the `enabled`
//! setting.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How an interception point relates to the host computation it replaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WrapMode {
    /// Runs before or after the host computation, which always runs
    Wrapper,
    /// Replaces the host computation while active
    Override,
}

/// Host computations the tool wraps or overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Creature configuration sheet
    ConfigSheetRender,
    /// After the host's base data
    ActorPrepareBaseData,
    /// Before the host's derived data
    ActorPrepareDerivedData,
    /// After the full preparation
    ActorPrepareData,
    /// Weapon rune copy of character slaves
    WeaponPrepareBaseData,
    /// After the host's combatant turn start
    CombatantStartTurn,
    /// After the host's combatant turn end
    CombatantEndTurn,
    /// Encounter-wide actor reset
    EncounterResetActors,
    /// Remaining duration of effects
    EffectRemainingDuration,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigSheetRender => write!(f, "config-sheet-render"),
            Self::ActorPrepareBaseData => write!(f, "actor-prepare-base-data"),
            Self::ActorPrepareDerivedData => write!(f, "actor-prepare-derived-data"),
            Self::ActorPrepareData => write!(f, "actor-prepare-data"),
            Self::WeaponPrepareBaseData => write!(f, "weapon-prepare-base-data"),
            Self::CombatantStartTurn => write!(f, "combatant-start-turn"),
            Self::CombatantEndTurn => write!(f, "combatant-end-turn"),
            Self::EncounterResetActors => write!(f, "encounter-reset-actors"),
            Self::EffectRemainingDuration => write!(f, "effect-remaining-duration"),
        }
    }
}

impl Phase {
    pub const ALL: [Phase; 9] = [
        Phase::ConfigSheetRender,
        Phase::ActorPrepareBaseData,
        Phase::ActorPrepareDerivedData,
        Phase::ActorPrepareData,
        Phase::WeaponPrepareBaseData,
        Phase::CombatantStartTurn,
        Phase::CombatantEndTurn,
        Phase::EncounterResetActors,
        Phase::EffectRemainingDuration,
    ];

    pub fn mode(&self) -> WrapMode {
        match self {
            Self::EncounterResetActors | Self::EffectRemainingDuration => WrapMode::Override,
            _ => WrapMode::Wrapper,
        }
    }

    /// Parse a phase from its kebab-case name
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|phase| phase.to_string() == s)
    }

    /// List all valid phase names
    pub fn all_names() -> &'static [&'static str] {
        &[
            "config-sheet-render",
            "actor-prepare-base-data",
            "actor-prepare-derived-data",
            "actor-prepare-data",
            "weapon-prepare-base-data",
            "combatant-start-turn",
            "combatant-end-turn",
            "encounter-reset-actors",
            "effect-remaining-duration",
        ]
    }
}

/// Lifecycle events the tool listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookEvent {
    /// A document's source was updated
    UpdateActor,
    /// A world actor was deleted
    DeleteActor,
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpdateActor => write!(f, "update-actor"),
            Self::DeleteActor => write!(f, "delete-actor"),
        }
    }
}

impl HookEvent {
    /// Parse a hook event from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "update-actor" => Some(Self::UpdateActor),
            "delete-actor" => Some(Self::DeleteActor),
            _ => None,
        }
    }

    /// List all valid event names
    pub fn all_names() -> &'static [&'static str] {
        &["update-actor", "delete-actor"]
    }
}

/// Registry of active interception points
#[derive(Debug, Clone, Default)]
pub struct Interceptors {
    phases: BTreeSet<Phase>,
    events: BTreeSet<HookEvent>,
}

impl Interceptors {
    /// Registry with every point inactive
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate or deactivate every phase and event at once
    pub fn toggle_all(&mut self, enabled: bool) {
        if enabled {
            self.phases.extend(Phase::ALL);
            self.events.extend([HookEvent::UpdateActor, HookEvent::DeleteActor]);
        } else {
            self.phases.clear();
            self.events.clear();
        }
    }

    pub fn toggle_phase(&mut self, phase: Phase, enabled: bool) {
        if enabled {
            self.phases.insert(phase);
        } else {
            self.phases.remove(&phase);
        }
    }

    pub fn toggle_event(&mut self, event: HookEvent, enabled: bool) {
        if enabled {
            self.events.insert(event);
        } else {
            self.events.remove(&event);
        }
    }

    pub fn is_active(&self, phase: Phase) -> bool {
        self.phases.contains(&phase)
    }

    pub fn is_listening(&self, event: HookEvent) -> bool {
        self.events.contains(&event)
    }

    pub fn active_phases(&self) -> impl Iterator<Item = Phase> + '_ {
        self.phases.iter().copied()
    }
}
