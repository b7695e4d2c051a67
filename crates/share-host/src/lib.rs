//! Host document model for the actor share tool
//!
//! The share engine talks to its host exclusively through the [`World`]
//! trait. [`MemoryWorld`] is a complete in-memory host used by the scenario
//! runner and the test suites.

pub mod duration;
pub mod encounter;
pub mod error;
pub mod memory;
pub mod prepare;
pub mod scene;
pub mod world;

pub use encounter::{Combatant, Encounter};
pub use error::{Error, Result};
pub use memory::{JournalEntry, MemoryWorld};
pub use scene::{Scene, Token, TokenPlacement};
pub use world::{EncounterEvent, HostEvent, RemainingDuration, ResetOptions, World};
