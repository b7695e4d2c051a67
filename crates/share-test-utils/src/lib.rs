//! Shared test utilities for the share workspace.
//!
//! Fixtures for actors, items and worlds used across crate test suites. It
//! is a dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`actor`] - [`ActorBuilder`] and item constructors
//! - [`faulty`] - [`FaultyWorld`], a world that fails on chosen actors
//! - [`world`] - ready-made [`share_host::MemoryWorld`] parties

pub mod actor;
pub mod faulty;
pub mod world;

pub use actor::{ActorBuilder, armor, bracers, condition, effect, weapon};
pub use faulty::FaultyWorld;
pub use world::{PartyWorld, party};
