//! Master/slave actor synchronization
//!
//! A slave actor names a master character in its share configuration and
//! picks categories (health, turn, skills, hero points, weapon runes, armor
//! potency) to mirror from it. The [`SyncEngine`] keeps the relationships and
//! does the mirroring; the [`Session`] drives it from the host's phases and
//! lifecycle events.

pub mod access;
pub mod config;
pub mod duration;
pub mod engine;
pub mod error;
pub mod form;
pub mod hooks;
pub mod identity;
pub mod logging;
pub mod mirror;
pub mod session;
pub mod settings;
pub mod store;
pub mod turn;

pub use access::{config_of, is_valid_master, is_valid_slave, master_and_config_of, master_of};
pub use config::{ShareCategory, ShareConfig};
pub use engine::{PassRole, SyncEngine};
pub use error::{Error, Result};
pub use form::{CategoryGroup, ConfigForm, ConfigSubmission, MasterOption};
pub use hooks::{HookEvent, Interceptors, Phase, WrapMode};
pub use identity::{identity_of, same_identity};
pub use session::{MAX_SETTLE_VISITS, Session};
pub use settings::{Settings, ShareSettings};
pub use store::RelationshipStore;
pub use turn::TurnReport;
