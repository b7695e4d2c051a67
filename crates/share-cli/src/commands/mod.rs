//! Command implementations for share-sim

pub mod masters;
pub mod phases;
pub mod run;

pub use masters::run_masters;
pub use phases::run_phases;
pub use run::run_scenario;
