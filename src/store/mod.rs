/// Storage module for helpdesk-learning
///
/// Snapshot data model and its JSON file persistence.

pub mod models;
pub mod snapshot;

pub use models::*;
pub use snapshot::SnapshotStore;
