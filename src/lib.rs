/// helpdesk-learning library
///
/// Local learning mode for the helpdesk assistant: records user actions,
/// spots repeated workflows and turns them into suggestions.

pub mod config;
pub mod core;
pub mod error;
pub mod intelligence;
pub mod manager;
pub mod store;

// Re-exports for convenience
pub use config::LearningConfig;
pub use error::{LearningError, Result};
pub use manager::LearningManager;
pub use store::ActionType;
