/// Core functionality modules
///
/// Bookkeeping over the learning snapshot: the bounded action log,
/// per-tool usage counters and topic frequencies.

pub mod action_log;
pub mod tool_usage;
pub mod topics;

pub use action_log::ActionStore;
pub use tool_usage::{ToolUsageIndex, MAX_TOOL_CONTEXTS};
pub use topics::TopicFrequencyTracker;
