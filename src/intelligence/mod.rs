/// Intelligence module
///
/// Workflow detection and suggestions based on the action history.

pub mod scorer;
pub mod suggestion_engine;
pub mod workflow_detector;

pub use scorer::Scorer;
pub use suggestion_engine::{
    NextActionSuggestion, Suggestion, SuggestionEngine, SuggestionKind, TimeBasedSuggestion,
    DEFAULT_SUGGESTION_LIMIT,
};
pub use workflow_detector::{DetectionSummary, WorkflowDetector};
