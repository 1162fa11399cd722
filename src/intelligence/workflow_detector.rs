// Finds workflows in the action history
//
// Like when someone always chats, then opens analytics, then searches.
// Every pass rescans the trailing window and adds onto what earlier passes
// already counted. Windows seen by two passes are counted twice.

use crate::core::ActionStore;
use crate::store::{generate_id, ActionType, UserAction, WorkflowPattern};
use tracing::debug;

// Only the most recent actions are scanned
pub const DETECTION_WINDOW: usize = 20;

// Workflows are always exactly this many steps
pub const SEQUENCE_LENGTH: usize = 3;

// Size of the workflow table after each pass
pub const MAX_WORKFLOWS: usize = 20;

// Detection runs when the action count hits a multiple of this
pub const DETECTION_INTERVAL: usize = 10;

/// What a single detection pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectionSummary {
    pub windows_scanned: usize,
    pub created: usize,
    pub updated: usize,
    pub evicted: usize,
}

pub struct WorkflowDetector;

impl WorkflowDetector {
    /// Whether the post-append action count triggers a pass
    pub fn should_run(action_count: usize) -> bool {
        action_count > 0 && action_count % DETECTION_INTERVAL == 0
    }

    // Main function - scan the tail of the history and fold every
    // 3-step window into the workflow table
    pub fn detect(
        workflows: &mut Vec<WorkflowPattern>,
        actions: &[UserAction],
        now: i64,
    ) -> DetectionSummary {
        let recent = ActionStore::recent(actions, DETECTION_WINDOW);

        let mut summary = DetectionSummary::default();
        if recent.len() < SEQUENCE_LENGTH {
            return summary;
        }

        for sequence in Self::extract_sequences(recent) {
            summary.windows_scanned += 1;

            match workflows.iter_mut().find(|w| w.sequence == sequence) {
                Some(existing) => {
                    existing.frequency += 1;
                    existing.last_occurred = now;
                    summary.updated += 1;
                }
                None => {
                    // First sighting counts once
                    workflows.push(WorkflowPattern {
                        id: generate_id(),
                        sequence,
                        frequency: 1,
                        last_occurred: now,
                    });
                    summary.created += 1;
                }
            }
        }

        summary.evicted = Self::rank_and_cap(workflows);

        debug!(
            "Workflow pass: {} windows, {} new, {} updated, {} evicted",
            summary.windows_scanned, summary.created, summary.updated, summary.evicted
        );

        summary
    }

    /// Sort by frequency (stable, so ties keep prior order) and keep the top 20.
    /// Returns how many were dropped.
    pub fn rank_and_cap(workflows: &mut Vec<WorkflowPattern>) -> usize {
        workflows.sort_by(|a, b| b.frequency.cmp(&a.frequency));

        let evicted = workflows.len().saturating_sub(MAX_WORKFLOWS);
        workflows.truncate(MAX_WORKFLOWS);
        evicted
    }

    /// Every contiguous run of three action types
    fn extract_sequences(actions: &[UserAction]) -> Vec<[ActionType; SEQUENCE_LENGTH]> {
        actions
            .windows(SEQUENCE_LENGTH)
            .map(|w| [w[0].kind, w[1].kind, w[2].kind])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ActionType::*;

    fn history(kinds: &[ActionType]) -> Vec<UserAction> {
        kinds.iter().map(|k| UserAction::new(*k, None)).collect()
    }

    fn frequency_of(workflows: &[WorkflowPattern], sequence: [ActionType; 3]) -> Option<u64> {
        workflows
            .iter()
            .find(|w| w.sequence == sequence)
            .map(|w| w.frequency)
    }

    #[test]
    fn test_should_run() {
        assert!(!WorkflowDetector::should_run(0));
        assert!(!WorkflowDetector::should_run(9));
        assert!(WorkflowDetector::should_run(10));
        assert!(!WorkflowDetector::should_run(12));
        assert!(WorkflowDetector::should_run(1000));
    }

    #[test]
    fn test_skips_short_history() {
        let mut workflows = Vec::new();
        let summary = WorkflowDetector::detect(&mut workflows, &history(&[Message, Search]), 0);

        assert_eq!(summary, DetectionSummary::default());
        assert!(workflows.is_empty());
    }

    #[test]
    fn test_detects_repeating_triple() {
        // message, view_analytics, search x3 + message = 10 actions, 8 windows
        let mut kinds = Vec::new();
        for _ in 0..3 {
            kinds.extend([Message, ViewAnalytics, Search]);
        }
        kinds.push(Message);

        let mut workflows = Vec::new();
        let summary = WorkflowDetector::detect(&mut workflows, &history(&kinds), 1);

        assert_eq!(summary.windows_scanned, 8);
        assert_eq!(summary.created, 3);
        assert_eq!(frequency_of(&workflows, [Message, ViewAnalytics, Search]), Some(3));
        assert_eq!(frequency_of(&workflows, [ViewAnalytics, Search, Message]), Some(3));
        assert_eq!(frequency_of(&workflows, [Search, Message, ViewAnalytics]), Some(2));

        // Sorted descending, ties in first-seen order
        assert_eq!(workflows[0].sequence, [Message, ViewAnalytics, Search]);
        assert_eq!(workflows[2].sequence, [Search, Message, ViewAnalytics]);
    }

    #[test]
    fn test_first_sighting_counts_once() {
        let mut workflows = Vec::new();
        WorkflowDetector::detect(&mut workflows, &history(&[Filter, Search, Message]), 5);

        assert_eq!(workflows.len(), 1);
        assert_eq!(workflows[0].frequency, 1);
        assert_eq!(workflows[0].last_occurred, 5);
    }

    #[test]
    fn test_passes_accumulate() {
        let actions = history(&[Filter, Search, Message]);
        let mut workflows = Vec::new();

        WorkflowDetector::detect(&mut workflows, &actions, 1);
        WorkflowDetector::detect(&mut workflows, &actions, 2);

        assert_eq!(workflows[0].frequency, 2);
        assert_eq!(workflows[0].last_occurred, 2);
    }

    #[test]
    fn test_only_trailing_window_scanned() {
        // 25 actions: the first five never make it into the window
        let mut kinds = vec![ConversationStart; 5];
        kinds.extend(std::iter::repeat(Search).take(20));

        let mut workflows = Vec::new();
        let summary = WorkflowDetector::detect(&mut workflows, &history(&kinds), 0);

        assert_eq!(summary.windows_scanned, 18);
        assert_eq!(workflows.len(), 1);
        assert_eq!(workflows[0].sequence, [Search, Search, Search]);
    }

    #[test]
    fn test_table_capped_at_twenty() {
        let mut workflows: Vec<WorkflowPattern> = (0..25u64)
            .map(|i| WorkflowPattern {
                id: generate_id(),
                sequence: [Message, Message, Message],
                frequency: i,
                last_occurred: 0,
            })
            .collect();

        let evicted = WorkflowDetector::rank_and_cap(&mut workflows);

        assert_eq!(evicted, 5);
        assert_eq!(workflows.len(), MAX_WORKFLOWS);
        assert_eq!(workflows[0].frequency, 24);
        assert_eq!(workflows.last().map(|w| w.frequency), Some(5));
    }
}
