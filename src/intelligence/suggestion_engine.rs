/// Suggestion engine
///
/// Generates ranked suggestions from tool usage, detected workflows and
/// conversation topics. Read-only over the snapshot.

use crate::core::{ToolUsageIndex, TopicFrequencyTracker};
use crate::intelligence::Scorer;
use crate::store::{generate_id, ActionType, LearningData};
use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tools considered for suggestions
const TOP_TOOLS: usize = 2;

/// Workflows considered for suggestions
const TOP_WORKFLOWS: usize = 2;

/// A tool needs this many uses before we mention it
const MIN_TOOL_USES: u64 = 3;

/// A workflow needs this many sightings before we mention it
const MIN_WORKFLOW_FREQUENCY: u64 = 2;

/// A topic needs this many mentions before we mention it
const MIN_TOPIC_COUNT: u64 = 2;

/// Next-step predictions returned
const MAX_NEXT_ACTIONS: usize = 3;

/// Time-of-day predictions returned
const MAX_TIME_BASED: usize = 3;

/// Same hour counts this much more than same weekday
const HOUR_WEIGHT: u64 = 2;

/// Default number of suggestions
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Where a suggestion came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Tool,
    Workflow,
    Topic,
}

impl std::fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SuggestionKind::Tool => "tool",
            SuggestionKind::Workflow => "workflow",
            SuggestionKind::Topic => "topic",
        };
        write!(f, "{}", s)
    }
}

/// Suggestion with reasoning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub content: String,
    pub confidence: f64,
    pub reasoning: String,
}

/// Likely follow-up to the current action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextActionSuggestion {
    pub action: ActionType,
    pub score: u64,
    pub reason: String,
}

/// Tool the user tends to reach for at this hour or on this weekday
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBasedSuggestion {
    pub action: ActionType,
    pub score: u64,
    pub reason: String,
}

/// Suggestion engine
pub struct SuggestionEngine<'a> {
    data: &'a LearningData,
}

impl<'a> SuggestionEngine<'a> {
    pub fn new(data: &'a LearningData) -> Self {
        Self { data }
    }

    /// Generate up to `limit` suggestions, most confident first
    pub fn generate(&self, limit: usize) -> Vec<Suggestion> {
        let mut suggestions = Vec::new();

        suggestions.extend(self.suggest_from_tools());
        suggestions.extend(self.suggest_from_workflows());
        suggestions.extend(self.suggest_from_topics());

        // Stable, so equal confidence keeps tool > workflow > topic order
        suggestions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        suggestions.truncate(limit);

        suggestions
    }

    fn suggest_from_tools(&self) -> Vec<Suggestion> {
        ToolUsageIndex::ranked(&self.data.tool_usage)
            .into_iter()
            .take(TOP_TOOLS)
            .filter(|tool| tool.usage_count >= MIN_TOOL_USES)
            .map(|tool| Suggestion {
                id: generate_id(),
                kind: SuggestionKind::Tool,
                content: format!("You frequently use \"{}\"", tool.tool_name.tool_label()),
                confidence: Scorer::tool_confidence(tool.usage_count),
                reasoning: format!("Used {} times", tool.usage_count),
            })
            .collect()
    }

    // The workflow table is kept sorted by the detector
    fn suggest_from_workflows(&self) -> Vec<Suggestion> {
        self.data
            .workflows
            .iter()
            .take(TOP_WORKFLOWS)
            .filter(|workflow| workflow.frequency >= MIN_WORKFLOW_FREQUENCY)
            .map(|workflow| {
                let steps: Vec<&str> = workflow.sequence.iter().map(|s| s.step_label()).collect();

                Suggestion {
                    id: generate_id(),
                    kind: SuggestionKind::Workflow,
                    content: format!("Common workflow: {}", steps.join(" → ")),
                    confidence: Scorer::workflow_confidence(workflow.frequency),
                    reasoning: format!("Occurred {} times", workflow.frequency),
                }
            })
            .collect()
    }

    fn suggest_from_topics(&self) -> Vec<Suggestion> {
        TopicFrequencyTracker::ranked(&self.data.frequent_topics)
            .into_iter()
            .take(1)
            .filter(|topic| topic.count >= MIN_TOPIC_COUNT)
            .map(|topic| Suggestion {
                id: generate_id(),
                kind: SuggestionKind::Topic,
                content: format!("You often discuss \"{}\"", topic.topic),
                confidence: Scorer::topic_confidence(topic.count),
                reasoning: format!("Appeared in {} conversations", topic.count),
            })
            .collect()
    }

    /// Predict what usually follows `current`
    ///
    /// Every workflow step right after `current` scores that workflow's
    /// frequency; scores add up across workflows.
    pub fn next_actions(&self, current: ActionType) -> Vec<NextActionSuggestion> {
        let mut scores: HashMap<ActionType, u64> = HashMap::new();
        let mut order: Vec<ActionType> = Vec::new();

        for workflow in &self.data.workflows {
            if let Some(next) = Self::predict_next_in_sequence(current, &workflow.sequence) {
                let score = scores.entry(next).or_insert_with(|| {
                    order.push(next);
                    0
                });
                *score += workflow.frequency;
            }
        }

        let mut predictions: Vec<NextActionSuggestion> = order
            .into_iter()
            .map(|action| {
                let score = scores.get(&action).copied().unwrap_or_default();
                NextActionSuggestion {
                    action,
                    score,
                    reason: format!("Usually follows {}", current.step_label()),
                }
            })
            .collect();

        predictions.sort_by(|a, b| b.score.cmp(&a.score));
        predictions.truncate(MAX_NEXT_ACTIONS);
        predictions
    }

    /// Tools used at this hour of the day or on this day of the week
    ///
    /// Each logged action of a tool in `now`'s hour scores 2, each one on
    /// `now`'s weekday scores 1. Hours and weekdays are read in `now`'s
    /// time zone. Ties keep the order tools first appear in the log.
    pub fn time_based<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<TimeBasedSuggestion> {
        let hour = now.hour();
        let weekday = now.weekday();

        // (same hour, same weekday) hits per tool
        let mut hits: IndexMap<ActionType, (u64, u64)> = IndexMap::new();
        for action in &self.data.actions {
            let Some(at) = DateTime::<Utc>::from_timestamp_millis(action.timestamp) else {
                continue;
            };
            let at = at.with_timezone(&now.timezone());

            let entry = hits.entry(action.kind).or_insert((0, 0));
            if at.hour() == hour {
                entry.0 += 1;
            }
            if at.weekday() == weekday {
                entry.1 += 1;
            }
        }

        let mut suggestions: Vec<TimeBasedSuggestion> = hits
            .into_iter()
            .map(|(action, (at_hour, on_day))| TimeBasedSuggestion {
                action,
                score: at_hour * HOUR_WEIGHT + on_day,
                reason: format!(
                    "Used {} times around {:02}:00 and {} times on {}",
                    at_hour, hour, on_day, weekday
                ),
            })
            .filter(|s| s.score > 0)
            .collect();

        suggestions.sort_by(|a, b| b.score.cmp(&a.score));
        suggestions.truncate(MAX_TIME_BASED);
        suggestions
    }

    /// Step after the first occurrence of `current`, if it isn't the last one
    fn predict_next_in_sequence(current: ActionType, sequence: &[ActionType]) -> Option<ActionType> {
        sequence
            .iter()
            .position(|step| *step == current)
            .and_then(|i| sequence.get(i + 1))
            .copied()
    }
}
