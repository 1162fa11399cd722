/// Data models for the learning snapshot
///
/// Everything here is serialized into `learning.json` with camelCase keys.

use crate::error::LearningError;
use serde::{Deserialize, Serialize};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::str::FromStr;

/// Current time as epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Fresh unique id for actions, workflows and suggestions
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Kinds of user interaction the assistant reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Message,
    Search,
    Filter,
    ViewAnalytics,
    ConversationStart,
    ConversationContinue,
}

impl ActionType {
    pub const ALL: [ActionType; 6] = [
        ActionType::Message,
        ActionType::Search,
        ActionType::Filter,
        ActionType::ViewAnalytics,
        ActionType::ConversationStart,
        ActionType::ConversationContinue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Message => "message",
            ActionType::Search => "search",
            ActionType::Filter => "filter",
            ActionType::ViewAnalytics => "view_analytics",
            ActionType::ConversationStart => "conversation_start",
            ActionType::ConversationContinue => "conversation_continue",
        }
    }

    /// Label shown when suggesting the action as a tool.
    /// Conversation events have no tool label and fall back to the raw name.
    pub fn tool_label(&self) -> &'static str {
        match self {
            ActionType::ViewAnalytics => "View Analytics",
            ActionType::Search => "Search Conversations",
            ActionType::Filter => "Filter by Tags",
            ActionType::Message => "Start Chatting",
            other => other.as_str(),
        }
    }

    /// Label for one step of a workflow
    pub fn step_label(&self) -> &'static str {
        match self {
            ActionType::Message => "chat",
            ActionType::ViewAnalytics => "view analytics",
            ActionType::Search => "search",
            ActionType::Filter => "filter",
            ActionType::ConversationStart => "start conversation",
            ActionType::ConversationContinue => "continue conversation",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = LearningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ActionType::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == trimmed)
            .ok_or_else(|| LearningError::UnknownActionType(trimmed.to_string()))
    }
}

/// One recorded interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActionType,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
}

impl UserAction {
    pub fn new(kind: ActionType, context: Option<Map<String, Value>>) -> Self {
        Self {
            id: generate_id(),
            kind,
            timestamp: now_millis(),
            context,
        }
    }

    /// The `topic` context key, when it is a string
    pub fn topic(&self) -> Option<&str> {
        self.context
            .as_ref()
            .and_then(|ctx| ctx.get("topic"))
            .and_then(Value::as_str)
    }
}

/// Aggregate usage of one action type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolUsagePattern {
    pub tool_name: ActionType,
    pub usage_count: u64,
    pub last_used: i64,
    pub contexts: Vec<String>,
}

/// A recurring run of three actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowPattern {
    pub id: String,
    pub sequence: [ActionType; 3],
    pub frequency: u64,
    pub last_occurred: i64,
}

/// The persisted root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningData {
    pub enabled: bool,
    pub actions: Vec<UserAction>,
    pub tool_usage: IndexMap<ActionType, ToolUsagePattern>,
    pub workflows: Vec<WorkflowPattern>,
    pub frequent_topics: IndexMap<String, u64>,
    #[serde(default)]
    pub preferences: Map<String, Value>,
    pub last_analyzed: i64,
}

impl Default for LearningData {
    fn default() -> Self {
        Self {
            enabled: true,
            actions: Vec::new(),
            tool_usage: IndexMap::new(),
            workflows: Vec::new(),
            frequent_topics: IndexMap::new(),
            preferences: Map::new(),
            last_analyzed: now_millis(),
        }
    }
}

/// Topic with its count, as listed in the review view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCount {
    pub topic: String,
    pub count: u64,
}

/// Summary counters for the settings screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningStatistics {
    pub enabled: bool,
    pub total_actions: usize,
    pub tools_tracked: usize,
    pub workflows_detected: usize,
    pub topics_tracked: usize,
    pub last_analyzed: i64,
}

/// Sorted review of everything learned so far
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningReport {
    pub tool_usage: Vec<ToolUsagePattern>,
    pub workflows: Vec<WorkflowPattern>,
    pub frequent_topics: Vec<TopicCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_type_parse() {
        assert_eq!("view_analytics".parse::<ActionType>().unwrap(), ActionType::ViewAnalytics);
        assert_eq!(" search ".parse::<ActionType>().unwrap(), ActionType::Search);

        match "dance".parse::<ActionType>() {
            Err(LearningError::UnknownActionType(kind)) => assert_eq!(kind, "dance"),
            other => panic!("Expected UnknownActionType, got {:?}", other),
        }
    }

    #[test]
    fn test_labels_fall_back_to_raw_name() {
        assert_eq!(ActionType::ViewAnalytics.tool_label(), "View Analytics");
        assert_eq!(ActionType::ConversationStart.tool_label(), "conversation_start");
        assert_eq!(ActionType::Message.step_label(), "chat");
    }

    #[test]
    fn test_action_topic() {
        let mut ctx = Map::new();
        ctx.insert("topic".to_string(), Value::from("billing"));
        let action = UserAction::new(ActionType::Message, Some(ctx));
        assert_eq!(action.topic(), Some("billing"));

        let mut ctx = Map::new();
        ctx.insert("topic".to_string(), Value::from(42));
        let action = UserAction::new(ActionType::Message, Some(ctx));
        assert_eq!(action.topic(), None);
    }

    #[test]
    fn test_snapshot_uses_camel_case_keys() {
        let mut data = LearningData::default();
        data.tool_usage.insert(
            ActionType::Search,
            ToolUsagePattern {
                tool_name: ActionType::Search,
                usage_count: 2,
                last_used: 10,
                contexts: vec![],
            },
        );

        let json = serde_json::to_value(&data).unwrap();
        assert!(json.get("toolUsage").unwrap().get("search").is_some());
        assert!(json.get("frequentTopics").is_some());
        assert!(json.get("lastAnalyzed").is_some());
        assert_eq!(json["toolUsage"]["search"]["usageCount"], 2);
    }

    #[test]
    fn test_map_order_survives_round_trip() {
        let mut data = LearningData::default();
        for topic in ["zeta", "alpha", "mid"] {
            data.frequent_topics.insert(topic.to_string(), 1);
        }
        for kind in [ActionType::Filter, ActionType::Message] {
            data.tool_usage.insert(
                kind,
                ToolUsagePattern {
                    tool_name: kind,
                    usage_count: 1,
                    last_used: 0,
                    contexts: vec![],
                },
            );
        }

        let json = serde_json::to_string(&data).unwrap();
        let back: LearningData = serde_json::from_str(&json).unwrap();

        let topics: Vec<&str> = back.frequent_topics.keys().map(String::as_str).collect();
        assert_eq!(topics, vec!["zeta", "alpha", "mid"]);
        let tools: Vec<ActionType> = back.tool_usage.keys().copied().collect();
        assert_eq!(tools, vec![ActionType::Filter, ActionType::Message]);
    }

    #[test]
    fn test_action_without_context_omits_field() {
        let action = UserAction::new(ActionType::Filter, None);
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "filter");
        assert!(json.get("context").is_none());
    }
}
