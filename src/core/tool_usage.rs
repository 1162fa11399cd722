/// Tool usage aggregation
///
/// Folds every tracked action into a per-type counter with the topics
/// it was used for.

use crate::store::{ActionType, ToolUsagePattern, UserAction};
use indexmap::IndexMap;

/// Topics remembered per tool
pub const MAX_TOOL_CONTEXTS: usize = 10;

pub struct ToolUsageIndex;

impl ToolUsageIndex {
    /// Count `action` against its tool, creating the entry on first use
    pub fn record(usage: &mut IndexMap<ActionType, ToolUsagePattern>, action: &UserAction) {
        let tool = usage.entry(action.kind).or_insert_with(|| ToolUsagePattern {
            tool_name: action.kind,
            usage_count: 0,
            last_used: action.timestamp,
            contexts: Vec::new(),
        });

        tool.usage_count += 1;
        tool.last_used = action.timestamp;

        if let Some(topic) = action.topic() {
            if !tool.contexts.iter().any(|c| c == topic) {
                tool.contexts.push(topic.to_string());
                if tool.contexts.len() > MAX_TOOL_CONTEXTS {
                    let overflow = tool.contexts.len() - MAX_TOOL_CONTEXTS;
                    tool.contexts.drain(..overflow);
                }
            }
        }
    }

    /// Tools by usage count, highest first. Ties keep first-use order.
    pub fn ranked(usage: &IndexMap<ActionType, ToolUsagePattern>) -> Vec<&ToolUsagePattern> {
        let mut tools: Vec<&ToolUsagePattern> = usage.values().collect();
        tools.sort_by(|a, b| b.usage_count.cmp(&a.usage_count));
        tools
    }
}
