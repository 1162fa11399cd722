// Keeps the raw action history bounded
//
// New actions go on the end, old ones fall off the front once we hit the cap.

use crate::store::UserAction;

// One day in milliseconds
const DAY_MS: i64 = 24 * 60 * 60 * 1000;

pub struct ActionStore;

impl ActionStore {
    // Push an action and drop the oldest ones past `max_actions`.
    // Returns how many got evicted.
    pub fn append(actions: &mut Vec<UserAction>, action: UserAction, max_actions: usize) -> usize {
        actions.push(action);
        Self::truncate_to(actions, max_actions)
    }

    // Drop the oldest actions until at most `max_actions` remain.
    // Returns how many got evicted.
    pub fn truncate_to(actions: &mut Vec<UserAction>, max_actions: usize) -> usize {
        let overflow = actions.len().saturating_sub(max_actions);
        actions.drain(..overflow);
        overflow
    }

    /// Last `count` actions (or all of them if there are fewer)
    pub fn recent(actions: &[UserAction], count: usize) -> &[UserAction] {
        let start = actions.len().saturating_sub(count);
        &actions[start..]
    }

    /// Cutoff timestamp for keeping `days` worth of history
    pub fn cutoff(now: i64, days: u32) -> i64 {
        now - i64::from(days) * DAY_MS
    }

    /// Drop every action at or before `cutoff`. Returns how many were removed.
    pub fn retain_newer_than(actions: &mut Vec<UserAction>, cutoff: i64) -> usize {
        let before = actions.len();
        actions.retain(|a| a.timestamp > cutoff);
        before - actions.len()
    }
}
