// LearningManager - the one place that owns the learning snapshot
//
// Every mutating call applies its change in memory first and then rewrites
// learning.json. If the write fails the change is still in memory and
// `flush()` can retry it without applying anything twice.
//
// Nothing changes while learning is disabled, except the flag itself,
// reset() and import_data().
//
// Known limitation: no file locking. Two processes on the same data dir
// means last writer wins.

use crate::config::LearningConfig;
use crate::core::{ActionStore, ToolUsageIndex, TopicFrequencyTracker};
use crate::error::{LearningError, Result};
use crate::intelligence::{
    DetectionSummary, NextActionSuggestion, Suggestion, SuggestionEngine, TimeBasedSuggestion,
    WorkflowDetector,
};
use crate::store::{
    now_millis, ActionType, LearningData, LearningReport, LearningStatistics, SnapshotStore,
    UserAction,
};
use chrono::{DateTime, Local, TimeZone};
use serde_json::{Map, Value};
use tracing::{debug, info};

pub struct LearningManager {
    config: LearningConfig,
    store: SnapshotStore,
    data: LearningData,
    initialized: bool,
}

impl LearningManager {
    /// Create a manager with defaults in memory. Nothing touches disk until
    /// `initialize()` or the first mutation.
    pub fn new(config: LearningConfig) -> Self {
        let store = SnapshotStore::new(config.snapshot_path());

        Self {
            config,
            store,
            data: LearningData::default(),
            initialized: false,
        }
    }

    /// `new` + `initialize` in one go
    pub async fn open(config: LearningConfig) -> Result<Self> {
        config.validate()?;
        let mut manager = Self::new(config);
        manager.initialize().await?;
        Ok(manager)
    }

    /// Create the data dir and load an existing snapshot.
    ///
    /// Safe to call more than once; only the first call does anything.
    /// A snapshot that exists but doesn't parse is an error, never a silent
    /// fallback to defaults.
    pub async fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        self.store.ensure_dir().await?;

        if let Some(mut data) = self.store.load().await? {
            Self::enforce_caps(&mut data, self.config.max_actions);
            self.data = data;
        } else {
            debug!("No learning snapshot at {}, starting fresh", self.store.path().display());
        }

        self.initialized = true;
        info!(
            "Learning manager ready (enabled: {}, {} actions)",
            self.data.enabled,
            self.data.actions.len()
        );
        Ok(())
    }

    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.data.enabled
    }

    /// Turn learning on or off. Turning it off keeps what was learned.
    pub async fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        self.data.enabled = enabled;
        info!("Learning mode {}", if enabled { "enabled" } else { "disabled" });
        self.flush().await
    }

    /// Record a user action.
    pub async fn track_action(
        &mut self,
        kind: ActionType,
        context: Option<Map<String, Value>>,
    ) -> Result<()> {
        if !self.data.enabled {
            return Ok(());
        }

        let action = UserAction::new(kind, context);
        ToolUsageIndex::record(&mut self.data.tool_usage, &action);

        let evicted = ActionStore::append(&mut self.data.actions, action, self.config.max_actions);
        if evicted > 0 {
            debug!("Action log full, dropped {} oldest", evicted);
        }

        if WorkflowDetector::should_run(self.data.actions.len()) {
            self.run_detection();
        }

        self.flush().await
    }

    /// Same as `track_action` but takes the action type as a string.
    /// Unknown types are rejected.
    pub async fn track_action_named(
        &mut self,
        kind: &str,
        context: Option<Map<String, Value>>,
    ) -> Result<()> {
        let kind: ActionType = kind.parse()?;
        self.track_action(kind, context).await
    }

    /// Count conversation tags
    pub async fn update_topics<S: AsRef<str>>(&mut self, tags: &[S]) -> Result<()> {
        if !self.data.enabled {
            return Ok(());
        }

        TopicFrequencyTracker::record(&mut self.data.frequent_topics, tags);
        self.flush().await
    }

    /// Run workflow detection now instead of waiting for the next 10th action
    pub async fn analyze_now(&mut self) -> Result<DetectionSummary> {
        if !self.data.enabled {
            return Ok(DetectionSummary::default());
        }

        let summary = self.run_detection();
        self.flush().await?;
        Ok(summary)
    }

    fn run_detection(&mut self) -> DetectionSummary {
        let now = now_millis();
        let summary = WorkflowDetector::detect(&mut self.data.workflows, &self.data.actions, now);
        self.data.last_analyzed = now;
        summary
    }

    /// Top suggestions, most confident first. Empty when disabled.
    pub fn generate_suggestions(&self, limit: usize) -> Vec<Suggestion> {
        if !self.data.enabled {
            return Vec::new();
        }

        SuggestionEngine::new(&self.data).generate(limit)
    }

    /// What usually comes after `current`. Empty when disabled.
    pub fn suggest_next_actions(&self, current: ActionType) -> Vec<NextActionSuggestion> {
        if !self.data.enabled {
            return Vec::new();
        }

        SuggestionEngine::new(&self.data).next_actions(current)
    }

    /// Tools usually used at this local hour and weekday. Empty when disabled.
    pub fn time_based_actions(&self) -> Vec<TimeBasedSuggestion> {
        self.time_based_actions_at(&Local::now())
    }

    /// `time_based_actions` against an explicit clock
    pub fn time_based_actions_at<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Vec<TimeBasedSuggestion> {
        if !self.data.enabled {
            return Vec::new();
        }

        SuggestionEngine::new(&self.data).time_based(now)
    }

    pub fn statistics(&self) -> LearningStatistics {
        LearningStatistics {
            enabled: self.data.enabled,
            total_actions: self.data.actions.len(),
            tools_tracked: self.data.tool_usage.len(),
            workflows_detected: self.data.workflows.len(),
            topics_tracked: self.data.frequent_topics.len(),
            last_analyzed: self.data.last_analyzed,
        }
    }

    /// Everything learned, each list sorted by its count descending
    pub fn learning_data(&self) -> LearningReport {
        let mut workflows = self.data.workflows.clone();
        workflows.sort_by(|a, b| b.frequency.cmp(&a.frequency));

        LearningReport {
            tool_usage: ToolUsageIndex::ranked(&self.data.tool_usage)
                .into_iter()
                .cloned()
                .collect(),
            workflows,
            frequent_topics: TopicFrequencyTracker::ranked(&self.data.frequent_topics),
        }
    }

    /// Raw action log, oldest first
    pub fn actions(&self) -> &[UserAction] {
        &self.data.actions
    }

    /// Wipe everything learned but keep the enabled flag
    pub async fn reset(&mut self) -> Result<()> {
        let enabled = self.data.enabled;
        self.data = LearningData {
            enabled,
            ..LearningData::default()
        };

        info!("Learning data reset");
        self.flush().await
    }

    /// Drop actions older than `days_to_keep` days. Aggregates stay as they are.
    pub async fn clear_old_actions(&mut self, days_to_keep: u32) -> Result<usize> {
        if !self.data.enabled {
            return Ok(0);
        }

        let cutoff = ActionStore::cutoff(now_millis(), days_to_keep);
        let removed = ActionStore::retain_newer_than(&mut self.data.actions, cutoff);

        info!("Cleared {} actions older than {} days", removed, days_to_keep);
        self.flush().await?;
        Ok(removed)
    }

    pub fn preference(&self, key: &str) -> Option<&Value> {
        self.data.preferences.get(key)
    }

    pub fn preferences(&self) -> &Map<String, Value> {
        &self.data.preferences
    }

    pub async fn set_preference(&mut self, key: impl Into<String>, value: Value) -> Result<()> {
        if !self.data.enabled {
            return Ok(());
        }

        self.data.preferences.insert(key.into(), value);
        self.flush().await
    }

    /// Full snapshot as pretty JSON, for backups
    pub fn export_data(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }

    /// Replace everything with a previously exported snapshot.
    ///
    /// The current enabled flag wins over the imported one. Caps are
    /// re-applied in case the backup came from a bigger configuration.
    pub async fn import_data(&mut self, json: &str) -> Result<()> {
        let mut imported: LearningData =
            serde_json::from_str(json).map_err(|e| LearningError::InvalidImport(e.to_string()))?;

        imported.enabled = self.data.enabled;
        Self::enforce_caps(&mut imported, self.config.max_actions);

        self.data = imported;
        info!(
            "Imported learning data ({} actions, {} workflows)",
            self.data.actions.len(),
            self.data.workflows.len()
        );
        self.flush().await
    }

    // Snapshots written under a bigger cap (or by hand) get trimmed to the
    // current one: newest actions kept, workflows sorted and capped
    fn enforce_caps(data: &mut LearningData, max_actions: usize) {
        let dropped = ActionStore::truncate_to(&mut data.actions, max_actions);
        let evicted = WorkflowDetector::rank_and_cap(&mut data.workflows);
        if dropped > 0 || evicted > 0 {
            debug!("Trimmed {} actions and {} workflows to fit caps", dropped, evicted);
        }
    }

    /// Write the current snapshot to disk
    pub async fn flush(&self) -> Result<()> {
        self.store.save(&self.data).await
    }
}
