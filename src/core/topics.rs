/// Topic frequency tracking
///
/// Counts conversation tags handed to us by the agent layer.

use crate::store::TopicCount;
use indexmap::IndexMap;

pub struct TopicFrequencyTracker;

impl TopicFrequencyTracker {
    /// Bump each tag once per occurrence, duplicates included
    pub fn record<S: AsRef<str>>(topics: &mut IndexMap<String, u64>, tags: &[S]) {
        for tag in tags {
            *topics.entry(tag.as_ref().to_string()).or_insert(0) += 1;
        }
    }

    /// Topics by count, highest first. Ties keep first-seen order.
    pub fn ranked(topics: &IndexMap<String, u64>) -> Vec<TopicCount> {
        let mut ranked: Vec<TopicCount> = topics
            .iter()
            .map(|(topic, count)| TopicCount {
                topic: topic.clone(),
                count: *count,
            })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_count_separately() {
        let mut topics = IndexMap::new();

        TopicFrequencyTracker::record(&mut topics, &["work", "urgent", "work"]);
        TopicFrequencyTracker::record(&mut topics, &["work"]);

        assert_eq!(topics["work"], 3);
        assert_eq!(topics["urgent"], 1);
    }

    #[test]
    fn test_ranked_descending() {
        let mut topics = IndexMap::new();
        TopicFrequencyTracker::record(&mut topics, &["a", "b", "b", "c", "c", "c"]);

        let ranked = TopicFrequencyTracker::ranked(&topics);
        let counts: Vec<u64> = ranked.iter().map(|t| t.count).collect();
        assert_eq!(counts, vec![3, 2, 1]);
        assert_eq!(ranked[0].topic, "c");
    }

    #[test]
    fn test_ranked_ties_keep_first_seen_order() {
        let mut topics = IndexMap::new();
        TopicFrequencyTracker::record(&mut topics, &["zeta"]);
        TopicFrequencyTracker::record(&mut topics, &["zeta", "alpha", "alpha"]);

        let ranked = TopicFrequencyTracker::ranked(&topics);
        assert_eq!(ranked[0].topic, "zeta");
        assert_eq!(ranked[1].topic, "alpha");
    }

    #[test]
    fn test_empty_tags() {
        let mut topics = IndexMap::new();
        TopicFrequencyTracker::record::<&str>(&mut topics, &[]);
        assert!(topics.is_empty());
    }
}
