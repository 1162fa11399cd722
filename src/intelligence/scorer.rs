/// Confidence scoring for suggestions
///
/// Each source maps its raw count onto 0.0-1.0 with its own saturation point.

/// Usage count at which a tool suggestion is fully confident
pub const TOOL_SATURATION: u64 = 10;

/// Frequency at which a workflow suggestion is fully confident
pub const WORKFLOW_SATURATION: u64 = 5;

/// Count at which a topic suggestion is fully confident
pub const TOPIC_SATURATION: u64 = 5;

/// Scorer for calculating confidence scores
pub struct Scorer;

impl Scorer {
    /// `min(count / saturation, 1.0)`
    pub fn saturating_ratio(count: u64, saturation: u64) -> f64 {
        if saturation == 0 {
            return 1.0;
        }

        (count as f64 / saturation as f64).clamp(0.0, 1.0)
    }

    pub fn tool_confidence(usage_count: u64) -> f64 {
        Self::saturating_ratio(usage_count, TOOL_SATURATION)
    }

    pub fn workflow_confidence(frequency: u64) -> f64 {
        Self::saturating_ratio(frequency, WORKFLOW_SATURATION)
    }

    pub fn topic_confidence(count: u64) -> f64 {
        Self::saturating_ratio(count, TOPIC_SATURATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_confidence() {
        assert_eq!(Scorer::tool_confidence(5), 0.5);
        assert_eq!(Scorer::tool_confidence(10), 1.0);
        assert_eq!(Scorer::tool_confidence(40), 1.0);
    }

    #[test]
    fn test_workflow_and_topic_confidence() {
        assert_eq!(Scorer::workflow_confidence(2), 0.4);
        assert_eq!(Scorer::workflow_confidence(7), 1.0);
        assert_eq!(Scorer::topic_confidence(5), 1.0);
        assert_eq!(Scorer::topic_confidence(0), 0.0);
    }

    #[test]
    fn test_zero_saturation() {
        assert_eq!(Scorer::saturating_ratio(0, 0), 1.0);
    }
}
