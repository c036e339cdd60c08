//! History Track
//!
//! An ordered, duplicate-free list of visited topics. Topics are appended
//! when submitted (before the fetch starts, so a topic that errors still
//! shows up) and never appear twice: re-adding a topic that is already
//! present anywhere in the sequence is skipped, which keeps the order of
//! the remaining entries stable.

/// Ordered sequence of visited topics
#[derive(Clone, Debug, Default)]
pub struct HistoryTrack {
    topics: Vec<String>,
}

impl HistoryTrack {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a topic, skipping it if already present (case-sensitive).
    ///
    /// Returns `true` if the topic was appended.
    pub fn add(&mut self, topic: impl Into<String>) -> bool {
        let topic = topic.into();
        if self.topics.iter().any(|t| *t == topic) {
            return false;
        }
        self.topics.push(topic);
        true
    }

    /// The visited topics, oldest first
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    /// Topic at `index`, if any
    pub fn get(&self, index: usize) -> Option<&str> {
        self.topics.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_preserves_order() {
        let mut history = HistoryTrack::new();
        assert!(history.add("ocean"));
        assert!(history.add("tide"));
        assert!(history.add("moon"));
        assert_eq!(history.topics(), ["ocean", "tide", "moon"]);
    }

    #[test]
    fn test_revisit_is_skipped() {
        let mut history = HistoryTrack::new();
        history.add("ocean");
        history.add("tide");
        assert!(!history.add("ocean"));
        assert_eq!(history.topics(), ["ocean", "tide"]);
    }

    #[test]
    fn test_dedup_is_case_sensitive() {
        let mut history = HistoryTrack::new();
        history.add("Ocean");
        assert!(history.add("ocean"));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_empty() {
        let history = HistoryTrack::new();
        assert!(history.is_empty());
        assert_eq!(history.topics(), [] as [&str; 0]);
    }
}
