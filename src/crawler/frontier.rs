use std::collections::{HashSet, VecDeque};

/// A URL queued for fetching at a known BFS depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedPage {
    pub url: String,
    pub depth: usize,
}

/// Per-discovery-session crawl state
///
/// Owned by exactly one discovery session; concurrent audits of different
/// domains each get their own instance so visited sets never
/// cross-contaminate.
#[derive(Debug, Default)]
pub struct CrawlState {
    visited: HashSet<String>,
    failed: HashSet<String>,
    frontier: VecDeque<QueuedPage>,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a URL visited; returns false if it already was
    ///
    /// Visiting happens on pop, not on enqueue, so duplicate frontier
    /// entries are harmless.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Records a transport-level fetch failure
    ///
    /// Failed URLs are never re-fetched within the same run.
    pub fn mark_failed(&mut self, url: &str) {
        self.failed.insert(url.to_string());
    }

    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn enqueue(&mut self, url: String, depth: usize) {
        self.frontier.push_back(QueuedPage { url, depth });
    }

    pub fn pop(&mut self) -> Option<QueuedPage> {
        self.frontier.pop_front()
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_visited_once() {
        let mut state = CrawlState::new();
        assert!(state.mark_visited("https://example.com/a"));
        assert!(!state.mark_visited("https://example.com/a"));
        assert_eq!(state.visited_count(), 1);
    }

    #[test]
    fn test_fifo_frontier() {
        let mut state = CrawlState::new();
        state.enqueue("https://example.com/a".to_string(), 0);
        state.enqueue("https://example.com/b".to_string(), 1);

        assert_eq!(state.pop().unwrap().url, "https://example.com/a");
        let next = state.pop().unwrap();
        assert_eq!(next.url, "https://example.com/b");
        assert_eq!(next.depth, 1);
        assert!(state.pop().is_none());
    }

    #[test]
    fn test_duplicate_enqueue_tolerated() {
        let mut state = CrawlState::new();
        state.enqueue("https://example.com/a".to_string(), 0);
        state.enqueue("https://example.com/a".to_string(), 1);
        assert_eq!(state.frontier_len(), 2);

        // First pop claims the visit, second is skipped by the caller
        let first = state.pop().unwrap();
        assert!(state.mark_visited(&first.url));
        let second = state.pop().unwrap();
        assert!(!state.mark_visited(&second.url));
    }
}
