//! Request lifecycle tracking.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Lifecycle phases for a storefront request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// Request received, processing started.
    Start,
    /// A page was served from the page store without regeneration.
    Served,
    /// A page was (re)generated from the commerce API.
    Generated(String),
    /// The buy action handed the browser to the checkout provider.
    Redirected,
    /// Request completed successfully.
    Completion,
    /// An error occurred.
    Error(String),
}

/// Timing context for observability.
#[derive(Debug, Clone)]
pub struct TimingContext {
    start: Instant,
    marks: HashMap<String, Instant>,
}

impl TimingContext {
    /// Create a new timing context.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            marks: HashMap::new(),
        }
    }

    /// Record a timing mark.
    pub fn mark(&mut self, name: &str) {
        self.marks.insert(name.to_string(), Instant::now());
    }

    /// Mark the start of a page generation pass.
    pub fn mark_generation_start(&mut self, page: &str) {
        self.mark(&format!("generate_{}_start", page));
    }

    /// Mark the end of a page generation pass.
    pub fn mark_generation_end(&mut self, page: &str) {
        self.mark(&format!("generate_{}_end", page));
    }

    /// Get elapsed time since start.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time from request start to a named mark.
    pub fn since_start(&self, name: &str) -> Option<Duration> {
        self.marks.get(name).map(|t| t.duration_since(self.start))
    }

    /// Duration of a generation pass, if both marks were recorded.
    pub fn generation_time(&self, page: &str) -> Option<Duration> {
        let start = self.marks.get(&format!("generate_{}_start", page))?;
        let end = self.marks.get(&format!("generate_{}_end", page))?;
        Some(end.duration_since(*start))
    }
}

impl Default for TimingContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_time_requires_both_marks() {
        let mut timing = TimingContext::new();
        timing.mark_generation_start("listing");
        assert!(timing.generation_time("listing").is_none());

        timing.mark_generation_end("listing");
        assert!(timing.generation_time("listing").is_some());
        assert!(timing.since_start("generate_listing_end").is_some());
    }
}
