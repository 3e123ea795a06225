//! In-memory page view counting.

use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;

/// One counted path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewCount {
    pub path: String,
    pub count: u64,
}

/// Counts successful dispatches per path.
///
/// This is the service's only mutable state; it lives and dies with the
/// process.
#[derive(Debug, Default)]
pub struct ViewCounter {
    views: RwLock<HashMap<String, u64>>,
}

impl ViewCounter {
    /// Creates an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one view of `path`.
    pub fn record(&self, path: &str) {
        let mut views = self.views.write();
        *views.entry(path.to_owned()).or_insert(0) += 1;
    }

    /// Current counts, most viewed first (ties by path).
    pub fn snapshot(&self) -> Vec<ViewCount> {
        let views = self.views.read();
        let mut counts: Vec<ViewCount> = views
            .iter()
            .map(|(path, count)| ViewCount {
                path: path.clone(),
                count: *count,
            })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.path.cmp(&b.path)));
        counts
    }
}
