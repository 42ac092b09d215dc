use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::sync::Mutex;

use crate::frontier::{FrontierStore, SCORE_FLOOR};

/// A pending URL with its priority score
#[derive(Debug, Clone)]
struct FrontierEntry {
    score: f64,
    url: String,
}

// BinaryHeap is a max-heap: higher scores pop first. Ties compare the URL
// reversed so the lexicographically smallest URL is the "greatest" entry.
impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.url.cmp(&self.url))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.score.total_cmp(&other.score) == Ordering::Equal && self.url == other.url
    }
}

impl Eq for FrontierEntry {}

#[derive(Debug, Default)]
struct FrontierInner {
    seen: HashSet<String>,
    pending: HashSet<String>,
    heap: BinaryHeap<FrontierEntry>,
}

impl FrontierInner {
    /// Pushes onto the heap unless the URL is already pending, preserving the
    /// at-most-once-pending invariant.
    fn push_pending(&mut self, url: &str, score: f64) {
        if self.pending.insert(url.to_string()) {
            self.heap.push(FrontierEntry {
                score,
                url: url.to_string(),
            });
        }
    }
}

/// Serializable view of the frontier, used for cross-run persistence
#[derive(Debug, Clone, Default)]
pub struct FrontierSnapshot {
    pub seen: Vec<String>,
    pub pending: Vec<(String, f64)>,
}

/// In-process frontier: one mutex over the seen set and the pending heap.
///
/// Every operation takes the lock once, so the whole interface is trivially
/// linearizable and `add_batch` is atomic (the two-phase crash gap of a
/// networked store cannot arise here).
#[derive(Debug, Default)]
pub struct MemoryFrontier {
    inner: Mutex<FrontierInner>,
}

impl MemoryFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the current seen set and pending queue for persistence
    pub fn snapshot(&self) -> FrontierSnapshot {
        let inner = self.inner.lock().unwrap();
        FrontierSnapshot {
            seen: inner.seen.iter().cloned().collect(),
            pending: inner
                .heap
                .iter()
                .map(|e| (e.url.clone(), e.score))
                .collect(),
        }
    }

    /// Restores a previously captured snapshot, replacing current state
    pub fn restore(&self, snapshot: FrontierSnapshot) {
        let mut inner = self.inner.lock().unwrap();
        inner.seen = snapshot.seen.into_iter().collect();
        // Pending entries are also seen by definition
        let mut scores: HashMap<String, f64> = HashMap::new();
        for (url, score) in snapshot.pending {
            inner.seen.insert(url.clone());
            scores.insert(url, score);
        }
        inner.pending = scores.keys().cloned().collect();
        inner.heap = scores
            .into_iter()
            .map(|(url, score)| FrontierEntry { score, url })
            .collect();
    }
}

impl FrontierStore for MemoryFrontier {
    fn add_if_new(&self, url: &str, score: f64) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if !inner.seen.insert(url.to_string()) {
            return false;
        }
        inner.push_pending(url, score);
        true
    }

    fn add_batch(&self, urls: &[String], base_score: f64) -> usize {
        let mut inner = self.inner.lock().unwrap();
        let mut added = 0;
        for url in urls {
            if inner.seen.insert(url.clone()) {
                inner.push_pending(url, base_score);
                added += 1;
            }
        }
        added
    }

    fn pop_highest(&self) -> Option<(String, f64)> {
        let mut inner = self.inner.lock().unwrap();
        let entry = inner.heap.pop()?;
        inner.pending.remove(&entry.url);
        Some((entry.url, entry.score))
    }

    fn reinsert(&self, url: &str, score: f64) {
        let mut inner = self.inner.lock().unwrap();
        inner.push_pending(url, score.max(SCORE_FLOOR));
    }

    fn pending_len(&self) -> usize {
        self.inner.lock().unwrap().heap.len()
    }

    fn seen_len(&self) -> usize {
        self.inner.lock().unwrap().seen.len()
    }
}
