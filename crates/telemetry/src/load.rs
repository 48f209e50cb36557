//! Sliding-window load detection.
//!
//! Every query is recorded as its arrival time only. When more than
//! `threshold` queries fall inside `window`, the agent short-circuits
//! with a canned response instead of calling the model.
//! Thread-safe via `std::sync::Mutex` (non-async, held briefly).

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::model::LoadStatus;

/// Default retention for entries that are no longer inside the window.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(3_600);

/// Outcome of recording one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadCheck {
    /// Queries inside the window, including the one just recorded
    pub recent: usize,
    pub high_load: bool,
}

#[derive(Debug)]
pub struct RecentQueryLog {
    window: Duration,
    threshold: usize,
    retention: Duration,
    arrivals: Mutex<VecDeque<Instant>>,
}

impl RecentQueryLog {
    pub fn new(window: Duration, threshold: usize) -> Self {
        Self {
            window,
            threshold,
            retention: DEFAULT_RETENTION.max(window),
            arrivals: Mutex::new(VecDeque::new()),
        }
    }

    /// Entries older than `retention` are dropped as new ones arrive.
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention.max(self.window);
        self
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Record a query arriving now and report whether the window is overloaded.
    pub fn record(&self) -> LoadCheck {
        self.record_at(Instant::now())
    }

    pub fn record_at(&self, now: Instant) -> LoadCheck {
        let mut arrivals = self.arrivals.lock().unwrap_or_else(|e| e.into_inner());

        // Opportunistic pruning keeps the log bounded by retention.
        while arrivals
            .front()
            .is_some_and(|at| now.saturating_duration_since(*at) >= self.retention)
        {
            arrivals.pop_front();
        }
        arrivals.push_back(now);

        let recent = Self::count_within(&arrivals, now, self.window);
        LoadCheck {
            recent,
            high_load: recent > self.threshold,
        }
    }

    fn count_within(arrivals: &VecDeque<Instant>, now: Instant, window: Duration) -> usize {
        arrivals
            .iter()
            .rev()
            .take_while(|at| now.saturating_duration_since(**at) < window)
            .count()
    }

    pub fn status(&self) -> LoadStatus {
        self.status_at(Instant::now())
    }

    pub fn status_at(&self, now: Instant) -> LoadStatus {
        let arrivals = self.arrivals.lock().unwrap_or_else(|e| e.into_inner());
        let recent = Self::count_within(&arrivals, now, self.window);
        LoadStatus {
            recent_queries: recent,
            high_load: recent > self.threshold,
            window_secs: self.window.as_secs(),
            threshold: self.threshold,
        }
    }

    /// Drop entries older than the retention period. Returns how many were removed.
    pub fn prune(&self) -> usize {
        self.prune_at(Instant::now())
    }

    pub fn prune_at(&self, now: Instant) -> usize {
        let mut arrivals = self.arrivals.lock().unwrap_or_else(|e| e.into_inner());
        let before = arrivals.len();
        arrivals.retain(|at| now.saturating_duration_since(*at) < self.retention);
        let removed = before - arrivals.len();
        if removed > 0 {
            debug!(removed, remaining = arrivals.len(), "Pruned recent query log");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.arrivals.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
