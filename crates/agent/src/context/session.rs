//! Session memory: the tasks this agent has completed recently.

use std::collections::VecDeque;
use std::sync::Mutex;

use bizpilot_core::Regime;

pub const DEFAULT_CAPACITY: usize = 10;
const SHOWN: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionEntry {
    pub task: String,
    pub regime: Regime,
}

#[derive(Debug)]
pub struct SessionMemory {
    capacity: usize,
    entries: Mutex<VecDeque<SessionEntry>>,
}

impl SessionMemory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Remember a completed task, evicting the oldest beyond capacity.
    pub fn remember(&self, task: &str, regime: Regime) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(SessionEntry {
            task: task.to_string(),
            regime,
        });
    }

    /// Newest first.
    pub fn recent(&self, limit: usize) -> Vec<SessionEntry> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.iter().rev().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Prompt fragment, or `None` before the first completed query.
    pub fn render(&self) -> Option<String> {
        let recent = self.recent(SHOWN);
        if recent.is_empty() {
            return None;
        }
        let mut out = String::from("## Recent Session Activity\n");
        for entry in recent {
            out.push_str(&format!("- [{}] {}\n", entry.regime, entry.task));
        }
        Some(out.trim_end().to_string())
    }
}

impl Default for SessionMemory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
