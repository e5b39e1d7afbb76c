//! Operator event feed: most recent first, bounded, mirrored to the log.

use std::collections::VecDeque;

use threatsim_core::enums::Severity;
use threatsim_core::events::FeedEntry;

#[derive(Debug, Clone)]
pub struct EventFeed {
    entries: VecDeque<FeedEntry>,
    capacity: usize,
    next_seq: u64,
}

impl EventFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_seq: 0,
        }
    }

    /// Append an entry. The oldest entry is dropped once the feed is full.
    pub fn push(&mut self, time_ms: f64, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        match severity {
            Severity::Info | Severity::Success => log::info!("[{time_ms:.0} ms] {message}"),
            Severity::Warning => log::warn!("[{time_ms:.0} ms] {message}"),
            Severity::Critical | Severity::Error => log::error!("[{time_ms:.0} ms] {message}"),
        }
        self.entries.push_front(FeedEntry {
            seq: self.next_seq,
            time_ms,
            severity,
            message,
        });
        self.next_seq += 1;
        self.entries.truncate(self.capacity);
    }

    /// Most recent first.
    pub fn entries(&self) -> Vec<FeedEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
