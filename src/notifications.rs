use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

#[derive(Clone, Debug, PartialEq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A single user-visible notification (the toast analog).
#[derive(Clone, Debug)]
pub struct Notification {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub level: NotificationLevel,
    pub message: String,
}

/// Store for dismissible notifications raised by the session and the
/// ingestion controller. Capped; oldest entries are evicted first.
#[derive(Clone)]
pub struct NotificationStore {
    entries: Arc<Mutex<Vec<Notification>>>,
    next_id: Arc<AtomicU64>,
    max_entries: usize,
}

impl NotificationStore {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(0)),
            max_entries,
        }
    }

    /// Push a notification and return its id (usable for dismissal).
    pub fn push(&self, level: NotificationLevel, message: impl Into<String>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut entries = self.entries.lock();
        entries.push(Notification {
            id,
            timestamp: Utc::now(),
            level,
            message: message.into(),
        });

        // FIFO eviction when exceeding max
        if entries.len() > self.max_entries {
            entries.remove(0);
        }

        id
    }

    pub fn dismiss(&self, id: u64) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() != before
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.entries.lock().clone()
    }

    pub fn error_count(&self) -> usize {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.level == NotificationLevel::Error)
            .count()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_dismiss() {
        let store = NotificationStore::new(10);
        let id = store.push(NotificationLevel::Error, "Failed to send message");

        assert_eq!(store.entries().len(), 1);
        assert_eq!(store.error_count(), 1);

        assert!(store.dismiss(id));
        assert!(store.entries().is_empty());
        assert!(!store.dismiss(id));
    }

    #[test]
    fn test_fifo_eviction_at_capacity() {
        let store = NotificationStore::new(2);
        store.push(NotificationLevel::Info, "first");
        store.push(NotificationLevel::Info, "second");
        store.push(NotificationLevel::Info, "third");

        let entries = store.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "second");
        assert_eq!(entries[1].message, "third");
    }
}
