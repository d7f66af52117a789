// Notification hub - non-fatal failures surface here instead of
// interrupting the edit/playback/game loops

use chrono::Utc;
use std::collections::VecDeque;

/// Default number of notifications kept before the oldest is dropped
const DEFAULT_MAX_NOTIFICATIONS: usize = 64;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// Which subsystem raised the notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationCategory {
    Edit,
    Playback,
    Game,
    Storage,
}

/// A notification with timestamp and metadata
#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub category: NotificationCategory,
    pub message: String,
    /// Unix timestamp in milliseconds
    pub timestamp_ms: i64,
}

impl Notification {
    /// Create a new notification stamped with the current time
    pub fn new(level: NotificationLevel, category: NotificationCategory, message: String) -> Self {
        Self {
            level,
            category,
            message,
            timestamp_ms: Utc::now().timestamp_millis(),
        }
    }

    pub fn info(category: NotificationCategory, message: String) -> Self {
        Self::new(NotificationLevel::Info, category, message)
    }

    pub fn warning(category: NotificationCategory, message: String) -> Self {
        Self::new(NotificationLevel::Warning, category, message)
    }

    pub fn error(category: NotificationCategory, message: String) -> Self {
        Self::new(NotificationLevel::Error, category, message)
    }
}

/// Capped queue of notifications
///
/// The UI (or a test) drains this between ticks; pushing never fails and
/// never blocks, the oldest entry is evicted when the cap is reached.
#[derive(Debug)]
pub struct NotificationHub {
    entries: VecDeque<Notification>,
    max_entries: usize,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_NOTIFICATIONS)
    }

    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries),
            max_entries,
        }
    }

    /// Push a notification, evicting the oldest entry when full
    pub fn push(&mut self, notification: Notification) {
        if self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(notification);
    }

    /// Take all pending notifications, oldest first
    pub fn drain(&mut self) -> Vec<Notification> {
        self.entries.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}
