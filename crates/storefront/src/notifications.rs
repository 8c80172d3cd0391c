//! Storefront notifications (announcements, promos, order and design updates).
//!
//! Loaded from `notifications.json` at startup and rendered as-is. The list
//! is kept sorted newest first.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use threadline_core::NotificationId;

/// Errors raised while loading notifications.
#[derive(Debug, thiserror::Error)]
pub enum NotificationsError {
    #[error("failed to read notifications: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse notifications: {0}")]
    Parse(#[from] serde_json::Error),
}

/// What a notification is about; drives its icon and accent colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    #[default]
    Info,
    Promo,
    Order,
    Design,
}

impl NotificationKind {
    /// CSS modifier class for the list item.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Info => "notification--info",
            Self::Promo => "notification--promo",
            Self::Order => "notification--order",
            Self::Design => "notification--design",
        }
    }
}

/// A single notification.
#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    #[serde(default)]
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NotificationsFile {
    notifications: Vec<Notification>,
}

/// Notifications feed, newest first.
#[derive(Debug, Clone, Default)]
pub struct NotificationFeed {
    items: Arc<Vec<Notification>>,
}

impl NotificationFeed {
    /// Load the feed from a JSON file. A missing file yields an empty feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, NotificationsError> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "Notifications file does not exist");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let file: NotificationsFile = serde_json::from_str(&raw)?;
        tracing::info!(count = file.notifications.len(), "Notifications loaded");
        Ok(Self::new(file.notifications))
    }

    /// Build a feed, sorting newest first.
    #[must_use]
    pub fn new(mut items: Vec<Notification>) -> Self {
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self {
            items: Arc::new(items),
        }
    }

    /// Every notification, newest first.
    #[must_use]
    pub fn all(&self) -> &[Notification] {
        &self.items
    }

    /// The newest `n` notifications.
    #[must_use]
    pub fn latest(&self, n: usize) -> &[Notification] {
        self.items.get(..n.min(self.items.len())).unwrap_or_default()
    }
}

/// Human-friendly age of a timestamp relative to `now`.
///
/// "just now" under a minute, then minutes, hours and days up to a week,
/// then the calendar date.
#[must_use]
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(at);

    if age.num_seconds() < 60 {
        "just now".to_string()
    } else if age.num_minutes() < 60 {
        format!("{}m ago", age.num_minutes())
    } else if age.num_hours() < 24 {
        format!("{}h ago", age.num_hours())
    } else if age.num_days() < 7 {
        format!("{}d ago", age.num_days())
    } else {
        at.format("%b %-d, %Y").to_string()
    }
}
