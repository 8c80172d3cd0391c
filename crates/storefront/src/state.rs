//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::{Catalog, CatalogError};
use crate::config::StorefrontConfig;
use crate::notifications::{NotificationFeed, NotificationsError};
use crate::services::auth::CustomerDirectory;

/// Error loading content for the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("notifications: {0}")]
    Notifications(#[from] NotificationsError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog, notifications, customer directory and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    notifications: NotificationFeed,
    customers: CustomerDirectory,
}

impl AppState {
    /// Create application state, loading content from `config.content_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if `catalog.json` is missing or invalid, or if
    /// `notifications.json` exists but cannot be parsed.
    pub fn load(config: StorefrontConfig) -> Result<Self, StateError> {
        let catalog = Catalog::load(&config.content_dir.join("catalog.json"))?;
        let notifications =
            NotificationFeed::load(&config.content_dir.join("notifications.json"))?;
        Ok(Self::new(config, catalog, notifications))
    }

    /// Create application state from already-loaded content.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog, notifications: NotificationFeed) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                notifications,
                customers: CustomerDirectory::new(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the notifications feed.
    #[must_use]
    pub fn notifications(&self) -> &NotificationFeed {
        &self.inner.notifications
    }

    /// Get a reference to the customer directory.
    #[must_use]
    pub fn customers(&self) -> &CustomerDirectory {
        &self.inner.customers
    }
}
