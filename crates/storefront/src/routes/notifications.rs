//! Notifications list and header panel.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::filters;
use crate::middleware::{CspNonce, OptionalAuth};
use crate::models::CurrentCustomer;
use crate::notifications::{Notification, relative_time};
use crate::state::AppState;

/// Number of notifications in the header dropdown.
const PANEL_SIZE: usize = 5;

/// Notification display data for templates.
#[derive(Clone)]
pub struct NotificationView {
    pub id: String,
    pub css_class: &'static str,
    pub title: String,
    pub body: String,
    pub timestamp: String,
    pub when: String,
    pub link: Option<String>,
}

impl NotificationView {
    fn new(notification: &Notification, now: DateTime<Utc>) -> Self {
        Self {
            id: notification.id.to_string(),
            css_class: notification.kind.css_class(),
            title: notification.title.clone(),
            body: notification.body.clone(),
            timestamp: notification.created_at.to_rfc3339(),
            when: relative_time(notification.created_at, now),
            link: notification.link.clone(),
        }
    }
}

fn views(notifications: &[Notification]) -> Vec<NotificationView> {
    let now = Utc::now();
    notifications
        .iter()
        .map(|n| NotificationView::new(n, now))
        .collect()
}

/// Notifications page template.
#[derive(Template, WebTemplate)]
#[template(path = "notifications/index.html")]
pub struct NotificationsTemplate {
    pub nonce: String,
    pub customer: Option<CurrentCustomer>,
    pub notifications: Vec<NotificationView>,
}

/// Header dropdown fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/notifications_panel.html")]
pub struct NotificationsPanelTemplate {
    pub notifications: Vec<NotificationView>,
    pub has_more: bool,
}

/// Display every notification, newest first.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    CspNonce(nonce): CspNonce,
    OptionalAuth(customer): OptionalAuth,
) -> impl IntoResponse {
    NotificationsTemplate {
        nonce,
        customer,
        notifications: views(state.notifications().all()),
    }
}

/// Latest notifications for the header dropdown.
#[instrument(skip_all)]
pub async fn panel(State(state): State<AppState>) -> impl IntoResponse {
    let feed = state.notifications();
    NotificationsPanelTemplate {
        notifications: views(feed.latest(PANEL_SIZE)),
        has_more: feed.all().len() > PANEL_SIZE,
    }
}
