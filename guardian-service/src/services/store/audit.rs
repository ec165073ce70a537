//! Audit event store.
//!
//! Append-only in-memory list. Queries filter a snapshot and paginate the
//! result; the reported total is the filtered count, not the page length.

use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dtos::resources::AuditPage;
use crate::models::{AuditEvent, AuditEventType, AuditFilter, AuditSeverity};

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Clone, Default)]
pub struct AuditStore {
    events: Arc<RwLock<Vec<AuditEvent>>>,
}

impl AuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event. Recording never fails; it is fire-and-forget from
    /// the caller's point of view.
    pub async fn record(&self, event: AuditEvent) {
        tracing::debug!(event_type = %event.event_type.as_str(), "Audit event recorded");
        self.events.write().await.push(event);
    }

    /// Filter and paginate. Page numbering starts at 1; a page past the end
    /// yields an empty page with the correct total.
    pub async fn query(&self, filter: &AuditFilter, page: usize, page_size: usize) -> AuditPage {
        let page = page.max(1);
        let page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };

        let events = self.events.read().await;
        let filtered: Vec<&AuditEvent> = events.iter().filter(|e| matches(e, filter)).collect();
        let total_events = filtered.len();

        // Page and size come straight from the query string; keep the
        // arithmetic saturating so absurd values yield an empty page.
        let start = page.saturating_sub(1).saturating_mul(page_size);
        let page_events = filtered
            .into_iter()
            .skip(start)
            .take(page_size)
            .cloned()
            .collect();

        AuditPage {
            events: page_events,
            total_events,
            page,
            page_size,
        }
    }

    pub async fn seed(&self, events: Vec<AuditEvent>) {
        self.events.write().await.extend(events);
    }
}

/// Filter predicate, applied in declaration order: type membership, severity
/// membership, exact user id, exact resource id, inclusive timestamp range,
/// then case-insensitive substring search over email/type/resource
/// type/serialized details.
fn matches(event: &AuditEvent, filter: &AuditFilter) -> bool {
    if !filter.event_types.is_empty() && !filter.event_types.contains(&event.event_type) {
        return false;
    }
    if !filter.severities.is_empty() && !filter.severities.contains(&event.severity) {
        return false;
    }
    if let Some(user_id) = filter.user_id {
        if event.user_id != Some(user_id) {
            return false;
        }
    }
    if let Some(resource_id) = &filter.resource_id {
        if event.resource_id.as_deref() != Some(resource_id.as_str()) {
            return false;
        }
    }
    if let Some(from) = filter.from {
        if event.timestamp < from {
            return false;
        }
    }
    if let Some(to) = filter.to {
        if event.timestamp > to {
            return false;
        }
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        let email_hit = event
            .user_email
            .as_ref()
            .is_some_and(|e| e.to_lowercase().contains(&needle));
        let type_hit = event.event_type.as_str().contains(&needle);
        let resource_hit = event
            .resource_type
            .as_ref()
            .is_some_and(|t| t.to_lowercase().contains(&needle));
        let details_hit = event.details.to_string().to_lowercase().contains(&needle);
        if !(email_hit || type_hit || resource_hit || details_hit) {
            return false;
        }
    }
    true
}

/// Demo fixtures mirroring a freshly provisioned dashboard.
pub fn demo_events(admin_id: Uuid) -> Vec<AuditEvent> {
    use chrono::{Duration, Utc};

    let admin_email = "admin@example.com";
    let agent = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
    let now = Utc::now();

    let mut events = vec![
        AuditEvent::new(AuditEventType::AuthLogin, AuditSeverity::Info)
            .actor(admin_id, admin_email)
            .client(Some("192.168.1.1".to_string()), Some(agent.to_string()))
            .details(serde_json::json!({ "success": true })),
        AuditEvent::new(AuditEventType::UserCreate, AuditSeverity::Info)
            .actor(admin_id, admin_email)
            .client(Some("192.168.1.1".to_string()), Some(agent.to_string()))
            .resource("2".to_string(), "user")
            .details(serde_json::json!({ "email": "newuser@example.com", "role": "developer" })),
        AuditEvent::new(AuditEventType::RoleUpdate, AuditSeverity::Info)
            .actor(admin_id, admin_email)
            .client(Some("192.168.1.1".to_string()), Some(agent.to_string()))
            .resource("3".to_string(), "role")
            .details(serde_json::json!({
                "name": "developer",
                "changes": { "permissions": { "added": ["api-keys:read"], "removed": [] } }
            })),
        AuditEvent::new(AuditEventType::ApiKeyCreate, AuditSeverity::Info)
            .actor(admin_id, admin_email)
            .client(Some("192.168.1.1".to_string()), Some(agent.to_string()))
            .resource("1".to_string(), "api-key")
            .details(serde_json::json!({ "name": "Production API Key" })),
        AuditEvent::new(AuditEventType::AuthLogin, AuditSeverity::Warning)
            .client(Some("203.0.113.1".to_string()), Some(agent.to_string()))
            .details(serde_json::json!({ "success": false, "reason": "Invalid credentials" })),
    ];
    events[4].user_email = Some("unknown@example.com".to_string());

    // Stagger timestamps one hour apart, newest first.
    for (i, event) in events.iter_mut().enumerate() {
        event.timestamp = now - Duration::hours(i as i64);
    }

    events
}
