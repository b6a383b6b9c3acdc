use std::{
    fmt::{self, Debug},
    sync::{Arc, Mutex},
};

use sea_orm::{ActiveValue::Set, DatabaseConnection, EntityTrait};
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::activity;

/// One append-only audit entry describing a handled request.
///
/// Built by the activity recorder before the handler runs; never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    pub session_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub browser: Option<String>,
    pub ip_address: Option<String>,
    pub controller: String,
    pub action: String,
    pub params: serde_json::Value,
    pub slug: Option<String>,
    pub lesson: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("failed to persist activity record: {0}")]
    WriteFailed(#[from] sea_orm::DbErr),
}

/// Captures audit records in memory instead of persisting them.
///
/// Lets tests verify exactly what would have been recorded without a
/// database.
#[derive(Clone, Default)]
pub struct MockAuditSink {
    records: Arc<Mutex<Vec<ActivityRecord>>>,
}

impl MockAuditSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self, record: ActivityRecord) {
        self.records.lock().unwrap().push(record);
    }

    #[must_use]
    pub fn records(&self) -> Vec<ActivityRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.records.lock().unwrap().clear();
    }
}

/// Audit sink that either persists records or captures them for tests.
#[derive(Clone)]
pub enum AuditSink {
    /// Persist records through the activity entity
    Database(DatabaseConnection),
    /// Capture records in memory for inspection
    Mock(MockAuditSink),
}

impl Debug for AuditSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database(_) => f.debug_tuple("AuditSink::Database").finish(),
            Self::Mock(_) => f.debug_tuple("AuditSink::Mock").finish(),
        }
    }
}

impl AuditSink {
    #[must_use]
    pub fn database(db: DatabaseConnection) -> Self {
        Self::Database(db)
    }

    #[must_use]
    pub fn mock() -> Self {
        Self::Mock(MockAuditSink::new())
    }

    /// Append one record. Callers treat failure as a logged warning, not
    /// as a request failure.
    pub async fn record(&self, record: ActivityRecord) -> Result<(), AuditError> {
        match self {
            Self::Database(db) => {
                let model = activity::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    created_at: Set(chrono::Utc::now().naive_utc()),
                    session_id: Set(record.session_id),
                    user_id: Set(record.user_id),
                    browser: Set(record.browser),
                    ip_address: Set(record.ip_address),
                    controller: Set(record.controller),
                    action: Set(record.action),
                    params: Set(record.params),
                    slug: Set(record.slug),
                    lesson: Set(record.lesson),
                };
                activity::Entity::insert(model).exec(db).await?;
                Ok(())
            }
            Self::Mock(mock) => {
                mock.store(record);
                Ok(())
            }
        }
    }

    /// Get captured records (only available for the mock sink).
    ///
    /// Returns None when records go to the database.
    #[must_use]
    pub fn records(&self) -> Option<Vec<ActivityRecord>> {
        match self {
            Self::Mock(mock) => Some(mock.records()),
            Self::Database(_) => None,
        }
    }

    /// Clear captured records (only available for the mock sink).
    pub fn clear_records(&self) {
        if let Self::Mock(mock) = self {
            mock.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(action: &str) -> ActivityRecord {
        ActivityRecord {
            session_id: Some(Uuid::new_v4()),
            user_id: None,
            browser: Some("test-agent".to_string()),
            ip_address: None,
            controller: "/en/index".to_string(),
            action: action.to_string(),
            params: serde_json::json!({}),
            slug: None,
            lesson: None,
        }
    }

    #[tokio::test]
    async fn test_mock_sink_captures_records() {
        let sink = AuditSink::mock();

        sink.record(record("get")).await.unwrap();
        sink.record(record("post")).await.unwrap();

        let records = sink.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].action, "get");
    }

    #[tokio::test]
    async fn test_mock_sink_clear() {
        let sink = AuditSink::mock();
        sink.record(record("get")).await.unwrap();

        sink.clear_records();
        assert!(sink.records().unwrap().is_empty());
    }
}
