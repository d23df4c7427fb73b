//! Append-only audit log.

use async_trait::async_trait;
use lode_core::audit::{AuditOutcome, AuditRecord};
use lode_core::RequestSpec;

use crate::error::StoreError;
use crate::helpers::{parse_datetime, to_unsigned};

/// Destination for audit records. Writers treat failures as non-fatal.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, record: &AuditRecord) -> Result<(), StoreError>;
}

/// [`AuditSink`] backed by the `audit_log` table.
#[derive(Clone)]
pub struct SqlAuditLog {
    conn: libsql::Connection,
}

impl SqlAuditLog {
    pub(crate) const fn new(conn: libsql::Connection) -> Self {
        Self { conn }
    }

    /// Most recent records first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query fails or a row cannot be mapped.
    pub async fn recent(&self, limit: u32) -> Result<Vec<AuditRecord>, StoreError> {
        let mut rows = self
            .conn
            .query(
                "SELECT trace_id, fingerprint, request, model, duration_ms, source_count,
                        retrieval_calls, outcome, created_at
                 FROM audit_log ORDER BY created_at DESC, id DESC LIMIT ?1",
                libsql::params![limit],
            )
            .await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            let request: RequestSpec = serde_json::from_str(&row.get::<String>(2)?)
                .map_err(|e| StoreError::InvalidRow(format!("request: {e}")))?;
            let outcome: AuditOutcome = row
                .get::<String>(7)?
                .parse()
                .map_err(StoreError::InvalidRow)?;
            records.push(AuditRecord {
                trace_id: row.get::<String>(0)?,
                fingerprint: row.get::<String>(1)?,
                request,
                model: row.get::<String>(3)?,
                duration_ms: to_unsigned("duration_ms", row.get::<i64>(4)?)?,
                source_count: to_unsigned("source_count", row.get::<i64>(5)?)?,
                retrieval_calls: to_unsigned("retrieval_calls", row.get::<i64>(6)?)?,
                outcome,
                created_at: parse_datetime(&row.get::<String>(8)?)?,
            });
        }
        Ok(records)
    }
}

#[async_trait]
impl AuditSink for SqlAuditLog {
    async fn append(&self, record: &AuditRecord) -> Result<(), StoreError> {
        let request = serde_json::to_string(&record.request)
            .map_err(|e| StoreError::InvalidRow(format!("request: {e}")))?;
        self.conn
            .execute(
                "INSERT INTO audit_log (trace_id, fingerprint, request, model, duration_ms,
                                        source_count, retrieval_calls, outcome, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                libsql::params![
                    record.trace_id.as_str(),
                    record.fingerprint.as_str(),
                    request,
                    record.model.as_str(),
                    i64::try_from(record.duration_ms).unwrap_or(i64::MAX),
                    record.source_count,
                    record.retrieval_calls,
                    record.outcome.as_str(),
                    record.created_at.to_rfc3339()
                ],
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LodeStore;
    use chrono::{Duration, Utc};
    use lode_core::fixtures::sample_request;
    use pretty_assertions::assert_eq;

    fn record(trace: &str, outcome: AuditOutcome, minutes_ago: i64) -> AuditRecord {
        AuditRecord {
            trace_id: trace.to_string(),
            fingerprint: "ab".repeat(32),
            request: sample_request(),
            model: "research-large".to_string(),
            duration_ms: 1840,
            source_count: 4,
            retrieval_calls: 2,
            outcome,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn append_then_recent_round_trips() {
        let store = LodeStore::open_local(":memory:").await.unwrap();
        let log = store.audit_log();
        let rec = record("t-1", AuditOutcome::Computed, 0);
        log.append(&rec).await.unwrap();

        let recent = log.recent(10).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].trace_id, "t-1");
        assert_eq!(recent[0].request, rec.request);
        assert_eq!(recent[0].outcome, AuditOutcome::Computed);
        assert_eq!(recent[0].retrieval_calls, 2);
    }

    #[tokio::test]
    async fn recent_is_newest_first_and_limited() {
        let store = LodeStore::open_local(":memory:").await.unwrap();
        let log = store.audit_log();
        log.append(&record("old", AuditOutcome::Rejected, 30)).await.unwrap();
        log.append(&record("new", AuditOutcome::CacheHit, 1)).await.unwrap();
        log.append(&record("mid", AuditOutcome::Failed, 10)).await.unwrap();

        let traces: Vec<_> = log
            .recent(2)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.trace_id)
            .collect();
        assert_eq!(traces, vec!["new", "mid"]);
    }

    #[tokio::test]
    async fn rows_cannot_be_rewritten() {
        let store = LodeStore::open_local(":memory:").await.unwrap();
        store
            .audit_log()
            .append(&record("t-1", AuditOutcome::Computed, 0))
            .await
            .unwrap();
        let result = store
            .conn()
            .execute("UPDATE audit_log SET outcome = 'failed'", ())
            .await;
        assert!(result.is_err());
    }
}
