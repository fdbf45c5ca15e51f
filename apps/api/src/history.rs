//! Session history — an in-memory, append-only log of generated reports
//! keyed by session id.
//!
//! This is deliberately not a durable store: history survives exactly as
//! long as the process, and a session's list only shrinks on an explicit
//! clear. The report pipeline never mutates this; handlers append after a
//! report is produced.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use uuid::Uuid;

use crate::models::report::ReportRecord;

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Vec<ReportRecord>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, session_id: Uuid, record: ReportRecord) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(session_id)
            .or_default()
            .push(record);
    }

    /// All reports for a session, oldest first. Unknown sessions are empty,
    /// not an error — a fresh session id simply has no history yet.
    pub fn list(&self, session_id: Uuid) -> Vec<ReportRecord> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&session_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn find(&self, session_id: Uuid, report_id: Uuid) -> Option<ReportRecord> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&session_id)
            .and_then(|records| records.iter().find(|r| r.id == report_id).cloned())
    }

    /// Clears a session's history, returning how many reports were dropped.
    pub fn clear(&self, session_id: Uuid) -> usize {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&session_id)
            .map(|records| records.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fields::ParsedReport;
    use chrono::Utc;

    fn record(text: &str) -> ReportRecord {
        ReportRecord {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            image_filenames: vec!["ring.jpg".to_string()],
            raw_text: text.to_string(),
            report_text: text.to_string(),
            fields: ParsedReport::default(),
            download_stem: "ring".to_string(),
        }
    }

    #[test]
    fn test_append_and_list_preserves_order() {
        let store = SessionStore::new();
        let session = Uuid::new_v4();
        store.append(session, record("first"));
        store.append(session, record("second"));

        let history = store.list(session);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].raw_text, "first");
        assert_eq!(history[1].raw_text, "second");
    }

    #[test]
    fn test_unknown_session_is_empty() {
        let store = SessionStore::new();
        assert!(store.list(Uuid::new_v4()).is_empty());
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.append(a, record("mine"));
        assert!(store.list(b).is_empty());
        assert_eq!(store.list(a).len(), 1);
    }

    #[test]
    fn test_find_by_report_id() {
        let store = SessionStore::new();
        let session = Uuid::new_v4();
        let wanted = record("target");
        let wanted_id = wanted.id;
        store.append(session, record("other"));
        store.append(session, wanted);

        let found = store.find(session, wanted_id).unwrap();
        assert_eq!(found.raw_text, "target");
        assert!(store.find(session, Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_clear_drops_only_that_session() {
        let store = SessionStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.append(a, record("one"));
        store.append(a, record("two"));
        store.append(b, record("keep"));

        assert_eq!(store.clear(a), 2);
        assert!(store.list(a).is_empty());
        assert_eq!(store.list(b).len(), 1);
        assert_eq!(store.clear(a), 0);
    }
}
