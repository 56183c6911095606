// --- File: crates/termin_form/src/draft.rs ---
//! Draft cache mirroring unsubmitted form values to local storage.
//!
//! Drafts are stored as JSON under a single key together with the time they
//! were written. A draft older than the TTL is discarded instead of restored.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::FormFields;

/// Storage key the form draft lives under.
pub const DRAFT_KEY: &str = "bookingFormData";

/// Drafts older than this are discarded on restore.
pub const DEFAULT_DRAFT_TTL_SECS: u64 = 60 * 60;

/// Upper bound for configured TTLs, ten years.
const MAX_DRAFT_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

#[derive(Error, Debug)]
pub enum DraftError {
    #[error("draft storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("draft could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Key-value string storage in the manner of browser local storage.
#[cfg_attr(test, mockall::automock)]
pub trait DraftStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, DraftError>;
    fn save(&self, key: &str, contents: &str) -> Result<(), DraftError>;
    fn remove(&self, key: &str) -> Result<(), DraftError>;
}

/// One `<key>.json` file per entry inside a directory.
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    dir: PathBuf,
}

impl FileDraftStore {
    /// Opens the store, creating `dir` if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, DraftError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl DraftStore for FileDraftStore {
    fn load(&self, key: &str) -> Result<Option<String>, DraftError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, contents: &str) -> Result<(), DraftError> {
        // write-then-rename so a crash never leaves half a draft behind
        let target = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &target)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DraftError> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// In-process store for tests and embedders without a writable disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryDraftStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DraftStore for MemoryDraftStore {
    fn load(&self, key: &str) -> Result<Option<String>, DraftError> {
        Ok(self.entries().get(key).cloned())
    }

    fn save(&self, key: &str, contents: &str) -> Result<(), DraftError> {
        self.entries().insert(key.to_string(), contents.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DraftError> {
        self.entries().remove(key);
        Ok(())
    }
}

/// Stored draft document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    /// RFC 3339 timestamp of midnight UTC on the chosen day, or null.
    pub date: Option<String>,
    pub time: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
    /// Milliseconds since the UNIX epoch.
    pub timestamp: i64,
}

impl Draft {
    pub fn from_fields(fields: &FormFields, now: DateTime<Utc>) -> Self {
        Self {
            date: fields
                .date
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc().to_rfc3339()),
            time: fields.time.clone(),
            name: fields.name.clone(),
            email: fields.email.clone(),
            phone: fields.phone.clone(),
            message: fields.message.clone(),
            timestamp: now.timestamp_millis(),
        }
    }

    pub fn into_fields(self) -> FormFields {
        FormFields {
            date: self.date.as_deref().and_then(parse_draft_date),
            time: self.time.filter(|t| !t.is_empty()),
            name: self.name,
            email: self.email,
            phone: self.phone,
            message: self.message,
        }
    }
}

fn parse_draft_date(raw: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

/// A [`DraftStore`] bound to [`DRAFT_KEY`] and an expiry.
#[derive(Clone)]
pub struct DraftCache {
    store: Arc<dyn DraftStore>,
    ttl: Duration,
}

impl DraftCache {
    pub fn new(store: Arc<dyn DraftStore>) -> Self {
        Self::with_ttl(store, DEFAULT_DRAFT_TTL_SECS)
    }

    pub fn with_ttl(store: Arc<dyn DraftStore>, ttl_secs: u64) -> Self {
        Self {
            store,
            ttl: Duration::seconds(ttl_secs.min(MAX_DRAFT_TTL_SECS) as i64),
        }
    }

    /// Returns the stored values if the draft is younger than the TTL.
    ///
    /// Expired or unreadable drafts are removed.
    pub fn restore(&self, now: DateTime<Utc>) -> Result<Option<FormFields>, DraftError> {
        let Some(raw) = self.store.load(DRAFT_KEY)? else {
            return Ok(None);
        };

        let draft: Draft = match serde_json::from_str(&raw) {
            Ok(draft) => draft,
            Err(e) => {
                warn!("Discarding unreadable draft: {}", e);
                self.store.remove(DRAFT_KEY)?;
                return Ok(None);
            }
        };

        // Ages that overflow or lie in the future count as expired.
        match now.timestamp_millis().checked_sub(draft.timestamp) {
            Some(age_ms) if (0..self.ttl.num_milliseconds()).contains(&age_ms) => {
                debug!("Restoring draft written {} ms ago", age_ms);
                Ok(Some(draft.into_fields()))
            }
            age_ms => {
                debug!("Draft age {:?} ms is out of range, discarding", age_ms);
                self.store.remove(DRAFT_KEY)?;
                Ok(None)
            }
        }
    }

    /// Writes the current values with a fresh timestamp.
    pub fn mirror(&self, fields: &FormFields, now: DateTime<Utc>) -> Result<(), DraftError> {
        let json = serde_json::to_string(&Draft::from_fields(fields, now))?;
        self.store.save(DRAFT_KEY, &json)
    }

    pub fn clear(&self) -> Result<(), DraftError> {
        self.store.remove(DRAFT_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mockall::predicate::eq;

    fn sample_fields() -> FormFields {
        FormFields {
            date: NaiveDate::from_ymd_opt(2026, 10, 22),
            time: Some("16:30".into()),
            name: "Max".into(),
            email: "max@example.de".into(),
            phone: "+49301234".into(),
            message: "Hallo".into(),
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap()
    }

    #[test]
    fn fresh_draft_is_restored() {
        let cache = DraftCache::new(Arc::new(MemoryDraftStore::new()));
        cache.mirror(&sample_fields(), t0()).unwrap();

        let restored = cache.restore(t0() + Duration::minutes(59)).unwrap();
        assert_eq!(restored, Some(sample_fields()));
    }

    #[test]
    fn draft_older_than_an_hour_is_discarded() {
        let store = Arc::new(MemoryDraftStore::new());
        let cache = DraftCache::new(store.clone());
        cache.mirror(&sample_fields(), t0()).unwrap();

        assert_eq!(cache.restore(t0() + Duration::hours(1)).unwrap(), None);
        assert_eq!(store.load(DRAFT_KEY).unwrap(), None);
    }

    #[test]
    fn draft_with_out_of_range_timestamp_is_discarded() {
        let store = Arc::new(MemoryDraftStore::new());
        let raw = format!(r#"{{"name":"Max","timestamp":{}}}"#, i64::MIN);
        store.save(DRAFT_KEY, &raw).unwrap();

        let cache = DraftCache::new(store.clone());
        assert_eq!(cache.restore(t0()).unwrap(), None);
        assert_eq!(store.load(DRAFT_KEY).unwrap(), None);

        let raw = format!(r#"{{"name":"Max","timestamp":{}}}"#, i64::MAX);
        store.save(DRAFT_KEY, &raw).unwrap();
        assert_eq!(cache.restore(t0()).unwrap(), None);
        assert_eq!(store.load(DRAFT_KEY).unwrap(), None);
    }

    #[test]
    fn corrupt_draft_is_removed() {
        let mut store = MockDraftStore::new();
        store
            .expect_load()
            .with(eq(DRAFT_KEY))
            .returning(|_| Ok(Some("{not json".into())));
        store
            .expect_remove()
            .with(eq(DRAFT_KEY))
            .times(1)
            .returning(|_| Ok(()));

        let cache = DraftCache::new(Arc::new(store));
        assert_eq!(cache.restore(t0()).unwrap(), None);
    }

    #[test]
    fn partial_draft_fills_missing_fields_with_empty_strings() {
        let store = Arc::new(MemoryDraftStore::new());
        let raw = format!(
            r#"{{"date":null,"time":null,"name":"Max","timestamp":{}}}"#,
            t0().timestamp_millis()
        );
        store.save(DRAFT_KEY, &raw).unwrap();

        let fields = DraftCache::new(store).restore(t0()).unwrap().unwrap();
        assert_eq!(fields.name, "Max");
        assert_eq!(fields.email, "");
        assert_eq!(fields.date, None);
        assert_eq!(fields.time, None);
    }

    #[test]
    fn draft_json_uses_widget_layout() {
        let draft = Draft::from_fields(&sample_fields(), t0());
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["date"], "2026-10-22T00:00:00+00:00");
        assert_eq!(json["time"], "16:30");
        assert_eq!(json["timestamp"], t0().timestamp_millis());
    }

    #[test]
    fn file_store_round_trips_and_removes() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path().join("drafts")).unwrap();

        assert_eq!(store.load(DRAFT_KEY).unwrap(), None);
        store.save(DRAFT_KEY, "{}").unwrap();
        assert_eq!(store.load(DRAFT_KEY).unwrap().as_deref(), Some("{}"));
        store.remove(DRAFT_KEY).unwrap();
        store.remove(DRAFT_KEY).unwrap();
        assert_eq!(store.load(DRAFT_KEY).unwrap(), None);
    }
}
