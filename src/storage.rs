//! Local persistence for notebook session state.
//!
//! A single JSON file holds small string values keyed by name:
//!
//! ```text
//! ~/.notebook/session.json
//! ```
//!
//! Entries written without a time-to-live belong to the current session and
//! are dropped by [`SessionStore::end_session`]. Entries with one carry an
//! absolute expiry and read as absent once it has passed.

mod grades;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::{fs, io};

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid expiry: {0}")]
    Expiry(#[from] jiff::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// Well-known keys.
pub mod key {
    use crate::model::EvaluationId;

    /// Playback clock, in seconds.
    pub const TIME: &str = "time";
    pub const SCRIPT_SCROLL: &str = "scriptScrollY";
    pub const SUMMARY_SCROLL: &str = "summaryScrollY";

    pub fn evaluation_text(id: EvaluationId) -> String {
        format!("evaluation.{id}.text")
    }

    pub fn evaluation_rating(id: EvaluationId) -> String {
        format!("evaluation.{id}.rating")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Entry {
    value: String,

    /// `None` for session-scoped entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires: Option<Timestamp>,
}

impl Entry {
    fn is_live(&self, now: Timestamp) -> bool {
        self.expires.is_none_or(|at| at > now)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default)]
    entries: BTreeMap<String, Entry>,
}

/// Key-value session state, written through to disk on every change.
pub struct SessionStore {
    path: PathBuf,
    file: SessionFile,
}

impl SessionStore {
    /// Opens the store at `path`. A missing file is an empty store.
    ///
    /// Entries that expired while the notebook was closed are pruned.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut file: SessionFile = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => SessionFile::default(),
            Err(e) => return Err(e.into()),
        };

        let now = Timestamp::now();
        let before = file.entries.len();
        file.entries.retain(|_, entry| entry.is_live(now));
        if file.entries.len() != before {
            log::trace!("pruned {} expired entries", before - file.entries.len());
        }

        Ok(Self { path, file })
    }

    /// Returns the default store path: `~/.notebook/session.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".notebook").join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // ── Entries ──

    /// Reads a value. Expired entries read as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        let entry = self.file.entries.get(key)?;
        if !entry.is_live(Timestamp::now()) {
            return None;
        }
        Some(&entry.value)
    }

    /// Writes a value. Without a `ttl` the entry lasts until the session
    /// ends. A negative `ttl` erases the entry instead.
    pub fn set(
        &mut self,
        key: &str,
        value: impl Into<String>,
        ttl: Option<SignedDuration>,
    ) -> Result<()> {
        let expires = match ttl {
            Some(ttl) if ttl.is_negative() => return self.erase(key),
            Some(ttl) => Some(Timestamp::now().checked_add(ttl)?),
            None => None,
        };
        let entry = Entry {
            value: value.into(),
            expires,
        };
        self.file.entries.insert(key.to_string(), entry);
        self.save()
    }

    pub fn erase(&mut self, key: &str) -> Result<()> {
        if self.file.entries.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }

    /// Drops every session-scoped entry. Entries with an expiry survive.
    pub fn end_session(&mut self) -> Result<()> {
        self.file.entries.retain(|_, entry| entry.expires.is_some());
        self.save()
    }

    // ── Typed values ──

    /// Reads a whole-number value, treating absent or unparsable values as 0.
    pub fn number(&self, key: &str) -> i64 {
        let Some(value) = self.get(key) else {
            return 0;
        };
        value.trim().parse().unwrap_or_else(|_| {
            log::warn!("ignoring non-numeric value for {key}: {value:?}");
            0
        })
    }

    pub fn set_number(&mut self, key: &str, value: i64) -> Result<()> {
        self.set(key, value.to_string(), None)
    }

    /// The stored playback clock.
    pub fn time(&self) -> i64 {
        self.number(key::TIME)
    }

    pub fn set_time(&mut self, seconds: i64) -> Result<()> {
        self.set_number(key::TIME, seconds)
    }

    /// Restores a fresh notebook: clock and scroll positions at zero and
    /// everything else from the previous session dropped.
    pub fn reset(&mut self) -> Result<()> {
        self.end_session()?;
        for key in [key::TIME, key::SCRIPT_SCROLL, key::SUMMARY_SCROLL] {
            self.file.entries.insert(
                key.to_string(),
                Entry {
                    value: "0".into(),
                    expires: None,
                },
            );
        }
        self.save()
    }

    fn save(&mut self) -> Result<()> {
        let now = Timestamp::now();
        self.file.entries.retain(|_, entry| entry.is_live(now));

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.file)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn test_store() -> (TempDir, SessionStore) {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::open(dir.path().join("notebook").join("session.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn missing_file_is_empty() {
        let (_dir, store) = test_store();
        assert_eq!(store.get(key::TIME), None);
        assert_eq!(store.time(), 0);
    }

    #[test]
    fn values_survive_reopen() {
        let (_dir, mut store) = test_store();
        store.set_time(125).unwrap();
        store.set("name", "value", Some(SignedDuration::from_hours(24))).unwrap();

        let reopened = SessionStore::open(store.path()).unwrap();
        assert_eq!(reopened.time(), 125);
        assert_eq!(reopened.get("name"), Some("value"));
    }

    #[test]
    fn last_write_wins() {
        let (_dir, mut store) = test_store();
        store.set("k", "one", None).unwrap();
        store.set("k", "two", None).unwrap();
        assert_eq!(store.get("k"), Some("two"));
    }

    #[test]
    fn negative_ttl_erases() {
        let (_dir, mut store) = test_store();
        store.set("k", "v", None).unwrap();
        store.set("k", "ignored", Some(SignedDuration::from_secs(-1))).unwrap();
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn expired_entries_read_as_absent_and_are_pruned() {
        let (_dir, mut store) = test_store();
        store.set("keep", "v", None).unwrap();

        let past = Timestamp::now().checked_sub(SignedDuration::from_secs(60)).unwrap();
        store.file.entries.insert(
            "old".into(),
            Entry {
                value: "v".into(),
                expires: Some(past),
            },
        );
        assert_eq!(store.get("old"), None);

        // Written straight to disk, bypassing the prune in `save`.
        let json = serde_json::to_string(&store.file).unwrap();
        fs::write(store.path(), json).unwrap();

        let reopened = SessionStore::open(store.path()).unwrap();
        assert!(!reopened.file.entries.contains_key("old"));
        assert_eq!(reopened.get("keep"), Some("v"));
    }

    #[test]
    fn end_session_keeps_only_expiring_entries() {
        let (_dir, mut store) = test_store();
        store.set("session", "v", None).unwrap();
        store.set("lasting", "v", Some(SignedDuration::from_hours(1))).unwrap();

        store.end_session().unwrap();
        assert_eq!(store.get("session"), None);
        assert_eq!(store.get("lasting"), Some("v"));
    }

    #[test]
    fn reset_zeroes_clock_and_scroll() {
        let (_dir, mut store) = test_store();
        store.set_time(900).unwrap();
        store.set_number(key::SCRIPT_SCROLL, 12).unwrap();
        store.set("other", "v", None).unwrap();

        store.reset().unwrap();
        assert_eq!(store.get(key::TIME), Some("0"));
        assert_eq!(store.get(key::SUMMARY_SCROLL), Some("0"));
        assert_eq!(store.number(key::SCRIPT_SCROLL), 0);
        assert_eq!(store.get("other"), None);
    }

    #[test]
    fn non_numeric_time_reads_as_zero() {
        let (_dir, mut store) = test_store();
        store.set(key::TIME, "soon", None).unwrap();
        assert_eq!(store.time(), 0);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(SessionStore::open(&path), Err(StorageError::Json(_))));
    }
}
