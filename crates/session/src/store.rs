//! Session Store Implementation

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log_normalizer::{normalize_csv, CanonicalTable, NormalizeError};
use serde::Serialize;
use tracing::{debug, info};

use crate::SessionError;

/// Max parsed tables kept around; re-uploads of a recent file skip parsing
const DEFAULT_MAX_CACHED_TABLES: usize = 8;

/// Identity of an uploaded file: name, size, and a content digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UploadKey {
    name: String,
    len: usize,
    digest: u64,
}

impl UploadKey {
    /// Derive the cache key for an upload
    pub fn of(name: &str, bytes: &[u8]) -> Self {
        let mut hasher = DefaultHasher::new();
        bytes.hash(&mut hasher);
        Self {
            name: name.to_string(),
            len: bytes.len(),
            digest: hasher.finish(),
        }
    }
}

/// Metadata about the currently loaded log
#[derive(Debug, Clone, Serialize)]
pub struct LogInfo {
    pub file_name: String,
    pub rows: usize,
    pub sensors: usize,
    pub loaded_at: DateTime<Utc>,
}

/// One sensor name with its selection flag
#[derive(Debug, Clone, Serialize)]
pub struct SensorEntry {
    pub name: String,
    pub selected: bool,
}

/// State owned by the one logical actor of the viewer session.
///
/// The selection map only ever grows: loading a new file inserts its
/// sensors unselected but never removes entries from earlier files, so
/// re-loading a previous log keeps its selection.
pub struct SessionStore {
    /// Parsed tables keyed by upload identity
    cache: HashMap<UploadKey, Arc<CanonicalTable>>,
    /// Cache keys in insertion order, for retention
    cache_order: Vec<UploadKey>,
    /// Identity and metadata of the active log
    active: Option<(UploadKey, LogInfo)>,
    /// Sensor name -> is selected
    selection: BTreeMap<String, bool>,
    /// Retention limit for `cache`
    max_cached_tables: usize,
}

impl SessionStore {
    /// Create an empty session
    pub fn new() -> Self {
        info!("creating session store");
        Self {
            cache: HashMap::new(),
            cache_order: Vec::new(),
            active: None,
            selection: BTreeMap::new(),
            max_cached_tables: DEFAULT_MAX_CACHED_TABLES,
        }
    }

    /// Load an upload into the session.
    ///
    /// On success the log becomes active and its sensors join the
    /// selection map unselected; returns the table and whether the parse
    /// cache was hit. On failure prior session state is left untouched.
    pub fn load(
        &mut self,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<(Arc<CanonicalTable>, bool), NormalizeError> {
        let key = UploadKey::of(file_name, bytes);

        let (table, cache_hit) = match self.cache.get(&key) {
            Some(table) => {
                debug!("parse cache hit for '{}'", file_name);
                (Arc::clone(table), true)
            }
            None => {
                let table = Arc::new(normalize_csv(bytes)?);
                self.remember(key.clone(), Arc::clone(&table));
                (table, false)
            }
        };

        for name in table.column_names() {
            self.selection.entry(name.to_string()).or_insert(false);
        }

        let log_info = LogInfo {
            file_name: file_name.to_string(),
            rows: table.n_rows(),
            sensors: table.n_columns(),
            loaded_at: Utc::now(),
        };
        info!(
            "loaded log '{}': {} rows, {} sensors (cache hit: {})",
            file_name, log_info.rows, log_info.sensors, cache_hit
        );
        self.active = Some((key, log_info));

        Ok((table, cache_hit))
    }

    /// Insert into the cache, evicting the oldest inactive entry past the
    /// retention limit.
    fn remember(&mut self, key: UploadKey, table: Arc<CanonicalTable>) {
        while self.cache.len() >= self.max_cached_tables {
            let active_key = self.active.as_ref().map(|(k, _)| k);
            let Some(pos) = self
                .cache_order
                .iter()
                .position(|k| Some(k) != active_key)
            else {
                break;
            };
            let evicted = self.cache_order.remove(pos);
            self.cache.remove(&evicted);
        }
        self.cache_order.push(key.clone());
        self.cache.insert(key, table);
    }

    /// The active canonical table, if a log is loaded
    pub fn table(&self) -> Option<Arc<CanonicalTable>> {
        let (key, _) = self.active.as_ref()?;
        self.cache.get(key).map(Arc::clone)
    }

    /// Metadata for the active log
    pub fn info(&self) -> Option<&LogInfo> {
        self.active.as_ref().map(|(_, info)| info)
    }

    /// Number of parsed tables currently cached
    pub fn cached_tables(&self) -> usize {
        self.cache.len()
    }

    /// Sensors of the active log in table column order, optionally
    /// filtered by case-insensitive substring search.
    pub fn sensors(&self, query: Option<&str>) -> Vec<SensorEntry> {
        let Some(table) = self.table() else {
            return Vec::new();
        };
        let needle = query.unwrap_or("").to_lowercase();

        table
            .column_names()
            .filter(|name| needle.is_empty() || name.to_lowercase().contains(&needle))
            .map(|name| SensorEntry {
                name: name.to_string(),
                selected: self.selection.get(name).copied().unwrap_or(false),
            })
            .collect()
    }

    /// Set one sensor's selection flag
    pub fn set_selected(&mut self, name: &str, selected: bool) -> Result<(), SessionError> {
        match self.selection.get_mut(name) {
            Some(flag) => {
                *flag = selected;
                Ok(())
            }
            None => Err(SessionError::UnknownSensor(name.to_string())),
        }
    }

    /// Select every sensor matching the query (all of them when the query
    /// is empty); returns how many were marked.
    pub fn select_matching(&mut self, query: &str) -> usize {
        let needle = query.to_lowercase();
        let mut marked = 0;
        for (name, flag) in self.selection.iter_mut() {
            if needle.is_empty() || name.to_lowercase().contains(&needle) {
                *flag = true;
                marked += 1;
            }
        }
        marked
    }

    /// Clear every selection flag
    pub fn deselect_all(&mut self) {
        for flag in self.selection.values_mut() {
            *flag = false;
        }
    }

    /// Names currently selected
    pub fn selected(&self) -> Vec<String> {
        self.selection
            .iter()
            .filter(|(_, &selected)| selected)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Number of selected sensors
    pub fn selected_count(&self) -> usize {
        self.selection.values().filter(|&&s| s).count()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_LOG: &str = "SECONDS;PID;VALUE\n0;RPM;800\n1;RPM;900\n0;Speed;10\n1;Speed;20\n";
    const WIDE_LOG: &str = "time(ms);Coolant\n1000;80\n2000;82\n";

    #[test]
    fn test_load_and_cache_hit() {
        let mut store = SessionStore::new();

        let (_, hit) = store.load("trip.csv", LONG_LOG.as_bytes()).unwrap();
        assert!(!hit);
        let (_, hit) = store.load("trip.csv", LONG_LOG.as_bytes()).unwrap();
        assert!(hit);

        assert_eq!(store.cached_tables(), 1);
        assert_eq!(store.info().unwrap().sensors, 2);
    }

    #[test]
    fn test_failed_load_leaves_state_untouched() {
        let mut store = SessionStore::new();
        store.load("trip.csv", LONG_LOG.as_bytes()).unwrap();
        store.set_selected("RPM", true).unwrap();

        let err = store.load("bad.csv", b"timestamp;value\n1;2\n");
        assert!(err.is_err());

        assert_eq!(store.info().unwrap().file_name, "trip.csv");
        assert!(store.table().is_some());
        assert_eq!(store.selected(), vec!["RPM".to_string()]);
    }

    #[test]
    fn test_selection_survives_new_upload() {
        let mut store = SessionStore::new();
        store.load("trip.csv", LONG_LOG.as_bytes()).unwrap();
        store.set_selected("RPM", true).unwrap();

        store.load("bench.csv", WIDE_LOG.as_bytes()).unwrap();

        // New sensor appears unselected, earlier selection is retained.
        let entries = store.sensors(None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Coolant");
        assert!(!entries[0].selected);
        assert_eq!(store.selected(), vec!["RPM".to_string()]);
    }

    #[test]
    fn test_unknown_sensor_toggle() {
        let mut store = SessionStore::new();
        store.load("trip.csv", LONG_LOG.as_bytes()).unwrap();

        let err = store.set_selected("Boost", true).unwrap_err();
        assert!(matches!(err, SessionError::UnknownSensor(_)));
    }

    #[test]
    fn test_select_matching_and_deselect_all() {
        let mut store = SessionStore::new();
        store.load("trip.csv", LONG_LOG.as_bytes()).unwrap();

        assert_eq!(store.select_matching("rp"), 1);
        assert_eq!(store.selected(), vec!["RPM".to_string()]);

        assert_eq!(store.select_matching(""), 2);
        assert_eq!(store.selected_count(), 2);

        store.deselect_all();
        assert_eq!(store.selected_count(), 0);
    }

    #[test]
    fn test_sensor_search_filter() {
        let mut store = SessionStore::new();
        store.load("trip.csv", LONG_LOG.as_bytes()).unwrap();

        let entries = store.sensors(Some("spee"));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Speed");
    }

    #[test]
    fn test_cache_retention() {
        let mut store = SessionStore::new();
        for i in 0..20 {
            let raw = format!("time(ms);S\n{};{}\n", i * 1000, i);
            store.load(&format!("log{i}.csv"), raw.as_bytes()).unwrap();
        }

        assert!(store.cached_tables() <= DEFAULT_MAX_CACHED_TABLES);
        // The active (most recent) table is never evicted.
        assert!(store.table().is_some());
    }
}
