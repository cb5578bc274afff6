//! Local cache
//!
//! A directory of small JSON files, one per key, mirroring what the browser
//! build kept in local storage. Reads tolerate missing or corrupt entries;
//! writes go through a temp file and rename.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use footprint_common::config::{ClientSection, RootFolder};
use footprint_common::models::hhmm;
use footprint_common::{time, Category, CoupleCode, LatLng, Location, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Location list plus save time
pub const DATA_KEY: &str = "footprintData";
pub const ANNIVERSARY_KEY: &str = "anniversaryDate";
pub const COUPLE_CODE_KEY: &str = "coupleCode";
/// Written once the cached records have been pushed to the server
pub const MIGRATION_MARKER_KEY: &str = "migrationComplete";
/// Records a previous migration run could not deliver
pub const MIGRATION_PENDING_KEY: &str = "migrationPending";

pub const DEFAULT_AUTOSAVE: Duration = Duration::from_secs(30);

/// Auto-save period from `[client] autosave_secs`; zero or unset uses the default
pub fn autosave_period(section: &ClientSection) -> Duration {
    section
        .autosave_secs
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_AUTOSAVE)
}

/// One cached record
///
/// Older caches were written before coordinates were captured and used the
/// browser form's field names, so both spellings are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default = "default_category", alias = "type")]
    pub category: Category,
    #[serde(default)]
    pub rating: i64,
    #[serde(default, alias = "date")]
    pub visit_date: Option<NaiveDate>,
    #[serde(default, with = "hhmm")]
    pub time: Option<NaiveTime>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default, alias = "latitude")]
    pub lat: Option<f64>,
    #[serde(default, alias = "longitude")]
    pub lng: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_category() -> Category {
    Category::Etc
}

impl CachedRecord {
    pub fn position(&self) -> Option<LatLng> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(LatLng::new(lat, lng)),
            _ => None,
        }
    }
}

impl From<&Location> for CachedRecord {
    fn from(location: &Location) -> Self {
        Self {
            id: Some(location.id),
            name: location.name.clone(),
            address: location.address.clone(),
            category: location.category,
            rating: i64::from(location.rating),
            visit_date: location.visit_date,
            time: location.visit_time,
            memo: location.memo.clone(),
            photos: location.photos.clone(),
            lat: Some(location.latitude),
            lng: Some(location.longitude),
            created_at: Some(location.created_at),
        }
    }
}

/// Payload stored under [`DATA_KEY`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedData {
    #[serde(default)]
    pub locations: Vec<CachedRecord>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct LocalCache {
    dir: PathBuf,
}

impl LocalCache {
    /// Open (creating if needed) a cache directory
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Cache directory under the resolved root folder
    pub fn in_root(root: &RootFolder) -> Result<Self> {
        Self::open(root.cache_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    pub fn get_raw(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn get_json<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        let text = match self.get_raw(key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read cache key {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring corrupt cache key {}: {}", key, e);
                None
            }
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let text = serde_json::to_string(value)?;
        self.set_raw(key, &text)
    }

    /// Cached location list; missing or corrupt data reads as empty
    pub fn load(&self) -> CachedData {
        self.get_json(DATA_KEY).unwrap_or_default()
    }

    pub fn save(&self, locations: &[CachedRecord]) -> Result<()> {
        let data = CachedData {
            locations: locations.to_vec(),
            last_updated: Some(time::now()),
        };
        self.set_json(DATA_KEY, &data)?;
        debug!("Cached {} locations", data.locations.len());
        Ok(())
    }

    pub fn save_locations(&self, locations: &[Location]) -> Result<()> {
        let records: Vec<CachedRecord> = locations.iter().map(CachedRecord::from).collect();
        self.save(&records)
    }

    pub fn anniversary_date(&self) -> Option<NaiveDate> {
        self.get_json(ANNIVERSARY_KEY)
    }

    pub fn set_anniversary_date(&self, date: NaiveDate) -> Result<()> {
        self.set_json(ANNIVERSARY_KEY, &date)
    }

    pub fn couple_code(&self) -> Option<CoupleCode> {
        self.get_json(COUPLE_CODE_KEY)
    }

    pub fn set_couple_code(&self, code: &CoupleCode) -> Result<()> {
        self.set_json(COUPLE_CODE_KEY, code)
    }

    /// When the migration completed, if it has
    pub fn migration_completed_at(&self) -> Option<DateTime<Utc>> {
        self.get_json(MIGRATION_MARKER_KEY)
    }

    pub fn mark_migration_complete(&self) -> Result<()> {
        self.set_json(MIGRATION_MARKER_KEY, &time::now())
    }

    /// Records left over from an interrupted migration, if any
    pub fn pending_migration(&self) -> Option<Vec<CachedRecord>> {
        self.get_json(MIGRATION_PENDING_KEY)
    }

    pub fn set_pending_migration(&self, records: &[CachedRecord]) -> Result<()> {
        self.set_json(MIGRATION_PENDING_KEY, &records)
    }

    pub fn clear_pending_migration(&self) -> Result<()> {
        self.remove(MIGRATION_PENDING_KEY)
    }
}

/// Periodic background save of the latest location snapshot
///
/// The owner publishes snapshots on a `watch` channel; the saver writes only
/// when the snapshot changed since its last write. Failures are logged and
/// dropped.
pub struct AutoSaver {
    cache: Arc<LocalCache>,
    snapshot: watch::Receiver<Vec<Location>>,
    handle: JoinHandle<()>,
}

impl AutoSaver {
    pub fn spawn(
        cache: Arc<LocalCache>,
        snapshot: watch::Receiver<Vec<Location>>,
        period: Duration,
    ) -> Self {
        let task_cache = Arc::clone(&cache);
        let mut task_snapshot = snapshot.clone();

        let handle = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut ticker = tokio::time::interval_at(start, period);
            loop {
                ticker.tick().await;
                match task_snapshot.has_changed() {
                    Ok(true) => {
                        let locations = task_snapshot.borrow_and_update().clone();
                        write_snapshot(&task_cache, &locations);
                    }
                    Ok(false) => {}
                    Err(_) => break,
                }
            }
        });

        info!("Auto-save every {:?} to {}", period, cache.dir().display());
        Self {
            cache,
            snapshot,
            handle,
        }
    }

    /// Stop the timer and write the latest snapshot once more
    pub fn shutdown(self) {
        self.handle.abort();
        let locations = self.snapshot.borrow().clone();
        write_snapshot(&self.cache, &locations);
    }
}

fn write_snapshot(cache: &LocalCache, locations: &[Location]) {
    if let Err(e) = cache.save_locations(locations) {
        error!("Auto-save failed: {}", e);
    }
}
