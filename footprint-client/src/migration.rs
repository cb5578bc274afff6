//! One-time migration of cached records into the server
//!
//! Each cached record is geocoded when it has no coordinates and then
//! created under the couple code. Records with bad data are skipped for
//! good. Records that fail for a transient reason (server or geocoder
//! unreachable) are kept aside and retried on the next run; the completion
//! marker is only written once nothing is left to retry.

use chrono::NaiveDate;
use footprint_common::models::MAX_RATING;
use footprint_common::{CoupleCode, LatLng, NewLocation};
use tracing::{info, warn};

use crate::api_client::FootprintApi;
use crate::cache::{CachedRecord, LocalCache};
use crate::error::ClientError;
use crate::map::Geocoder;

#[derive(Debug, Clone, PartialEq)]
pub enum MigrationOutcome {
    /// Stored on the server under the given id
    Migrated { id: i64 },
    /// The record itself is unusable; it will not be retried
    Skipped { reason: String },
    /// Delivery failed; the record stays pending for the next run
    Deferred { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordReport {
    pub name: String,
    pub outcome: MigrationOutcome,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationReport {
    pub records: Vec<RecordReport>,
    /// The marker was already present; nothing was attempted
    pub already_done: bool,
}

impl MigrationReport {
    fn count(&self, pred: impl Fn(&MigrationOutcome) -> bool) -> usize {
        self.records.iter().filter(|r| pred(&r.outcome)).count()
    }

    pub fn migrated(&self) -> usize {
        self.count(|o| matches!(o, MigrationOutcome::Migrated { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, MigrationOutcome::Skipped { .. }))
    }

    pub fn deferred(&self) -> usize {
        self.count(|o| matches!(o, MigrationOutcome::Deferred { .. }))
    }

    /// True when this run finished the migration
    pub fn is_complete(&self) -> bool {
        self.already_done || self.deferred() == 0
    }
}

/// Push every cached record to the server once
///
/// A run that defers records leaves them in the pending key; the next run
/// works from that list instead of the full cache, so records already
/// delivered are never sent twice.
pub async fn migrate_cache(
    cache: &LocalCache,
    api: &dyn FootprintApi,
    geocoder: &dyn Geocoder,
    code: &CoupleCode,
    today: NaiveDate,
) -> Result<MigrationReport, ClientError> {
    if let Some(at) = cache.migration_completed_at() {
        info!("Cache already migrated at {}", at);
        return Ok(MigrationReport {
            records: Vec::new(),
            already_done: true,
        });
    }

    let source = match cache.pending_migration() {
        Some(pending) => {
            info!("Retrying {} pending records", pending.len());
            pending
        }
        None => cache.load().locations,
    };
    info!(
        "Migrating {} cached records to couple {}",
        source.len(),
        code
    );

    let mut records = Vec::with_capacity(source.len());
    let mut pending = Vec::new();
    for record in &source {
        let outcome = match migrate_record(record, api, geocoder, code, today).await {
            Ok(id) => MigrationOutcome::Migrated { id },
            Err(Failure::Invalid(reason)) => {
                warn!("Skipped cached record '{}': {}", record.name, reason);
                MigrationOutcome::Skipped { reason }
            }
            Err(Failure::Transient(reason)) => {
                warn!("Deferred cached record '{}': {}", record.name, reason);
                pending.push(record.clone());
                MigrationOutcome::Deferred { reason }
            }
        };
        records.push(RecordReport {
            name: record.name.clone(),
            outcome,
        });
    }

    if pending.is_empty() {
        cache.clear_pending_migration()?;
        cache.mark_migration_complete()?;
    } else {
        cache.set_pending_migration(&pending)?;
    }

    let report = MigrationReport {
        records,
        already_done: false,
    };
    info!(
        "Migration run finished: {} migrated, {} skipped, {} deferred",
        report.migrated(),
        report.skipped(),
        report.deferred()
    );
    Ok(report)
}

enum Failure {
    Invalid(String),
    Transient(String),
}

async fn migrate_record(
    record: &CachedRecord,
    api: &dyn FootprintApi,
    geocoder: &dyn Geocoder,
    code: &CoupleCode,
    today: NaiveDate,
) -> Result<i64, Failure> {
    if record.name.trim().is_empty() {
        return Err(Failure::Invalid("missing name".to_string()));
    }
    if !(0..=i64::from(MAX_RATING)).contains(&record.rating) {
        return Err(Failure::Invalid(format!(
            "rating {} out of range",
            record.rating
        )));
    }

    let position = match record.position() {
        Some(position) => position,
        None => locate(record, geocoder).await?,
    };

    let request = NewLocation {
        couple_code: code.to_string(),
        name: record.name.trim().to_string(),
        address: record.address.trim().to_string(),
        lat: position.lat,
        lng: position.lng,
        category: record.category,
        rating: record.rating,
        date: Some(
            record
                .visit_date
                .or_else(|| record.created_at.map(|ts| ts.date_naive()))
                .unwrap_or(today),
        ),
        time: record.time,
        memo: record
            .memo
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string),
        photos: record.photos.clone(),
    };

    match api.create_location(&request).await {
        Ok(stored) => Ok(stored.id),
        // The server looked at the record and refused it
        Err(ClientError::Rejected { status, message }) if status < 500 => Err(
            Failure::Invalid(format!("create rejected ({}): {}", status, message)),
        ),
        Err(e) => Err(Failure::Transient(format!("create failed: {}", e))),
    }
}

async fn locate(record: &CachedRecord, geocoder: &dyn Geocoder) -> Result<LatLng, Failure> {
    if record.address.trim().is_empty() {
        return Err(Failure::Invalid(
            "no coordinates and no address".to_string(),
        ));
    }

    match geocoder.geocode(record.address.trim()).await {
        Ok(Some(position)) => Ok(position),
        Ok(None) => Err(Failure::Invalid(format!(
            "address not found: {}",
            record.address
        ))),
        Err(e) => Err(Failure::Transient(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{FakeApi, FakeGeocoder};
    use crate::cache::DATA_KEY;
    use footprint_common::Category;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
    }

    fn seeded_cache(dir: &TempDir) -> LocalCache {
        let cache = LocalCache::open(dir.path()).unwrap();
        cache
            .set_raw(
                DATA_KEY,
                r#"{"locations":[
                    {"name":"교동짬뽕","category":"restaurant","address":"서울특별시 마포구 와우산로 94","lat":37.5563,"lng":126.9223,"visitDate":"2024-01-15","rating":4},
                    {"name":"남산타워","category":"travel","address":"서울 용산구 남산공원길 105","visitDate":"2024-01-20","rating":5},
                    {"name":"어딘가","category":"etc","address":"존재하지 않는 주소","rating":3},
                    {"name":"","category":"cafe","address":"x","rating":1},
                    {"name":"별점 과다","category":"cafe","address":"서울 용산구 남산공원길 105","rating":9}
                ]}"#,
            )
            .unwrap();
        cache
    }

    #[tokio::test]
    async fn test_migration_reports_each_record() {
        let dir = TempDir::new().unwrap();
        let cache = seeded_cache(&dir);
        let api = FakeApi::default();
        let geocoder = FakeGeocoder::default();
        let code = CoupleCode::parse("AB12CD34").unwrap();

        let report = migrate_cache(&cache, &api, &geocoder, &code, today())
            .await
            .unwrap();

        assert!(!report.already_done);
        assert_eq!(report.records.len(), 5);
        assert_eq!(report.migrated(), 2);
        assert_eq!(report.skipped(), 3);
        assert!(matches!(
            report.records[0].outcome,
            MigrationOutcome::Migrated { .. }
        ));
        assert!(matches!(
            report.records[1].outcome,
            MigrationOutcome::Migrated { .. }
        ));
        match &report.records[2].outcome {
            MigrationOutcome::Skipped { reason } => assert!(reason.contains("not found")),
            other => panic!("unexpected outcome {:?}", other),
        }

        let stored = api.stored();
        assert_eq!(stored.len(), 2);
        let tower = stored.iter().find(|l| l.name == "남산타워").unwrap();
        assert_eq!(tower.category, Category::Travel);
        assert_eq!(tower.position(), FakeGeocoder::KNOWN_POSITION);
        assert!(cache.migration_completed_at().is_some());
    }

    #[tokio::test]
    async fn test_migration_runs_once() {
        let dir = TempDir::new().unwrap();
        let cache = seeded_cache(&dir);
        let api = FakeApi::default();
        let geocoder = FakeGeocoder::default();
        let code = CoupleCode::parse("AB12CD34").unwrap();

        migrate_cache(&cache, &api, &geocoder, &code, today())
            .await
            .unwrap();
        let second = migrate_cache(&cache, &api, &geocoder, &code, today())
            .await
            .unwrap();

        assert!(second.already_done);
        assert!(second.records.is_empty());
        assert_eq!(api.stored().len(), 2);
    }

    #[tokio::test]
    async fn test_create_failure_skips_record() {
        let dir = TempDir::new().unwrap();
        let cache = seeded_cache(&dir);
        let api = FakeApi::failing();
        let geocoder = FakeGeocoder::default();
        let code = CoupleCode::parse("AB12CD34").unwrap();

        let report = migrate_cache(&cache, &api, &geocoder, &code, today())
            .await
            .unwrap();

        assert_eq!(report.migrated(), 0);
        match &report.records[0].outcome {
            MigrationOutcome::Deferred { reason } => assert!(reason.starts_with("create failed")),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(!report.is_complete());
        assert_eq!(cache.migration_completed_at(), None);
    }

    #[tokio::test]
    async fn test_deferred_records_retry_once_server_is_back() {
        let dir = TempDir::new().unwrap();
        let cache = seeded_cache(&dir);
        let geocoder = FakeGeocoder::default();
        let code = CoupleCode::parse("AB12CD34").unwrap();

        let first = migrate_cache(&cache, &FakeApi::failing(), &geocoder, &code, today())
            .await
            .unwrap();
        assert_eq!(first.migrated(), 0);
        assert_eq!(first.deferred(), 2);
        assert_eq!(first.skipped(), 3);
        assert_eq!(cache.pending_migration().map(|p| p.len()), Some(2));

        let api = FakeApi::default();
        let second = migrate_cache(&cache, &api, &geocoder, &code, today())
            .await
            .unwrap();
        assert!(!second.already_done);
        assert!(second.is_complete());
        assert_eq!(second.records.len(), 2);
        assert_eq!(second.migrated(), 2);
        assert_eq!(api.stored().len(), 2);
        assert!(cache.migration_completed_at().is_some());
        assert_eq!(cache.pending_migration(), None);
    }

    #[tokio::test]
    async fn test_retry_does_not_resend_delivered_records() {
        let dir = TempDir::new().unwrap();
        let cache = seeded_cache(&dir);
        let api = FakeApi::default();
        let code = CoupleCode::parse("AB12CD34").unwrap();

        // Geocoder down: the record with coordinates goes through, the
        // two needing a lookup wait
        let down = FakeGeocoder { down: true };
        let first = migrate_cache(&cache, &api, &down, &code, today())
            .await
            .unwrap();
        assert_eq!(first.migrated(), 1);
        assert_eq!(first.deferred(), 2);

        let second = migrate_cache(&cache, &api, &FakeGeocoder::default(), &code, today())
            .await
            .unwrap();
        assert_eq!(second.migrated(), 1);
        assert_eq!(second.skipped(), 1);
        assert!(second.is_complete());

        let names: Vec<String> = api.stored().into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["교동짬뽕".to_string(), "남산타워".to_string()]);
    }
}
