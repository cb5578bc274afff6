//! Record store adapter
//!
//! Handlers talk to [`RecordStore`] rather than to sqlx directly, so the
//! backing store can be swapped (or replaced by a failing double in tests).
//! Every operation is a single insert/select/delete scoped by couple code.

use async_trait::async_trait;
use chrono::NaiveDate;
use footprint_common::{time, Couple, CoupleCode, Error, Location, NewLocation, Result};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use super::{couples, locations};
use crate::identity;

/// Couple-code scoped persistence operations
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new couple and return its generated code
    async fn create_couple(&self, anniversary_date: Option<NaiveDate>) -> Result<CoupleCode>;

    /// Look up a couple; `Error::NotFound` when no row matches
    async fn get_couple(&self, code: &CoupleCode) -> Result<Couple>;

    /// All locations for a couple, newest-created first
    async fn list_locations(&self, code: &CoupleCode) -> Result<Vec<Location>>;

    /// Insert a location and return the stored record with its assigned id
    async fn create_location(&self, code: &CoupleCode, record: &NewLocation) -> Result<Location>;

    /// Delete where both id and couple code match
    ///
    /// Returns the number of rows removed. Zero is not an error.
    async fn delete_location(&self, id: i64, code: &CoupleCode) -> Result<u64>;
}

/// SQLite-backed store
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn create_couple(&self, anniversary_date: Option<NaiveDate>) -> Result<CoupleCode> {
        let couple = Couple {
            couple_code: identity::create_code(),
            anniversary_date,
            created_at: time::now(),
        };

        couples::insert_couple(&self.pool, &couple).await?;
        debug!("Created couple {}", couple.couple_code);

        Ok(couple.couple_code)
    }

    async fn get_couple(&self, code: &CoupleCode) -> Result<Couple> {
        couples::load_couple(&self.pool, code)
            .await?
            .ok_or_else(|| Error::NotFound(format!("couple {}", code)))
    }

    async fn list_locations(&self, code: &CoupleCode) -> Result<Vec<Location>> {
        locations::list_locations(&self.pool, code).await
    }

    async fn create_location(&self, code: &CoupleCode, record: &NewLocation) -> Result<Location> {
        let id = locations::insert_location(&self.pool, code, record, &time::now()).await?;

        locations::load_location(&self.pool, id)
            .await?
            .ok_or_else(|| Error::Internal(format!("restaurant {} vanished after insert", id)))
    }

    async fn delete_location(&self, id: i64, code: &CoupleCode) -> Result<u64> {
        let removed = locations::delete_location(&self.pool, id, code).await?;
        if removed == 0 {
            warn!(
                "Delete of restaurant {} under couple {} matched no rows",
                id, code
            );
        }
        Ok(removed)
    }
}
