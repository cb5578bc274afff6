//! Location (restaurants table) queries
//!
//! `location_from_row` is the single place a stored row turns into a
//! [`Location`]; unknown categories normalize to `etc` here.

use chrono::{DateTime, NaiveDate, Utc};
use footprint_common::models::hhmm;
use footprint_common::{time, Category, CoupleCode, Error, Location, NewLocation, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const SELECT_COLUMNS: &str = "id, couple_code, name, address, latitude, longitude, type, rating, \
     visit_date, visit_time, memo, photos, created_at";

/// Insert a validated create request and return the new row id
pub async fn insert_location(
    pool: &SqlitePool,
    code: &CoupleCode,
    record: &NewLocation,
    created_at: &DateTime<Utc>,
) -> Result<i64> {
    let photos = serde_json::to_string(&record.photos)?;

    let result = sqlx::query(
        r#"
        INSERT INTO restaurants (
            couple_code, name, address, latitude, longitude, type, rating,
            visit_date, visit_time, memo, photos, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(code.as_str())
    .bind(record.name.trim())
    .bind(record.address.trim())
    .bind(record.lat)
    .bind(record.lng)
    .bind(record.category.as_str())
    .bind(record.rating)
    .bind(record.date.map(|d| d.to_string()))
    .bind(record.time.as_ref().map(hhmm::format))
    .bind(record.memo_trimmed())
    .bind(photos)
    .bind(time::to_storage(created_at))
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Load one location by id
pub async fn load_location(pool: &SqlitePool, id: i64) -> Result<Option<Location>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM restaurants WHERE id = ?",
        SELECT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(|row| location_from_row(&row)).transpose()
}

/// All locations for a couple, newest-created first
pub async fn list_locations(pool: &SqlitePool, code: &CoupleCode) -> Result<Vec<Location>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM restaurants WHERE couple_code = ? ORDER BY created_at DESC, id DESC",
        SELECT_COLUMNS
    ))
    .bind(code.as_str())
    .fetch_all(pool)
    .await?;

    rows.iter().map(location_from_row).collect()
}

/// Delete by id and couple code; returns the number of rows removed
pub async fn delete_location(pool: &SqlitePool, id: i64, code: &CoupleCode) -> Result<u64> {
    let result = sqlx::query("DELETE FROM restaurants WHERE id = ? AND couple_code = ?")
        .bind(id)
        .bind(code.as_str())
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Map a `restaurants` row into the shared model
fn location_from_row(row: &SqliteRow) -> Result<Location> {
    let id: i64 = row.try_get("id")?;
    let corrupt = |field: &str, detail: String| {
        Error::Internal(format!("Corrupt {} in restaurant {}: {}", field, id, detail))
    };

    let code: String = row.try_get("couple_code")?;
    let category: String = row.try_get("type")?;
    let rating: i64 = row.try_get("rating")?;
    let visit_date: Option<String> = row.try_get("visit_date")?;
    let visit_time: Option<String> = row.try_get("visit_time")?;
    let photos: String = row.try_get("photos")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(Location {
        id,
        couple_code: CoupleCode::parse(&code)?,
        name: row.try_get("name")?,
        address: row.try_get("address")?,
        category: Category::normalize(&category),
        rating: u8::try_from(rating).map_err(|e| corrupt("rating", e.to_string()))?,
        visit_date: visit_date
            .as_deref()
            .map(|text| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
            .transpose()
            .map_err(|e| corrupt("visit_date", e.to_string()))?,
        visit_time: visit_time
            .as_deref()
            .map(hhmm::parse)
            .transpose()
            .map_err(|e| corrupt("visit_time", e.to_string()))?,
        memo: row.try_get("memo")?,
        photos: serde_json::from_str(&photos).map_err(|e| corrupt("photos", e.to_string()))?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        created_at: time::from_storage(&created_at)
            .map_err(|e| corrupt("created_at", e.to_string()))?,
    })
}
