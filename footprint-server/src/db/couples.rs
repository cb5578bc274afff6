//! Couple row queries

use chrono::NaiveDate;
use footprint_common::{time, Couple, CoupleCode, Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// Insert a couple row
pub async fn insert_couple(pool: &SqlitePool, couple: &Couple) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO couples (couple_code, anniversary_date, created_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(couple.couple_code.as_str())
    .bind(couple.anniversary_date.map(|d| d.to_string()))
    .bind(time::to_storage(&couple.created_at))
    .execute(pool)
    .await?;

    Ok(())
}

/// Load a couple by exact code match
pub async fn load_couple(pool: &SqlitePool, code: &CoupleCode) -> Result<Option<Couple>> {
    let row = sqlx::query(
        r#"
        SELECT couple_code, anniversary_date, created_at
        FROM couples
        WHERE couple_code = ?
        "#,
    )
    .bind(code.as_str())
    .fetch_optional(pool)
    .await?;

    row.map(|row| couple_from_row(&row)).transpose()
}

/// Map a `couples` row into the shared model
fn couple_from_row(row: &SqliteRow) -> Result<Couple> {
    let code: String = row.try_get("couple_code")?;
    let anniversary: Option<String> = row.try_get("anniversary_date")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(Couple {
        couple_code: CoupleCode::parse(&code)?,
        anniversary_date: anniversary
            .as_deref()
            .map(|text| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
            .transpose()
            .map_err(|e| Error::Internal(format!("Corrupt anniversary_date for {}: {}", code, e)))?,
        created_at: time::from_storage(&created_at)
            .map_err(|e| Error::Internal(format!("Corrupt created_at for {}: {}", code, e)))?,
    })
}
