//! Couple code issuing and validation

use footprint_common::{Couple, CoupleCode, Error, Result};

use crate::db::RecordStore;

/// Issue a new couple code
///
/// No uniqueness check happens here. A collision surfaces as a primary-key
/// failure on insert.
pub fn create_code() -> CoupleCode {
    CoupleCode::generate()
}

/// Resolve user-supplied text to an existing couple
///
/// Malformed input can never match a stored code, so it is reported as
/// `NotFound` like any other unknown code.
pub async fn validate_code(store: &dyn RecordStore, raw: &str) -> Result<Couple> {
    let code = CoupleCode::parse(raw)
        .map_err(|_| Error::NotFound(format!("couple {}", raw.trim())))?;
    store.get_couple(&code).await
}
