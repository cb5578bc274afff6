//! Couple code endpoints
//!
//! - POST /api/couple/create
//! - GET  /api/couple/:code
//! - POST /api/couple/join

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use chrono::NaiveDate;
use footprint_common::{Couple, CoupleCode};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::identity;
use crate::AppState;

/// Create-couple request body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCoupleRequest {
    /// "YYYY-MM-DD"; blank means no anniversary recorded
    #[serde(default)]
    pub anniversary_date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCoupleResponse {
    pub success: bool,
    pub couple_code: CoupleCode,
    pub message: String,
}

/// Join request body (validate a code typed by the partner)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinCoupleRequest {
    pub couple_code: String,
}

#[derive(Debug, Serialize)]
pub struct CoupleResponse {
    pub success: bool,
    pub couple: Couple,
}

/// POST /api/couple/create
pub async fn create_couple(
    State(state): State<AppState>,
    payload: Result<Json<CreateCoupleRequest>, JsonRejection>,
) -> ApiResult<Json<CreateCoupleResponse>> {
    let Json(request) = payload?;
    let anniversary_date = parse_anniversary(request.anniversary_date.as_deref())?;

    let couple_code = state
        .store
        .create_couple(anniversary_date)
        .await
        .map_err(ApiError::store("커플 코드 생성에 실패했습니다."))?;

    info!("Issued couple code {}", couple_code);

    Ok(Json(CreateCoupleResponse {
        success: true,
        couple_code,
        message: "커플 코드가 생성되었습니다! 💕".to_string(),
    }))
}

/// GET /api/couple/:code
pub async fn get_couple(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<CoupleResponse>> {
    let couple = identity::validate_code(state.store.as_ref(), &code)
        .await
        .map_err(ApiError::store("커플 코드 조회에 실패했습니다."))?;

    Ok(Json(CoupleResponse {
        success: true,
        couple,
    }))
}

/// POST /api/couple/join
pub async fn join_couple(
    State(state): State<AppState>,
    payload: Result<Json<JoinCoupleRequest>, JsonRejection>,
) -> ApiResult<Json<CoupleResponse>> {
    let Json(request) = payload?;

    let couple = identity::validate_code(state.store.as_ref(), &request.couple_code)
        .await
        .map_err(ApiError::store("커플 코드 조회에 실패했습니다."))?;

    info!("Partner joined couple {}", couple.couple_code);

    Ok(Json(CoupleResponse {
        success: true,
        couple,
    }))
}

fn parse_anniversary(raw: Option<&str>) -> ApiResult<Option<NaiveDate>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                ApiError::BadRequest(format!("기념일 형식이 올바르지 않습니다: {}", text))
            }),
    }
}
