//! Restaurant/location endpoints
//!
//! - GET    /api/restaurants/:code
//! - POST   /api/restaurants
//! - DELETE /api/restaurants/:id

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use footprint_common::{CoupleCode, Location, NewLocation};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::identity;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct RestaurantListResponse {
    pub success: bool,
    pub restaurants: Vec<Location>,
}

#[derive(Debug, Serialize)]
pub struct RestaurantResponse {
    pub success: bool,
    pub restaurant: Location,
    pub message: String,
}

/// Delete request body; the couple code stands in for authorization
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRestaurantRequest {
    pub couple_code: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    /// Rows actually removed (0 when id and code did not match)
    pub deleted: u64,
    pub message: String,
}

/// GET /api/restaurants/:code
///
/// A well-formed code with no couple row simply yields an empty list.
pub async fn list_restaurants(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<RestaurantListResponse>> {
    let code = CoupleCode::parse(&code).map_err(ApiError::store("커플 코드가 올바르지 않습니다."))?;

    let restaurants = state
        .store
        .list_locations(&code)
        .await
        .map_err(ApiError::store("맛집 목록을 불러올 수 없습니다."))?;

    Ok(Json(RestaurantListResponse {
        success: true,
        restaurants,
    }))
}

/// POST /api/restaurants
pub async fn create_restaurant(
    State(state): State<AppState>,
    payload: Result<Json<NewLocation>, JsonRejection>,
) -> ApiResult<Json<RestaurantResponse>> {
    let Json(request) = payload?;
    let code = request
        .validate()
        .map_err(ApiError::store("맛집 정보가 올바르지 않습니다."))?;

    // The couple must exist before anything is filed under its code
    identity::validate_code(state.store.as_ref(), code.as_str())
        .await
        .map_err(ApiError::store("커플 코드 조회에 실패했습니다."))?;

    let restaurant = state
        .store
        .create_location(&code, &request)
        .await
        .map_err(ApiError::store("맛집 등록에 실패했습니다."))?;

    info!(
        "Saved restaurant {} ({}) for couple {}",
        restaurant.id, restaurant.name, code
    );

    Ok(Json(RestaurantResponse {
        success: true,
        restaurant,
        message: "맛집이 성공적으로 등록되었습니다! 💕".to_string(),
    }))
}

/// DELETE /api/restaurants/:id
///
/// Deleting under the wrong couple code removes nothing but still reports
/// success; `deleted` tells the caller whether a row went away.
pub async fn delete_restaurant(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<DeleteRestaurantRequest>, JsonRejection>,
) -> ApiResult<Json<DeleteResponse>> {
    let Path(id) = path.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let Json(request) = payload?;
    let code =
        CoupleCode::parse(&request.couple_code).map_err(ApiError::store("커플 코드가 올바르지 않습니다."))?;

    let deleted = state
        .store
        .delete_location(id, &code)
        .await
        .map_err(ApiError::store("맛집 삭제에 실패했습니다."))?;

    if deleted > 0 {
        info!("Deleted restaurant {} for couple {}", id, code);
    }

    Ok(Json(DeleteResponse {
        success: true,
        deleted,
        message: "맛집이 삭제되었습니다.".to_string(),
    }))
}
