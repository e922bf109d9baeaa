use std::sync::Arc;

use axum::{Json, debug_handler, extract::State};
use common::{
    reference::{AgeRange, Brand, CategoryNode},
    response::ApiResponse,
};

use crate::{ServerState, routes::error_message_erasure::ApiError};

#[debug_handler]
pub(crate) async fn brands_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<ApiResponse<Vec<Brand>>>, ApiError> {
    let brands = state
        .db
        .brands()
        .await
        .map_err(|err| ApiError::from_connector(err, "Error fetching brands"))?;

    Ok(Json(ApiResponse::ok(brands)))
}

#[debug_handler]
pub(crate) async fn categories_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<ApiResponse<Vec<CategoryNode>>>, ApiError> {
    let tree = state
        .db
        .category_tree()
        .await
        .map_err(|err| ApiError::from_connector(err, "Error fetching categories"))?;

    Ok(Json(ApiResponse::ok(tree)))
}

#[debug_handler]
pub(crate) async fn age_ranges_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<ApiResponse<Vec<AgeRange>>>, ApiError> {
    let age_ranges = state
        .db
        .age_ranges()
        .await
        .map_err(|err| ApiError::from_connector(err, "Error fetching age ranges"))?;

    Ok(Json(ApiResponse::ok(age_ranges)))
}
