use std::sync::Arc;

use axum::{
    Json, debug_handler,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use common::{
    product::{
        base::Product,
        input::{ProductInput, ProductPatch},
    },
    response::ApiResponse,
};
use metrics::{Metrics, put_metric};
use serde::Serialize;
use tracing::info;

use crate::{ServerState, routes::error_message_erasure::ApiError};

const SAVE_FAILED: &str = "Error saving product";

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SavedProduct {
    #[serde(rename = "_id")]
    id: String,
    slug: String,
    effective_price: f64,
    total_stock: i64,
}

impl From<&Product> for SavedProduct {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.map(|id| id.to_hex()).unwrap_or_default(),
            slug: product.slug.clone(),
            effective_price: product.effective_price(),
            total_stock: product.total_stock(),
        }
    }
}

#[debug_handler]
pub(crate) async fn create_product_handler(
    State(state): State<Arc<ServerState>>,
    WithRejection(Json(input), _): WithRejection<Json<ProductInput>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state
        .db
        .create_product(input)
        .await
        .map_err(|err| ApiError::from_connector(err, SAVE_FAILED))?;

    put_metric!(Metrics::ProductCreated, 1);
    info!("Product created: {}", product.slug);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(SavedProduct::from(&product))),
    ))
}

#[debug_handler]
pub(crate) async fn update_product_handler(
    State(state): State<Arc<ServerState>>,
    WithRejection(Path(id), _): WithRejection<Path<String>, ApiError>,
    WithRejection(Json(patch), _): WithRejection<Json<ProductPatch>, ApiError>,
) -> Result<Json<ApiResponse<SavedProduct>>, ApiError> {
    let product = state
        .db
        .update_product(&id, patch)
        .await
        .map_err(|err| ApiError::from_connector(err, SAVE_FAILED))?;

    put_metric!(Metrics::ProductUpdated, 1);
    info!("Product updated: {}", product.slug);

    Ok(Json(ApiResponse::ok(SavedProduct::from(&product))))
}
