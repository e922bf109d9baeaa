use std::sync::Arc;

use axum::{
    Json, debug_handler,
    extract::{Path, State},
};
use axum_extra::extract::{Query, WithRejection};
use common::{
    response::{ApiResponse, ProductDetail, ProductListResponse},
    search_params::{ApiSearchInput, LEGACY_MAX_LIMIT, MAX_LIMIT, ProductQuery},
};
use metrics::{Metrics, put_metric};
use tokio::time::Instant;
use tracing::debug;

use crate::{ServerState, routes::error_message_erasure::ApiError};

type SearchInput = WithRejection<Query<ApiSearchInput>, ApiError>;

async fn list_products(
    state: &ServerState,
    route: &'static str,
    query: ProductQuery,
) -> Result<Json<ProductListResponse>, ApiError> {
    let start_time = Instant::now();

    let response = match state.db.search_products(&query).await {
        Ok(response) => response,
        Err(err) => {
            put_metric!(Metrics::ProductListingFailed, 1, "route" => route);
            return Err(ApiError::from_connector(err, "Error fetching products"));
        }
    };

    put_metric!(Metrics::ProductListing, 1, "route" => route);

    if response.data.products.is_empty() {
        put_metric!(Metrics::ProductListingEmpty, 1, "route" => route);
    }

    debug!("Request time: {}ms", start_time.elapsed().as_millis());

    Ok(Json(response))
}

#[debug_handler]
pub(crate) async fn products_handler(
    State(state): State<Arc<ServerState>>,
    WithRejection(Query(input), _): SearchInput,
) -> Result<Json<ProductListResponse>, ApiError> {
    list_products(&state, "products", input.normalize(MAX_LIMIT)).await
}

#[debug_handler]
pub(crate) async fn category_products_handler(
    State(state): State<Arc<ServerState>>,
    WithRejection(Path(category), _): WithRejection<Path<String>, ApiError>,
    WithRejection(Query(input), _): SearchInput,
) -> Result<Json<ProductListResponse>, ApiError> {
    let query = input.with_category(category).normalize(MAX_LIMIT);

    list_products(&state, "category", query).await
}

#[debug_handler]
pub(crate) async fn brand_products_handler(
    State(state): State<Arc<ServerState>>,
    WithRejection(Path(brand), _): WithRejection<Path<String>, ApiError>,
    WithRejection(Query(input), _): SearchInput,
) -> Result<Json<ProductListResponse>, ApiError> {
    let query = input.with_brand(brand).normalize(MAX_LIMIT);

    list_products(&state, "brand", query).await
}

#[debug_handler]
pub(crate) async fn legacy_search_handler(
    State(state): State<Arc<ServerState>>,
    WithRejection(Query(input), _): SearchInput,
) -> Result<Json<ProductListResponse>, ApiError> {
    let query = input.normalize_strict(LEGACY_MAX_LIMIT)?;

    list_products(&state, "search", query).await
}

#[debug_handler]
pub(crate) async fn legacy_filter_handler(
    State(state): State<Arc<ServerState>>,
    WithRejection(Query(input), _): SearchInput,
) -> Result<Json<ProductListResponse>, ApiError> {
    let query = input.normalize_strict(LEGACY_MAX_LIMIT)?;

    list_products(&state, "filter", query).await
}

#[debug_handler]
pub(crate) async fn product_detail_handler(
    State(state): State<Arc<ServerState>>,
    WithRejection(Path(slug), _): WithRejection<Path<String>, ApiError>,
) -> Result<Json<ApiResponse<ProductDetail>>, ApiError> {
    let product = state
        .db
        .find_product(&slug)
        .await
        .map_err(|err| ApiError::from_connector(err, "Error fetching product"))?;

    let Some(product) = product else {
        put_metric!(Metrics::ProductNotFound, 1);
        return Err(ApiError::NotFound(format!("Product {slug}")));
    };

    Ok(Json(ApiResponse::ok(ProductDetail::from(product))))
}
