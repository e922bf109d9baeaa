use serde::Serialize;

use crate::{
    product::{
        enums::{Condition, Sort},
        view::ProductView,
    },
    search_params::ProductQuery,
};

#[derive(Serialize, Debug)]
pub struct ProductListResponse {
    pub success: bool,
    pub data: ProductListData,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProductListData {
    pub products: Vec<ProductView>,
    pub pagination: Pagination,
    pub filters: FilterMetadata,
    pub applied_filters: AppliedFilters,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u64,
    pub total_products: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub limit: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total_products: u64) -> Self {
        let total_pages = total_products.div_ceil(u64::from(limit.max(1)));

        Self {
            current_page: page,
            total_pages,
            total_products,
            has_next_page: u64::from(page) < total_pages,
            has_prev_page: page > 1,
            limit,
        }
    }
}

/// Sidebar data. Always fully populated, zeroes and empty lists mean "no data".
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterMetadata {
    pub min_price: f64,
    pub max_price: f64,
    pub available_brands: Vec<String>,
    pub available_categories: Vec<String>,
    pub available_age_ranges: Vec<String>,
    pub conditions: Vec<String>,
    pub in_stock_count: u64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFilters {
    pub search: Option<String>,
    pub brands: Vec<String>,
    pub categories: Vec<String>,
    pub age_ranges: Vec<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub conditions: Vec<Condition>,
    pub min_rating: Option<f64>,
    pub in_stock: bool,
    pub sort: Sort,
}

impl From<&ProductQuery> for AppliedFilters {
    fn from(query: &ProductQuery) -> Self {
        Self {
            search: query.search.clone(),
            brands: query.brands.clone(),
            categories: query.categories.clone(),
            age_ranges: query.age_ranges.clone(),
            min_price: query.min_price,
            max_price: query.max_price,
            conditions: query.conditions.clone(),
            min_rating: query.min_rating,
            in_stock: query.in_stock,
            sort: query.sort,
        }
    }
}

/// Single product page: the joined view plus stock summed over active variants.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: ProductView,
    pub total_stock: i64,
}

impl From<ProductView> for ProductDetail {
    fn from(product: ProductView) -> Self {
        Self {
            total_stock: product.total_stock(),
            product,
        }
    }
}

/// `{ success: true, data }` wrapper for the smaller endpoints.
#[derive(Serialize, Debug)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
