use common::{
    product::view::ProductView,
    response::{AppliedFilters, FilterMetadata, Pagination, ProductListData, ProductListResponse},
    search_params::ProductQuery,
};
use tracing::debug;

use crate::structs::{Count, NamedFacet, RawFacets};

/// Shapes the three pipeline results into the listing response. Missing
/// count or facet documents are treated as "no data", never as errors.
pub struct ResultAssembler<'a> {
    query: &'a ProductQuery,
}

fn names(facets: Vec<NamedFacet>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for facet in facets {
        if !facet.name.is_empty() && !names.contains(&facet.name) {
            names.push(facet.name);
        }
    }

    names
}

impl<'a> ResultAssembler<'a> {
    pub fn new(query: &'a ProductQuery) -> Self {
        Self { query }
    }

    pub fn filter_metadata(facets: Option<RawFacets>) -> FilterMetadata {
        let Some(facets) = facets else {
            debug!("No metadata document, returning empty filters");
            return FilterMetadata::default();
        };

        let bounds = facets.price_range.into_iter().next().unwrap_or_default();

        FilterMetadata {
            min_price: bounds.min_price.unwrap_or(0.0),
            max_price: bounds.max_price.unwrap_or(0.0),
            available_brands: names(facets.brands),
            available_categories: names(facets.categories),
            available_age_ranges: names(facets.age_ranges),
            conditions: facets
                .conditions
                .into_iter()
                .filter_map(|condition| condition.value)
                .collect(),
            in_stock_count: facets
                .in_stock
                .into_iter()
                .next()
                .map(|count| count.total_count)
                .unwrap_or(0),
        }
    }

    pub fn assemble(
        &self,
        products: Vec<ProductView>,
        count: Option<Count>,
        facets: Option<RawFacets>,
    ) -> ProductListResponse {
        let total_products = count.map(|count| count.total_count).unwrap_or(0);

        ProductListResponse {
            success: true,
            data: ProductListData {
                products,
                pagination: Pagination::new(self.query.page, self.query.limit, total_products),
                filters: Self::filter_metadata(facets),
                applied_filters: AppliedFilters::from(self.query),
            },
        }
    }
}
