//! Evaluates a [`FilterPlan`] over in-memory products, mirroring what the
//! rendered pipelines do in the database.

use std::{cmp::Ordering, collections::HashMap};

use common::product::{
    base::Product,
    view::{ProductView, ReferenceSummary},
};
use mongodb::bson::oid::ObjectId;

use super::{
    plan::FilterPlan,
    predicate::{Dimension, Predicate, SEARCHABLE_FIELDS},
    sort_stage::sort_fields,
};
use crate::{
    collections::products::SearchOutput,
    structs::{Count, NamedFacet, PriceBounds, RawFacets, ValueFacet},
};

pub(crate) struct MemoryCatalog {
    pub(crate) products: Vec<Product>,
    pub(crate) names: HashMap<ObjectId, String>,
}

fn matches(predicate: &Predicate, product: &Product) -> bool {
    match predicate {
        Predicate::Visible => product.is_publicly_visible(),
        Predicate::Search(text) => {
            let needle = text.to_lowercase();
            let contains = |value: &str| value.to_lowercase().contains(&needle);

            SEARCHABLE_FIELDS.iter().any(|field| match *field {
                "name" => contains(product.name.as_str()),
                "description" => product.description.as_deref().is_some_and(contains),
                "tags" => product.tags.iter().any(|tag| contains(tag.as_str())),
                "sku" => product.sku.as_deref().is_some_and(contains),
                _ => false,
            })
        }
        Predicate::BrandIn(ids) => ids.contains(&product.brand),
        Predicate::CategoryIn(ids) => product.categories.iter().any(|id| ids.contains(id)),
        Predicate::AgeRangeIn(ids) => product.age_range.is_some_and(|id| ids.contains(&id)),
        Predicate::ConditionIn(conditions) => conditions.contains(&product.condition),
        Predicate::MinRating(rating) => product.average_rating >= *rating,
        Predicate::InStock => product.is_in_stock(),
        Predicate::PriceRange { min, max } => {
            let price = product.effective_price();
            min.is_none_or(|min| price >= min) && max.is_none_or(|max| price <= max)
        }
    }
}

fn compare_field(field: &str, left: &Product, right: &Product) -> Ordering {
    match field {
        "createdAt" => left.created_at.cmp(&right.created_at),
        "effectivePrice" => left.effective_price().total_cmp(&right.effective_price()),
        "averageRating" => left.average_rating.total_cmp(&right.average_rating),
        "totalReviews" => left.total_reviews.cmp(&right.total_reviews),
        "name" => left.name.cmp(&right.name),
        _ => Ordering::Equal,
    }
}

impl MemoryCatalog {
    fn filtered<'a>(&'a self, predicates: &[&Predicate]) -> Vec<&'a Product> {
        self.products
            .iter()
            .filter(|product| predicates.iter().all(|predicate| matches(predicate, product)))
            .collect()
    }

    fn facet_scope(&self, plan: &FilterPlan, facet: Option<Dimension>) -> Vec<&Product> {
        let mut predicates = plan.shared_facet_predicates();
        predicates.extend(plan.facet_predicates(facet));

        self.filtered(&predicates)
    }

    fn summary(&self, id: ObjectId) -> Option<ReferenceSummary> {
        self.names.get(&id).map(|name| ReferenceSummary {
            id,
            name: name.clone(),
            slug: name.to_lowercase(),
        })
    }

    fn sorted_names(&self, ids: impl Iterator<Item = ObjectId>) -> Vec<NamedFacet> {
        let mut names: Vec<String> = ids.filter_map(|id| self.names.get(&id).cloned()).collect();
        names.sort();
        names.dedup();

        names.into_iter().map(|name| NamedFacet { name }).collect()
    }

    fn view(&self, product: &Product) -> ProductView {
        ProductView {
            id: product.id.unwrap_or_else(ObjectId::new),
            name: product.name.clone(),
            slug: product.slug.clone(),
            sku: product.sku.clone(),
            brand: self.summary(product.brand),
            categories: product
                .categories
                .iter()
                .filter_map(|id| self.summary(*id))
                .collect(),
            tags: product.tags.clone(),
            condition: product.condition,
            base_price: product.base_price,
            mrp: product.mrp,
            effective_price: product.effective_price(),
            stock_quantity: product.stock_quantity,
            has_variants: product.has_variants(),
            variants: vec![],
            images: product.images.clone(),
            description: product.description.clone(),
            specifications: vec![],
            features: vec![],
            warranty: product.warranty.clone(),
            average_rating: product.average_rating,
            total_reviews: product.total_reviews,
            created_at: product.created_at,
        }
    }

    pub(crate) fn search(&self, plan: &FilterPlan) -> SearchOutput {
        let mut listing_predicates = plan.pre_price_predicates();
        listing_predicates.extend(plan.price_predicates());

        let mut matched = self.filtered(&listing_predicates);
        let total_count = matched.len() as u64;

        matched.sort_by(|left, right| {
            sort_fields(plan.sort)
                .iter()
                .map(|(field, direction)| match direction {
                    1 => compare_field(field, left, right),
                    _ => compare_field(field, right, left),
                })
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| left.id.cmp(&right.id))
        });

        let products = matched
            .into_iter()
            .skip(plan.skip as usize)
            .take(plan.limit as usize)
            .map(|product| self.view(product))
            .collect();

        let priced = self.facet_scope(plan, Some(Dimension::Price));
        let price_range = match priced.is_empty() {
            true => vec![],
            false => vec![PriceBounds {
                min_price: priced
                    .iter()
                    .map(|product| product.effective_price())
                    .min_by(f64::total_cmp),
                max_price: priced
                    .iter()
                    .map(|product| product.effective_price())
                    .max_by(f64::total_cmp),
            }],
        };

        let mut conditions: Vec<String> = self
            .facet_scope(plan, None)
            .iter()
            .map(|product| product.condition.to_string())
            .collect();
        conditions.sort();
        conditions.dedup();

        let facets = RawFacets {
            price_range,
            brands: self.sorted_names(
                self.facet_scope(plan, Some(Dimension::Brand))
                    .into_iter()
                    .map(|product| product.brand),
            ),
            categories: self.sorted_names(
                self.facet_scope(plan, Some(Dimension::Category))
                    .into_iter()
                    .flat_map(|product| product.categories.clone()),
            ),
            age_ranges: self.sorted_names(
                self.facet_scope(plan, Some(Dimension::AgeRange))
                    .into_iter()
                    .filter_map(|product| product.age_range),
            ),
            conditions: conditions
                .into_iter()
                .map(|value| ValueFacet { value: Some(value) })
                .collect(),
            in_stock: vec![Count {
                total_count: self
                    .facet_scope(plan, None)
                    .iter()
                    .filter(|product| product.is_in_stock())
                    .count() as u64,
            }],
        };

        SearchOutput {
            products,
            count: (total_count > 0).then_some(Count { total_count }),
            facets: Some(facets),
        }
    }
}

#[cfg(test)]
mod tests {
    use common::{
        product::{
            base::{ProductImages, Variant, VariantConfiguration},
            enums::{Condition, ProductStatus},
        },
        reference::ReferenceKind,
        response::ProductListResponse,
        search_params::{ApiSearchInput, MAX_LIMIT, ProductQuery},
    };

    use super::*;
    use crate::{
        assembler::ResultAssembler,
        query_pipeline::plan::CrossFilterPipelineBuilder,
        resolver::{ReferenceResolver, tests::StaticLookup},
    };

    struct Store {
        acme: ObjectId,
        zed: ObjectId,
        widgets: ObjectId,
        gadgets: ObjectId,
        lookup: StaticLookup,
        catalog: MemoryCatalog,
    }

    fn product(name: &str, brand: ObjectId, category: ObjectId, base_price: Option<f64>) -> Product {
        Product {
            id: Some(ObjectId::new()),
            name: name.into(),
            slug: name.to_lowercase(),
            sku: None,
            brand,
            categories: vec![category],
            age_range: None,
            tags: vec![],
            is_active: true,
            status: ProductStatus::Published,
            condition: Condition::New,
            base_price,
            mrp: None,
            tax_rate: None,
            stock_quantity: 10,
            variant_configuration: VariantConfiguration::default(),
            variants: vec![],
            images: ProductImages::default(),
            manufacturer_images: vec![],
            description: None,
            definition: None,
            specifications: vec![],
            features: vec![],
            dimensions: None,
            weight: None,
            warranty: None,
            meta: None,
            linked_products: vec![],
            average_rating: 0.0,
            total_reviews: 0,
            created_at: 0,
            updated_at: 0,
        }
    }

    /// P1 Acme/Widgets 100, P2 Acme/Gadgets 200, P3 Zed/Widgets with one
    /// variant at 50 in stock, plus products that must never be listed.
    fn store() -> Store {
        let acme = ObjectId::new();
        let zed = ObjectId::new();
        let widgets = ObjectId::new();
        let gadgets = ObjectId::new();

        let p1 = product("P1", acme, widgets, Some(100.0));
        let p2 = product("P2", acme, gadgets, Some(200.0));

        let mut p3 = product("P3", zed, widgets, None);
        p3.stock_quantity = 0;
        p3.variant_configuration.has_variants = true;
        p3.variants = vec![Variant {
            name: "Blue".into(),
            sku: None,
            price: 50.0,
            mrp: None,
            stock_quantity: 5,
            is_active: true,
            identifying_attributes: vec![],
            images: vec![],
        }];

        let mut hidden = product("Hidden", acme, widgets, Some(1.0));
        hidden.is_active = false;

        let mut draft = product("Draft", zed, gadgets, Some(5000.0));
        draft.status = ProductStatus::Draft;

        let lookup = StaticLookup::new(vec![
            (ReferenceKind::Brand, acme, "Acme"),
            (ReferenceKind::Brand, zed, "Zed"),
            (ReferenceKind::Category, widgets, "Widgets"),
            (ReferenceKind::Category, gadgets, "Gadgets"),
        ]);

        let names = HashMap::from([
            (acme, "Acme".to_string()),
            (zed, "Zed".to_string()),
            (widgets, "Widgets".to_string()),
            (gadgets, "Gadgets".to_string()),
        ]);

        Store {
            acme,
            zed,
            widgets,
            gadgets,
            lookup,
            catalog: MemoryCatalog {
                products: vec![p1, p2, p3, hidden, draft],
                names,
            },
        }
    }

    async fn run(store: &Store, pairs: &[(&str, &str)]) -> ProductListResponse {
        let input: ApiSearchInput = serde_json::from_value(serde_json::Value::Object(
            pairs
                .iter()
                .map(|(key, value)| (key.to_string(), serde_json::Value::from(*value)))
                .collect(),
        ))
        .unwrap();

        let query: ProductQuery = input.normalize(MAX_LIMIT);

        let references = ReferenceResolver::new(&store.lookup)
            .resolve_query(&query)
            .await;
        let plan = CrossFilterPipelineBuilder::new(&query, references).build();
        let output = store.catalog.search(&plan);

        ResultAssembler::new(&query).assemble(output.products, output.count, output.facets)
    }

    fn names(response: &ProductListResponse) -> Vec<&str> {
        response
            .data
            .products
            .iter()
            .map(|product| product.name.as_str())
            .collect()
    }

    #[tokio::test]
    async fn category_listing_sorted_by_effective_price() {
        let store = store();
        let response = run(&store, &[("category", "Widgets"), ("sort", "price-low")]).await;

        assert_eq!(names(&response), vec!["P3", "P1"]);
        assert_eq!(response.data.products[0].effective_price, 50.0);
        assert_eq!(response.data.products[1].effective_price, 100.0);
        assert_eq!(response.data.pagination.total_products, 2);
        assert_eq!(response.data.filters.available_brands, vec!["Acme", "Zed"]);
        assert_eq!(
            response.data.filters.available_categories,
            vec!["Gadgets", "Widgets"]
        );
    }

    #[tokio::test]
    async fn unknown_brand_returns_nothing() {
        let store = store();
        let response = run(&store, &[("brand", "Nonexistent")]).await;

        assert!(response.data.products.is_empty());
        assert_eq!(response.data.pagination.total_products, 0);
        assert_eq!(response.data.pagination.total_pages, 0);
        assert!(response.success);
    }

    #[tokio::test]
    async fn brand_filter_narrows_category_facet_only() {
        let store = store();
        let response = run(&store, &[("brand", "acme")]).await;

        assert_eq!(names(&response).len(), 2);
        assert!(
            response
                .data
                .products
                .iter()
                .all(|product| product.brand.as_ref().map(|brand| brand.id) == Some(store.acme))
        );
        assert_eq!(response.data.filters.available_brands, vec!["Acme", "Zed"]);
        assert_eq!(
            response.data.filters.available_categories,
            vec!["Gadgets", "Widgets"]
        );

        let response = run(&store, &[("brand", "Zed")]).await;

        assert_eq!(names(&response), vec!["P3"]);
        assert_eq!(response.data.filters.available_brands, vec!["Acme", "Zed"]);
        assert_eq!(response.data.filters.available_categories, vec!["Widgets"]);
    }

    #[tokio::test]
    async fn category_filter_narrows_brand_facet() {
        let store = store();
        let response = run(&store, &[("category", "gadgets")]).await;

        assert_eq!(names(&response), vec!["P2"]);
        assert_eq!(response.data.products[0].categories[0].id, store.gadgets);
        assert_eq!(response.data.filters.available_brands, vec!["Acme"]);
        assert_eq!(
            response.data.filters.available_categories,
            vec!["Gadgets", "Widgets"]
        );
    }

    #[tokio::test]
    async fn price_filter_keeps_slider_bounds() {
        let store = store();

        let unfiltered = run(&store, &[]).await;
        let filtered = run(&store, &[("price[gte]", "60"), ("price[lte]", "150")]).await;

        assert_eq!(names(&filtered), vec!["P1"]);
        assert_eq!(unfiltered.data.filters.min_price, 50.0);
        assert_eq!(unfiltered.data.filters.max_price, 200.0);
        assert_eq!(filtered.data.filters, unfiltered.data.filters);
    }

    #[tokio::test]
    async fn hidden_products_never_listed_or_counted() {
        let store = store();
        let response = run(&store, &[("sort", "price-high")]).await;

        assert_eq!(names(&response), vec!["P2", "P1", "P3"]);
        assert_eq!(response.data.pagination.total_products, 3);
        assert_eq!(response.data.filters.max_price, 200.0);
        assert_eq!(response.data.filters.in_stock_count, 3);
    }

    #[tokio::test]
    async fn malformed_price_is_ignored() {
        let store = store();
        let response = run(&store, &[("minPrice", "lots")]).await;

        assert_eq!(response.data.pagination.total_products, 3);
    }

    #[tokio::test]
    async fn in_stock_filter_uses_variant_stock() {
        let mut store = store();
        store.catalog.products[2].variants[0].stock_quantity = 0;

        let response = run(&store, &[("inStock", "true"), ("sort", "name-asc")]).await;

        assert_eq!(names(&response), vec!["P1", "P2"]);
        assert_eq!(response.data.filters.in_stock_count, 2);
    }

    #[tokio::test]
    async fn sold_out_variant_product_falls_back_to_base_price() {
        let mut store = store();
        store.catalog.products[2].variants[0].stock_quantity = 0;
        store.catalog.products[2].base_price = Some(150.0);

        let response = run(&store, &[("sort", "price-low")]).await;

        assert_eq!(names(&response), vec!["P1", "P3", "P2"]);
    }

    #[tokio::test]
    async fn paging_past_the_end_is_empty_but_counted() {
        let store = store();
        let response = run(&store, &[("page", "3"), ("limit", "2")]).await;

        assert!(response.data.products.is_empty());
        assert_eq!(response.data.pagination.total_products, 3);
        assert_eq!(response.data.pagination.total_pages, 2);
        assert!(!response.data.pagination.has_next_page);
    }

    #[tokio::test]
    async fn search_matches_name_case_insensitively() {
        let store = store();
        let response = run(&store, &[("search", "p2")]).await;

        assert_eq!(names(&response), vec!["P2"]);
        assert_eq!(response.data.filters.available_brands, vec!["Acme"]);
    }

    #[tokio::test]
    async fn listing_joins_reference_names() {
        let store = store();
        let response = run(&store, &[("brand", "Zed")]).await;
        let product = &response.data.products[0];

        assert_eq!(product.brand.as_ref().map(|brand| brand.id), Some(store.zed));
        assert_eq!(product.categories[0].id, store.widgets);
        assert_eq!(product.categories[0].name, "Widgets");
    }
}
