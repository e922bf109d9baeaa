use mongodb::bson::{Document, doc};
use tracing::trace;

use super::effective_price_stage::EffectivePriceStage;
use super::facet_stage::FacetStage;
use super::lookup_stage::LookupStage;
use super::match_stage::MatchStage;
use super::page_stage::PageStage;
use super::plan::FilterPlan;
use super::predicate::Predicate;
use super::sort_stage::SortStage;

/// Renders a [`FilterPlan`] into the three aggregation pipelines of one listing
/// request: the page of products, the total count and the sidebar facets.
pub struct SearchPipeline {
    plan: FilterPlan,
}

impl SearchPipeline {
    pub fn new(plan: FilterPlan) -> Self {
        Self { plan }
    }

    fn filtered_documents(&self) -> Vec<Document> {
        let mut documents: Vec<Document> = Vec::new();

        documents.extend(MatchStage::new(self.plan.pre_price_predicates()).get_stage_documents());
        documents.extend(EffectivePriceStage::new().get_stage_documents());
        documents.extend(MatchStage::new(self.plan.price_predicates()).get_stage_documents());

        documents
    }

    pub fn get_search_documents(&self) -> Vec<Document> {
        let mut documents = self.filtered_documents();

        documents.extend(SortStage::new(self.plan.sort).get_stage_documents());
        documents.extend(PageStage::new(self.plan.skip, self.plan.limit).get_stage_documents());
        documents.extend(LookupStage::listing().get_stage_documents());

        trace!("Search documents: {:#?}", documents);

        documents
    }

    pub fn get_count_documents(&self) -> Vec<Document> {
        let mut documents = self.filtered_documents();

        documents.push(doc! {
            "$count": "totalCount"
        });

        trace!("Count documents: {:#?}", documents);

        documents
    }

    pub fn get_metadata_documents(&self) -> Vec<Document> {
        let mut documents: Vec<Document> = Vec::new();

        documents.extend(MatchStage::new(self.plan.shared_facet_predicates()).get_stage_documents());
        documents.extend(EffectivePriceStage::new().get_stage_documents());
        documents.extend(FacetStage::new(&self.plan).get_stage_documents());

        trace!("Metadata documents: {:#?}", documents);

        documents
    }
}

/// Pipeline for `GET /products/{slug}`, same visibility rule and joins as the listing.
pub fn get_detail_documents(slug: &str) -> Vec<Document> {
    let mut documents = vec![doc! {
        "$match": {
            "$and": [
                { "slug": slug.to_lowercase() },
                Predicate::Visible.to_document(),
            ]
        }
    }];

    documents.extend(EffectivePriceStage::new().get_stage_documents());
    documents.push(doc! { "$limit": 1 });
    documents.extend(LookupStage::detail().get_stage_documents());

    documents
}

pub(crate) trait StageDocument {
    fn get_stage_documents(&self) -> Vec<Document>;
}

#[cfg(test)]
mod tests {
    use common::{product::enums::Sort, search_params::ProductQuery};
    use mongodb::bson::{Bson, oid::ObjectId};

    use super::*;
    use crate::query_pipeline::{
        facet_stage::{FACET_BRANDS, FACET_CATEGORIES, FACET_IN_STOCK, FACET_PRICE_RANGE},
        plan::{CrossFilterPipelineBuilder, ResolvedReferences},
    };

    struct Fixture {
        brand: ObjectId,
        category: ObjectId,
        pipeline: SearchPipeline,
    }

    fn fixture() -> Fixture {
        let brand = ObjectId::new();
        let category = ObjectId::new();

        let query = ProductQuery {
            min_price: Some(10.0),
            max_price: Some(500.0),
            sort: Sort::PriceLow,
            page: 2,
            limit: 10,
            ..Default::default()
        };

        let references = ResolvedReferences {
            brands: Some(vec![brand]),
            categories: Some(vec![category]),
            age_ranges: None,
        };

        Fixture {
            brand,
            category,
            pipeline: SearchPipeline::new(CrossFilterPipelineBuilder::new(&query, references).build()),
        }
    }

    fn stage_names(documents: &[Document]) -> Vec<&str> {
        documents
            .iter()
            .map(|document| document.keys().next().unwrap().as_str())
            .collect()
    }

    fn facet<'a>(metadata: &'a [Document], name: &str) -> Vec<&'a Document> {
        metadata
            .last()
            .unwrap()
            .get_document("$facet")
            .unwrap()
            .get_array(name)
            .unwrap()
            .iter()
            .map(|stage| stage.as_document().unwrap())
            .collect()
    }

    fn mentions(document: &Document, value: &Bson) -> bool {
        Bson::Document(document.clone()).to_string().contains(&value.to_string())
    }

    #[test]
    fn search_pipeline_stage_order() {
        let documents = fixture().pipeline.get_search_documents();

        assert_eq!(
            stage_names(&documents),
            vec![
                "$match", "$addFields", "$match", "$sort", "$skip", "$limit", "$lookup",
                "$unwind", "$lookup", "$set", "$unset",
            ]
        );
        assert_eq!(documents[4], doc! { "$skip": 10_i64 });
        assert_eq!(documents[5], doc! { "$limit": 10_i64 });
    }

    #[test]
    fn price_filter_runs_after_effective_price() {
        let documents = fixture().pipeline.get_count_documents();

        assert_eq!(
            stage_names(&documents),
            vec!["$match", "$addFields", "$match", "$count"]
        );
        assert_eq!(
            documents[2],
            doc! { "$match": { "effectivePrice": { "$gte": 10.0, "$lte": 500.0 } } }
        );
    }

    #[test]
    fn count_and_search_share_filters() {
        let pipeline = fixture().pipeline;

        assert_eq!(
            pipeline.get_search_documents()[..3],
            pipeline.get_count_documents()[..3]
        );
    }

    #[test]
    fn metadata_prefilter_only_has_shared_predicates() {
        let metadata = fixture().pipeline.get_metadata_documents();

        assert_eq!(stage_names(&metadata), vec!["$match", "$addFields", "$facet"]);
        assert_eq!(metadata[0], doc! { "$match": Predicate::Visible.to_document() });
    }

    #[test]
    fn brand_facet_ignores_brand_filter_but_keeps_category() {
        let fixture = fixture();
        let metadata = fixture.pipeline.get_metadata_documents();
        let brands = facet(&metadata, FACET_BRANDS);

        assert!(!mentions(brands[0], &Bson::ObjectId(fixture.brand)));
        assert!(mentions(brands[0], &Bson::ObjectId(fixture.category)));
    }

    #[test]
    fn category_facet_ignores_category_filter_but_keeps_brand() {
        let fixture = fixture();
        let metadata = fixture.pipeline.get_metadata_documents();
        let categories = facet(&metadata, FACET_CATEGORIES);

        assert!(mentions(categories[0], &Bson::ObjectId(fixture.brand)));
        assert!(!mentions(categories[0], &Bson::ObjectId(fixture.category)));
        assert_eq!(categories[1], &doc! { "$unwind": "$categories" });
    }

    #[test]
    fn price_facet_never_sees_price_filter() {
        let fixture = fixture();
        let metadata = fixture.pipeline.get_metadata_documents();

        for stage in facet(&metadata, FACET_PRICE_RANGE) {
            assert!(!stage.to_string().contains("$lte"));
        }

        assert!(mentions(
            facet(&metadata, FACET_PRICE_RANGE)[0],
            &Bson::ObjectId(fixture.brand)
        ));
    }

    #[test]
    fn in_stock_facet_counts() {
        let metadata = fixture().pipeline.get_metadata_documents();
        let in_stock = facet(&metadata, FACET_IN_STOCK);

        assert_eq!(in_stock.last().unwrap(), &&doc! { "$count": "totalCount" });
    }

    #[test]
    fn detail_pipeline_filters_visibility() {
        let documents = get_detail_documents("Gaming-Mouse");

        assert_eq!(
            documents[0],
            doc! {
                "$match": {
                    "$and": [
                        { "slug": "gaming-mouse" },
                        { "isActive": true, "status": "Published" },
                    ]
                }
            }
        );
    }
}
