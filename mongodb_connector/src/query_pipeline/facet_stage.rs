use mongodb::bson::{Document, doc};

use crate::constants::{
    COLLECTION_AGE_RANGES_NAME, COLLECTION_BRANDS_NAME, COLLECTION_CATEGORIES_NAME,
};

use super::{
    effective_price_stage::EFFECTIVE_PRICE_FIELD,
    match_stage::MatchStage,
    plan::FilterPlan,
    predicate::{Dimension, Predicate},
    traits::StageDocument,
};

pub(crate) const FACET_PRICE_RANGE: &str = "priceRange";
pub(crate) const FACET_BRANDS: &str = "brands";
pub(crate) const FACET_CATEGORIES: &str = "categories";
pub(crate) const FACET_AGE_RANGES: &str = "ageRanges";
pub(crate) const FACET_CONDITIONS: &str = "conditions";
pub(crate) const FACET_IN_STOCK: &str = "inStock";

/// One `$facet` holding every sidebar aggregation. Each facet re-applies the
/// dimension filters except its own; the price range is never applied so the
/// slider bounds do not move with the selected range.
pub(super) struct FacetStage<'a> {
    plan: &'a FilterPlan,
}

impl<'a> FacetStage<'a> {
    pub(super) fn new(plan: &'a FilterPlan) -> Self {
        Self { plan }
    }

    fn scoped(&self, facet: Option<Dimension>, tail: Vec<Document>) -> Vec<Document> {
        let mut documents = MatchStage::new(self.plan.facet_predicates(facet)).get_stage_documents();
        documents.extend(tail);
        documents
    }

    fn price_range(&self) -> Vec<Document> {
        self.scoped(
            Some(Dimension::Price),
            vec![doc! {
                "$group": {
                    "_id": null,
                    "minPrice": { "$min": format!("${EFFECTIVE_PRICE_FIELD}") },
                    "maxPrice": { "$max": format!("${EFFECTIVE_PRICE_FIELD}") },
                }
            }],
        )
    }

    fn reference_names(
        &self,
        facet: Dimension,
        field: &str,
        collection: &str,
        is_array: bool,
    ) -> Vec<Document> {
        let mut tail: Vec<Document> = Vec::new();

        if is_array {
            tail.push(doc! { "$unwind": format!("${field}") });
        }

        tail.extend([
            doc! { "$group": { "_id": format!("${field}") } },
            doc! {
                "$lookup": {
                    "from": collection,
                    "localField": "_id",
                    "foreignField": "_id",
                    "as": "reference",
                }
            },
            doc! { "$unwind": "$reference" },
            doc! { "$project": { "_id": 0, "name": "$reference.name" } },
            doc! { "$sort": { "name": 1 } },
        ]);

        self.scoped(Some(facet), tail)
    }

    fn conditions(&self) -> Vec<Document> {
        self.scoped(
            None,
            vec![
                doc! { "$group": { "_id": "$condition" } },
                doc! { "$match": { "_id": { "$ne": null } } },
                doc! { "$sort": { "_id": 1 } },
            ],
        )
    }

    fn in_stock(&self) -> Vec<Document> {
        let mut tail = MatchStage::new(vec![&Predicate::InStock]).get_stage_documents();
        tail.push(doc! { "$count": "totalCount" });

        self.scoped(None, tail)
    }
}

impl StageDocument for FacetStage<'_> {
    fn get_stage_documents(&self) -> Vec<Document> {
        vec![doc! {
            "$facet": {
                FACET_PRICE_RANGE: self.price_range(),
                FACET_BRANDS: self.reference_names(
                    Dimension::Brand,
                    "brand",
                    COLLECTION_BRANDS_NAME,
                    false,
                ),
                FACET_CATEGORIES: self.reference_names(
                    Dimension::Category,
                    "categories",
                    COLLECTION_CATEGORIES_NAME,
                    true,
                ),
                FACET_AGE_RANGES: self.reference_names(
                    Dimension::AgeRange,
                    "ageRange",
                    COLLECTION_AGE_RANGES_NAME,
                    false,
                ),
                FACET_CONDITIONS: self.conditions(),
                FACET_IN_STOCK: self.in_stock(),
            }
        }]
    }
}
