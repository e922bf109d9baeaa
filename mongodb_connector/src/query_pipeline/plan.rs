use common::{product::enums::Sort, search_params::ProductQuery};
use mongodb::bson::oid::ObjectId;
use tracing::trace;

use super::predicate::{Dimension, Predicate};

/// Reference filters after name/slug resolution. `None` means the filter
/// was not requested, `Some(vec![])` means nothing matched the tokens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedReferences {
    pub brands: Option<Vec<ObjectId>>,
    pub categories: Option<Vec<ObjectId>>,
    pub age_ranges: Option<Vec<ObjectId>>,
}

/// Every predicate of one request, tagged by dimension, plus ordering and paging.
/// Which pipeline receives which predicate is answered here and nowhere else.
#[derive(Debug, Clone)]
pub struct FilterPlan {
    predicates: Vec<Predicate>,
    pub(crate) sort: Sort,
    pub(crate) skip: u64,
    pub(crate) limit: u32,
}

impl FilterPlan {
    /// Predicates the listing and count apply before `effectivePrice` exists.
    pub fn pre_price_predicates(&self) -> Vec<&Predicate> {
        self.predicates
            .iter()
            .filter(|predicate| predicate.dimension() != Some(Dimension::Price))
            .collect()
    }

    pub fn price_predicates(&self) -> Vec<&Predicate> {
        self.predicates
            .iter()
            .filter(|predicate| predicate.dimension() == Some(Dimension::Price))
            .collect()
    }

    /// Predicates every facet shares, those not tied to a facet dimension.
    pub fn shared_facet_predicates(&self) -> Vec<&Predicate> {
        self.predicates
            .iter()
            .filter(|predicate| predicate.dimension().is_none())
            .collect()
    }

    /// Dimension predicates a facet applies on top of the shared ones: everything
    /// except its own dimension, and never the price range.
    pub fn facet_predicates(&self, facet: Option<Dimension>) -> Vec<&Predicate> {
        self.predicates
            .iter()
            .filter(|predicate| match predicate.dimension() {
                None | Some(Dimension::Price) => false,
                Some(dimension) => Some(dimension) != facet,
            })
            .collect()
    }
}

pub struct CrossFilterPipelineBuilder<'a> {
    query: &'a ProductQuery,
    references: ResolvedReferences,
}

impl<'a> CrossFilterPipelineBuilder<'a> {
    pub fn new(query: &'a ProductQuery, references: ResolvedReferences) -> Self {
        Self { query, references }
    }

    pub fn build(self) -> FilterPlan {
        let mut predicates: Vec<Predicate> = vec![Predicate::Visible];

        if let Some(ref search) = self.query.search {
            predicates.push(Predicate::Search(search.clone()));
        }

        if !self.query.conditions.is_empty() {
            predicates.push(Predicate::ConditionIn(self.query.conditions.clone()));
        }

        if let Some(rating) = self.query.min_rating {
            predicates.push(Predicate::MinRating(rating));
        }

        if self.query.in_stock {
            predicates.push(Predicate::InStock);
        }

        if let Some(brands) = self.references.brands {
            predicates.push(Predicate::BrandIn(brands));
        }

        if let Some(categories) = self.references.categories {
            predicates.push(Predicate::CategoryIn(categories));
        }

        if let Some(age_ranges) = self.references.age_ranges {
            predicates.push(Predicate::AgeRangeIn(age_ranges));
        }

        if self.query.min_price.is_some() || self.query.max_price.is_some() {
            predicates.push(Predicate::PriceRange {
                min: self.query.min_price,
                max: self.query.max_price,
            });
        }

        trace!("Filter predicates: {:#?}", predicates);

        FilterPlan {
            predicates,
            sort: self.query.sort,
            skip: self.query.skip(),
            limit: self.query.limit,
        }
    }
}
