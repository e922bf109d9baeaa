use common::product::enums::{Condition, ProductStatus};
use mongodb::bson::{Bson, Document, doc, oid::ObjectId};

/// Facet dimensions whose own filter is left out when that facet is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Brand,
    Category,
    AgeRange,
    Price,
}

/// A single filter applied to the product collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Visible,
    Search(String),
    /// An empty id list matches nothing, it never means "no filter".
    BrandIn(Vec<ObjectId>),
    CategoryIn(Vec<ObjectId>),
    AgeRangeIn(Vec<ObjectId>),
    /// Products without a stored condition count as [`Condition::New`].
    ConditionIn(Vec<Condition>),
    /// Products without a stored rating count as rated 0.
    MinRating(f64),
    InStock,
    /// Applied to `effectivePrice`, so it must run after that field is added.
    PriceRange {
        min: Option<f64>,
        max: Option<f64>,
    },
}

pub(crate) const SEARCHABLE_FIELDS: [&str; 4] = ["name", "description", "tags", "sku"];

impl Predicate {
    pub fn dimension(&self) -> Option<Dimension> {
        match self {
            Predicate::BrandIn(_) => Some(Dimension::Brand),
            Predicate::CategoryIn(_) => Some(Dimension::Category),
            Predicate::AgeRangeIn(_) => Some(Dimension::AgeRange),
            Predicate::PriceRange { .. } => Some(Dimension::Price),
            Predicate::Visible
            | Predicate::Search(_)
            | Predicate::ConditionIn(_)
            | Predicate::MinRating(_)
            | Predicate::InStock => None,
        }
    }

    pub fn to_document(&self) -> Document {
        match self {
            Predicate::Visible => doc! {
                "isActive": true,
                "status": ProductStatus::Published.to_string(),
            },
            Predicate::Search(text) => {
                let pattern = regex::escape(text);

                let alternatives: Vec<Document> = SEARCHABLE_FIELDS
                    .iter()
                    .map(|field| doc! { *field: { "$regex": pattern.as_str(), "$options": "i" } })
                    .collect();

                doc! { "$or": alternatives }
            }
            Predicate::BrandIn(ids) => doc! { "brand": { "$in": ids.clone() } },
            Predicate::CategoryIn(ids) => doc! { "categories": { "$in": ids.clone() } },
            Predicate::AgeRangeIn(ids) => doc! { "ageRange": { "$in": ids.clone() } },
            Predicate::ConditionIn(conditions) => {
                let values: Vec<Bson> = conditions
                    .iter()
                    .map(|condition| Bson::String(condition.to_string()))
                    .collect();
                let stored = doc! { "$ifNull": ["$condition", Condition::default().to_string()] };

                doc! { "$expr": { "$in": [stored, values] } }
            }
            Predicate::MinRating(rating) => {
                let stored = doc! { "$ifNull": ["$averageRating", 0.0] };

                doc! { "$expr": { "$gte": [stored, *rating] } }
            }
            Predicate::InStock => doc! {
                "$or": [
                    {
                        "variantConfiguration.hasVariants": { "$ne": true },
                        "stockQuantity": { "$gt": 0 },
                    },
                    {
                        "variantConfiguration.hasVariants": true,
                        "variants": {
                            "$elemMatch": {
                                "isActive": { "$ne": false },
                                "stockQuantity": { "$gt": 0 },
                            }
                        },
                    },
                ]
            },
            Predicate::PriceRange { min, max } => {
                let mut bounds = Document::new();

                if let Some(min) = min {
                    bounds.insert("$gte", *min);
                }

                if let Some(max) = max {
                    bounds.insert("$lte", *max);
                }

                doc! { "effectivePrice": bounds }
            }
        }
    }
}
