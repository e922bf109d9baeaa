use mongodb::bson::{Document, doc};

use super::traits::StageDocument;

pub(crate) const EFFECTIVE_PRICE_FIELD: &str = "effectivePrice";

/// Adds `effectivePrice`: the cheapest active, in stock, non-zero variant price
/// for variant products, otherwise `basePrice` when positive, otherwise 0.
pub(super) struct EffectivePriceStage;

impl EffectivePriceStage {
    pub(super) fn new() -> Self {
        Self {}
    }
}

impl StageDocument for EffectivePriceStage {
    fn get_stage_documents(&self) -> Vec<Document> {
        let qualifying_variants = doc! {
            "$filter": {
                "input": { "$ifNull": ["$variants", []] },
                "as": "variant",
                "cond": {
                    "$and": [
                        { "$ne": ["$$variant.isActive", false] },
                        { "$gt": ["$$variant.price", 0] },
                        { "$gt": ["$$variant.stockQuantity", 0] },
                    ]
                }
            }
        };

        let base_price = doc! {
            "$cond": {
                "if": { "$gt": [{ "$ifNull": ["$basePrice", 0] }, 0] },
                "then": "$basePrice",
                "else": 0,
            }
        };

        vec![doc! {
            "$addFields": {
                EFFECTIVE_PRICE_FIELD: {
                    "$let": {
                        "vars": { "qualifying": qualifying_variants },
                        "in": {
                            "$cond": {
                                "if": {
                                    "$and": [
                                        { "$eq": ["$variantConfiguration.hasVariants", true] },
                                        { "$gt": [{ "$size": "$$qualifying" }, 0] },
                                    ]
                                },
                                "then": { "$min": "$$qualifying.price" },
                                "else": base_price,
                            }
                        }
                    }
                }
            }
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cheapest_qualifying_variant_wins() {
        assert_eq!(
            EffectivePriceStage::new().get_stage_documents(),
            vec![doc! {
                "$addFields": {
                    "effectivePrice": {
                        "$let": {
                            "vars": {
                                "qualifying": {
                                    "$filter": {
                                        "input": { "$ifNull": ["$variants", []] },
                                        "as": "variant",
                                        "cond": {
                                            "$and": [
                                                { "$ne": ["$$variant.isActive", false] },
                                                { "$gt": ["$$variant.price", 0] },
                                                { "$gt": ["$$variant.stockQuantity", 0] },
                                            ]
                                        }
                                    }
                                }
                            },
                            "in": {
                                "$cond": {
                                    "if": {
                                        "$and": [
                                            { "$eq": ["$variantConfiguration.hasVariants", true] },
                                            { "$gt": [{ "$size": "$$qualifying" }, 0] },
                                        ]
                                    },
                                    "then": { "$min": "$$qualifying.price" },
                                    "else": {
                                        "$cond": {
                                            "if": { "$gt": [{ "$ifNull": ["$basePrice", 0] }, 0] },
                                            "then": "$basePrice",
                                            "else": 0,
                                        }
                                    },
                                }
                            }
                        }
                    }
                }
            }]
        );
    }

    #[test]
    fn falls_back_to_positive_base_price() {
        let documents = EffectivePriceStage::new().get_stage_documents();

        let fallback = documents[0]
            .get_document("$addFields")
            .and_then(|fields| fields.get_document(EFFECTIVE_PRICE_FIELD))
            .and_then(|price| price.get_document("$let"))
            .and_then(|let_expr| let_expr.get_document("in"))
            .and_then(|in_expr| in_expr.get_document("$cond"))
            .and_then(|cond| cond.get_document("else"))
            .unwrap();

        assert_eq!(
            fallback,
            &doc! {
                "$cond": {
                    "if": { "$gt": [{ "$ifNull": ["$basePrice", 0] }, 0] },
                    "then": "$basePrice",
                    "else": 0,
                }
            }
        );
    }
}
