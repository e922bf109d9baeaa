use mongodb::bson::{Document, doc};

use crate::constants::{COLLECTION_BRANDS_NAME, COLLECTION_CATEGORIES_NAME};

use super::traits::StageDocument;

/// Joins brand and categories as `{_id, name, slug}` and trims the
/// document down to what the storefront renders.
pub(super) struct LookupStage {
    keep_details: bool,
}

impl LookupStage {
    pub(super) fn listing() -> Self {
        Self {
            keep_details: false,
        }
    }

    pub(super) fn detail() -> Self {
        Self { keep_details: true }
    }
}

impl StageDocument for LookupStage {
    fn get_stage_documents(&self) -> Vec<Document> {
        let summary = vec![doc! { "$project": { "name": 1, "slug": 1 } }];

        let display_fields = doc! {
            "hasVariants": { "$ifNull": ["$variantConfiguration.hasVariants", false] },
            "variants": {
                "$filter": {
                    "input": { "$ifNull": ["$variants", []] },
                    "as": "variant",
                    "cond": { "$ne": ["$$variant.isActive", false] },
                }
            },
        };

        let mut removed_fields = vec![
            "variantConfiguration",
            "manufacturerImages",
            "linkedProducts",
            "meta",
        ];

        if !self.keep_details {
            removed_fields.extend(["specifications", "features"]);
        }

        vec![
            doc! {
                "$lookup": {
                    "from": COLLECTION_BRANDS_NAME,
                    "localField": "brand",
                    "foreignField": "_id",
                    "pipeline": summary.clone(),
                    "as": "brand",
                }
            },
            doc! {
                "$unwind": {
                    "path": "$brand",
                    "preserveNullAndEmptyArrays": true,
                }
            },
            doc! {
                "$lookup": {
                    "from": COLLECTION_CATEGORIES_NAME,
                    "localField": "categories",
                    "foreignField": "_id",
                    "pipeline": summary,
                    "as": "categories",
                }
            },
            doc! { "$set": display_fields },
            doc! { "$unset": removed_fields },
        ]
    }
}
