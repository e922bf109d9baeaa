use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::{
    object_id::serialize_hex,
    product::{
        base::{IdentifyingAttribute, ProductImages, SpecificationSection},
        enums::Condition,
    },
};

/// Brand/category/age range joined onto a product for display.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ReferenceSummary {
    #[serde(rename = "_id", serialize_with = "serialize_hex")]
    pub id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

/// Storefront shape of a product, read back from the listing and detail
/// pipelines with brand and categories already joined and `effectivePrice`
/// computed. Heavy fields are projected out of listings and default to empty.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(rename = "_id", serialize_with = "serialize_hex")]
    pub id: ObjectId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub brand: Option<ReferenceSummary>,
    #[serde(default)]
    pub categories: Vec<ReferenceSummary>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub condition: Condition,
    #[serde(default)]
    pub base_price: Option<f64>,
    #[serde(default)]
    pub mrp: Option<f64>,
    #[serde(default)]
    pub effective_price: f64,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub has_variants: bool,
    #[serde(default)]
    pub variants: Vec<VariantView>,
    #[serde(default)]
    pub images: ProductImages,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specifications: Vec<SpecificationSection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(default)]
    pub warranty: Option<String>,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub total_reviews: i64,
    #[serde(default)]
    pub created_at: i64,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VariantView {
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub mrp: Option<f64>,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub identifying_attributes: Vec<IdentifyingAttribute>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl ProductView {
    pub fn total_stock(&self) -> i64 {
        match self.has_variants {
            true => self
                .variants
                .iter()
                .map(|variant| variant.stock_quantity.max(0))
                .sum(),
            false => self.stock_quantity.max(0),
        }
    }
}
