use std::collections::HashSet;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::product::enums::{Condition, ProductStatus};

fn default_true() -> bool {
    true
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyingAttribute {
    pub key: String,
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub display_value: Option<String>,
    #[serde(default)]
    pub is_color: bool,
    #[serde(default)]
    pub hex_code: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub mrp: Option<f64>,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub identifying_attributes: Vec<IdentifyingAttribute>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Variant {
    /// A variant only counts towards the "starting at" price when a customer could buy it.
    pub fn qualifies_for_pricing(&self) -> bool {
        self.is_active && self.price > 0.0 && self.stock_quantity > 0
    }

    pub fn is_in_stock(&self) -> bool {
        self.is_active && self.stock_quantity > 0
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VariantConfiguration {
    #[serde(default)]
    pub has_variants: bool,
    #[serde(default)]
    pub variant_types: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductImages {
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub hover_image: Option<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct SpecificationEntry {
    pub key: String,
    pub value: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct SpecificationSection {
    pub section: String,
    #[serde(default)]
    pub specs: Vec<SpecificationEntry>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Dimensions {
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Weight {
    pub value: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct SeoMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub sku: Option<String>,
    pub brand: ObjectId,
    pub categories: Vec<ObjectId>,
    #[serde(default)]
    pub age_range: Option<ObjectId>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub condition: Condition,
    #[serde(default)]
    pub base_price: Option<f64>,
    #[serde(default)]
    pub mrp: Option<f64>,
    #[serde(default)]
    pub tax_rate: Option<f64>,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub variant_configuration: VariantConfiguration,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub images: ProductImages,
    #[serde(default)]
    pub manufacturer_images: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub specifications: Vec<SpecificationSection>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
    #[serde(default)]
    pub weight: Option<Weight>,
    #[serde(default)]
    pub warranty: Option<String>,
    #[serde(default)]
    pub meta: Option<SeoMeta>,
    #[serde(default)]
    pub linked_products: Vec<ObjectId>,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub total_reviews: i64,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Product {
    pub fn has_variants(&self) -> bool {
        self.variant_configuration.has_variants
    }

    pub fn is_publicly_visible(&self) -> bool {
        self.is_active && self.status == ProductStatus::Published
    }

    /// The single comparable price used for price filters and sorting:
    /// the cheapest purchasable variant, otherwise the flat base price, otherwise 0.
    ///
    /// A variant product with nothing purchasable falls back to `base_price`,
    /// even if that value is stale.
    pub fn effective_price(&self) -> f64 {
        if self.has_variants()
            && let Some(cheapest) = self
                .variants
                .iter()
                .filter(|variant| variant.qualifies_for_pricing())
                .map(|variant| variant.price)
                .min_by(f64::total_cmp)
        {
            return cheapest;
        }

        self.base_price.filter(|price| *price > 0.0).unwrap_or(0.0)
    }

    pub fn total_stock(&self) -> i64 {
        if !self.has_variants() {
            return self.stock_quantity.max(0);
        }

        self.variants
            .iter()
            .filter(|variant| variant.is_active)
            .map(|variant| variant.stock_quantity.max(0))
            .sum()
    }

    pub fn is_in_stock(&self) -> bool {
        match self.has_variants() {
            true => self.variants.iter().any(Variant::is_in_stock),
            false => self.stock_quantity > 0,
        }
    }

    /// Keeps `mrp >= price` on the product and every variant. A missing mrp
    /// takes the price, a lower one is raised to it.
    pub fn normalize_pricing(&mut self) {
        if let Some(base_price) = self.base_price {
            self.mrp = Some(raise_mrp(&self.slug, self.mrp, base_price));
        }

        for variant in self.variants.iter_mut() {
            variant.mrp = Some(raise_mrp(&variant.name, variant.mrp, variant.price));
        }
    }

    /// Dedupes linked products, drops self references and anything
    /// not present in `existing`.
    pub fn sanitize_linked_products(&mut self, existing: &HashSet<ObjectId>) {
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let own_id = self.id;

        self.linked_products.retain(|linked| {
            Some(*linked) != own_id && existing.contains(linked) && seen.insert(*linked)
        });
    }
}

fn raise_mrp(owner: &str, mrp: Option<f64>, price: f64) -> f64 {
    match mrp {
        Some(mrp) if mrp >= price => mrp,
        Some(mrp) => {
            debug!("Raising mrp of {owner} from {mrp} to {price}");
            price
        }
        None => price,
    }
}
