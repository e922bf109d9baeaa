use std::collections::HashSet;

use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::{
    deserialize_disallow_empty_string::{disallow_empty_optional_string, disallow_empty_string},
    errors::InputError,
    product::{
        base::{
            Dimensions, Product, ProductImages, SeoMeta, SpecificationSection, Variant,
            VariantConfiguration, Weight,
        },
        enums::{Condition, ProductStatus},
    },
    utils::{get_current_time, slugify},
};

/// Body of `POST /admin/products`. Ids are hex strings.
#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct ProductInput {
    #[serde(deserialize_with = "disallow_empty_string")]
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde_as(as = "DisplayFromStr")]
    pub brand: ObjectId,
    #[serde_as(as = "Vec<DisplayFromStr>")]
    #[serde(default)]
    pub categories: Vec<ObjectId>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub age_range: Option<ObjectId>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub status: Option<ProductStatus>,
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
    #[serde_as(as = "Vec<DisplayFromStr>")]
    #[serde(default)]
    pub linked_products: Vec<ObjectId>,
}

/// Body of `PATCH /admin/products/{id}`, every field optional.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct ProductPatch {
    #[serde(default, deserialize_with = "disallow_empty_optional_string")]
    pub name: Option<String>,
    pub slug: Option<String>,
    pub sku: Option<String>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub brand: Option<ObjectId>,
    #[serde_as(as = "Option<Vec<DisplayFromStr>>")]
    #[serde(default)]
    pub categories: Option<Vec<ObjectId>>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub age_range: Option<ObjectId>,
    pub tags: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub status: Option<ProductStatus>,
    pub condition: Option<Condition>,
    pub base_price: Option<f64>,
    pub mrp: Option<f64>,
    pub tax_rate: Option<f64>,
    pub stock_quantity: Option<i64>,
    pub variant_configuration: Option<VariantConfiguration>,
    pub variants: Option<Vec<Variant>>,
    pub images: Option<ProductImages>,
    pub manufacturer_images: Option<Vec<String>>,
    pub description: Option<String>,
    pub definition: Option<String>,
    pub specifications: Option<Vec<SpecificationSection>>,
    pub features: Option<Vec<String>>,
    pub dimensions: Option<Dimensions>,
    pub weight: Option<Weight>,
    pub warranty: Option<String>,
    pub meta: Option<SeoMeta>,
    #[serde_as(as = "Option<Vec<DisplayFromStr>>")]
    #[serde(default)]
    pub linked_products: Option<Vec<ObjectId>>,
}

impl ProductInput {
    pub fn into_product(self) -> Result<Product, InputError> {
        if self.images.thumbnail.as_deref().is_none_or(str::is_empty) {
            return Err(InputError::MissingThumbnail);
        }

        let slug = match self.slug {
            Some(slug) => slug,
            None => self.name.clone(),
        };

        let now = get_current_time();

        let mut product = Product {
            id: None,
            name: self.name,
            slug,
            sku: self.sku,
            brand: self.brand,
            categories: self.categories,
            age_range: self.age_range,
            tags: self.tags,
            is_active: self.is_active.unwrap_or(true),
            status: self.status.unwrap_or_default(),
            condition: self.condition,
            base_price: self.base_price,
            mrp: self.mrp,
            tax_rate: self.tax_rate,
            stock_quantity: self.stock_quantity,
            variant_configuration: self.variant_configuration,
            variants: self.variants,
            images: self.images,
            manufacturer_images: self.manufacturer_images,
            description: self.description,
            definition: self.definition,
            specifications: self.specifications,
            features: self.features,
            dimensions: self.dimensions,
            weight: self.weight,
            warranty: self.warranty,
            meta: self.meta,
            linked_products: self.linked_products,
            average_rating: 0.0,
            total_reviews: 0,
            created_at: now,
            updated_at: now,
        };

        prepare_for_write(&mut product)?;

        Ok(product)
    }
}

impl ProductPatch {
    pub fn apply(self, product: &mut Product) -> Result<(), InputError> {
        macro_rules! patch {
            ($patch:ident, $target:ident; $($field:ident),* $(,)?) => {
                $(if let Some(value) = $patch.$field {
                    $target.$field = value;
                })*
            };
        }

        macro_rules! patch_optional {
            ($patch:ident, $target:ident; $($field:ident),* $(,)?) => {
                $(if $patch.$field.is_some() {
                    $target.$field = $patch.$field;
                })*
            };
        }

        let patch = self;

        patch!(
            patch, product;
            name,
            slug,
            brand,
            categories,
            tags,
            is_active,
            status,
            condition,
            stock_quantity,
            variant_configuration,
            variants,
            images,
            manufacturer_images,
            specifications,
            features,
            linked_products,
        );

        patch_optional!(
            patch, product;
            sku,
            age_range,
            base_price,
            mrp,
            tax_rate,
            description,
            definition,
            dimensions,
            weight,
            warranty,
            meta,
        );

        product.updated_at = get_current_time();

        prepare_for_write(product)
    }
}

/// Shared create/update rules: lowercase slug and tags, a category,
/// a price source, and `mrp >= price` everywhere.
fn prepare_for_write(product: &mut Product) -> Result<(), InputError> {
    let slug = slugify(&product.slug);

    if slug.is_empty() {
        return Err(InputError::InvalidSlug(product.slug.clone()));
    }

    product.slug = slug;

    if product.categories.is_empty() {
        return Err(InputError::MissingCategories);
    }

    let mut seen_categories = HashSet::new();
    product
        .categories
        .retain(|category| seen_categories.insert(*category));

    product.tags = product
        .tags
        .iter()
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect();

    if product.has_variants() {
        if product.variants.is_empty() {
            return Err(InputError::MissingVariants);
        }

        if product.variants.iter().any(|variant| variant.price < 0.0) {
            return Err(InputError::NegativePrice);
        }
    } else {
        match product.base_price {
            None => return Err(InputError::MissingBasePrice),
            Some(price) if price < 0.0 => return Err(InputError::NegativePrice),
            Some(_) => {}
        }
    }

    product.stock_quantity = product.stock_quantity.max(0);

    for variant in product.variants.iter_mut() {
        variant.stock_quantity = variant.stock_quantity.max(0);
    }

    product.normalize_pricing();

    Ok(())
}
