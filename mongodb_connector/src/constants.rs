pub(crate) const COLLECTION_PRODUCTS_NAME: &str = "products";
pub(crate) const COLLECTION_BRANDS_NAME: &str = "brands";
pub(crate) const COLLECTION_CATEGORIES_NAME: &str = "categories";
pub(crate) const COLLECTION_AGE_RANGES_NAME: &str = "age-ranges";

pub(crate) const INDEX_SLUG_UNIQUE: &str = "slug_unique";
pub(crate) const INDEX_PRODUCT_VISIBILITY: &str = "visibility";
pub(crate) const INDEX_PRODUCT_BRAND: &str = "brand";
pub(crate) const INDEX_PRODUCT_CATEGORIES: &str = "categories";
pub(crate) const INDEX_PRODUCT_CREATED_AT: &str = "created_at";
