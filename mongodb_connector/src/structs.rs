use mongodb::bson::oid::ObjectId;
use serde::Deserialize;

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Count {
    pub total_count: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IdOnly {
    #[serde(rename = "_id")]
    pub(crate) id: ObjectId,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceBounds {
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct NamedFacet {
    pub name: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ValueFacet {
    #[serde(rename = "_id")]
    pub value: Option<String>,
}

/// The single document produced by the metadata `$facet`. Every facet
/// may be missing or empty.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawFacets {
    #[serde(default)]
    pub price_range: Vec<PriceBounds>,
    #[serde(default)]
    pub brands: Vec<NamedFacet>,
    #[serde(default)]
    pub categories: Vec<NamedFacet>,
    #[serde(default)]
    pub age_ranges: Vec<NamedFacet>,
    #[serde(default)]
    pub conditions: Vec<ValueFacet>,
    #[serde(default)]
    pub in_stock: Vec<Count>,
}
