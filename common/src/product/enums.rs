use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq, Display)]
pub enum ProductStatus {
    #[default]
    Draft,
    Published,
    OutOfStock,
    Archived,
    Discontinued,
}

#[derive(
    Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq, Hash, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Condition {
    #[default]
    New,
    Used,
    Refurbished,
}

/// Listing order surfaced to clients, unknown values fall back to `Newest`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq, EnumString, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Sort {
    #[default]
    Newest,
    Oldest,
    PriceLow,
    PriceHigh,
    Rating,
    Popular,
    NameAsc,
    NameDesc,
}

impl Sort {
    pub fn parse_lenient(value: &str) -> Self {
        value.trim().parse().unwrap_or_default()
    }
}
