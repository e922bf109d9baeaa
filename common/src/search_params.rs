use std::str::FromStr;

use serde::Deserialize;
use serde_with::{NoneAsEmptyString, OneOrMany, serde_as};
use tracing::debug;

use crate::errors::InputError;
use crate::product::enums::{Condition, Sort};
use crate::utils::split_tokens;

pub const DEFAULT_LIMIT: u32 = 12;
/// Cap for the unified `/products` listing.
pub const MAX_LIMIT: u32 = 50;
/// Cap for the older `/products/search` and `/products/filter` endpoints.
pub const LEGACY_MAX_LIMIT: u32 = 100;

/// Raw query string of every product listing endpoint. All values arrive as
/// strings so that malformed numbers can be dropped instead of failing the request.
/// Token filters may be repeated (`brand=Acme&brand=Zed`) or comma separated.
#[serde_as]
#[derive(Debug, Default, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ApiSearchInput {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub search: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub q: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub query: Option<String>,
    #[serde_as(as = "OneOrMany<_>")]
    #[serde(default)]
    pub brand: Vec<String>,
    #[serde_as(as = "OneOrMany<_>")]
    #[serde(default)]
    pub brands: Vec<String>,
    #[serde_as(as = "OneOrMany<_>")]
    #[serde(default)]
    pub category: Vec<String>,
    #[serde_as(as = "OneOrMany<_>")]
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde_as(as = "OneOrMany<_>")]
    #[serde(default)]
    pub age_range: Vec<String>,
    #[serde_as(as = "OneOrMany<_>")]
    #[serde(default)]
    pub age_ranges: Vec<String>,
    #[serde_as(as = "OneOrMany<_>")]
    #[serde(default)]
    pub age: Vec<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub min_price: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub max_price: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default, rename = "price[gte]")]
    pub price_gte: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default, rename = "price[lte]")]
    pub price_lte: Option<String>,
    #[serde_as(as = "OneOrMany<_>")]
    #[serde(default)]
    pub condition: Vec<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub rating: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub min_rating: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub in_stock: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub sort: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub page: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub limit: Option<String>,
}

/// Normalized parameter bag handed to the pipeline builder.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub brands: Vec<String>,
    pub categories: Vec<String>,
    pub age_ranges: Vec<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub conditions: Vec<Condition>,
    pub min_rating: Option<f64>,
    pub in_stock: bool,
    pub sort: Sort,
    pub page: u32,
    pub limit: u32,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            search: None,
            brands: Vec::new(),
            categories: Vec::new(),
            age_ranges: Vec::new(),
            min_price: None,
            max_price: None,
            conditions: Vec::new(),
            min_rating: None,
            in_stock: false,
            sort: Sort::default(),
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ProductQuery {
    pub fn skip(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

// "12.5" -> Some(12.5), "abc" / "NaN" / "inf" -> None
fn parse_number(value: Option<&str>) -> Option<f64> {
    let parsed = value?.trim().parse::<f64>().ok()?;

    parsed.is_finite().then_some(parsed)
}

fn parse_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|flag| flag.trim().to_lowercase()).as_deref(),
        Some("true" | "1" | "yes" | "on")
    )
}

fn merge_tokens(values: &[&Vec<String>]) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();

    for value in values.iter().copied().flatten() {
        for token in split_tokens(value) {
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        }
    }

    tokens
}

impl ApiSearchInput {
    fn search_text(&self) -> Option<String> {
        [&self.search, &self.q, &self.query]
            .into_iter()
            .flatten()
            .map(|text| text.trim())
            .find(|text| !text.is_empty())
            .map(str::to_string)
    }

    fn min_price_value(&self) -> Option<&str> {
        self.min_price.as_deref().or(self.price_gte.as_deref())
    }

    fn max_price_value(&self) -> Option<&str> {
        self.max_price.as_deref().or(self.price_lte.as_deref())
    }

    fn rating_value(&self) -> Option<&str> {
        self.rating.as_deref().or(self.min_rating.as_deref())
    }

    fn condition_tokens(&self) -> Vec<String> {
        merge_tokens(&[&self.condition])
    }

    /// Adds a token taken from a path segment, e.g. `/products/brand/{brand}`.
    pub fn with_brand(mut self, brand: String) -> Self {
        self.brand.insert(0, brand);
        self
    }

    pub fn with_category(mut self, category: String) -> Self {
        self.category.insert(0, category);
        self
    }

    /// Lenient normalization used by the unified listing: numbers that do
    /// not parse are dropped, unknown conditions are ignored, paging is clamped.
    pub fn normalize(&self, max_limit: u32) -> ProductQuery {
        let conditions = self
            .condition_tokens()
            .iter()
            .filter_map(|token| match Condition::from_str(token) {
                Ok(condition) => Some(condition),
                Err(_) => {
                    debug!("Ignoring unknown condition: {token:?}");
                    None
                }
            })
            .fold(Vec::new(), |mut conditions, condition| {
                if !conditions.contains(&condition) {
                    conditions.push(condition);
                }
                conditions
            });

        let page = self
            .page
            .as_deref()
            .and_then(|page| page.trim().parse::<i64>().ok())
            .map(|page| page.clamp(1, i64::from(u32::MAX)) as u32)
            .unwrap_or(1);

        let limit = self
            .limit
            .as_deref()
            .and_then(|limit| limit.trim().parse::<i64>().ok())
            .map(|limit| limit.clamp(1, i64::from(max_limit)) as u32)
            .unwrap_or(DEFAULT_LIMIT.min(max_limit));

        ProductQuery {
            search: self.search_text(),
            brands: merge_tokens(&[&self.brand, &self.brands]),
            categories: merge_tokens(&[&self.category, &self.categories]),
            age_ranges: merge_tokens(&[&self.age_range, &self.age_ranges, &self.age]),
            min_price: parse_number(self.min_price_value()),
            max_price: parse_number(self.max_price_value()),
            conditions,
            min_rating: parse_number(self.rating_value()),
            in_stock: parse_flag(self.in_stock.as_deref()),
            sort: self
                .sort
                .as_deref()
                .map(Sort::parse_lenient)
                .unwrap_or_default(),
            page,
            limit,
        }
    }

    /// Strict normalization for the legacy endpoints, which answer 400
    /// instead of silently dropping bad input.
    pub fn normalize_strict(&self, max_limit: u32) -> Result<ProductQuery, InputError> {
        let strict_number = |name: &'static str, value: Option<&str>| match value {
            None => Ok(None),
            Some(raw) => parse_number(Some(raw))
                .map(Some)
                .ok_or_else(|| InputError::InvalidNumber(name, raw.to_string())),
        };

        let min_price = strict_number("minPrice", self.min_price_value())?;
        let max_price = strict_number("maxPrice", self.max_price_value())?;
        let rating = strict_number("rating", self.rating_value())?;

        if min_price.is_some_and(|price| price < 0.0) || max_price.is_some_and(|price| price < 0.0)
        {
            return Err(InputError::NegativePrice);
        }

        if let (Some(min), Some(max)) = (min_price, max_price)
            && min > max
        {
            return Err(InputError::InvertedPriceRange);
        }

        if rating.is_some_and(|rating| !(0.0..=5.0).contains(&rating)) {
            return Err(InputError::RatingOutOfBounds);
        }

        for token in self.condition_tokens() {
            if Condition::from_str(&token).is_err() {
                return Err(InputError::UnknownCondition(token));
            }
        }

        if let Some(page) = self.page.as_deref()
            && !matches!(page.trim().parse::<u32>(), Ok(page) if page >= 1)
        {
            return Err(InputError::InvalidPage);
        }

        if let Some(limit) = self.limit.as_deref() {
            match limit.trim().parse::<u32>() {
                Ok(limit) if (1..=max_limit).contains(&limit) => {}
                _ => return Err(InputError::InvalidLimit(max_limit)),
            }
        }

        Ok(self.normalize(max_limit))
    }
}
