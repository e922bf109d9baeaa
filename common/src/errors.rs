use thiserror::Error;

/// Rejections raised while validating client input, either strict
/// search parameters or product writes. Every variant maps to a 400.
#[derive(Error, Debug, PartialEq)]
pub enum InputError {
    #[error("Invalid number for {0}: {1}")]
    InvalidNumber(&'static str, String),
    #[error("Price cannot be negative")]
    NegativePrice,
    #[error("Minimum price cannot be greater than maximum price")]
    InvertedPriceRange,
    #[error("Rating must be between 0 and 5")]
    RatingOutOfBounds,
    #[error("Unknown condition: {0}")]
    UnknownCondition(String),
    #[error("Page must be a positive integer")]
    InvalidPage,
    #[error("Limit must be between 1 and {0}")]
    InvalidLimit(u32),
    #[error("Product must belong to at least one category")]
    MissingCategories,
    #[error("Base price is required for products without variants")]
    MissingBasePrice,
    #[error("Variant products need at least one variant")]
    MissingVariants,
    #[error("Thumbnail image is required")]
    MissingThumbnail,
    #[error("Slug is invalid: {0}")]
    InvalidSlug(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
}
