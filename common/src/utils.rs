use chrono::Utc;
use regex::Regex;
use std::sync::LazyLock;

static NON_SLUG_CHARACTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("slug regex to compile"));

pub fn get_current_time() -> i64 {
    Utc::now().timestamp()
}

/// Splits a comma separated query value into trimmed, non-empty,
/// de-duplicated tokens, keeping the order they were given in.
pub fn split_tokens(value: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();

    for token in value.split(',').map(str::trim) {
        if token.is_empty() || tokens.iter().any(|existing| existing == token) {
            continue;
        }

        tokens.push(token.to_string());
    }

    tokens
}

/// "Gaming Laptops & Accessories" -> "gaming-laptops-accessories"
pub fn slugify(value: &str) -> String {
    NON_SLUG_CHARACTERS
        .replace_all(&value.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}
