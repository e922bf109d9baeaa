use serde::{Deserialize, Deserializer, de::Error};

fn non_blank<E: Error>(field: String) -> Result<String, E> {
    match field.trim() {
        "" => Err(E::custom("field is blank")),
        trimmed => Ok(trimmed.to_string()),
    }
}

/// Required string field, trimmed. `null` and whitespace-only values are rejected.
pub fn disallow_empty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(field) => non_blank(field),
        None => Err(D::Error::custom("field is not a string")),
    }
}

/// Same as [`disallow_empty_string`] for patch fields, where absence is allowed
/// but a blank value is not.
pub fn disallow_empty_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(non_blank)
        .transpose()
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Deserialize, Debug)]
    struct Named {
        #[serde(deserialize_with = "disallow_empty_string")]
        name: String,
        #[serde(default, deserialize_with = "disallow_empty_optional_string")]
        nickname: Option<String>,
    }

    #[test]
    fn trims_required_values() {
        let named: Named = serde_json::from_value(json!({ "name": "  Kite  " })).unwrap();

        assert_eq!(named.name, "Kite");
        assert_eq!(named.nickname, None);
    }

    #[test]
    fn rejects_blank_values() {
        assert!(serde_json::from_value::<Named>(json!({ "name": "   " })).is_err());
        assert!(serde_json::from_value::<Named>(json!({ "name": null })).is_err());
        assert!(serde_json::from_value::<Named>(json!({ "name": "Kite", "nickname": " " })).is_err());
    }
}
