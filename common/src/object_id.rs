//! JSON output helpers for documents whose ids stay `ObjectId` in BSON
//! but are handed to the storefront as plain hex strings.

use mongodb::bson::oid::ObjectId;
use serde::Serializer;

pub fn serialize_hex<S>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&id.to_hex())
}

pub fn serialize_optional_hex<S>(id: &Option<ObjectId>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match id {
        Some(id) => serializer.serialize_str(&id.to_hex()),
        None => serializer.serialize_none(),
    }
}
