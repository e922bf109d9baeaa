use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::object_id::{serialize_hex, serialize_optional_hex};

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReferenceStatus {
    #[default]
    Active,
    Inactive,
}

/// The lookup collections a filter token can be resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ReferenceKind {
    Brand,
    Category,
    AgeRange,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    #[serde(rename = "_id", serialize_with = "serialize_hex")]
    pub id: ObjectId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub status: ReferenceStatus,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub order: i32,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id", serialize_with = "serialize_hex")]
    pub id: ObjectId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub status: ReferenceStatus,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, serialize_with = "serialize_optional_hex")]
    pub parent_category: Option<ObjectId>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub order: i32,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AgeRange {
    #[serde(rename = "_id", serialize_with = "serialize_hex")]
    pub id: ObjectId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub status: ReferenceStatus,
    #[serde(default)]
    pub min_age: Option<i32>,
    #[serde(default)]
    pub max_age: Option<i32>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub order: i32,
}

/// A top level category with its direct children, one level deep.
#[derive(Serialize, Debug, Clone)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<Category>,
}

impl CategoryNode {
    /// Groups `children` under their parent in `roots`. Children pointing at
    /// themselves or at a parent outside `roots` are dropped.
    pub fn build_tree(roots: Vec<Category>, children: Vec<Category>) -> Vec<CategoryNode> {
        let mut nodes: Vec<CategoryNode> = roots
            .into_iter()
            .map(|category| CategoryNode {
                category,
                children: Vec::new(),
            })
            .collect();

        for child in children {
            let Some(parent_id) = child.parent_category else {
                continue;
            };

            if parent_id == child.id {
                continue;
            }

            if let Some(node) = nodes.iter_mut().find(|node| node.category.id == parent_id) {
                node.children.push(child);
            }
        }

        nodes
    }
}
