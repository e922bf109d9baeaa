use async_trait::async_trait;
use common::reference::{AgeRange, Brand, Category, CategoryNode, ReferenceKind, ReferenceStatus};
use mongodb::{
    Collection, Database, IndexModel,
    bson::{doc, oid::ObjectId},
    options::IndexOptions,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    constants::{
        COLLECTION_AGE_RANGES_NAME, COLLECTION_BRANDS_NAME, COLLECTION_CATEGORIES_NAME,
        INDEX_SLUG_UNIQUE,
    },
    errors::ConnectorError,
    resolver::{ReferenceLookup, token_filter},
    structs::IdOnly,
};

enum ParentScope<'a> {
    Any,
    Roots,
    ChildrenOf(&'a [ObjectId]),
}

/// Brands, categories and age ranges: the collections filter tokens resolve against.
pub(crate) struct ReferenceCollections {
    brands: Collection<Brand>,
    categories: Collection<Category>,
    age_ranges: Collection<AgeRange>,
}

impl ReferenceCollections {
    pub(crate) async fn new(db: &Database) -> Self {
        for name in [
            COLLECTION_BRANDS_NAME,
            COLLECTION_CATEGORIES_NAME,
            COLLECTION_AGE_RANGES_NAME,
        ] {
            Self::create_indexes(db, name).await;
        }

        Self {
            brands: db.collection::<Brand>(COLLECTION_BRANDS_NAME),
            categories: db.collection::<Category>(COLLECTION_CATEGORIES_NAME),
            age_ranges: db.collection::<AgeRange>(COLLECTION_AGE_RANGES_NAME),
        }
    }

    async fn create_indexes(db: &Database, name: &str) {
        let slug_index = IndexModel::builder()
            .keys(doc! {
                "slug": 1,
            })
            .options(
                IndexOptions::builder()
                    .name(INDEX_SLUG_UNIQUE.to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        db.collection::<IdOnly>(name)
            .create_index(slug_index)
            .await
            .unwrap_or_else(|err| panic!("Creating slug index on {name} to not fail: {err}"));
    }

    fn collection_name(kind: ReferenceKind) -> &'static str {
        match kind {
            ReferenceKind::Brand => COLLECTION_BRANDS_NAME,
            ReferenceKind::Category => COLLECTION_CATEGORIES_NAME,
            ReferenceKind::AgeRange => COLLECTION_AGE_RANGES_NAME,
        }
    }

    fn id_collection(&self, kind: ReferenceKind) -> Collection<IdOnly> {
        match kind {
            ReferenceKind::Brand => self.brands.clone_with_type::<IdOnly>(),
            ReferenceKind::Category => self.categories.clone_with_type::<IdOnly>(),
            ReferenceKind::AgeRange => self.age_ranges.clone_with_type::<IdOnly>(),
        }
    }

    async fn find_active<T>(
        collection: &Collection<T>,
        parent: ParentScope<'_>,
    ) -> Result<Vec<T>, ConnectorError>
    where
        T: DeserializeOwned + Send + Sync,
    {
        let mut filter = doc! {
            "status": ReferenceStatus::Active.to_string(),
        };

        match parent {
            ParentScope::Any => {}
            ParentScope::Roots => {
                filter.insert("parentCategory", doc! { "$in": [null] });
            }
            ParentScope::ChildrenOf(parents) => {
                filter.insert("parentCategory", doc! { "$in": parents.to_vec() });
            }
        }

        let mut cursor = collection
            .find(filter)
            .sort(doc! { "order": 1, "name": 1 })
            .await?;

        let mut results: Vec<T> = Vec::new();

        while cursor.advance().await? {
            results.push(cursor.deserialize_current()?);
        }

        Ok(results)
    }

    pub(crate) async fn active_brands(&self) -> Result<Vec<Brand>, ConnectorError> {
        Self::find_active(&self.brands, ParentScope::Any).await
    }

    pub(crate) async fn active_age_ranges(&self) -> Result<Vec<AgeRange>, ConnectorError> {
        Self::find_active(&self.age_ranges, ParentScope::Any).await
    }

    /// Active top level categories with one level of active children.
    pub(crate) async fn category_tree(&self) -> Result<Vec<CategoryNode>, ConnectorError> {
        let roots = Self::find_active(&self.categories, ParentScope::Roots).await?;
        let root_ids: Vec<ObjectId> = roots.iter().map(|category| category.id).collect();

        let children = match root_ids.is_empty() {
            true => Vec::new(),
            false => Self::find_active(&self.categories, ParentScope::ChildrenOf(&root_ids)).await?,
        };

        Ok(CategoryNode::build_tree(roots, children))
    }
}

#[async_trait]
impl ReferenceLookup for ReferenceCollections {
    async fn find_ids(
        &self,
        kind: ReferenceKind,
        tokens: &[String],
    ) -> Result<Vec<ObjectId>, ConnectorError> {
        let filter = token_filter(tokens);

        debug!(
            "Resolving {kind} in {}: {:?}",
            Self::collection_name(kind),
            filter
        );

        let mut cursor = self
            .id_collection(kind)
            .find(filter)
            .projection(doc! { "_id": 1 })
            .await?;

        let mut ids: Vec<ObjectId> = Vec::new();

        while cursor.advance().await? {
            ids.push(cursor.deserialize_current()?.id);
        }

        Ok(ids)
    }
}
