use std::collections::HashSet;

use common::product::{base::Product, view::ProductView};
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Bson, Document, doc, oid::ObjectId},
    options::IndexOptions,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    constants::{
        COLLECTION_PRODUCTS_NAME, INDEX_PRODUCT_BRAND, INDEX_PRODUCT_CATEGORIES,
        INDEX_PRODUCT_CREATED_AT, INDEX_PRODUCT_VISIBILITY, INDEX_SLUG_UNIQUE,
    },
    errors::ConnectorError,
    query_pipeline::traits::{SearchPipeline, get_detail_documents},
    structs::{Count, IdOnly, RawFacets},
};

pub(crate) struct ProductsCollection {
    collection: Collection<Product>,
}

/// Raw output of the three listing pipelines, before assembly.
pub(crate) struct SearchOutput {
    pub(crate) products: Vec<ProductView>,
    pub(crate) count: Option<Count>,
    pub(crate) facets: Option<RawFacets>,
}

impl ProductsCollection {
    pub(crate) async fn new(db: &Database) -> Self {
        Self::create_indexes(db).await;

        Self {
            collection: db.collection::<Product>(COLLECTION_PRODUCTS_NAME),
        }
    }

    async fn create_indexes(db: &Database) {
        let named = |keys: Document, name: &str, unique: bool| {
            IndexModel::builder()
                .keys(keys)
                .options(
                    IndexOptions::builder()
                        .name(name.to_string())
                        .unique(unique)
                        .build(),
                )
                .build()
        };

        let indexes = vec![
            named(doc! { "slug": 1 }, INDEX_SLUG_UNIQUE, true),
            named(
                doc! { "isActive": 1, "status": 1 },
                INDEX_PRODUCT_VISIBILITY,
                false,
            ),
            named(doc! { "brand": 1 }, INDEX_PRODUCT_BRAND, false),
            named(doc! { "categories": 1 }, INDEX_PRODUCT_CATEGORIES, false),
            named(doc! { "createdAt": -1 }, INDEX_PRODUCT_CREATED_AT, false),
        ];

        db.collection::<Product>(COLLECTION_PRODUCTS_NAME)
            .create_indexes(indexes)
            .await
            .unwrap_or_else(|err| {
                panic!("Creating {COLLECTION_PRODUCTS_NAME} indexes to not fail: {err}")
            });
    }

    async fn aggregate<T>(&self, documents: Vec<Document>) -> Result<Vec<T>, ConnectorError>
    where
        T: DeserializeOwned + Send + Sync,
    {
        let mut cursor = self.collection.aggregate(documents).with_type::<T>().await?;

        let mut results: Vec<T> = Vec::new();

        while cursor.advance().await? {
            results.push(cursor.deserialize_current()?);
        }

        Ok(results)
    }

    /// Runs the listing, count and metadata pipelines concurrently. They read
    /// independently, so counts can drift from the page under concurrent writes.
    pub(crate) async fn search(
        &self,
        pipeline: &SearchPipeline,
    ) -> Result<SearchOutput, ConnectorError> {
        let (products, counts, facets) = tokio::try_join!(
            self.aggregate::<ProductView>(pipeline.get_search_documents()),
            self.aggregate::<Count>(pipeline.get_count_documents()),
            self.aggregate::<RawFacets>(pipeline.get_metadata_documents()),
        )?;

        debug!(
            "Fetched {} products, count documents: {}, facet documents: {}",
            products.len(),
            counts.len(),
            facets.len()
        );

        Ok(SearchOutput {
            products,
            count: counts.into_iter().next(),
            facets: facets.into_iter().next(),
        })
    }

    pub(crate) async fn find_public(&self, slug: &str) -> Result<Option<ProductView>, ConnectorError> {
        let products = self
            .aggregate::<ProductView>(get_detail_documents(slug))
            .await?;

        Ok(products.into_iter().next())
    }

    pub(crate) async fn find_by_id(&self, id: ObjectId) -> Result<Option<Product>, ConnectorError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub(crate) async fn existing_ids(
        &self,
        ids: &[ObjectId],
    ) -> Result<HashSet<ObjectId>, ConnectorError> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }

        let mut cursor = self
            .collection
            .clone_with_type::<IdOnly>()
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .projection(doc! { "_id": 1 })
            .await?;

        let mut existing: HashSet<ObjectId> = HashSet::new();

        while cursor.advance().await? {
            existing.insert(cursor.deserialize_current()?.id);
        }

        Ok(existing)
    }

    pub(crate) async fn insert(&self, product: &Product) -> Result<ObjectId, ConnectorError> {
        let result = self
            .collection
            .insert_one(product)
            .await
            .map_err(|err| ConnectorError::from_write(err, &format!("Product {}", product.slug)))?;

        inserted_object_id(&result.inserted_id, &product.slug)
    }

    pub(crate) async fn replace(&self, id: ObjectId, product: &Product) -> Result<(), ConnectorError> {
        let result = self
            .collection
            .replace_one(doc! { "_id": id }, product)
            .await
            .map_err(|err| ConnectorError::from_write(err, &format!("Product {}", product.slug)))?;

        if result.matched_count == 0 {
            return Err(ConnectorError::NotFound(format!("Product {id}")));
        }

        Ok(())
    }
}

fn inserted_object_id(id: &Bson, slug: &str) -> Result<ObjectId, ConnectorError> {
    id.as_object_id()
        .ok_or_else(|| ConnectorError::UnexpectedId(format!("product {slug}")))
}
