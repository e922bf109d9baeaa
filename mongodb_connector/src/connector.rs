use common::{
    errors::InputError,
    product::{
        base::Product,
        input::{ProductInput, ProductPatch},
        view::ProductView,
    },
    reference::{AgeRange, Brand, CategoryNode},
    response::ProductListResponse,
    search_params::ProductQuery,
};
use mongodb::{
    Client, Database,
    bson::{doc, oid::ObjectId},
};
use tracing::{debug, error};

use crate::{
    assembler::ResultAssembler,
    collections::{products::ProductsCollection, references::ReferenceCollections},
    errors::ConnectorError,
    query_pipeline::{plan::CrossFilterPipelineBuilder, traits::SearchPipeline},
    resolver::ReferenceResolver,
};

pub struct MongoDBConnector {
    // mongodb structs are already Arc, thread safe
    database: Database,
    products: ProductsCollection,
    references: ReferenceCollections,
}

impl MongoDBConnector {
    pub async fn new(connection_uri: &str, database_name: &str) -> Result<Self, ConnectorError> {
        let client = Client::with_uri_str(connection_uri).await?;
        let database = client.database(database_name);

        Ok(Self {
            products: ProductsCollection::new(&database).await,
            references: ReferenceCollections::new(&database).await,
            database,
        })
    }

    pub async fn ping(&self) -> Result<(), ConnectorError> {
        self.database.run_command(doc! { "ping": 1 }).await?;

        Ok(())
    }

    /// Public listing: resolve reference tokens, build the three pipelines,
    /// run them side by side and assemble the response.
    pub async fn search_products(
        &self,
        query: &ProductQuery,
    ) -> Result<ProductListResponse, ConnectorError> {
        let references = ReferenceResolver::new(&self.references)
            .resolve_query(query)
            .await;

        let pipeline =
            SearchPipeline::new(CrossFilterPipelineBuilder::new(query, references).build());

        let output = self.products.search(&pipeline).await.inspect_err(|err| {
            error!("Failed to run product pipelines: {err}");
        })?;

        let response =
            ResultAssembler::new(query).assemble(output.products, output.count, output.facets);

        debug!(
            "Listing page {} of {} ({} products)",
            response.data.pagination.current_page,
            response.data.pagination.total_pages,
            response.data.pagination.total_products
        );

        Ok(response)
    }

    pub async fn find_product(&self, slug: &str) -> Result<Option<ProductView>, ConnectorError> {
        self.products.find_public(slug).await
    }

    pub async fn create_product(&self, input: ProductInput) -> Result<Product, ConnectorError> {
        let mut product = input.into_product()?;

        self.link_existing_products(&mut product).await?;

        let id = self.products.insert(&product).await?;
        product.id = Some(id);

        debug!("Created product {} ({id})", product.slug);

        Ok(product)
    }

    pub async fn update_product(
        &self,
        id: &str,
        patch: ProductPatch,
    ) -> Result<Product, ConnectorError> {
        let id = ObjectId::parse_str(id).map_err(|_| InputError::InvalidId(id.to_string()))?;

        let Some(mut product) = self.products.find_by_id(id).await? else {
            return Err(ConnectorError::NotFound(format!("Product {id}")));
        };

        patch.apply(&mut product)?;

        self.link_existing_products(&mut product).await?;
        self.products.replace(id, &product).await?;

        debug!("Updated product {} ({id})", product.slug);

        Ok(product)
    }

    async fn link_existing_products(&self, product: &mut Product) -> Result<(), ConnectorError> {
        let existing = self.products.existing_ids(&product.linked_products).await?;

        product.sanitize_linked_products(&existing);

        Ok(())
    }

    pub async fn brands(&self) -> Result<Vec<Brand>, ConnectorError> {
        self.references.active_brands().await
    }

    pub async fn age_ranges(&self) -> Result<Vec<AgeRange>, ConnectorError> {
        self.references.active_age_ranges().await
    }

    pub async fn category_tree(&self) -> Result<Vec<CategoryNode>, ConnectorError> {
        self.references.category_tree().await
    }
}
