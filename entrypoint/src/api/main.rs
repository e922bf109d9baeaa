mod routes;
mod service_layers;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post},
};
use clap::Parser;
use mimalloc::MiMalloc;
use mongodb_connector::connector::MongoDBConnector;
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};
use utils::{config::ApiArgs, logger::configure_logger};

use crate::{
    routes::{
        admin::{create_product_handler, update_product_handler},
        health::health_handler,
        products::{
            brand_products_handler, category_products_handler, legacy_filter_handler,
            legacy_search_handler, product_detail_handler, products_handler,
        },
        references::{age_ranges_handler, brands_handler, categories_handler},
    },
    service_layers::build_service_layers,
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

pub(crate) struct ServerState {
    pub(crate) db: MongoDBConnector,
}

fn build_router(state: Arc<ServerState>, allowed_origin: &str) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/products", get(products_handler))
        .route("/products/search", get(legacy_search_handler))
        .route("/products/filter", get(legacy_filter_handler))
        .route("/products/category/{category}", get(category_products_handler))
        .route("/products/brand/{brand}", get(brand_products_handler))
        .route("/products/{slug}", get(product_detail_handler))
        .route("/brands", get(brands_handler))
        .route("/categories", get(categories_handler))
        .route("/age-ranges", get(age_ranges_handler))
        .route("/admin/products", post(create_product_handler))
        .route("/admin/products/{id}", patch(update_product_handler))
        .layer(build_service_layers(allowed_origin).expect("Invalid allowed origin"))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {err}");
    }

    info!("Shutting down");
}

#[tokio::main]
async fn main() {
    configure_logger();

    let args = ApiArgs::parse();

    let db = MongoDBConnector::new(&args.connection_uri(), &args.database)
        .await
        .expect("Failed to connect to MongoDB");

    let state = Arc::new(ServerState { db });
    let app = build_router(state, &args.allowed_origin);

    let listener = TcpListener::bind(&args.bind)
        .await
        .expect("Failed to bind listener");

    info!("Listening on {}", args.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server exited unexpectedly");

    if let Err(err) = metrics::shutdown() {
        warn!("Failed to flush metrics: {err}");
    }
}
