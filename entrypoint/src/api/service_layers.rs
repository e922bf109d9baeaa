use axum::http::{HeaderValue, Method, header::InvalidHeaderValue};
use tower::{
    ServiceBuilder,
    layer::util::{Identity, Stack},
};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    cors::CorsLayer,
    trace::TraceLayer,
};

type ServiceLayers =
    Stack<CorsLayer, Stack<TraceLayer<SharedClassifier<ServerErrorsAsFailures>>, Identity>>;

pub(crate) fn build_service_layers(
    allowed_origin: &str,
) -> Result<ServiceBuilder<ServiceLayers>, InvalidHeaderValue> {
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .allow_origin(allowed_origin.parse::<HeaderValue>()?);

    Ok(ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer))
}
