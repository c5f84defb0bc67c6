use axum::{
    Router,
    extract::OriginalUri,
    http::HeaderValue,
    routing::get,
};
use services::services::config::Config;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{AppState, error::ApiError, routes};

pub fn router(state: AppState, config: &Config) -> Router {
    // Unknown API paths stay JSON 404s even when the client bundle is served.
    let api_routes = Router::new()
        .merge(routes::task_items::router())
        .fallback(api_not_found);

    let mut app = Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes);

    if let Some(static_dir) = &config.static_dir {
        tracing::info!("Serving client bundle from {}", static_dir.display());
        app = app.fallback_service(routes::frontend::static_files(static_dir));
    }

    app.layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn api_not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|origin| origin == "*") {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(origin = %origin, error = %err, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(allowed))
}
