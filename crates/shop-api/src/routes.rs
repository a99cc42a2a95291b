//! # Routes
//!
//! Axum router configuration for the storefront API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;

/// Create the main application router
///
/// Routes:
/// - GET    /health, /          - Health check
/// - GET    /api/products       - List products
/// - GET    /api/cart           - Cart contents, totals and stock warnings
/// - POST   /api/cart           - Add to cart
/// - PUT    /api/cart           - Set line quantity
/// - DELETE /api/cart?productId - Remove line
/// - POST   /api/discount       - Apply discount strategy
/// - DELETE /api/discount       - Clear discount strategy
/// - POST   /api/update         - Change product price or stock
/// - POST   /api/checkout       - Pay and place order
///
/// Anything else falls through to the static directory when one is configured.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/products", get(handlers::list_products))
        .route(
            "/cart",
            get(handlers::get_cart)
                .post(handlers::add_to_cart)
                .put(handlers::update_cart)
                .delete(handlers::remove_from_cart),
        )
        .route(
            "/discount",
            post(handlers::apply_discount).delete(handlers::clear_discount),
        )
        .route("/update", post(handlers::update_product))
        .route("/checkout", post(handlers::checkout));

    let static_dir = state.config.static_dir.clone().filter(|dir| dir.is_dir());

    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes);

    match static_dir {
        Some(dir) => {
            info!("Serving static files from {}", dir.display());
            router = router.fallback_service(ServeDir::new(dir));
        }
        None => {
            router = router.route("/", get(handlers::health));
        }
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
