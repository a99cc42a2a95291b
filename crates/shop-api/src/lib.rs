//! # shop-api
//!
//! HTTP API layer for storefront-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server over a single shared `Storefront`
//! - REST endpoints for the catalog, cart, discounts and checkout
//! - Static file serving for the bundled frontend
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/products` | List products |
//! | GET/POST/PUT/DELETE | `/api/cart` | Read and edit the cart |
//! | POST/DELETE | `/api/discount` | Apply or clear a discount |
//! | POST | `/api/update` | Change a product's price or stock |
//! | POST | `/api/checkout` | Pay and place the order |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
