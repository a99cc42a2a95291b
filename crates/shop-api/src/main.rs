//! # Storefront
//!
//! Shopping cart and checkout server.
//!
//! ## Usage
//!
//! ```bash
//! # Optional: mail relay for order confirmations
//! export MAIL_RELAY_URL=https://relay.example.com/v1/send
//! export MAIL_USER=shop@example.com
//! export MAIL_PASS=...
//!
//! # Run the server
//! storefront
//! ```

use shop_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    {
        let store = state.store.lock().await;
        info!("Environment: {}", state.config.environment);
        info!("Products loaded: {}", store.products().len());
        info!("{:?}", store);
    }

    let app = routes::create_router(state);

    info!("Storefront starting on http://{}", addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Products: GET http://{}/api/products", addr);
        info!("Checkout: POST http://{}/api/checkout", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  Storefront RS
  ━━━━━━━━━━━━━━━━━━━━━━━
  Cart, pricing and checkout
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
