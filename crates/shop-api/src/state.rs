//! # Application State
//!
//! Shared state for the Axum application.
//! Holds the storefront behind a single async mutex, plus configuration.

use shop_core::{CatalogSeed, Storefront};
use shop_gateways::{default_gateways, RelayMailer};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Directory of static frontend files, served when present
    pub static_dir: Option<PathBuf>,
    /// Explicit catalog seed file
    pub catalog_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            static_dir: Some(
                std::env::var("STATIC_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("static")),
            ),
            catalog_path: std::env::var("CATALOG_PATH").ok().map(PathBuf::from),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
///
/// Every request locks `store` for its whole operation, checkout included.
#[derive(Clone)]
pub struct AppState {
    /// The storefront
    pub store: Arc<Mutex<Storefront>>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState with the card/PayPal gateways and the relay mailer
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let mailer = RelayMailer::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize mailer: {}", e))?;
        let mut store = Storefront::new(default_gateways(), Arc::new(mailer));

        let seed = load_catalog_seed(config.catalog_path.as_deref())?;
        for entry in seed.into_entries() {
            store.add_product(entry);
        }

        Ok(Self::with_store(store, config))
    }

    /// Wrap an already-built storefront
    pub fn with_store(store: Storefront, config: AppConfig) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            config,
        }
    }
}

/// Load the catalog seed from config file, or fall back to the built-in seed
fn load_catalog_seed(explicit: Option<&std::path::Path>) -> anyhow::Result<CatalogSeed> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let seed = CatalogSeed::from_toml(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        tracing::info!("Loaded {} products from {}", seed.products.len(), path.display());
        return Ok(seed);
    }

    let config_paths = [
        "config/catalog.toml",
        "../config/catalog.toml",
        "../../config/catalog.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let seed = CatalogSeed::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded {} products from {}", seed.products.len(), path);
            return Ok(seed);
        }
    }

    tracing::warn!("No catalog file found, using built-in seed products");
    Ok(CatalogSeed::builtin())
}
