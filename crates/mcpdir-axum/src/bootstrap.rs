//! Bootstrap for the Axum adapter.
//!
//! Opens the catalog store when a database is configured. Without one, or
//! when it cannot be opened, every request is answered from the mock
//! catalog.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use mcpdir_core::{CatalogReader, InMemoryCatalog};
use mcpdir_db::{CatalogFactory, setup_database};
use tracing::{info, warn};

use crate::mock::mock_catalog;

pub const DEFAULT_PORT: u16 = 8787;

/// CORS configuration for the HTTP server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins.
    #[default]
    AllowAll,
    /// Allow specific origins.
    AllowOrigins(Vec<String>),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP server.
    pub port: u16,
    /// Catalog database. `None` serves mock data.
    pub database: Option<PathBuf>,
    /// CORS configuration.
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database: None,
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_database(mut self, path: Option<PathBuf>) -> Self {
        self.database = path;
        self
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }
}

/// Everything the handlers read from.
pub struct AxumContext {
    /// Live catalog store, if one is available.
    pub store: Option<Arc<dyn CatalogReader>>,
    /// Served when the store is missing or failing.
    pub mock: Arc<InMemoryCatalog>,
}

impl AxumContext {
    pub fn new(store: Option<Arc<dyn CatalogReader>>) -> Self {
        Self {
            store,
            mock: Arc::new(mock_catalog()),
        }
    }

    /// Context that never touches a store.
    pub fn mock_only() -> Self {
        Self::new(None)
    }
}

pub async fn bootstrap(config: &ServerConfig) -> Result<AxumContext> {
    let Some(path) = &config.database else {
        info!("No catalog database configured, serving mock data");
        return Ok(AxumContext::mock_only());
    };

    match setup_database(path).await {
        Ok(pool) => {
            info!(database = %path.display(), "Catalog store ready");
            let store: Arc<dyn CatalogReader> = CatalogFactory::catalog_reader(pool);
            Ok(AxumContext::new(Some(store)))
        }
        Err(e) => {
            warn!(database = %path.display(), error = %e, "Catalog store unavailable, serving mock data");
            Ok(AxumContext::mock_only())
        }
    }
}

/// Bind and serve until the process is stopped.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    use tokio::net::TcpListener;

    let ctx = bootstrap(&config).await?;
    let app = crate::routes::create_router(ctx, &config.cors);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("mcpdir API listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
