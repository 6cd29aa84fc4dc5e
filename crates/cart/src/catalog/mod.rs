//! Catalog and stock lookups.
//!
//! # Architecture
//!
//! - [`Catalog`] is the seam the cart store depends on, so tests and other
//!   backends can stand in for the HTTP service
//! - [`HttpCatalog`] talks to the REST backend with `reqwest`
//! - The catalog is the source of truth for stock - nothing is cached
//!
//! # Endpoints
//!
//! - `GET /stock/{id}` - `{ "id": 1, "amount": 3 }`
//! - `GET /products/{id}` - `{ "id": 1, "name": "...", "price": 139.9, "imageUrl": "..." }`
//! - `GET /products` - list of product details

mod types;

pub use types::{ProductDetails, StockEntry};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rocketshoes_core::ProductId;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::CartConfig;

/// Errors that can occur when talking to the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("HTTP {status} from {path}")]
    Status { status: u16, path: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The service returned a record for a different product.
    #[error("Requested product {requested}, got {returned}")]
    IdMismatch {
        requested: ProductId,
        returned: ProductId,
    },
}

/// Read-only product and stock lookups by product id.
pub trait Catalog {
    /// Current stock for a product.
    fn stock(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<StockEntry, CatalogError>> + Send;

    /// Product details for building a cart entry.
    fn product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<ProductDetails, CatalogError>> + Send;
}

impl<T: Catalog + Send + Sync> Catalog for Arc<T> {
    fn stock(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<StockEntry, CatalogError>> + Send {
        (**self).stock(id)
    }

    fn product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<ProductDetails, CatalogError>> + Send {
        (**self).product(id)
    }
}

// =============================================================================
// HttpCatalog
// =============================================================================

/// Client for the catalog REST service.
#[derive(Clone)]
pub struct HttpCatalog {
    inner: Arc<HttpCatalogInner>,
}

struct HttpCatalogInner {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpCatalog {
    /// Create a catalog client from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &CartConfig) -> Result<Self, CatalogError> {
        Self::with_base_url(config.catalog_url.clone(), config.catalog_timeout)
    }

    /// Create a catalog client for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn with_base_url(mut base_url: Url, timeout: Duration) -> Result<Self, CatalogError> {
        // Url::join replaces the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            inner: Arc::new(HttpCatalogInner { client, base_url }),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// List every product in the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the body is malformed.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<ProductDetails>, CatalogError> {
        self.get_json("products").await
    }

    /// GET a path relative to the base URL and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = self.inner.base_url.join(path)?;

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                path,
                body = %response_text.chars().take(500).collect::<String>(),
                "Catalog returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                path,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }
}

impl Catalog for HttpCatalog {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn stock(&self, id: ProductId) -> Result<StockEntry, CatalogError> {
        let stock: StockEntry = self.get_json(&format!("stock/{id}")).await?;
        ensure_same_id(id, stock.id)?;
        debug!(available = stock.amount, "Fetched stock");
        Ok(stock)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn product(&self, id: ProductId) -> Result<ProductDetails, CatalogError> {
        let product: ProductDetails = self.get_json(&format!("products/{id}")).await?;
        ensure_same_id(id, product.id)?;
        Ok(product)
    }
}

fn ensure_same_id(requested: ProductId, returned: ProductId) -> Result<(), CatalogError> {
    if requested == returned {
        Ok(())
    } else {
        Err(CatalogError::IdMismatch {
            requested,
            returned,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_for(server: &mockito::ServerGuard) -> HttpCatalog {
        let base_url = Url::parse(&server.url()).unwrap();
        HttpCatalog::with_base_url(base_url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_stock_lookup() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/stock/1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":1,"amount":3}"#)
            .create_async()
            .await;

        let stock = catalog_for(&server).stock(ProductId::new(1)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            stock,
            StockEntry {
                id: ProductId::new(1),
                amount: 3
            }
        );
    }

    #[tokio::test]
    async fn test_product_lookup() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/products/2")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":2,"name":"Tenis Runner","price":139.9,"imageUrl":"https://cdn.example.com/2.jpg"}"#,
            )
            .create_async()
            .await;

        let product = catalog_for(&server)
            .product(ProductId::new(2))
            .await
            .unwrap();

        assert_eq!(product.name, "Tenis Runner");
        assert_eq!(product.price, rocketshoes_core::Price::from_cents(13990));
        assert_eq!(product.image_url, "https://cdn.example.com/2.jpg");
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/stock/404")
            .with_status(404)
            .with_body("{}")
            .create_async()
            .await;

        let err = catalog_for(&server)
            .stock(ProductId::new(404))
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/stock/1")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = catalog_for(&server)
            .stock(ProductId::new(1))
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[tokio::test]
    async fn test_id_mismatch() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/stock/1")
            .with_status(200)
            .with_body(r#"{"id":2,"amount":3}"#)
            .create_async()
            .await;

        let err = catalog_for(&server)
            .stock(ProductId::new(1))
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::IdMismatch { .. }));
    }

    #[tokio::test]
    async fn test_base_url_with_path_prefix() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/products")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let base_url = Url::parse(&format!("{}/api", server.url())).unwrap();
        let catalog = HttpCatalog::with_base_url(base_url, Duration::from_secs(5)).unwrap();
        let products = catalog.list_products().await.unwrap();

        mock.assert_async().await;
        assert!(products.is_empty());
    }
}
