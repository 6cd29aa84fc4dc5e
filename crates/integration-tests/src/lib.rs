//! Integration tests for the RocketShoes cart.
//!
//! The tests drive a real [`CartStore`] against a mocked catalog HTTP service
//! and file-backed storage in a temporary directory.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rocketshoes_cart::{CART_STORAGE_KEY, CartStore, FileStore, HttpCatalog, RecordingNotifier};
use url::Url;

/// Store type used across the integration tests.
pub type TestStore = CartStore<HttpCatalog, FileStore, Arc<RecordingNotifier>>;

/// A mocked catalog server plus a scratch directory for cart storage.
pub struct TestContext {
    pub server: mockito::ServerGuard,
    pub notifier: Arc<RecordingNotifier>,
    dir: tempfile::TempDir,
}

impl TestContext {
    /// Start a catalog server and create an empty storage directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    pub async fn new() -> Self {
        #[allow(clippy::unwrap_used)]
        let dir = tempfile::tempdir().unwrap();
        Self {
            server: mockito::Server::new_async().await,
            notifier: Arc::new(RecordingNotifier::new()),
            dir,
        }
    }

    /// Path of the storage file.
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        self.dir.path().join("storage.json")
    }

    /// Open a fresh store over the shared storage file, as a page load would.
    ///
    /// # Panics
    ///
    /// Panics if the mock server URL is not a valid catalog URL.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn open_store(&self) -> TestStore {
        let base_url = Url::parse(&self.server.url()).unwrap();
        let catalog = HttpCatalog::with_base_url(base_url, Duration::from_secs(5)).unwrap();
        CartStore::open(
            catalog,
            FileStore::new(self.storage_path()),
            Arc::clone(&self.notifier),
        )
    }

    /// Raw JSON object held in the storage file.
    ///
    /// # Panics
    ///
    /// Panics if the file is missing or not valid JSON.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn stored_json(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(self.storage_path()).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    /// The cart array stored under [`CART_STORAGE_KEY`].
    ///
    /// The storage file maps each key to a string holding the serialized
    /// value, so the cart is decoded a second time.
    ///
    /// # Panics
    ///
    /// Panics if the key is missing, not a string, or not valid JSON.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn stored_cart(&self) -> serde_json::Value {
        let stored = self.stored_json();
        let raw = stored[CART_STORAGE_KEY].as_str().unwrap();
        serde_json::from_str(raw).unwrap()
    }

    /// Serve `GET /stock/{id}` with the given amount.
    pub async fn mock_stock(&mut self, id: i32, amount: u32) -> mockito::Mock {
        self.server
            .mock("GET", format!("/stock/{id}").as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(serde_json::json!({ "id": id, "amount": amount }).to_string())
            .create_async()
            .await
    }

    /// Serve `GET /products/{id}` with a product named after its id.
    pub async fn mock_product(&mut self, id: i32, price: &str) -> mockito::Mock {
        let body = serde_json::json!({
            "id": id,
            "name": format!("Tenis {id}"),
            "price": price,
            "imageUrl": format!("https://cdn.example.com/{id}.jpg"),
        });
        self.server
            .mock("GET", format!("/products/{id}").as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }
}
