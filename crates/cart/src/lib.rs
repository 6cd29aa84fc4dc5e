//! RocketShoes cart library.
//!
//! Tracks which products a shopper has added, keeps that list in a durable
//! key-value slot across restarts, and checks every quantity change against
//! the stock reported by the catalog service.
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_cart::{CartConfig, CartStore, FileStore, HttpCatalog, ProductId, TracingNotifier};
//!
//! let config = CartConfig::from_env()?;
//! let catalog = HttpCatalog::new(&config)?;
//! let storage = FileStore::new(&config.storage_path);
//! let mut store = CartStore::open(catalog, storage, TracingNotifier);
//!
//! store.add_product(ProductId::new(1)).await?;
//! println!("{} items", store.cart().item_count());
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod store;

#[cfg(test)]
mod test_support;

pub use cart::{Cart, CartInvariantError, Product};
pub use catalog::{Catalog, CatalogError, HttpCatalog, ProductDetails, StockEntry};
pub use config::{CartConfig, ConfigError};
pub use error::{CartError, CartOperation};
pub use notify::{Notifier, RecordingNotifier, TracingNotifier};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{CART_STORAGE_KEY, CartChange, CartStore, UpdateProductAmount};

pub use rocketshoes_core::{Price, ProductId};
