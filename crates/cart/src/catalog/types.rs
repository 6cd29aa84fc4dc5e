//! Wire types for the catalog service.

use rocketshoes_core::{Price, ProductId};
use serde::{Deserialize, Serialize};

/// Product details returned by `GET /products/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    /// Catalog product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Product image URL.
    pub image_url: String,
}

/// Available stock returned by `GET /stock/{id}`.
///
/// Only valid for the check it was fetched for; never cache it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    /// Catalog product ID.
    pub id: ProductId,
    /// Units available.
    pub amount: u32,
}
