//! Cart domain types.
//!
//! A [`Cart`] is an ordered list of [`Product`] entries, unique by product id,
//! each with an amount of at least one. The invariants are checked whenever a
//! cart is built from outside data (deserialization, [`Cart::from_products`]),
//! so the store can treat any `Cart` value it holds as well-formed.

use std::collections::{BTreeMap, HashSet};

use rocketshoes_core::{Price, ProductId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::ProductDetails;

/// Reasons a list of products cannot form a cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartInvariantError {
    /// Two entries share the same product id.
    #[error("product {0} appears more than once")]
    DuplicateProduct(ProductId),

    /// An entry has an amount of zero.
    #[error("product {0} has an amount of zero")]
    ZeroAmount(ProductId),
}

/// A product in the cart together with the quantity the shopper wants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Product image URL.
    pub image_url: String,
    /// Quantity in the cart (always at least 1).
    pub amount: u32,
}

impl Product {
    /// Build a cart entry from catalog details.
    #[must_use]
    pub fn from_details(details: ProductDetails, amount: u32) -> Self {
        Self {
            id: details.id,
            name: details.name,
            price: details.price,
            image_url: details.image_url,
            amount,
        }
    }

    /// Price of this line (`price * amount`).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.amount)
    }
}

/// The shopper's ordered set of selected products.
///
/// Serialized as a plain JSON array of products.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Product>", into = "Vec<Product>")]
pub struct Cart {
    products: Vec<Product>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Build a cart from a list of products, checking uniqueness and amounts.
    ///
    /// # Errors
    ///
    /// Returns `CartInvariantError` if an id repeats or an amount is zero.
    pub fn from_products(products: Vec<Product>) -> Result<Self, CartInvariantError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if product.amount == 0 {
                return Err(CartInvariantError::ZeroAmount(product.id));
            }
            if !seen.insert(product.id) {
                return Err(CartInvariantError::DuplicateProduct(product.id));
            }
        }
        Ok(Self { products })
    }

    /// Look up the entry for a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Whether the cart holds an entry for `id`.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }

    /// Total number of units across all entries.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.products.iter().map(|p| u64::from(p.amount)).sum()
    }

    /// Amount per product id, for badge and quantity displays.
    #[must_use]
    pub fn amounts(&self) -> BTreeMap<ProductId, u32> {
        self.products.iter().map(|p| (p.id, p.amount)).collect()
    }

    /// Line total for one product, if it is in the cart.
    #[must_use]
    pub fn line_total(&self, id: ProductId) -> Option<Price> {
        self.get(id).map(Product::line_total)
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.products.iter().map(Product::line_total).sum()
    }

    /// A copy of this cart with `product` appended at the end.
    ///
    /// # Errors
    ///
    /// Returns `CartInvariantError` if the product is already present or its
    /// amount is zero.
    pub(crate) fn with_appended(&self, product: Product) -> Result<Self, CartInvariantError> {
        if product.amount == 0 {
            return Err(CartInvariantError::ZeroAmount(product.id));
        }
        if self.contains(product.id) {
            return Err(CartInvariantError::DuplicateProduct(product.id));
        }
        let mut products = self.products.clone();
        products.push(product);
        Ok(Self { products })
    }

    /// A copy of this cart with the entry for `id` set to `amount`.
    ///
    /// Returns `None` if there is no such entry or `amount` is zero.
    pub(crate) fn with_amount(&self, id: ProductId, amount: u32) -> Option<Self> {
        if amount == 0 || !self.contains(id) {
            return None;
        }
        let products = self
            .products
            .iter()
            .map(|product| {
                if product.id == id {
                    Product {
                        amount,
                        ..product.clone()
                    }
                } else {
                    product.clone()
                }
            })
            .collect();
        Some(Self { products })
    }

    /// A copy of this cart without the entry for `id`.
    ///
    /// Returns `None` if there is no such entry.
    pub(crate) fn without(&self, id: ProductId) -> Option<Self> {
        if !self.contains(id) {
            return None;
        }
        let products = self
            .products
            .iter()
            .filter(|product| product.id != id)
            .cloned()
            .collect();
        Some(Self { products })
    }
}

impl TryFrom<Vec<Product>> for Cart {
    type Error = CartInvariantError;

    fn try_from(products: Vec<Product>) -> Result<Self, Self::Error> {
        Self::from_products(products)
    }
}

impl From<Cart> for Vec<Product> {
    fn from(cart: Cart) -> Self {
        cart.products
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i32, cents: i64, amount: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Sneaker {id}"),
            price: Price::from_cents(cents),
            image_url: format!("https://cdn.example.com/{id}.jpg"),
            amount,
        }
    }

    #[test]
    fn test_from_products_rejects_duplicates() {
        let result = Cart::from_products(vec![product(1, 100, 1), product(1, 100, 2)]);
        assert_eq!(
            result.unwrap_err(),
            CartInvariantError::DuplicateProduct(ProductId::new(1))
        );
    }

    #[test]
    fn test_from_products_rejects_zero_amount() {
        let result = Cart::from_products(vec![product(1, 100, 0)]);
        assert_eq!(
            result.unwrap_err(),
            CartInvariantError::ZeroAmount(ProductId::new(1))
        );
    }

    #[test]
    fn test_summaries() {
        let cart = Cart::from_products(vec![product(1, 13990, 2), product(2, 5000, 1)]).unwrap();

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal(), Price::from_cents(32980));
        assert_eq!(
            cart.line_total(ProductId::new(1)),
            Some(Price::from_cents(27980))
        );
        assert_eq!(cart.line_total(ProductId::new(9)), None);
        assert_eq!(cart.amounts().get(&ProductId::new(2)), Some(&1));
    }

    #[test]
    fn test_with_amount_keeps_order() {
        let cart = Cart::from_products(vec![product(1, 100, 1), product(2, 100, 1)]).unwrap();
        let updated = cart.with_amount(ProductId::new(1), 4).unwrap();

        let ids: Vec<i32> = updated.iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(updated.get(ProductId::new(1)).unwrap().amount, 4);
        // The original value is untouched.
        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 1);
    }

    #[test]
    fn test_with_amount_missing_entry() {
        let cart = Cart::new();
        assert!(cart.with_amount(ProductId::new(1), 2).is_none());
    }

    #[test]
    fn test_with_appended_goes_to_end() {
        let cart = Cart::from_products(vec![product(2, 100, 1)]).unwrap();
        let updated = cart.with_appended(product(1, 100, 1)).unwrap();

        let ids: Vec<i32> = updated.iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(
            updated.with_appended(product(1, 100, 1)).unwrap_err(),
            CartInvariantError::DuplicateProduct(ProductId::new(1))
        );
    }

    #[test]
    fn test_without() {
        let cart = Cart::from_products(vec![product(1, 100, 1), product(2, 100, 3)]).unwrap();
        let updated = cart.without(ProductId::new(1)).unwrap();

        assert_eq!(updated.len(), 1);
        assert!(!updated.contains(ProductId::new(1)));
        assert!(updated.without(ProductId::new(1)).is_none());
    }

    #[test]
    fn test_serde_uses_camel_case_array() {
        let cart = Cart::from_products(vec![product(1, 13990, 2)]).unwrap();
        let json = serde_json::to_value(&cart).unwrap();

        assert!(json.is_array());
        assert_eq!(json[0]["imageUrl"], "https://cdn.example.com/1.jpg");
        assert_eq!(json[0]["amount"], 2);
        assert!(json[0]["price"].is_number());

        let back: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart);
    }

    #[test]
    fn test_deserialize_rejects_duplicate_ids() {
        let raw = r#"[
            {"id":1,"name":"A","price":10,"imageUrl":"a","amount":1},
            {"id":1,"name":"A","price":10,"imageUrl":"a","amount":2}
        ]"#;
        assert!(serde_json::from_str::<Cart>(raw).is_err());
    }
}
