//! Cart operation errors and their user-facing messages.
//!
//! Every failed cart operation yields a [`CartError`]. The store forwards
//! exactly one message per failure to its notifier, chosen by
//! [`CartError::user_message`].

use std::fmt;

use rocketshoes_core::ProductId;
use thiserror::Error;

use crate::cart::CartInvariantError;
use crate::catalog::CatalogError;
use crate::storage::StorageError;

/// Shown when a requested quantity exceeds the reported stock.
pub const MSG_OUT_OF_STOCK: &str = "Requested quantity is out of stock";
/// Shown when removing a product the cart does not hold.
pub const MSG_NOT_IN_CART: &str = "Product is not in the cart";
/// Shown when adding a product fails for any other reason.
pub const MSG_ADD_FAILED: &str = "Error adding product";
/// Shown when removing a product fails for any other reason.
pub const MSG_REMOVE_FAILED: &str = "Error removing product";
/// Shown when changing a quantity fails for any other reason.
pub const MSG_UPDATE_FAILED: &str = "Error updating product quantity";

/// The cart operation that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartOperation {
    Add,
    Remove,
    Update,
}

impl fmt::Display for CartOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Remove => write!(f, "remove"),
            Self::Update => write!(f, "update"),
        }
    }
}

/// Errors returned by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested amount exceeds the stock the catalog reported.
    #[error("Product {product_id}: requested {requested}, only {available} in stock")]
    OutOfStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// The cart has no entry for this product.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Quantity updates must ask for more than one unit.
    #[error("Product {product_id}: amount {amount} must be greater than 1")]
    AmountTooLow { product_id: ProductId, amount: u32 },

    /// Stock or product lookup failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Writing the cart to storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A catalog record would have broken the cart's invariants.
    #[error("Invalid cart: {0}")]
    Invariant(#[from] CartInvariantError),
}

impl CartError {
    /// Whether this error came from a broken collaborator rather than a
    /// business rule.
    #[must_use]
    pub const fn is_infrastructure(&self) -> bool {
        matches!(self, Self::Catalog(_) | Self::Storage(_) | Self::Invariant(_))
    }

    /// The message to show the shopper for a failed `operation`.
    #[must_use]
    pub const fn user_message(&self, operation: CartOperation) -> &'static str {
        match (self, operation) {
            (Self::OutOfStock { .. }, _) => MSG_OUT_OF_STOCK,
            (Self::NotInCart(_), CartOperation::Remove) => MSG_NOT_IN_CART,
            (_, CartOperation::Add) => MSG_ADD_FAILED,
            (_, CartOperation::Remove) => MSG_REMOVE_FAILED,
            (_, CartOperation::Update) => MSG_UPDATE_FAILED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        let err = CartError::OutOfStock {
            product_id: ProductId::new(1),
            requested: 3,
            available: 2,
        };
        assert_eq!(err.to_string(), "Product 1: requested 3, only 2 in stock");

        let err = CartError::NotInCart(ProductId::new(4));
        assert_eq!(err.to_string(), "Product 4 is not in the cart");
    }

    #[test]
    fn test_user_messages() {
        let out_of_stock = CartError::OutOfStock {
            product_id: ProductId::new(1),
            requested: 3,
            available: 2,
        };
        assert_eq!(out_of_stock.user_message(CartOperation::Add), MSG_OUT_OF_STOCK);
        assert_eq!(out_of_stock.user_message(CartOperation::Update), MSG_OUT_OF_STOCK);

        let not_in_cart = CartError::NotInCart(ProductId::new(1));
        assert_eq!(not_in_cart.user_message(CartOperation::Remove), MSG_NOT_IN_CART);

        let too_low = CartError::AmountTooLow {
            product_id: ProductId::new(1),
            amount: 1,
        };
        assert_eq!(too_low.user_message(CartOperation::Update), MSG_UPDATE_FAILED);

        let storage = CartError::Storage(StorageError::Corrupt("bad".to_string()));
        assert_eq!(storage.user_message(CartOperation::Add), MSG_ADD_FAILED);
        assert_eq!(storage.user_message(CartOperation::Remove), MSG_REMOVE_FAILED);
        assert!(storage.is_infrastructure());
        assert!(!too_low.is_infrastructure());
    }
}
