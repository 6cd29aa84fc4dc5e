//! The cart store.
//!
//! [`CartStore`] owns the current [`Cart`], mirrors it to a key-value slot on
//! every successful mutation, and checks quantity changes against the stock
//! the catalog reports.
//!
//! Each mutation is one transition `Cart -> Cart'`: the new cart is written to
//! storage first and becomes the in-memory state only if that write succeeded.
//! Failed operations leave both untouched, return a [`CartError`], and send
//! exactly one message to the notifier.

use rocketshoes_core::ProductId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::cart::{Cart, Product};
use crate::catalog::Catalog;
use crate::error::{CartError, CartOperation};
use crate::notify::Notifier;
use crate::storage::KeyValueStore;

/// Storage key the cart is persisted under.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Input for [`CartStore::update_product_amount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    /// Product to change.
    pub product_id: ProductId,
    /// Desired absolute amount.
    pub amount: u32,
}

/// What a successful operation did to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// A new entry was appended with amount 1.
    Added { product_id: ProductId },
    /// An existing entry now has `amount` units.
    AmountChanged { product_id: ProductId, amount: u32 },
    /// An entry was removed.
    Removed { product_id: ProductId },
    /// Nothing changed and nothing was persisted.
    Unchanged,
}

/// Shopping cart state container.
///
/// Mutations take `&mut self`, so no two of them can interleave on one store.
pub struct CartStore<C, S, N> {
    catalog: C,
    storage: S,
    notifier: N,
    key: String,
    cart: Cart,
}

impl<C, S, N> CartStore<C, S, N>
where
    C: Catalog,
    S: KeyValueStore,
    N: Notifier,
{
    /// Open the store, loading the cart persisted under [`CART_STORAGE_KEY`].
    pub fn open(catalog: C, storage: S, notifier: N) -> Self {
        Self::open_with_key(catalog, storage, notifier, CART_STORAGE_KEY)
    }

    /// Open the store using a custom storage key.
    ///
    /// An absent key yields an empty cart. Unreadable or malformed state also
    /// yields an empty cart; it is logged and left in place until the next
    /// successful mutation overwrites it.
    pub fn open_with_key(catalog: C, storage: S, notifier: N, key: impl Into<String>) -> Self {
        let key = key.into();
        let cart = load_cart(&storage, &key);
        info!(key = %key, products = cart.len(), "Cart loaded");

        Self {
            catalog,
            storage,
            notifier,
            key,
            cart,
        }
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The key the cart is persisted under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Re-read the cart from storage, replacing the in-memory state.
    pub fn reload(&mut self) -> &Cart {
        self.cart = load_cart(&self.storage, &self.key);
        &self.cart
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart gets its amount raised by one, provided
    /// stock allows it. A new product is fetched from the catalog and appended
    /// with amount 1.
    ///
    /// # Errors
    ///
    /// - `OutOfStock` if the increment would exceed stock
    /// - `Catalog` if a lookup fails
    /// - `Storage` if the new cart cannot be persisted
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub async fn add_product(&mut self, product_id: ProductId) -> Result<CartChange, CartError> {
        let result = self.try_add_product(product_id).await;
        self.report(CartOperation::Add, result)
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// - `NotInCart` if there is no entry for the product
    /// - `Storage` if the new cart cannot be persisted
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub fn remove_product(&mut self, product_id: ProductId) -> Result<CartChange, CartError> {
        let result = self.try_remove_product(product_id);
        self.report(CartOperation::Remove, result)
    }

    /// Set the amount of a product already in the cart.
    ///
    /// Amounts of 1 or less are rejected. Use [`Self::remove_product`] to drop
    /// an entry. A product that is not in the cart is ignored silently once
    /// the stock check has passed.
    ///
    /// # Errors
    ///
    /// - `AmountTooLow` if `amount <= 1`
    /// - `OutOfStock` if `amount` exceeds stock
    /// - `Catalog` if the stock lookup fails
    /// - `Storage` if the new cart cannot be persisted
    #[instrument(skip_all, fields(product_id = %update.product_id, amount = update.amount))]
    pub async fn update_product_amount(
        &mut self,
        update: UpdateProductAmount,
    ) -> Result<CartChange, CartError> {
        let result = self.try_update_product_amount(update).await;
        self.report(CartOperation::Update, result)
    }

    async fn try_add_product(&mut self, product_id: ProductId) -> Result<CartChange, CartError> {
        let stock = self.catalog.stock(product_id).await?;

        if let Some(existing) = self.cart.get(product_id) {
            let requested = existing.amount.saturating_add(1);
            if requested > stock.amount {
                return Err(CartError::OutOfStock {
                    product_id,
                    requested,
                    available: stock.amount,
                });
            }

            let next = self
                .cart
                .with_amount(product_id, requested)
                .ok_or(CartError::NotInCart(product_id))?;
            self.commit(next)?;
            return Ok(CartChange::AmountChanged {
                product_id,
                amount: requested,
            });
        }

        let details = self.catalog.product(product_id).await?;
        let next = self
            .cart
            .with_appended(Product::from_details(details, 1))?;
        self.commit(next)?;
        Ok(CartChange::Added { product_id })
    }

    fn try_remove_product(&mut self, product_id: ProductId) -> Result<CartChange, CartError> {
        let next = self
            .cart
            .without(product_id)
            .ok_or(CartError::NotInCart(product_id))?;
        self.commit(next)?;
        Ok(CartChange::Removed { product_id })
    }

    async fn try_update_product_amount(
        &mut self,
        UpdateProductAmount { product_id, amount }: UpdateProductAmount,
    ) -> Result<CartChange, CartError> {
        if amount <= 1 {
            return Err(CartError::AmountTooLow { product_id, amount });
        }

        let stock = self.catalog.stock(product_id).await?;
        if amount > stock.amount {
            return Err(CartError::OutOfStock {
                product_id,
                requested: amount,
                available: stock.amount,
            });
        }

        let Some(next) = self.cart.with_amount(product_id, amount) else {
            debug!("Product not in cart, nothing to update");
            return Ok(CartChange::Unchanged);
        };
        self.commit(next)?;
        Ok(CartChange::AmountChanged { product_id, amount })
    }

    /// Persist `next`, then make it the current cart.
    fn commit(&mut self, next: Cart) -> Result<(), CartError> {
        let serialized = serde_json::to_string(&next).map_err(crate::storage::StorageError::from)?;
        self.storage.set(&self.key, &serialized)?;
        self.cart = next;
        Ok(())
    }

    /// Log a failure and notify the shopper once.
    fn report(
        &self,
        operation: CartOperation,
        result: Result<CartChange, CartError>,
    ) -> Result<CartChange, CartError> {
        match &result {
            Ok(change) => debug!(?change, %operation, "Cart operation succeeded"),
            Err(err) => {
                if err.is_infrastructure() {
                    tracing::error!(error = %err, %operation, "Cart operation failed");
                } else {
                    info!(error = %err, %operation, "Cart operation rejected");
                }
                self.notifier.error(err.user_message(operation));
            }
        }
        result
    }
}

/// Read and validate the persisted cart, falling back to an empty cart.
fn load_cart(storage: &impl KeyValueStore, key: &str) -> Cart {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Cart::new(),
        Err(e) => {
            tracing::error!(error = %e, key, "Failed to read persisted cart, starting empty");
            return Cart::new();
        }
    };

    match serde_json::from_str::<Cart>(&raw) {
        Ok(cart) => cart,
        Err(e) => {
            warn!(error = %e, key, "Persisted cart is malformed, starting empty");
            Cart::new()
        }
    }
}
