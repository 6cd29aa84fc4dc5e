//! Catalog listing.

use rocketshoes_cart::{CartConfig, HttpCatalog};

use super::{CliNotifier, CommandError};

/// Print every product the catalog offers, with its amount in the cart.
pub async fn list(config: &CartConfig, notifier: CliNotifier) -> Result<(), CommandError> {
    let catalog = HttpCatalog::new(config)?;
    let products = catalog.list_products().await?;
    let in_cart = super::open_store(config, notifier)?.cart().amounts();

    #[allow(clippy::print_stdout)]
    {
        for product in products {
            let amount = in_cart.get(&product.id).copied().unwrap_or(0);
            println!(
                "{:>6}  {:<32} {:>10}  in cart: {amount}",
                product.id,
                product.name,
                product.price.to_string()
            );
        }
    }

    Ok(())
}
