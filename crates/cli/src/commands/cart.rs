//! Cart commands: show, add, remove, update.

use rocketshoes_cart::{Cart, CartChange, CartConfig, ProductId, UpdateProductAmount};

use super::{CliNotifier, CommandError, open_store};

/// Print the cart.
pub fn show(config: &CartConfig, notifier: CliNotifier) -> Result<(), CommandError> {
    let store = open_store(config, notifier)?;
    print_cart(store.cart());
    Ok(())
}

/// Add one unit of a product, then print the cart.
pub async fn add(
    config: &CartConfig,
    notifier: CliNotifier,
    product_id: ProductId,
) -> Result<(), CommandError> {
    let mut store = open_store(config, notifier)?;
    let change = store.add_product(product_id).await?;
    print_change(change);
    print_cart(store.cart());
    Ok(())
}

/// Remove a product, then print the cart.
pub fn remove(
    config: &CartConfig,
    notifier: CliNotifier,
    product_id: ProductId,
) -> Result<(), CommandError> {
    let mut store = open_store(config, notifier)?;
    let change = store.remove_product(product_id)?;
    print_change(change);
    print_cart(store.cart());
    Ok(())
}

/// Set a product's amount, then print the cart.
pub async fn update(
    config: &CartConfig,
    notifier: CliNotifier,
    product_id: ProductId,
    amount: u32,
) -> Result<(), CommandError> {
    let mut store = open_store(config, notifier)?;
    let change = store
        .update_product_amount(UpdateProductAmount { product_id, amount })
        .await?;
    print_change(change);
    print_cart(store.cart());
    Ok(())
}

fn print_change(change: CartChange) {
    let line = match change {
        CartChange::Added { product_id } => format!("Added product {product_id}"),
        CartChange::AmountChanged { product_id, amount } => {
            format!("Product {product_id} now has {amount} unit(s)")
        }
        CartChange::Removed { product_id } => format!("Removed product {product_id}"),
        CartChange::Unchanged => "Cart unchanged".to_string(),
    };

    #[allow(clippy::print_stdout)]
    {
        println!("{line}");
    }
}

fn print_cart(cart: &Cart) {
    #[allow(clippy::print_stdout)]
    {
        if cart.is_empty() {
            println!("Cart is empty");
            return;
        }

        println!("{:>6}  {:<32} {:>10} {:>6} {:>12}", "ID", "PRODUCT", "PRICE", "QTY", "TOTAL");
        for product in cart {
            println!(
                "{:>6}  {:<32} {:>10} {:>6} {:>12}",
                product.id,
                product.name,
                product.price.to_string(),
                product.amount,
                product.line_total().to_string()
            );
        }
        println!(
            "{} item(s), subtotal {}",
            cart.item_count(),
            cart.subtotal()
        );
    }
}
