//! Checkout command.

use anyhow::{Context as _, Result};
use turbo_commerce::checkout::ShippingAddress;

use super::CheckoutArgs;
use crate::context::Context;

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let mut address = ShippingAddress::new(args.street, args.city, args.state, args.country);
    if let Some(zip) = args.zip {
        address = address.with_zip(zip);
    }

    let engines = ctx.engines()?;
    engines.cart.fetch().await.context("Failed to load cart")?;

    let totals = engines.cart.totals()?;
    ctx.output.debug(&format!(
        "Checking out {} item(s) for {}",
        totals.total_quantity,
        totals.total_amount.display()
    ));

    let receipt = engines.orders.checkout(&address).await?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "orderIds": receipt.order_ids,
            "orders": receipt.orders,
        }));
        return Ok(());
    }

    ctx.output.header("Orders placed");
    ctx.output.kv("Ship to", &address.one_line());
    for id in &receipt.order_ids {
        ctx.output.list_item(id.as_str());
    }

    Ok(())
}
