//! Cart commands.

use anyhow::{Context as _, Result};
use turbo_commerce::cart::Cart;
use turbo_commerce::ids::{LineId, ListingId};

use super::{CartArgs, CartCommand};
use crate::context::Context;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let engines = ctx.engines()?;
    let cart = &engines.cart;

    cart.fetch().await.context("Failed to load cart")?;

    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => {}
        CartCommand::Add { listing, quantity } => {
            cart.add_item(&ListingId::new(listing), quantity).await?;
        }
        CartCommand::AddNew { listing, quantity } => {
            cart.add_if_absent(&ListingId::new(listing), quantity).await?;
        }
        CartCommand::Update { line, quantity } => {
            cart.update_quantity(&LineId::new(line), quantity).await?;
        }
        CartCommand::Remove { line } => {
            cart.remove_item(&LineId::new(line)).await?;
        }
        CartCommand::Clear => {
            cart.clear().await?;
        }
    }

    print_cart(&cart.snapshot(), ctx)
}

fn print_cart(cart: &Cart, ctx: &Context) -> Result<()> {
    let totals = cart.totals().context("Cart totals are out of range")?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "items": cart.lines(),
            "totals": totals,
        }));
        return Ok(());
    }

    ctx.output.header("Cart");
    if cart.is_empty() {
        ctx.output.info("Your cart is empty");
        return Ok(());
    }

    let widths = [26, 32, 5, 10, 10];
    ctx.output
        .table_row(&["LINE", "TITLE", "QTY", "PRICE", "TOTAL"], &widths);
    for line in cart.lines() {
        let total = line
            .line_total()
            .map(|m| m.display())
            .unwrap_or_else(|| "-".to_string());
        let mut title = line.listing.title.clone();
        if !line.listing.is_available() {
            title.push_str(" (unavailable)");
        }
        ctx.output.table_row(
            &[
                line.id.as_str(),
                &title,
                &line.quantity.to_string(),
                &line.listing.price.display(),
                &total,
            ],
            &widths,
        );
    }

    println!();
    ctx.output.kv("Items", &totals.total_quantity.to_string());
    ctx.output.kv("Total", &totals.total_amount.display());

    if cart.unavailable_lines().next().is_some() {
        ctx.output
            .warn("Some listings are no longer available and will fail at checkout");
    }

    Ok(())
}
