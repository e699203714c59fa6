//! Order commands.

use anyhow::{Context as _, Result};
use turbo_commerce::checkout::{Order, OrderStatus};
use turbo_commerce::ids::OrderId;

use super::{OrdersArgs, OrdersCommand};
use crate::context::Context;
use crate::output::status_badge;

/// Run the orders command.
pub async fn run(args: OrdersArgs, ctx: &Context) -> Result<()> {
    match args.command {
        OrdersCommand::List { sales, all } => list_orders(sales, all, ctx).await,
        OrdersCommand::Show { id } => show_order(&OrderId::new(id), ctx).await,
        OrdersCommand::Advance { id, status } => {
            advance_order(&OrderId::new(id), &status, ctx).await
        }
    }
}

async fn list_orders(sales: bool, all: bool, ctx: &Context) -> Result<()> {
    let engines = ctx.engines()?;

    let (title, orders) = if all {
        let actor = ctx.actor()?;
        ("All orders", engines.orders.all_orders(&actor).await?)
    } else if sales {
        ("My sales", engines.orders.my_sales().await?)
    } else {
        ("My orders", engines.orders.my_orders().await?)
    };

    if ctx.output.is_json() {
        ctx.output.json(&orders);
        return Ok(());
    }

    ctx.output.header(title);
    if orders.is_empty() {
        ctx.output.info("No orders found");
        return Ok(());
    }

    let widths = [26, 32, 5, 10, 12, 10];
    ctx.output.table_row(
        &["ORDER", "TITLE", "QTY", "TOTAL", "PLACED", "STATUS"],
        &widths,
    );
    for order in &orders {
        let info = order.listing_info();
        let row: [&str; 6] = [
            order.id().as_str(),
            info.title.as_str(),
            &info.quantity.to_string(),
            &order.total_price().display(),
            &order.created_at().format("%Y-%m-%d").to_string(),
            &status_badge(order.status()),
        ];
        ctx.output.table_row(&row, &widths);
    }

    Ok(())
}

async fn show_order(id: &OrderId, ctx: &Context) -> Result<()> {
    let engines = ctx.engines()?;
    let order = engines.orders.get_order(id).await?;
    print_order(&order, ctx);
    Ok(())
}

async fn advance_order(id: &OrderId, status: &str, ctx: &Context) -> Result<()> {
    let target: OrderStatus = status
        .parse()
        .with_context(|| format!("Cannot advance order {}", id))?;
    let actor = ctx.actor()?;

    let engines = ctx.engines()?;
    let order = engines.orders.advance_status(&actor, id, target).await?;
    print_order(&order, ctx);
    Ok(())
}

fn print_order(order: &Order, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(order);
        return;
    }

    let info = order.listing_info();
    ctx.output.header(&format!("Order {}", order.id()));
    ctx.output.kv("Status", &status_badge(order.status()));
    ctx.output.kv("Listing", &format!("{} ({})", info.title, info.listing_id));
    ctx.output.kv("Quantity", &info.quantity.to_string());
    ctx.output.kv("Unit price", &info.price.display());
    ctx.output.kv("Total", &order.total_price().display());
    ctx.output.kv("Payment", order.payment_method().as_str());
    ctx.output.kv("Buyer", order.buyer().display_name());
    ctx.output.kv("Seller", order.seller().display_name());
    ctx.output.kv("Ship to", &order.shipping_address().one_line());
    ctx.output.kv("Placed", &order.created_at().to_rfc3339());
    ctx.output.kv("Updated", &order.updated_at().to_rfc3339());

    let next: Vec<&str> = order
        .status()
        .allowed_transitions()
        .iter()
        .map(|s| s.as_str())
        .collect();
    if !next.is_empty() {
        ctx.output.kv("Can move to", &next.join(", "));
    }
}
