//! CLI command implementations.

pub mod cart;
pub mod checkout;
pub mod config;
pub mod orders;

use clap::{Args, Subcommand};

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart and its totals.
    Show,
    /// Add a listing, merging with an existing line.
    Add {
        /// Listing ID.
        listing: String,
        /// Quantity to add.
        #[arg(short, long, default_value = "1")]
        quantity: u32,
    },
    /// Add a listing only if it is not in the cart yet.
    AddNew {
        /// Listing ID.
        listing: String,
        /// Quantity to add.
        #[arg(short, long, default_value = "1")]
        quantity: u32,
    },
    /// Set a line's quantity.
    Update {
        /// Cart line ID.
        line: String,
        /// New quantity.
        quantity: u32,
    },
    /// Remove a line.
    Remove {
        /// Cart line ID.
        line: String,
    },
    /// Empty the cart.
    Clear,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Street address.
    #[arg(long)]
    pub street: String,

    /// City.
    #[arg(long)]
    pub city: String,

    /// State or region.
    #[arg(long)]
    pub state: String,

    /// Country.
    #[arg(long)]
    pub country: String,

    /// Postal code.
    #[arg(long)]
    pub zip: Option<String>,
}

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// List orders. Purchases by default.
    List {
        /// Orders for your listings instead.
        #[arg(long, conflicts_with = "all")]
        sales: bool,
        /// Every order in the marketplace (admin).
        #[arg(long)]
        all: bool,
    },
    /// Show one order.
    Show {
        /// Order ID.
        id: String,
    },
    /// Move an order to a new status.
    Advance {
        /// Order ID.
        id: String,
        /// Target status: processing, shipped, delivered or cancelled.
        status: String,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
