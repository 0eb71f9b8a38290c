// ===============================
// src/cli.rs
// ===============================
//
// Front end tipis: flag (clap) atau prompt interaktif (dialoguer).
// Keduanya berakhir di OrderRequest::new, validasi hanya di satu tempat.
//
use std::str::FromStr;

use clap::Parser;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use rust_decimal::Decimal;

use crate::binance::ORDER_PATH;
use crate::domain::{NormalizedOrder, OrderRequest, OrderResult, OrderType, Side};
use crate::error::{BotError, Result};
use crate::filters::SymbolFilters;
use crate::workflow::{Decision, PreparedOrder};

#[derive(Parser, Debug, Clone)]
#[command(name = "futures_bot", version, about = "Binance Futures testnet order client")]
pub struct Cli {
    /// Symbol, e.g. BTCUSDT
    #[arg(long)]
    pub symbol: Option<String>,
    #[arg(long, value_enum)]
    pub side: Option<Side>,
    /// Order type
    #[arg(long = "type", value_enum)]
    pub order_type: Option<OrderType>,
    #[arg(long)]
    pub quantity: Option<Decimal>,
    /// Price for LIMIT
    #[arg(long)]
    pub price: Option<Decimal>,
    /// Auto-approve adjustments
    #[arg(long)]
    pub yes: bool,
    /// Show adjustments but do not place order
    #[arg(long = "dry-run")]
    pub dry_run: bool,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// `Some` when every required flag is present; otherwise the caller
    /// falls back to the interactive prompts.
    pub fn to_request(&self) -> Option<Result<OrderRequest>> {
        let (symbol, side, order_type, quantity) =
            (self.symbol.as_deref()?, self.side?, self.order_type?, self.quantity?);
        Some(OrderRequest::new(symbol, side, order_type, quantity, self.price))
    }

    pub fn decide(&self, prepared: &PreparedOrder) -> Result<Decision> {
        print_plan(&prepared.order);
        if self.dry_run {
            println!("Dry-run enabled. Not placing order.");
            return Ok(Decision::DryRun);
        }
        if self.yes {
            return Ok(Decision::Submit);
        }
        let proceed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Proceed to place order?")
            .default(false)
            .interact()?;
        if proceed {
            Ok(Decision::Submit)
        } else {
            println!("Aborted by user.");
            Ok(Decision::Abort)
        }
    }
}

pub fn prompt_symbol() -> Result<String> {
    let symbol: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Symbol (e.g., BTCUSDT)")
        .interact_text()?;
    Ok(symbol.trim().to_ascii_uppercase())
}

/// Remaining prompts once the symbol rules are on screen.
pub fn prompt_request(symbol: &str) -> Result<OrderRequest> {
    let theme = ColorfulTheme::default();

    let sides = [Side::Buy, Side::Sell];
    let side = sides[Select::with_theme(&theme)
        .with_prompt("Side")
        .items(&["BUY", "SELL"])
        .default(0)
        .interact()?];

    let types = [OrderType::Market, OrderType::Limit];
    let order_type = types[Select::with_theme(&theme)
        .with_prompt("Type")
        .items(&["MARKET", "LIMIT"])
        .default(0)
        .interact()?];

    let quantity = prompt_decimal(&theme, "Quantity")?;
    let price = match order_type {
        OrderType::Limit => Some(prompt_decimal(&theme, "Price")?),
        OrderType::Market => None,
    };

    OrderRequest::new(symbol, side, order_type, quantity, price)
}

fn prompt_decimal(theme: &ColorfulTheme, prompt: &str) -> Result<Decimal> {
    let raw: String = Input::with_theme(theme)
        .with_prompt(prompt)
        .validate_with(|s: &String| -> std::result::Result<(), String> {
            Decimal::from_str(s.trim()).map(|_| ()).map_err(|e| format!("not a decimal: {e}"))
        })
        .interact_text()?;
    Decimal::from_str(raw.trim()).map_err(|e| BotError::InvalidOrderParameters(format!("{prompt}: {e}")))
}

pub fn print_rules(filters: &SymbolFilters) {
    println!();
    println!("{}", style(format!("Symbol rules for {}:", filters.symbol)).bold().cyan());
    println!(
        "  minQty: {}  maxQty: {}  stepSize: {}",
        filters.min_qty, filters.max_qty, filters.step_size
    );
    println!(
        "  tickSize: {}  minPrice: {}  maxPrice: {}",
        filters.tick_size, filters.min_price, filters.max_price
    );
    println!("  minNotional: {}", filters.min_notional);
    println!();
}

pub fn print_plan(order: &NormalizedOrder) {
    let price = match order.price {
        Some(p) => p.to_string(),
        None => "market".to_string(),
    };
    println!("{}", style("Planned order:").bold());
    println!("  Symbol : {}", order.symbol);
    println!("  Side   : {}", order.side);
    println!("  Type   : {}", order.order_type);
    println!("  Price  : {}", price);
    println!("  Qty    : {}", order.quantity);
    println!("  Notional (approx): {}", order.notional);
    println!();

    if let (true, Some(from), Some(to)) = (order.price_adjusted, order.requested_price, order.price) {
        println!("{}", style(format!("Note: price adjusted from {from} -> {to} (tickSize).")).yellow());
    }
    if order.quantity_adjusted {
        println!(
            "{}",
            style(format!(
                "Note: quantity adjusted from {} -> {} (minNotional/stepSize).",
                order.requested_quantity, order.quantity
            ))
            .yellow()
        );
    }
}

pub fn print_result(result: &OrderResult) {
    println!();
    println!("{}", style("=== ORDER RESULT ===").green().bold());
    println!("  OrderId  : {}", result.order_id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()));
    println!("  Symbol   : {}", result.symbol);
    println!("  Side     : {}", result.side);
    println!("  Type     : {}", result.order_type);
    println!("  Status   : {}", result.status);
    println!("  Price    : {}", result.price);
    println!("  AvgPrice : {}", result.avg_price);
    println!("  OrigQty  : {}", result.orig_qty);
    println!("  Executed : {}", result.executed_qty);
}

pub fn print_error(err: &BotError) {
    match err {
        BotError::ExchangeRejection { .. } => eprintln!("{} {}", style("Order failed:").red().bold(), err),
        BotError::TransportFailure { path, .. } if path == ORDER_PATH => {
            eprintln!("{} {}", style("Error:").red().bold(), err);
            eprintln!(
                "{}",
                style("The order state is unknown. Check open orders on the exchange before retrying.").yellow()
            );
        }
        _ => eprintln!("{} {}", style("Error:").red().bold(), err),
    }
}
