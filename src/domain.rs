// ===============================
// src/domain.rs
// ===============================
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{BotError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    #[value(name = "BUY", alias = "buy")]
    Buy,
    #[value(name = "SELL", alias = "sell")]
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    #[value(name = "MARKET", alias = "market")]
    Market,
    #[value(name = "LIMIT", alias = "limit")]
    Limit,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user asked for, validated once for both input front ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
}

impl OrderRequest {
    pub fn new(
        symbol: &str,
        side: Side,
        order_type: OrderType,
        quantity: Decimal,
        price: Option<Decimal>,
    ) -> Result<Self> {
        let symbol = symbol.trim().to_ascii_uppercase();
        if symbol.is_empty() {
            return Err(BotError::InvalidOrderParameters("symbol is empty".into()));
        }
        if quantity <= Decimal::ZERO {
            return Err(BotError::InvalidOrderParameters(format!(
                "quantity must be positive, got {quantity}"
            )));
        }

        let price = match order_type {
            OrderType::Limit => match price {
                None => {
                    return Err(BotError::InvalidOrderParameters(
                        "Price required for LIMIT order".into(),
                    ))
                }
                Some(p) if p <= Decimal::ZERO => {
                    return Err(BotError::InvalidOrderParameters(format!(
                        "price must be positive, got {p}"
                    )))
                }
                Some(p) => Some(p),
            },
            OrderType::Market => {
                if let Some(p) = price {
                    warn!(price = %p, "price ignored for MARKET order");
                }
                None
            }
        };

        Ok(Self { symbol, side, order_type, quantity, price })
    }
}

/// A grid-aligned order ready for submission, with what changed on the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedOrder {
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: Decimal,
    /// Limit price; `None` for MARKET.
    pub price: Option<Decimal>,
    /// Price the notional check was made against (ticker or adjusted limit).
    pub reference_price: Decimal,
    pub notional: Decimal,
    pub min_notional: Decimal,
    pub requested_quantity: Decimal,
    pub requested_price: Option<Decimal>,
    pub quantity_adjusted: bool,
    pub price_adjusted: bool,
}

impl NormalizedOrder {
    pub fn is_adjusted(&self) -> bool {
        self.quantity_adjusted || self.price_adjusted
    }
}

/// Order placement response. Decimal fields stay as wire strings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderResult {
    pub order_id: Option<i64>,
    pub client_order_id: String,
    pub symbol: String,
    pub status: String,
    pub side: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub time_in_force: String,
    pub price: String,
    pub avg_price: String,
    pub orig_qty: String,
    pub executed_qty: String,
    pub update_time: Option<i64>,
}

impl OrderResult {
    /// Limit price, or the average fill price when the order had none.
    pub fn effective_price(&self) -> Option<Decimal> {
        let parse = |s: &str| s.parse::<Decimal>().ok().filter(|d| !d.is_zero());
        parse(&self.price).or_else(|| parse(&self.avg_price))
    }

    pub fn quantity(&self) -> Option<Decimal> {
        self.orig_qty.parse::<Decimal>().ok()
    }

    pub fn notional(&self) -> Option<Decimal> {
        Some(self.effective_price()? * self.quantity()?)
    }
}
