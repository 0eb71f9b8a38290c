// ===============================
// src/filters.rs
// ===============================
//
// Typed symbol rules parsed from exchangeInfo.
// Parse gagal cepat: filter wajib hilang / angka rusak -> MalformedFilter.
//
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::binance::{RawFilter, SymbolInfo};
use crate::error::{BotError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolFilters {
    pub symbol: String,
    // LOT_SIZE
    pub step_size: Decimal,
    pub min_qty: Decimal,
    pub max_qty: Decimal,
    // PRICE_FILTER
    pub tick_size: Decimal,
    pub min_price: Decimal,
    pub max_price: Decimal,
    // MIN_NOTIONAL
    pub min_notional: Decimal,
}

impl SymbolFilters {
    pub fn from_symbol_info(info: &SymbolInfo) -> Result<Self> {
        let symbol = info.symbol.as_str();
        let lot = find_filter(info, "LOT_SIZE")?;
        let price = find_filter(info, "PRICE_FILTER")?;
        // futures: MIN_NOTIONAL.notional; spot: MIN_NOTIONAL.minNotional or NOTIONAL.minNotional
        let notional = ["MIN_NOTIONAL", "NOTIONAL"]
            .iter()
            .filter_map(|kind| info.filters.iter().find(|f| f.filter_type == *kind))
            .find_map(|f| f.notional.as_ref().or(f.min_notional.as_ref()))
            .ok_or_else(|| malformed(symbol, "missing MIN_NOTIONAL filter".into()))?;

        let filters = Self {
            symbol: symbol.to_string(),
            step_size: field(symbol, "LOT_SIZE.stepSize", &lot.step_size)?,
            min_qty: field(symbol, "LOT_SIZE.minQty", &lot.min_qty)?,
            max_qty: field(symbol, "LOT_SIZE.maxQty", &lot.max_qty)?,
            tick_size: field(symbol, "PRICE_FILTER.tickSize", &price.tick_size)?,
            min_price: field(symbol, "PRICE_FILTER.minPrice", &price.min_price)?,
            max_price: field(symbol, "PRICE_FILTER.maxPrice", &price.max_price)?,
            min_notional: number(symbol, "MIN_NOTIONAL.notional", notional)?,
        };
        filters.validate()?;
        Ok(filters)
    }

    fn validate(&self) -> Result<()> {
        if self.step_size <= Decimal::ZERO {
            return Err(malformed(&self.symbol, format!("stepSize must be positive, got {}", self.step_size)));
        }
        if self.tick_size <= Decimal::ZERO {
            return Err(malformed(&self.symbol, format!("tickSize must be positive, got {}", self.tick_size)));
        }
        if self.min_qty > self.max_qty {
            return Err(malformed(
                &self.symbol,
                format!("minQty {} greater than maxQty {}", self.min_qty, self.max_qty),
            ));
        }
        Ok(())
    }
}

fn find_filter<'a>(info: &'a SymbolInfo, kind: &str) -> Result<&'a RawFilter> {
    info.filters
        .iter()
        .find(|f| f.filter_type == kind)
        .ok_or_else(|| malformed(&info.symbol, format!("missing {kind} filter")))
}

fn field(symbol: &str, name: &str, raw: &Option<String>) -> Result<Decimal> {
    let s = raw.as_deref().ok_or_else(|| malformed(symbol, format!("missing {name}")))?;
    number(symbol, name, s)
}

fn number(symbol: &str, name: &str, s: &str) -> Result<Decimal> {
    Decimal::from_str(s).map_err(|e| malformed(symbol, format!("{name}={s:?}: {e}")))
}

fn malformed(symbol: &str, reason: String) -> BotError {
    BotError::MalformedFilter { symbol: symbol.to_string(), reason }
}
