// ===============================
// src/binance.rs
// ===============================
//
// Helper untuk Binance USDⓈ-M Futures REST:
// - endpoint path
// - signer HMAC-SHA256 + canonical query
// - model wire minimal (exchangeInfo, ticker, error body)
//
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

pub const EXCHANGE_INFO_PATH: &str = "/fapi/v1/exchangeInfo";
pub const TICKER_PRICE_PATH: &str = "/fapi/v1/ticker/price";
pub const ORDER_PATH: &str = "/fapi/v1/order";

pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

pub fn timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn sign_query(secret: &str, query: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC takes keys of any size");
    mac.update(query.as_bytes());
    let sig = mac.finalize().into_bytes();
    hex::encode(sig)
}

/// `k=v&k=v` in insertion order; values percent-encoded.
pub fn canonical_query(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

// ---- exchangeInfo ----
#[derive(Debug, Deserialize)]
pub struct ExchangeInfo {
    #[serde(default)]
    pub symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Deserialize)]
pub struct SymbolInfo {
    pub symbol: String,
    #[serde(default)]
    pub filters: Vec<RawFilter>,
}

/// One entry of `filters[]`. Only the fields we read are modelled;
/// every value is a decimal string on the wire.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFilter {
    pub filter_type: String,
    #[serde(default)]
    pub step_size: Option<String>,
    #[serde(default)]
    pub min_qty: Option<String>,
    #[serde(default)]
    pub max_qty: Option<String>,
    #[serde(default)]
    pub tick_size: Option<String>,
    #[serde(default)]
    pub min_price: Option<String>,
    #[serde(default)]
    pub max_price: Option<String>,
    #[serde(default)]
    pub notional: Option<String>, // futures MIN_NOTIONAL
    #[serde(default)]
    pub min_notional: Option<String>, // spot MIN_NOTIONAL / NOTIONAL
}

// ---- ticker/price ----
#[derive(Debug, Deserialize)]
pub struct TickerPrice {
    pub symbol: String,
    pub price: String,
}

// ---- error body: {"code":-1121,"msg":"Invalid symbol."} ----
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub code: i64,
    pub msg: String,
}
