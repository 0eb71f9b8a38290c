// ===============================
// src/client.rs
// ===============================
//
// REST client Binance Futures: public GET (exchangeInfo, ticker) dan
// signed request (HMAC-SHA256 atas canonical query + X-MBX-APIKEY header).
// Semua request/response dicatat ke target tracing "audit".
//
use std::str::FromStr;

use reqwest::{Method, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::binance::{
    canonical_query, sign_query, timestamp_ms, ApiErrorBody, ExchangeInfo, TickerPrice, API_KEY_HEADER,
    EXCHANGE_INFO_PATH, TICKER_PRICE_PATH,
};
use crate::config::ClientConfig;
use crate::error::{BotError, Result};
use crate::filters::SymbolFilters;

pub struct ExchangeClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ExchangeClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .map_err(|e| BotError::Config(format!("http client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    pub async fn fetch_symbol_filters(&self, symbol: &str) -> Result<SymbolFilters> {
        let info: ExchangeInfo = self.get_json(EXCHANGE_INFO_PATH, &[]).await?;
        let entry = info
            .symbols
            .iter()
            .find(|s| s.symbol == symbol)
            .ok_or_else(|| BotError::SymbolNotFound(symbol.to_string()))?;
        SymbolFilters::from_symbol_info(entry)
    }

    /// Last traded price, parsed from the wire string without touching f64.
    pub async fn fetch_market_price(&self, symbol: &str) -> Result<Decimal> {
        let ticker: TickerPrice = self.get_json(TICKER_PRICE_PATH, &[("symbol", symbol)]).await?;
        let price = Decimal::from_str(&ticker.price)
            .map_err(|e| BotError::InvalidResponse(format!("ticker price {:?}: {e}", ticker.price)))?;
        if price <= Decimal::ZERO {
            return Err(BotError::InvalidResponse(format!("non-positive ticker price {price} for {}", ticker.symbol)));
        }
        Ok(price)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = self.url(path);
        debug!(target: "audit", method = "GET", %url, ?query, "request");
        let rsp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| transport(path, e))?;
        // metadata, bukan order: non-2xx di sini tidak pernah "order rejected"
        let body = read_body(path, rsp).await.map_err(|e| match e {
            BotError::ExchangeRejection { status, code, message } => BotError::InvalidResponse(match code {
                Some(code) => format!("{path}: HTTP {status}, code {code}: {message}"),
                None => format!("{path}: HTTP {status}: {message}"),
            }),
            other => other,
        })?;
        serde_json::from_str(&body).map_err(|e| BotError::InvalidResponse(format!("{path}: {e}")))
    }

    /// Adds `timestamp` and `recvWindow`, signs the canonical query with the
    /// secret and sends the key only in the header. Non-2xx answers come back
    /// as `ExchangeRejection`, network failures as `TransportFailure`.
    pub async fn signed_request(
        &self,
        method: Method,
        path: &str,
        mut params: Vec<(String, String)>,
    ) -> Result<serde_json::Value> {
        params.push(("timestamp".to_string(), timestamp_ms().to_string()));
        params.push(("recvWindow".to_string(), self.config.recv_window_ms.to_string()));

        let query = canonical_query(&params);
        let sig = sign_query(self.config.credentials.api_secret(), &query);
        let url = format!("{}?{}&signature={}", self.url(path), query, sig);

        debug!(target: "audit", %method, %path, %query, "signed request");
        let rsp = self
            .http
            .request(method, url)
            .header(API_KEY_HEADER, self.config.credentials.api_key())
            .send()
            .await
            .map_err(|e| transport(path, e))?;
        let body = read_body(path, rsp).await?;
        serde_json::from_str(&body).map_err(|e| BotError::InvalidResponse(format!("{path}: {e}")))
    }
}

fn transport(path: &str, e: reqwest::Error) -> BotError {
    error!(?e, %path, "request failed");
    BotError::transport(path, e)
}

async fn read_body(path: &str, rsp: reqwest::Response) -> Result<String> {
    let status = rsp.status();
    let body = rsp.text().await.map_err(|e| transport(path, e))?;
    debug!(target: "audit", %path, status = status.as_u16(), %body, "response");
    if !status.is_success() {
        error!(%path, status = status.as_u16(), %body, "binance error");
        return Err(rejection(status, &body));
    }
    Ok(body)
}

fn rejection(status: StatusCode, body: &str) -> BotError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(err) => BotError::ExchangeRejection { status: status.as_u16(), code: Some(err.code), message: err.msg },
        Err(_) => {
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                body.trim().to_string()
            };
            BotError::ExchangeRejection { status: status.as_u16(), code: None, message }
        }
    }
}
