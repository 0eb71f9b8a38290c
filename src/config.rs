// ===============================
// src/config.rs
// ===============================
/*
=============================================================================
Project : futures_bot_rust — Binance Futures testnet order client in Rust
Module  : config.rs
Version : 0.1.0
Author  : Kukuh Tripamungkas Wicaksono (Kukuh TW)
License : MIT (see LICENSE)

Summary : Signs REST requests, reads symbol filters and ticker prices,
          normalizes quantity/price onto the exchange grid, places MARKET
          or LIMIT orders, writes an audit log and a CSV trade history.
=============================================================================
*/
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use dotenvy::dotenv;
use url::Url;

use crate::error::{BotError, Result};

pub const TESTNET_REST_URL: &str = "https://testnet.binancefuture.com";
/// Fixed receive window attached to every signed request.
pub const RECV_WINDOW_MS: u64 = 5000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// API key + secret. Debug output never shows either value.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), api_secret: api_secret.into() }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***")
            .field("api_secret", &"***")
            .finish()
    }
}

/// Everything an `ExchangeClient` owns: endpoint, credentials, limits.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub credentials: Credentials,
    pub timeout: Duration,
    pub recv_window_ms: u64,
}

impl ClientConfig {
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|e| BotError::Config(format!("bad REST url {base_url:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(BotError::Config(format!("REST url must be http(s), got {base_url:?}")));
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            timeout: DEFAULT_TIMEOUT,
            recv_window_ms: RECV_WINDOW_MS,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub log_dir: PathBuf,
    pub trade_history: PathBuf,
}

/// First non-empty value among `keys`.
fn env_first(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| env::var(k).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

pub fn load() -> Result<AppConfig> {
    // Pastikan .env dibaca (BINANCE_API_KEY, BINANCE_API_SECRET, dll)
    let _ = dotenv();

    let api_key = env_first(&["BINANCE_API_KEY", "API_KEY"]);
    let api_secret = env_first(&["BINANCE_API_SECRET", "API_SECRET"]);
    let (api_key, api_secret) = match (api_key, api_secret) {
        (Some(k), Some(s)) => (k, s),
        _ => {
            return Err(BotError::Config(
                "Set BINANCE_API_KEY and BINANCE_API_SECRET in .env".to_string(),
            ))
        }
    };

    let rest_url = env_first(&["BINANCE_REST_URL"]).unwrap_or_else(|| TESTNET_REST_URL.to_string());
    let mut client = ClientConfig::new(&rest_url, Credentials::new(api_key, api_secret))?;

    // Override batas waktu (ms) bila perlu; default 10s
    if let Some(raw) = env_first(&["BINANCE_HTTP_TIMEOUT_MS"]) {
        let ms: u64 = raw
            .parse()
            .map_err(|_| BotError::Config(format!("BINANCE_HTTP_TIMEOUT_MS must be an integer, got {raw:?}")))?;
        client = client.with_timeout(Duration::from_millis(ms));
    }

    let log_dir = PathBuf::from(env_first(&["LOG_DIR"]).unwrap_or_else(|| "logs".to_string()));
    let trade_history = log_dir.join("trades.csv");

    Ok(AppConfig { client, log_dir, trade_history })
}
