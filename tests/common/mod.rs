//! Shared fixtures: mock Binance server, client wiring, signature matcher.

use std::time::Duration;

use futures_bot_rust::binance::sign_query;
use futures_bot_rust::{ClientConfig, Credentials, ExchangeClient};
use wiremock::matchers::{method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

pub const API_KEY: &str = "test-api-key";
pub const API_SECRET: &str = "test-api-secret";

pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

pub fn client_for(server: &MockServer) -> ExchangeClient {
    client_with_timeout(&server.uri(), Duration::from_millis(500))
}

pub fn client_with_timeout(base_url: &str, timeout: Duration) -> ExchangeClient {
    let config = ClientConfig::new(base_url, Credentials::new(API_KEY, API_SECRET))
        .expect("valid config")
        .with_timeout(timeout);
    ExchangeClient::new(config).expect("client builds")
}

/// BTCUSDT: step 0.001, qty 0.001..1000, tick 0.1, minNotional 5.
pub fn exchange_info() -> serde_json::Value {
    serde_json::json!({
        "timezone": "UTC",
        "serverTime": 1700000000000u64,
        "symbols": [
            {
                "symbol": "ETHUSDT",
                "filters": [
                    {"filterType":"PRICE_FILTER","minPrice":"39.86","maxPrice":"306177","tickSize":"0.01"},
                    {"filterType":"LOT_SIZE","stepSize":"0.001","maxQty":"10000","minQty":"0.001"},
                    {"filterType":"MIN_NOTIONAL","notional":"20"}
                ]
            },
            {
                "symbol": "BTCUSDT",
                "status": "TRADING",
                "filters": [
                    {"filterType":"PRICE_FILTER","minPrice":"0.1","maxPrice":"1000000","tickSize":"0.1"},
                    {"filterType":"LOT_SIZE","stepSize":"0.001","maxQty":"1000","minQty":"0.001"},
                    {"filterType":"MARKET_LOT_SIZE","stepSize":"0.001","maxQty":"120","minQty":"0.001"},
                    {"filterType":"MAX_NUM_ORDERS","limit":200},
                    {"filterType":"MIN_NOTIONAL","notional":"5"}
                ]
            }
        ]
    })
}

pub async fn mount_exchange_info(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/fapi/v1/exchangeInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(exchange_info()))
        .mount(server)
        .await;
}

pub async fn mount_ticker(server: &MockServer, price: &str, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/fapi/v1/ticker/price"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "symbol": "BTCUSDT",
            "price": price,
            "time": 1700000000000u64,
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

pub fn order_ack(order_type: &str, price: &str, qty: &str) -> serde_json::Value {
    serde_json::json!({
        "orderId": 4060129917u64,
        "symbol": "BTCUSDT",
        "status": "NEW",
        "clientOrderId": "testnet-abc123",
        "price": price,
        "avgPrice": "0.00",
        "origQty": qty,
        "executedQty": "0.000",
        "cumQuote": "0.00000",
        "timeInForce": "GTC",
        "type": order_type,
        "side": "BUY",
        "updateTime": 1700000000123u64
    })
}

/// Matches when `signature` is the HMAC of everything before it, and the
/// API key appears only in the header.
pub struct ValidSignature;

impl Match for ValidSignature {
    fn matches(&self, request: &Request) -> bool {
        let Some(query) = request.url.query() else {
            return false;
        };
        let Some((signed, sig)) = query.rsplit_once("&signature=") else {
            return false;
        };
        let header_ok = request
            .headers
            .get("X-MBX-APIKEY")
            .and_then(|v| v.to_str().ok())
            == Some(API_KEY);
        let secret_hidden = !query.contains(API_SECRET) && !query.contains(API_KEY);
        header_ok && secret_hidden && request.body.is_empty() && sign_query(API_SECRET, signed) == sig
    }
}
