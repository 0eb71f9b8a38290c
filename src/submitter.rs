// ===============================
// src/submitter.rs
// ===============================
use reqwest::Method;
use tracing::{error, info};

use crate::binance::{ApiErrorBody, ORDER_PATH};
use crate::client::ExchangeClient;
use crate::domain::{NormalizedOrder, OrderResult, OrderType};
use crate::error::{BotError, Result};

/// Order params in the order Binance documents them.
/// MARKET: symbol/side/type/quantity. LIMIT adds timeInForce=GTC and price.
pub fn order_params(order: &NormalizedOrder) -> Result<Vec<(String, String)>> {
    let mut params = vec![
        ("symbol".to_string(), order.symbol.clone()),
        ("side".to_string(), order.side.as_str().to_string()),
        ("type".to_string(), order.order_type.as_str().to_string()),
    ];
    match order.order_type {
        OrderType::Market => {
            params.push(("quantity".to_string(), order.quantity.to_string()));
        }
        OrderType::Limit => {
            let price = order
                .price
                .ok_or_else(|| BotError::InvalidOrderParameters("LIMIT order without price".into()))?;
            params.push(("timeInForce".to_string(), "GTC".to_string()));
            params.push(("quantity".to_string(), order.quantity.to_string()));
            params.push(("price".to_string(), price.to_string()));
        }
    }
    Ok(params)
}

pub async fn submit(client: &ExchangeClient, order: &NormalizedOrder) -> Result<OrderResult> {
    let params = order_params(order)?;
    let body = client.signed_request(Method::POST, ORDER_PATH, params).await?;

    // 2xx yang tetap membawa {code,msg} tanpa orderId = ditolak
    if body.get("orderId").is_none() {
        if let Ok(err) = serde_json::from_value::<ApiErrorBody>(body.clone()) {
            if err.code < 0 {
                error!(code = err.code, msg = %err.msg, "order rejected");
                return Err(BotError::ExchangeRejection { status: 200, code: Some(err.code), message: err.msg });
            }
        }
    }

    let result: OrderResult = serde_json::from_value(body)
        .map_err(|e| BotError::InvalidResponse(format!("order response: {e}")))?;
    info!(order_id = ?result.order_id, status = %result.status, symbol = %result.symbol, "order placed");
    Ok(result)
}
