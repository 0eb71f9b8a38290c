// ===============================
// src/workflow.rs
// ===============================
//
// Alur satu invocation (sekuensial, tanpa retry):
//   filters -> ticker (MARKET saja) -> normalize -> approval -> submit
//
use tracing::info;

use crate::client::ExchangeClient;
use crate::domain::{NormalizedOrder, OrderRequest, OrderResult, OrderType};
use crate::error::Result;
use crate::filters::SymbolFilters;
use crate::normalizer::plan_order;
use crate::submitter::submit;

#[derive(Debug, Clone)]
pub struct PreparedOrder {
    pub filters: SymbolFilters,
    pub order: NormalizedOrder,
}

/// What the caller wants after seeing the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Submit,
    DryRun,
    Abort,
}

#[derive(Debug)]
pub enum Outcome {
    DryRun(PreparedOrder),
    Aborted(PreparedOrder),
    Placed { prepared: PreparedOrder, result: OrderResult },
}

pub async fn prepare(client: &ExchangeClient, request: &OrderRequest) -> Result<PreparedOrder> {
    let filters = client.fetch_symbol_filters(&request.symbol).await?;
    let market_price = match request.order_type {
        OrderType::Market => Some(client.fetch_market_price(&request.symbol).await?),
        OrderType::Limit => None,
    };
    let order = plan_order(request, market_price, &filters)?;
    info!(
        symbol = %order.symbol,
        side = %order.side,
        order_type = %order.order_type,
        qty = %order.quantity,
        price = ?order.price,
        notional = %order.notional,
        "planned order"
    );
    Ok(PreparedOrder { filters, order })
}

/// Runs the whole pipeline. `approve` sees the plan before anything is sent;
/// only `Decision::Submit` reaches the order endpoint.
pub async fn execute<F>(client: &ExchangeClient, request: &OrderRequest, approve: F) -> Result<Outcome>
where
    F: FnOnce(&PreparedOrder) -> Result<Decision>,
{
    info!(
        symbol = %request.symbol,
        side = %request.side,
        order_type = %request.order_type,
        qty = %request.quantity,
        price = ?request.price,
        "request"
    );
    let prepared = prepare(client, request).await?;

    match approve(&prepared)? {
        Decision::DryRun => {
            info!("dry-run, order not placed");
            Ok(Outcome::DryRun(prepared))
        }
        Decision::Abort => {
            info!("aborted by user");
            Ok(Outcome::Aborted(prepared))
        }
        Decision::Submit => {
            let result = submit(client, &prepared.order).await?;
            Ok(Outcome::Placed { prepared, result })
        }
    }
}
