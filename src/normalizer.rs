// ===============================
// src/normalizer.rs
// ===============================
//
// Map a requested (qty, price) onto the exchange grid:
//   qty   -> ceil ke stepSize, naik untuk minNotional, clamp ke minQty, tolak > maxQty
//   price -> floor ke tickSize
// Semua aritmatika pakai Decimal (exact), tanpa f64.
//
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::{NormalizedOrder, OrderRequest, OrderType};
use crate::error::{BotError, Result};
use crate::filters::SymbolFilters;

/// Smallest multiple of `step` that is >= `value`. Non-positive values give zero.
///
/// Panics when the result does not fit in a `Decimal`; see [`try_ceil_to_step`].
pub fn ceil_to_step(value: Decimal, step: Decimal) -> Decimal {
    match try_ceil_to_step(value, step) {
        Some(out) => out,
        None => panic!("ceil({value}, {step}) overflows Decimal"),
    }
}

/// `None` when rounding up would overflow.
pub fn try_ceil_to_step(value: Decimal, step: Decimal) -> Option<Decimal> {
    debug_assert!(step > Decimal::ZERO);
    if value <= Decimal::ZERO {
        return Some(Decimal::ZERO);
    }
    let rem = value % step;
    let out = if rem.is_zero() { value } else { (value - rem).checked_add(step)? };
    Some(quantize(out, step))
}

/// Largest multiple of `step` that is <= `value` (toward zero for negatives).
pub fn floor_to_step(value: Decimal, step: Decimal) -> Decimal {
    debug_assert!(step > Decimal::ZERO);
    quantize(value - value % step, step)
}

// Same decimal places as the step, so "0.001" yields "0.010" not "0.01000".
fn quantize(mut value: Decimal, step: Decimal) -> Decimal {
    value.rescale(step.scale());
    value
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityPlan {
    pub quantity: Decimal,
    pub min_notional: Decimal,
}

pub fn normalize(requested_qty: Decimal, reference_price: Decimal, filters: &SymbolFilters) -> Result<QuantityPlan> {
    let step = filters.step_size;
    let min_notional = filters.min_notional;
    let too_large = |quantity: Decimal| BotError::QuantityExceedsLimit { quantity, max_qty: filters.max_qty };
    // overflow berarti notional jauh di atas minimum
    let short = |qty: Decimal| reference_price.checked_mul(qty).is_some_and(|n| n < min_notional);

    // 1) round user's qty UP to allowed step
    let mut qty = try_ceil_to_step(requested_qty, step).ok_or_else(|| too_large(requested_qty))?;

    // 2) ensure min notional, re-derived from the constraint itself
    if reference_price > Decimal::ZERO && short(qty) {
        let mut needed = min_notional
            .checked_div(reference_price)
            .and_then(|q| try_ceil_to_step(q, step))
            .ok_or_else(|| too_large(qty))?;
        // inexact division (e.g. 5/3) may land one step short
        if short(needed) {
            needed = needed.checked_add(step).ok_or_else(|| too_large(needed))?;
        }
        if needed > qty {
            qty = needed;
            info!(qty = %qty, min_notional = %min_notional, "qty increased to meet minNotional");
        }
    }

    // 3) enforce minQty
    if qty < filters.min_qty {
        qty = filters.min_qty;
    }

    // 4) enforce maxQty (never shrink silently)
    if qty > filters.max_qty {
        return Err(BotError::QuantityExceedsLimit { quantity: qty, max_qty: filters.max_qty });
    }

    Ok(QuantityPlan { quantity: qty, min_notional })
}

pub fn adjust_price_to_tick(price: Decimal, filters: &SymbolFilters) -> Decimal {
    floor_to_step(price, filters.tick_size)
}

/// Build the order that will be sent. `market_price` is the ticker price,
/// used as the notional reference for MARKET orders; LIMIT orders use their
/// own tick-adjusted price instead, so the check is only approximate there.
pub fn plan_order(request: &OrderRequest, market_price: Option<Decimal>, filters: &SymbolFilters) -> Result<NormalizedOrder> {
    let (price, reference_price) = match request.order_type {
        OrderType::Limit => {
            let requested = request.price.ok_or_else(|| {
                BotError::InvalidOrderParameters("Price required for LIMIT order".into())
            })?;
            let adjusted = adjust_price_to_tick(requested, filters);
            check_price_band(adjusted, filters)?;
            if adjusted != requested {
                info!(from = %requested, to = %adjusted, "price adjusted based on tickSize");
            }
            (Some(adjusted), adjusted)
        }
        OrderType::Market => {
            let px = market_price.ok_or_else(|| {
                BotError::InvalidOrderParameters("market price required for MARKET order".into())
            })?;
            (None, px)
        }
    };

    let plan = normalize(request.quantity, reference_price, filters)?;
    let notional = reference_price.checked_mul(plan.quantity).ok_or_else(|| {
        BotError::InvalidOrderParameters(format!("notional of {} at {reference_price} overflows", plan.quantity))
    })?;

    Ok(NormalizedOrder {
        symbol: request.symbol.clone(),
        side: request.side,
        order_type: request.order_type,
        quantity: plan.quantity,
        price,
        reference_price,
        notional,
        min_notional: plan.min_notional,
        requested_quantity: request.quantity,
        requested_price: request.price,
        quantity_adjusted: plan.quantity != request.quantity,
        price_adjusted: price != request.price,
    })
}

// A zero bound is published by the exchange as "disabled".
fn check_price_band(price: Decimal, filters: &SymbolFilters) -> Result<()> {
    if price <= Decimal::ZERO {
        return Err(BotError::InvalidOrderParameters(format!(
            "price {price} rounds to zero at tickSize {}",
            filters.tick_size
        )));
    }
    if !filters.min_price.is_zero() && price < filters.min_price {
        return Err(BotError::InvalidOrderParameters(format!(
            "price {price} below minPrice {}",
            filters.min_price
        )));
    }
    if !filters.max_price.is_zero() && price > filters.max_price {
        return Err(BotError::InvalidOrderParameters(format!(
            "price {price} above maxPrice {}",
            filters.max_price
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Side;
    use rust_decimal_macros::dec;

    fn filters() -> SymbolFilters {
        SymbolFilters {
            symbol: "BTCUSDT".into(),
            step_size: dec!(0.001),
            min_qty: dec!(0.001),
            max_qty: dec!(1000),
            tick_size: dec!(0.1),
            min_price: dec!(0.1),
            max_price: dec!(1000000),
            min_notional: dec!(5),
        }
    }

    fn samples() -> Vec<Decimal> {
        vec![
            dec!(0.00005), dec!(0.0001), dec!(0.001), dec!(0.0015), dec!(0.3), dec!(1),
            dec!(1.23456789), dec!(7), dec!(99.99), dec!(100.37), dec!(12345.6789), dec!(50000),
        ]
    }

    fn steps() -> Vec<Decimal> {
        vec![dec!(0.001), dec!(0.01), dec!(0.1), dec!(0.5), dec!(1), dec!(0.00000100), dec!(25)]
    }

    #[test]
    fn floor_and_ceil_bracket_the_value() {
        for step in steps() {
            for v in samples() {
                let lo = floor_to_step(v, step);
                let hi = ceil_to_step(v, step);
                assert!(lo <= v && v < lo + step, "floor({v}, {step}) = {lo}");
                assert!(hi - step < v && v <= hi, "ceil({v}, {step}) = {hi}");
                assert!((lo % step).is_zero(), "{lo} off grid {step}");
                assert!((hi % step).is_zero(), "{hi} off grid {step}");
            }
        }
    }

    #[test]
    fn rounding_is_idempotent_on_grid() {
        for step in steps() {
            for v in samples() {
                let on = floor_to_step(v, step);
                assert_eq!(floor_to_step(on, step), on);
                let up = ceil_to_step(v, step);
                if up > Decimal::ZERO {
                    assert_eq!(ceil_to_step(up, step), up);
                }
            }
        }
        assert_eq!(ceil_to_step(dec!(0.005), dec!(0.001)), dec!(0.005));
        assert_eq!(floor_to_step(dec!(100.3), dec!(0.1)), dec!(100.3));
    }

    #[test]
    fn results_carry_step_scale() {
        assert_eq!(ceil_to_step(dec!(0.01), dec!(0.001)).to_string(), "0.010");
        assert_eq!(floor_to_step(dec!(100.37), dec!(0.10)).to_string(), "100.30");
        assert_eq!(ceil_to_step(dec!(3), dec!(1)).to_string(), "3");
    }

    #[test]
    fn non_positive_ceil_is_zero() {
        assert_eq!(ceil_to_step(dec!(0), dec!(0.001)), Decimal::ZERO);
        assert_eq!(ceil_to_step(dec!(-1.5), dec!(0.001)), Decimal::ZERO);
    }

    #[test]
    fn scenario_a_tiny_quantity_meets_notional() {
        let f = filters();
        let plan = normalize(dec!(0.00005), dec!(50000), &f).unwrap();
        assert_eq!(plan.quantity, dec!(0.001));
        assert_eq!(plan.min_notional, dec!(5));
    }

    #[test]
    fn scenario_b_price_floors_to_tick() {
        assert_eq!(adjust_price_to_tick(dec!(100.37), &filters()), dec!(100.3));
    }

    #[test]
    fn notional_re_derives_more_than_one_step() {
        // 5 / 100 = 0.05 -> 50 steps, not a single bump
        let plan = normalize(dec!(0.001), dec!(100), &filters()).unwrap();
        assert_eq!(plan.quantity, dec!(0.05));
    }

    #[test]
    fn notional_with_repeating_division() {
        let mut f = filters();
        f.step_size = dec!(0.01);
        f.min_qty = dec!(0.01);
        let plan = normalize(dec!(0.01), dec!(3), &f).unwrap();
        // 5/3 = 1.666.. -> 1.67
        assert_eq!(plan.quantity, dec!(1.67));
        assert!(plan.quantity * dec!(3) >= dec!(5));
    }

    #[test]
    fn clamps_up_to_min_qty() {
        let mut f = filters();
        f.min_qty = dec!(0.01);
        f.min_notional = Decimal::ZERO;
        let plan = normalize(dec!(0.002), dec!(50000), &f).unwrap();
        assert_eq!(plan.quantity, dec!(0.01));
    }

    #[test]
    fn over_max_qty_fails() {
        let err = normalize(dec!(1000.0001), dec!(10), &filters()).unwrap_err();
        match err {
            BotError::QuantityExceedsLimit { quantity, max_qty } => {
                assert_eq!(quantity, dec!(1000.001));
                assert_eq!(max_qty, dec!(1000));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn notional_escalation_past_max_fails() {
        let mut f = filters();
        f.max_qty = dec!(0.01);
        assert!(matches!(
            normalize(dec!(0.001), dec!(1), &f),
            Err(BotError::QuantityExceedsLimit { .. })
        ));
    }

    #[test]
    fn huge_market_quantity_is_rejected_not_overflowed() {
        let req = OrderRequest::new(
            "BTCUSDT", Side::Buy, OrderType::Market, dec!(10000000000000000000000000), None,
        )
        .unwrap();
        match plan_order(&req, Some(dec!(50000)), &filters()) {
            Err(BotError::QuantityExceedsLimit { quantity, max_qty }) => {
                assert_eq!(quantity, dec!(10000000000000000000000000));
                assert_eq!(max_qty, dec!(1000));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn tiny_reference_price_is_rejected_not_overflowed() {
        let mut f = filters();
        f.min_notional = dec!(50);
        let err = normalize(dec!(0.001), dec!(0.0000000000000000000000000001), &f).unwrap_err();
        assert!(matches!(err, BotError::QuantityExceedsLimit { .. }));
    }

    #[test]
    fn ceil_near_decimal_max_reports_overflow() {
        assert_eq!(try_ceil_to_step(Decimal::MAX, dec!(10)), None);
        assert_eq!(try_ceil_to_step(dec!(0.0015), dec!(0.001)), Some(dec!(0.002)));
    }

    #[test]
    fn zero_reference_price_skips_notional() {
        let plan = normalize(dec!(0.0021), Decimal::ZERO, &filters()).unwrap();
        assert_eq!(plan.quantity, dec!(0.003));
    }

    #[test]
    fn normalize_invariants_hold_over_samples() {
        let f = filters();
        for qty in samples() {
            for px in [dec!(0.5), dec!(3), dec!(100.3), dec!(50000)] {
                match normalize(qty, px, &f) {
                    Ok(plan) => {
                        assert!(plan.quantity >= f.min_qty);
                        assert!(plan.quantity <= f.max_qty);
                        assert!(plan.quantity * px >= f.min_notional, "{qty} @ {px}");
                        assert!((plan.quantity % f.step_size).is_zero());
                    }
                    Err(BotError::QuantityExceedsLimit { quantity, .. }) => assert!(quantity > f.max_qty),
                    Err(other) => panic!("unexpected {other:?}"),
                }
            }
        }
    }

    #[test]
    fn plan_limit_order_discloses_adjustments() {
        let req = OrderRequest::new("BTCUSDT", Side::Buy, OrderType::Limit, dec!(0.0015), Some(dec!(100.37))).unwrap();
        let order = plan_order(&req, None, &filters()).unwrap();
        assert_eq!(order.price, Some(dec!(100.3)));
        assert_eq!(order.reference_price, dec!(100.3));
        // 5 / 100.3 = 0.04985.. -> 0.050
        assert_eq!(order.quantity, dec!(0.05));
        assert_eq!(order.notional, dec!(5.015));
        assert!(order.price_adjusted);
        assert!(order.quantity_adjusted);
    }

    #[test]
    fn plan_market_order_uses_ticker() {
        let req = OrderRequest::new("BTCUSDT", Side::Sell, OrderType::Market, dec!(0.002), None).unwrap();
        let order = plan_order(&req, Some(dec!(50000)), &filters()).unwrap();
        assert_eq!(order.price, None);
        assert_eq!(order.quantity, dec!(0.002));
        assert_eq!(order.notional, dec!(100));
        assert!(!order.is_adjusted());
    }

    #[test]
    fn plan_rejects_price_outside_band() {
        let mut f = filters();
        f.max_price = dec!(1000);
        let req = OrderRequest::new("BTCUSDT", Side::Buy, OrderType::Limit, dec!(1), Some(dec!(1500))).unwrap();
        assert!(matches!(plan_order(&req, None, &f), Err(BotError::InvalidOrderParameters(_))));

        let req = OrderRequest::new("BTCUSDT", Side::Buy, OrderType::Limit, dec!(1), Some(dec!(0.05))).unwrap();
        assert!(matches!(plan_order(&req, None, &f), Err(BotError::InvalidOrderParameters(_))));
    }

    #[test]
    fn zero_max_price_means_unbounded() {
        let mut f = filters();
        f.max_price = Decimal::ZERO;
        let req = OrderRequest::new("BTCUSDT", Side::Buy, OrderType::Limit, dec!(1), Some(dec!(9999999))).unwrap();
        assert!(plan_order(&req, None, &f).is_ok());
    }
}
