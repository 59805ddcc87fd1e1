//! End-to-end simulation scenarios: bar store, calendar stepping, and
//! the full buy/hold/sell accounting cycle.

use chrono::NaiveDate;
use jq_trade_core::{PriceBar, StockCode};
use jq_trade_data::{HistoricalPrices, TradingCalendar};
use jq_trade_paper::{OrderKind, OrderStatus, Trader};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

fn toyota() -> StockCode {
    StockCode::new("7203").unwrap()
}

/// Mon 3, Tue 4, Wed 5 of June 2024; the bar on the 4th tops out at
/// 2580, the 5th reaches 2610.
fn toyota_week() -> HistoricalPrices {
    let mut store = HistoricalPrices::new();
    store.insert(
        toyota(),
        PriceBar::new(day(3), dec!(2500), dec!(2550), dec!(2480), dec!(2530), 1_200_000),
    );
    store.insert(
        toyota(),
        PriceBar::new(day(4), dec!(2530), dec!(2580), dec!(2510), dec!(2570), 900_000),
    );
    store.insert(
        toyota(),
        PriceBar::new(day(5), dec!(2570), dec!(2610), dec!(2560), dec!(2600), 1_100_000),
    );
    store
}

#[test]
fn buy_hold_sell_cycle_accounts_for_every_yen() {
    let store = toyota_week();
    let calendar = TradingCalendar::from_history(&store);
    let mut trader = Trader::new(store, dec!(1_000_000));

    // Day 1: market buy 100 fills at the open.
    trader.buy(toyota(), 100, OrderKind::Market, None).unwrap();
    let d1 = calendar.trading_days(day(1), day(30))[0];
    let fills = trader.simulate_fills(d1).unwrap();
    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].price, dec!(2500));
    assert_eq!(fills[0].quantity, 100);
    assert_eq!(trader.cash(), dec!(750_000));
    assert_eq!(trader.position(&toyota()).unwrap().average_cost(), dec!(2500));

    // Rest a limit sell above the market.
    let sell_id = trader
        .sell(toyota(), 100, OrderKind::Limit, Some(dec!(2600)))
        .unwrap()
        .id();

    // Day 2: high is 2580, the limit is not touched.
    let d2 = calendar.next_trading_day(d1).unwrap();
    assert!(trader.simulate_fills(d2).unwrap().is_empty());
    assert_eq!(trader.order(sell_id).unwrap().status(), OrderStatus::Pending);

    // Day 3: high is 2610, the order fills at the resting 2600.
    let d3 = calendar.next_trading_day(d2).unwrap();
    let fills = trader.simulate_fills(d3).unwrap();
    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].price, dec!(2600));

    assert_eq!(trader.cash(), dec!(1_010_000));
    assert!(trader.position(&toyota()).is_none());
    assert_eq!(trader.portfolio().realized_pnl(), dec!(10_000));
    assert_eq!(trader.order(sell_id).unwrap().status(), OrderStatus::Filled);

    // Flat again: the whole portfolio is cash.
    let prices = HashMap::new();
    assert_eq!(trader.portfolio().total_value(&prices).unwrap(), dec!(1_010_000));
    assert!(trader.portfolio().weights(&prices).unwrap().is_empty());
}

#[test]
fn mixed_fill_sequence_preserves_cash_accounting() {
    let store = toyota_week();
    let mut trader = Trader::new(store, dec!(1_000_000));
    let initial = trader.cash();

    trader.buy(toyota(), 100, OrderKind::Market, None).unwrap();
    trader.simulate_fills(day(3)).unwrap();
    trader.buy(toyota(), 50, OrderKind::Market, None).unwrap();
    trader.simulate_fills(day(4)).unwrap();
    trader.sell(toyota(), 80, OrderKind::Market, None).unwrap();
    trader.simulate_fills(day(5)).unwrap();

    let portfolio = trader.portfolio();
    let cost_basis: Decimal = portfolio
        .positions()
        .values()
        .map(|p| p.average_cost() * Decimal::from(p.quantity()))
        .sum();
    assert_eq!(
        portfolio.cash() + cost_basis,
        initial + portfolio.realized_pnl()
    );

    // 100 @ 2500 then 50 @ 2530 averages to 2510; the 80-share sell at
    // 2570 realizes (2570 - 2510) x 80.
    let position = trader.position(&toyota()).unwrap();
    assert_eq!(position.quantity(), 70);
    assert_eq!(position.average_cost(), dec!(2510));
    assert_eq!(portfolio.realized_pnl(), dec!(4_800));
}

#[test]
fn valuation_marks_open_positions_to_supplied_prices() {
    let store = toyota_week();
    let mut trader = Trader::new(store, dec!(1_000_000));

    trader.buy(toyota(), 100, OrderKind::Market, None).unwrap();
    trader.simulate_fills(day(3)).unwrap();

    let prices = HashMap::from([(toyota(), dec!(2530))]);
    let portfolio = trader.portfolio();
    assert_eq!(portfolio.total_value(&prices).unwrap(), dec!(1_003_000));
    assert_eq!(portfolio.unrealized_pnl(&prices).unwrap(), dec!(3_000));

    let weights = portfolio.weights(&prices).unwrap();
    assert_eq!(weights[&toyota()], dec!(253_000) / dec!(1_003_000));
}
