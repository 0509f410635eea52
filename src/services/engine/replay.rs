use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::models::trade;
use super::{EngineError, TradeKind};

/// Etat dérivé d'un ticker après relecture complète de son journal.
/// Jamais persisté: on le recalcule à chaque lecture.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerPosition {
    pub ticker: String,
    pub shares: i64,
    pub cash: Decimal,
}

impl TickerPosition {
    pub fn is_open(&self) -> bool {
        self.shares != 0
    }

    /// Prix de revient moyen par action détenue, net des primes d'options
    /// encaissées/payées sur ce ticker. None pour une position fermée.
    pub fn cost_basis(&self) -> Option<Decimal> {
        if self.shares == 0 {
            return None;
        }
        Some(-self.cash / Decimal::from(self.shares))
    }

    /// Profit réalisé: le solde de trésorerie une fois la position revenue
    /// à zéro. None tant que la position est ouverte.
    pub fn realized(&self) -> Option<Decimal> {
        if self.shares == 0 { Some(self.cash) } else { None }
    }

    /// Profit latent au dernier cours connu. None pour une position fermée.
    pub fn unrealized(&self, latest_price: Decimal) -> Option<Decimal> {
        let cost_basis = self.cost_basis()?;
        Some((latest_price - cost_basis) * Decimal::from(self.shares))
    }
}

/// Rejoue le journal d'un seul ticker, ordonné par date.
/// Fonction pure: mêmes trades en entrée, même état en sortie.
pub fn replay_ticker(
    ticker: &str,
    trades: &[&trade::Model],
) -> Result<TickerPosition, EngineError> {
    let mut shares: i64 = 0;
    let mut cash = Decimal::ZERO;
    let mut previous_date = None;

    for t in trades {
        // Un journal non chronologique est corrompu: on s'arrête net
        if previous_date.is_some_and(|d| t.date < d) {
            return Err(EngineError::OutOfOrder {
                ticker: ticker.to_string(),
            });
        }
        previous_date = Some(t.date);

        let kind = TradeKind::parse(&t.trade_type)?;
        shares += kind.share_delta(t.quantity);
        cash += kind.cash_delta(t.quantity, t.price);
    }

    Ok(TickerPosition {
        ticker: ticker.to_string(),
        shares,
        cash,
    })
}

/// Rejoue le journal complet: un état par ticker, dans l'ordre de première
/// apparition dans le journal.
pub fn replay_all(trades: &[trade::Model]) -> Result<Vec<TickerPosition>, EngineError> {
    let mut order: Vec<&str> = Vec::new();
    let mut by_ticker: HashMap<&str, Vec<&trade::Model>> = HashMap::new();

    for t in trades {
        if !by_ticker.contains_key(t.ticker.as_str()) {
            order.push(t.ticker.as_str());
        }
        by_ticker.entry(t.ticker.as_str()).or_default().push(t);
    }

    let mut positions = Vec::with_capacity(order.len());
    for ticker in order {
        positions.push(replay_ticker(ticker, &by_ticker[ticker])?);
    }

    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn make_trade(
        date: &str,
        ticker: &str,
        trade_type: &str,
        quantity: i32,
        price: &str,
    ) -> trade::Model {
        trade::Model {
            id: 0,
            date: day(date),
            ticker: ticker.to_string(),
            trade_type: trade_type.to_string(),
            quantity,
            price: dec(price),
            option_type: None,
            strike: None,
            expiration: None,
            fx_rate: Decimal::ONE,
        }
    }

    fn replay(trades: &[trade::Model]) -> TickerPosition {
        let refs: Vec<&trade::Model> = trades.iter().collect();
        replay_ticker(&trades[0].ticker, &refs).unwrap()
    }

    #[test]
    fn test_stock_only_log_sums_signed_quantities() {
        let trades = vec![
            make_trade("2025-01-02", "AAPL", "BUY_STOCK", 100, "10.00"),
            make_trade("2025-01-10", "AAPL", "SELL_STOCK", 40, "11.00"),
            make_trade("2025-02-03", "AAPL", "BUY_STOCK", 20, "9.00"),
        ];

        let position = replay(&trades);
        assert_eq!(position.shares, 100 - 40 + 20);
        // cash = -(100*10) + 40*11 - 20*9
        assert_eq!(position.cash, dec("-740.00"));
    }

    #[test]
    fn test_single_sell_put_is_realized_premium() {
        let trades = vec![make_trade("2025-01-02", "PLTR", "SELL_PUT", 1, "2.00")];

        let position = replay(&trades);
        assert_eq!(position.shares, 0);
        assert_eq!(position.cash, dec("200.00"));
        assert!(!position.is_open());
        assert_eq!(position.realized(), Some(dec("200.00")));
        assert_eq!(position.cost_basis(), None);
    }

    #[test]
    fn test_round_trip_realizes_profit_without_cost_basis() {
        let trades = vec![
            make_trade("2025-01-02", "AAPL", "BUY_STOCK", 100, "10.00"),
            make_trade("2025-01-20", "AAPL", "SELL_STOCK", 100, "12.00"),
        ];

        let position = replay(&trades);
        assert_eq!(position.shares, 0);
        assert_eq!(position.cash, dec("200.00"));
        assert_eq!(position.realized(), Some(dec("200.00")));
        assert_eq!(position.cost_basis(), None);
        assert_eq!(position.unrealized(dec("15.00")), None);
    }

    #[test]
    fn test_cost_basis_averages_over_buys() {
        let trades = vec![
            make_trade("2025-01-02", "AAPL", "BUY_STOCK", 100, "10.00"),
            make_trade("2025-01-10", "AAPL", "BUY_STOCK", 50, "20.00"),
        ];

        let position = replay(&trades);
        assert_eq!(position.shares, 150);
        assert_eq!(position.cash, dec("-2000.00"));
        assert_eq!(
            position.cost_basis(),
            Some(Decimal::from(2000) / Decimal::from(150))
        );
    }

    #[test]
    fn test_option_premium_lowers_cost_basis() {
        let trades = vec![
            make_trade("2025-01-02", "SOFI", "BUY_STOCK", 100, "10.00"),
            make_trade("2025-01-05", "SOFI", "SELL_CALL", 1, "1.00"),
        ];

        let position = replay(&trades);
        assert_eq!(position.shares, 100);
        assert_eq!(position.cash, dec("-900.00"));
        assert_eq!(position.cost_basis(), Some(dec("9.00")));
        // latent au cours de 10: (10 - 9) * 100
        assert_eq!(position.unrealized(dec("10.00")), Some(dec("100.00")));
    }

    #[test]
    fn test_replay_is_idempotent() {
        let trades = vec![
            make_trade("2025-01-02", "AAPL", "BUY_STOCK", 100, "10.00"),
            make_trade("2025-01-05", "AAPL", "SELL_PUT", 2, "1.50"),
        ];

        let first = replay(&trades);
        let second = replay(&trades);
        assert_eq!(first, second);
    }

    #[test]
    fn test_same_day_reordering_keeps_final_totals() {
        let mut trades = vec![
            make_trade("2025-01-02", "AAPL", "BUY_STOCK", 100, "10.00"),
            make_trade("2025-01-02", "AAPL", "SELL_CALL", 1, "2.00"),
        ];

        let forward = replay(&trades);
        trades.swap(0, 1);
        let swapped = replay(&trades);

        assert_eq!(forward.shares, swapped.shares);
        assert_eq!(forward.cash, swapped.cash);
    }

    #[test]
    fn test_unknown_trade_type_aborts_replay() {
        let trades = vec![
            make_trade("2025-01-02", "AAPL", "BUY_STOCK", 100, "10.00"),
            make_trade("2025-01-05", "AAPL", "EXERCISE", 100, "10.00"),
        ];

        let refs: Vec<&trade::Model> = trades.iter().collect();
        let result = replay_ticker("AAPL", &refs);
        assert_eq!(
            result,
            Err(EngineError::UnknownTradeType("EXERCISE".to_string()))
        );
    }

    #[test]
    fn test_out_of_order_log_aborts_replay() {
        let trades = vec![
            make_trade("2025-02-01", "AAPL", "BUY_STOCK", 100, "10.00"),
            make_trade("2025-01-01", "AAPL", "SELL_STOCK", 100, "12.00"),
        ];

        let refs: Vec<&trade::Model> = trades.iter().collect();
        let result = replay_ticker("AAPL", &refs);
        assert_eq!(
            result,
            Err(EngineError::OutOfOrder {
                ticker: "AAPL".to_string()
            })
        );
    }

    #[test]
    fn test_empty_log_yields_no_positions() {
        assert_eq!(replay_all(&[]).unwrap(), vec![]);
    }

    #[test]
    fn test_replay_all_keeps_first_seen_order() {
        let trades = vec![
            make_trade("2025-01-02", "PLTR", "SELL_PUT", 1, "2.00"),
            make_trade("2025-01-03", "AAPL", "BUY_STOCK", 10, "100.00"),
            make_trade("2025-01-04", "PLTR", "SELL_PUT", 1, "1.00"),
        ];

        let positions = replay_all(&trades).unwrap();
        let tickers: Vec<&str> = positions.iter().map(|p| p.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["PLTR", "AAPL"]);

        assert_eq!(positions[0].cash, dec("300.00"));
        assert!(positions[1].is_open());
    }
}
