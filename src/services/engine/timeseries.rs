use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::models::trade;
use super::{EngineError, TradeKind};

/// Table des clôtures quotidiennes, ticker × date -> cours.
#[derive(Debug, Clone, Default)]
pub struct PriceHistory {
    closes: HashMap<String, BTreeMap<NaiveDate, Decimal>>,
}

impl PriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ticker: &str, date: NaiveDate, close: Decimal) {
        self.closes
            .entry(ticker.to_string())
            .or_default()
            .insert(date, close);
    }

    pub fn close(&self, ticker: &str, date: NaiveDate) -> Option<Decimal> {
        self.closes.get(ticker).and_then(|by_date| by_date.get(&date)).copied()
    }

    /// Calendrier de cotation: union triée des dates de tous les tickers
    pub fn trading_days(&self) -> Vec<NaiveDate> {
        let days: BTreeSet<NaiveDate> = self
            .closes
            .values()
            .flat_map(|by_date| by_date.keys().copied())
            .collect();
        days.into_iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.values().all(|by_date| by_date.is_empty())
    }
}

/// Jour où un ticker encore détenu n'avait pas de clôture: la valeur du jour
/// exclut ce ticker et sous-estime le portefeuille. Signalé, jamais masqué.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceGap {
    pub date: NaiveDate,
    pub ticker: String,
}

/// Séries alignées sur le même axe de dates.
/// benchmark[i] est None les jours où l'indice n'a pas de cours.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceSeries {
    pub dates: Vec<NaiveDate>,
    pub portfolio: Vec<Decimal>,
    pub benchmark: Vec<Option<Decimal>>,
    pub gaps: Vec<PriceGap>,
}

impl PerformanceSeries {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Construit la série de valeur totale du portefeuille jour par jour, plus
/// l'indice de référence normalisé pour démarrer à la même valeur.
///
/// Le journal doit être ordonné par date puis ordre d'insertion. Les trades
/// datés d'un jour sans cotation (weekend, férié) sont appliqués au premier
/// jour de cotation suivant: un trade n'est jamais perdu, sinon les totaux
/// ne retomberaient plus sur ceux du replay de positions.
pub fn compute_time_series(
    trades: &[trade::Model],
    prices: &PriceHistory,
    benchmark: &BTreeMap<NaiveDate, Decimal>,
) -> Result<PerformanceSeries, EngineError> {
    // Journal vide: état vide défini, pas une erreur
    if trades.is_empty() {
        return Ok(PerformanceSeries::default());
    }

    let mut series = PerformanceSeries::default();
    let mut cash = Decimal::ZERO;
    let mut shares: BTreeMap<&str, i64> = BTreeMap::new();
    let mut next_trade = 0usize; // curseur sur le journal trié

    for current_day in prices.trading_days() {
        // 1. Appliquer tous les trades en attente jusqu'à ce jour inclus,
        //    dans l'ordre du journal
        while next_trade < trades.len() && trades[next_trade].date <= current_day {
            let t = &trades[next_trade];
            let kind = TradeKind::parse(&t.trade_type)?;
            *shares.entry(t.ticker.as_str()).or_insert(0) += kind.share_delta(t.quantity);
            cash += kind.cash_delta(t.quantity, t.price);
            next_trade += 1;
        }

        // 2. Valoriser seulement après les trades du jour:
        //    trésorerie + actions détenues au cours de clôture
        let mut value = cash;
        for (ticker, count) in &shares {
            if *count == 0 {
                continue; // un ticker soldé vaut 0, cours disponible ou pas
            }
            match prices.close(ticker, current_day) {
                Some(close) => value += close * Decimal::from(*count),
                None => series.gaps.push(PriceGap {
                    date: current_day,
                    ticker: (*ticker).to_string(),
                }),
            }
        }

        series.dates.push(current_day);
        series.portfolio.push(value);
    }

    // 3. Indice de référence ramené à la première valeur du portefeuille
    if !series.dates.is_empty() {
        let first_day = series.dates[0];
        let first_value = series.portfolio[0];

        let base = benchmark
            .get(&first_day)
            .or_else(|| benchmark.values().next())
            .copied();

        for current_day in &series.dates {
            let point = match (base, benchmark.get(current_day)) {
                (Some(base), Some(close)) if !base.is_zero() => {
                    Some(*close / base * first_value)
                }
                _ => None,
            };
            series.benchmark.push(point);
        }
    }

    Ok(series)
}
