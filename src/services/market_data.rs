//! Client HTTP pour les données de marché (API chart de Yahoo Finance).
//!
//! Un seul endpoint sert tout: /v8/finance/chart/{symbol} en intervalle
//! quotidien. Les timestamps sont ramenés à des dates UTC.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::Client;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use thiserror::Error;

use super::engine::timeseries::PriceHistory;

const BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

// Yahoo refuse les requêtes sans User-Agent de navigateur
const USER_AGENT: &str = "Mozilla/5.0 (compatible; wheel-tracker/0.1)";

#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("No price data available for {symbol}")]
    NoData { symbol: String },
}

// L'API enveloppe tout dans {"chart": {"result": [...], "error": ...}}
#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Source des cours: dernier cours connu + historiques quotidiens.
/// Trait séparé pour pouvoir brancher une autre source (ou un faux en test).
#[async_trait]
pub trait MarketDataSource {
    /// Dernier cours de clôture. Ok(None) = symbole sans cours exploitable,
    /// à remonter comme indisponible, jamais comme zéro.
    async fn current_close(&self, symbol: &str) -> Result<Option<Decimal>, MarketDataError>;

    /// Clôtures quotidiennes de plusieurs tickers sur [start, end]
    async fn history(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceHistory, MarketDataError>;

    /// Clôtures quotidiennes d'un indice de référence sur [start, end]
    async fn benchmark_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, Decimal>, MarketDataError>;
}

pub struct YahooFinanceClient {
    http: Client,
}

impl YahooFinanceClient {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }

    /// Télécharge les clôtures quotidiennes d'un symbole
    async fn daily_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, Decimal>, MarketDataError> {
        let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        // borne haute exclusive: on pousse au lendemain pour inclure `end`
        let period2 = end
            .succ_opt()
            .unwrap_or(end)
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp();

        let url = format!("{}/{}", BASE_URL, symbol);
        let envelope: ChartEnvelope = self
            .http
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let result = envelope
            .chart
            .result
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.remove(0))
                }
            })
            .ok_or_else(|| MarketDataError::NoData {
                symbol: symbol.to_string(),
            })?;

        let quote = result.indicators.quote.into_iter().next().ok_or_else(|| {
            MarketDataError::InvalidResponse(format!("no quote block for {}", symbol))
        })?;

        if quote.close.len() != result.timestamp.len() {
            return Err(MarketDataError::InvalidResponse(format!(
                "timestamp/close length mismatch for {}",
                symbol
            )));
        }

        let mut closes = BTreeMap::new();
        for (ts, close) in result.timestamp.iter().zip(quote.close) {
            // Les jours sans cotation arrivent en null: on les saute
            if let (Some(raw), Some(moment)) = (close, DateTime::from_timestamp(*ts, 0)) {
                if let Some(price) = Decimal::from_f64(raw) {
                    closes.insert(moment.date_naive(), price);
                }
            }
        }

        Ok(closes)
    }
}

#[async_trait]
impl MarketDataSource for YahooFinanceClient {
    async fn current_close(&self, symbol: &str) -> Result<Option<Decimal>, MarketDataError> {
        let url = format!("{}/{}", BASE_URL, symbol);
        let envelope: ChartEnvelope = self
            .http
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .query(&[("range", "5d"), ("interval", "1d")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let result = match envelope.chart.result.and_then(|mut r| {
            if r.is_empty() { None } else { Some(r.remove(0)) }
        }) {
            Some(result) => result,
            None => return Ok(None),
        };

        let quote = match result.indicators.quote.into_iter().next() {
            Some(quote) => quote,
            None => return Ok(None),
        };

        // dernière clôture non nulle (le jour courant peut ne pas en avoir)
        let latest = quote.close.into_iter().rev().flatten().next();
        Ok(latest.and_then(Decimal::from_f64))
    }

    async fn history(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceHistory, MarketDataError> {
        let mut prices = PriceHistory::new();

        for symbol in symbols {
            let closes = self.daily_closes(symbol, start, end).await?;
            if closes.is_empty() {
                return Err(MarketDataError::NoData {
                    symbol: symbol.clone(),
                });
            }
            for (date, close) in closes {
                prices.insert(symbol, date, close);
            }
        }

        Ok(prices)
    }

    async fn benchmark_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, Decimal>, MarketDataError> {
        let closes = self.daily_closes(symbol, start, end).await?;
        if closes.is_empty() {
            return Err(MarketDataError::NoData {
                symbol: symbol.to_string(),
            });
        }
        Ok(closes)
    }
}
