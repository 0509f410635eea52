use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DbErr};
use std::collections::HashMap;
use thiserror::Error;

use crate::services::engine::EngineError;
use crate::services::engine::replay::{TickerPosition, replay_all};
use crate::services::engine::timeseries::{PerformanceSeries, compute_time_series};
use crate::services::market_data::{MarketDataError, MarketDataSource};
use crate::services::rates::RateSource;
use crate::services::trade_service::TradeService;

/// Indice de référence du graphique de performance (S&P 500)
pub const BENCHMARK_SYMBOL: &str = "^GSPC";

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("database error: {0}")]
    Db(#[from] DbErr),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("price data unavailable: {0}")]
    PriceData(#[from] MarketDataError),
}

/// Position valorisée, prête pour la présentation. Tous les montants en USD;
/// la conversion AUD se fait à l'affichage avec le taux spot du résumé.
#[derive(Debug, Clone)]
pub struct PositionReport {
    pub ticker: String,
    pub shares: i64,
    pub cost_basis: Option<Decimal>,     // None si position fermée
    pub unrealized: Option<Decimal>,     // None si fermée ou cours introuvable
    pub realized: Option<Decimal>,       // None si position ouverte
    pub price_unavailable: bool,
}

#[derive(Debug)]
pub struct SummaryReport {
    pub fx_rate: Option<Decimal>,
    pub positions: Vec<PositionReport>,
}

pub struct PortfolioService;

impl PortfolioService {
    /// Construit le résumé des positions: replay complet du journal, puis
    /// valorisation des positions ouvertes au dernier cours connu.
    ///
    /// Les pannes des services externes dégradent le résumé (champs None),
    /// elles ne l'avortent jamais. Seul un journal corrompu est fatal.
    pub async fn build_summary(
        db: &DatabaseConnection,
        market: &(impl MarketDataSource + Sync),
        rates: &(impl RateSource + Sync),
    ) -> Result<SummaryReport, PortfolioError> {
        let trades = TradeService::list_all(db).await?;

        // 1. Replay pur: un état par ticker, ordre de première apparition
        let positions = replay_all(&trades)?;

        // 2. Taux spot USD->AUD du jour, appliqué uniformément à tous les
        //    montants (comportement assumé: les trades gardent leur propre
        //    taux historique en base, le résumé affiche au taux du jour)
        let fx_rate = match rates.spot_rate("USD", "AUD").await {
            Ok(rate) => Some(rate),
            Err(e) => {
                println!("⚠️  FX rate unavailable, USD-only summary: {}", e);
                None
            }
        };

        // 3. Dernier cours pour chaque position encore ouverte
        let mut quotes: HashMap<String, Option<Decimal>> = HashMap::new();
        for position in &positions {
            if !position.is_open() {
                continue;
            }
            let quote = match market.current_close(&position.ticker).await {
                Ok(quote) => quote,
                Err(e) => {
                    println!("⚠️  No current price for {}: {}", position.ticker, e);
                    None
                }
            };
            quotes.insert(position.ticker.clone(), quote);
        }

        // 4. Assembler les rapports de position
        let reports = positions
            .into_iter()
            .map(|position| Self::report(position, &quotes))
            .collect();

        Ok(SummaryReport {
            fx_rate,
            positions: reports,
        })
    }

    fn report(
        position: TickerPosition,
        quotes: &HashMap<String, Option<Decimal>>,
    ) -> PositionReport {
        let latest = quotes.get(&position.ticker).copied().flatten();
        let price_unavailable = position.is_open() && latest.is_none();

        PositionReport {
            shares: position.shares,
            cost_basis: position.cost_basis(),
            unrealized: latest.and_then(|price| position.unrealized(price)),
            realized: position.realized(),
            price_unavailable,
            ticker: position.ticker,
        }
    }

    /// Construit les séries du graphique de performance: valeur totale du
    /// portefeuille jour par jour contre l'indice de référence normalisé.
    pub async fn build_performance(
        db: &DatabaseConnection,
        market: &(impl MarketDataSource + Sync),
    ) -> Result<PerformanceSeries, PortfolioError> {
        let trades = TradeService::list_all(db).await?;

        // Journal vide: séries vides, pas de graphique, pas une erreur
        if trades.is_empty() {
            return Ok(PerformanceSeries::default());
        }

        let start = trades[0].date;
        let end = Utc::now().date_naive();

        let mut tickers: Vec<String> = trades.iter().map(|t| t.ticker.clone()).collect();
        tickers.sort();
        tickers.dedup();

        println!(
            "📈 Downloading daily closes for {} tickers since {}",
            tickers.len(),
            start
        );
        let prices = market.history(&tickers, start, end).await?;
        let benchmark = market.benchmark_history(BENCHMARK_SYMBOL, start, end).await?;

        Ok(compute_time_series(&trades, &prices, &benchmark)?)
    }
}
