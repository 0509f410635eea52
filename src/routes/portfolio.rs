use actix_web::{get, web, HttpResponse};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sea_orm::DatabaseConnection;

use crate::models::dto::{
    PerformanceResponse, PortfolioSummaryResponse, PositionResponse, PriceGapResponse,
};
use crate::services::market_data::YahooFinanceClient;
use crate::services::portfolio_service::{PortfolioError, PortfolioService};
use crate::services::rates::FrankfurterClient;

/// Arrondi d'affichage: 2 décimales
fn display(value: Decimal) -> f64 {
    value.round_dp(2).to_f64().unwrap_or_default()
}

/// Contre-valeur AUD au taux spot. None dès que l'un des deux manque:
/// un montant indisponible ne devient jamais un zéro
fn convert(value: Option<Decimal>, fx_rate: Option<Decimal>) -> Option<f64> {
    match (value, fx_rate) {
        (Some(v), Some(fx)) => Some(display(v * fx)),
        _ => None,
    }
}

/// GET /api/portfolio/summary - Positions par ticker, USD + AUD
#[get("/summary")]
pub async fn portfolio_summary(db: web::Data<DatabaseConnection>) -> HttpResponse {
    let market = YahooFinanceClient::new();
    let rates = FrankfurterClient::new();

    match PortfolioService::build_summary(db.get_ref(), &market, &rates).await {
        Ok(summary) => {
            let positions: Vec<PositionResponse> = summary
                .positions
                .iter()
                .map(|p| PositionResponse {
                    ticker: p.ticker.clone(),
                    shares: p.shares,
                    cost_basis_usd: p.cost_basis.map(display),
                    cost_basis_aud: convert(p.cost_basis, summary.fx_rate),
                    unrealized_usd: p.unrealized.map(display),
                    unrealized_aud: convert(p.unrealized, summary.fx_rate),
                    realized_usd: p.realized.map(display),
                    realized_aud: convert(p.realized, summary.fx_rate),
                    price_unavailable: p.price_unavailable,
                })
                .collect();

            HttpResponse::Ok().json(PortfolioSummaryResponse {
                fx_rate: summary.fx_rate.and_then(|fx| fx.to_f64()),
                positions,
            })
        }
        // Journal corrompu: pas de totaux partiels, on remonte l'erreur
        Err(PortfolioError::Engine(e)) => {
            HttpResponse::UnprocessableEntity().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
        Err(e) => HttpResponse::InternalServerError().json(format!("Error: {}", e)),
    }
}

/// GET /api/portfolio/performance - Séries portefeuille vs indice
#[get("/performance")]
pub async fn portfolio_performance(db: web::Data<DatabaseConnection>) -> HttpResponse {
    let market = YahooFinanceClient::new();

    match PortfolioService::build_performance(db.get_ref(), &market).await {
        Ok(series) => {
            let response = PerformanceResponse {
                dates: series.dates,
                portfolio: series.portfolio.into_iter().map(display).collect(),
                benchmark: series
                    .benchmark
                    .into_iter()
                    .map(|point| point.map(display))
                    .collect(),
                missing_prices: series
                    .gaps
                    .into_iter()
                    .map(|gap| PriceGapResponse {
                        date: gap.date,
                        ticker: gap.ticker,
                    })
                    .collect(),
            };
            HttpResponse::Ok().json(response)
        }
        // Cours introuvables: le graphique est sauté et signalé, le résumé
        // des positions reste servi par /summary
        Err(PortfolioError::PriceData(e)) => {
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
        Err(PortfolioError::Engine(e)) => {
            HttpResponse::UnprocessableEntity().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
        Err(e) => HttpResponse::InternalServerError().json(format!("Error: {}", e)),
    }
}

pub fn portfolio_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/portfolio")
            .service(portfolio_summary)
            .service(portfolio_performance)
    );
}
