//pour les requêtes et réponses structurées
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

// DTO pour saisir un trade
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTradeRequest {
    pub date: NaiveDate,                 // Format: "2025-12-20"
    #[validate(length(min = 1, max = 8))]
    pub ticker: String,
    pub trade_type: String,              // 'BUY_STOCK', 'SELL_STOCK', 'SELL_PUT', ...
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub price: Decimal,
    pub option_type: Option<String>,     // Optionnel, NULL pour les trades actions
    pub strike: Option<Decimal>,
    pub expiration: Option<NaiveDate>,
}

// DTO pour un trade dans la réponse
#[derive(Debug, Serialize)]
pub struct TradeResponse {
    pub id: i32,
    pub date: NaiveDate,
    pub ticker: String,
    pub trade_type: String,
    pub quantity: i32,
    pub price: f64,
    pub option_type: Option<String>,
    pub strike: Option<f64>,
    pub expiration: Option<NaiveDate>,
    pub fx_rate: f64,
}

// DTO pour une position dans le résumé
// Les champs AUD sont None quand le service de change est indisponible;
// unrealized est None quand le dernier cours n'a pas pu être récupéré.
#[derive(Debug, Serialize)]
pub struct PositionResponse {
    pub ticker: String,
    pub shares: i64,
    pub cost_basis_usd: Option<f64>,     // None si position fermée
    pub cost_basis_aud: Option<f64>,
    pub unrealized_usd: Option<f64>,     // None si fermée ou cours indisponible
    pub unrealized_aud: Option<f64>,
    pub realized_usd: Option<f64>,       // None si position ouverte
    pub realized_aud: Option<f64>,
    pub price_unavailable: bool,         // true = cours actuel introuvable
}

#[derive(Debug, Serialize)]
pub struct PortfolioSummaryResponse {
    pub fx_rate: Option<f64>,            // taux spot USD->AUD, None si service down
    pub positions: Vec<PositionResponse>,
}

// Un jour où un ticker ouvert n'avait pas de cours de clôture:
// la valeur du jour sous-estime le portefeuille, on le signale.
#[derive(Debug, Serialize)]
pub struct PriceGapResponse {
    pub date: NaiveDate,
    pub ticker: String,
}

// Séries alignées pour le graphique de performance.
// Le frontend dessine, le backend ne produit que les points.
#[derive(Debug, Serialize)]
pub struct PerformanceResponse {
    pub dates: Vec<NaiveDate>,
    pub portfolio: Vec<f64>,
    pub benchmark: Vec<Option<f64>>,     // null les jours sans cours de l'indice
    pub missing_prices: Vec<PriceGapResponse>,
}
