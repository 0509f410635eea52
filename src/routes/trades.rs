use actix_web::{get, post, web, HttpResponse};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::models::dto::{CreateTradeRequest, TradeResponse};
use crate::models::trade;
use crate::services::engine::TradeKind;
use crate::services::rates::{FrankfurterClient, RateSource};
use crate::services::trade_service::TradeService;

fn to_response(t: trade::Model) -> TradeResponse {
    TradeResponse {
        id: t.id,
        date: t.date,
        ticker: t.ticker,
        trade_type: t.trade_type,
        quantity: t.quantity,
        price: t.price.to_f64().unwrap_or_default(),
        option_type: t.option_type,
        strike: t.strike.and_then(|s| s.to_f64()),
        expiration: t.expiration,
        fx_rate: t.fx_rate.to_f64().unwrap_or_default(),
    }
}

/// POST /api/trades - Saisir un trade dans le journal
#[post("")]
pub async fn create_trade(
    db: web::Data<DatabaseConnection>,
    request: web::Json<CreateTradeRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return HttpResponse::BadRequest().json(errors);
    }
    let request = request.into_inner();

    // Valider le type avant toute écriture: un type inconnu ne doit
    // jamais entrer dans le journal
    if TradeKind::parse(&request.trade_type).is_err() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": format!("Invalid trade_type: {}", request.trade_type),
            "valid_types": TradeKind::VALID_TYPES,
        }));
    }

    if request.price <= Decimal::ZERO {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "price must be positive"
        }));
    }

    // Figer le taux USD->AUD à la date du trade. Service injoignable =
    // saisie refusée: un taux par défaut fausserait le journal pour toujours
    let rates = FrankfurterClient::new();
    let fx_rate = match rates.historical_rate("USD", "AUD", request.date).await {
        Ok(rate) => rate,
        Err(e) => {
            return HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "error": format!("FX rate service unavailable: {}", e)
            }));
        }
    };

    match TradeService::create_trade(&db, request, fx_rate).await {
        Ok(model) => HttpResponse::Created().json(to_response(model)),
        Err(e) => HttpResponse::InternalServerError().json(format!("Error: {}", e)),
    }
}

/// GET /api/trades - Journal complet, date puis ordre d'insertion
#[get("")]
pub async fn get_all_trades(db: web::Data<DatabaseConnection>) -> HttpResponse {
    match TradeService::list_all(db.get_ref()).await {
        Ok(trades) => {
            let response: Vec<TradeResponse> = trades.into_iter().map(to_response).collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => HttpResponse::InternalServerError().json(format!("Error: {}", e)),
    }
}

pub fn trades_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/trades")
            .service(create_trade)
            .service(get_all_trades)
    );
}
