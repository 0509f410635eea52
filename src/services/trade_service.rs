use sea_orm::*;
use rust_decimal::Decimal;
use crate::models::trade;
use crate::models::dto::CreateTradeRequest;

pub struct TradeService;

impl TradeService {
    /// Enregistre un nouveau trade avec son taux USD->AUD figé à la date
    /// du trade. Le journal est append-only: jamais de mise à jour ni de
    /// suppression, les positions se recalculent en le rejouant.
    pub async fn create_trade(
        db: &DatabaseConnection,
        request: CreateTradeRequest,
        fx_rate: Decimal,
    ) -> Result<trade::Model, DbErr> {
        let new_trade = trade::ActiveModel {
            date: Set(request.date),
            ticker: Set(request.ticker.to_uppercase()),
            trade_type: Set(request.trade_type),
            quantity: Set(request.quantity),
            price: Set(request.price),
            option_type: Set(request.option_type),
            strike: Set(request.strike),
            expiration: Set(request.expiration),
            fx_rate: Set(fx_rate),
            ..Default::default()
        };

        new_trade.insert(db).await
    }

    /// Journal complet, ordonné par date puis ordre d'insertion (id).
    /// C'est l'ordre contractuel attendu par le moteur de positions.
    pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<trade::Model>, DbErr> {
        trade::Entity::find()
            .order_by_asc(trade::Column::Date)
            .order_by_asc(trade::Column::Id)
            .all(db)
            .await
    }
}
