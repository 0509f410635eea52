use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub date: Date,
    pub ticker: String,          // normalisé en majuscules à l'insertion
    pub trade_type: String,      // 'BUY_STOCK', 'SELL_STOCK', 'SELL_PUT', 'SELL_CALL', 'BUY_PUT', 'BUY_CALL'
    pub quantity: i32,           // actions ou contrats (1 contrat = 100 actions)
    pub price: Decimal,          // prix unitaire ou prime par contrat, USD
    pub option_type: Option<String>,   // NULL pour les trades actions
    pub strike: Option<Decimal>,
    pub expiration: Option<Date>,
    pub fx_rate: Decimal,        // taux USD->AUD figé à la date du trade
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
