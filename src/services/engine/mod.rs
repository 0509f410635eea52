// Moteur de positions: relecture pure du journal de trades.
// Aucune E/S ici: les services récupèrent les données, le moteur calcule.

pub mod replay;
pub mod timeseries;

use rust_decimal::Decimal;
use thiserror::Error;

/// Convention standard: 1 contrat d'option = 100 actions
pub const CONTRACT_MULTIPLIER: i64 = 100;

/// Erreurs structurelles: le journal lui-même est inexploitable.
/// On n'ignore jamais un trade illisible, des totaux partiels seraient faux.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("unknown trade type: '{0}'")]
    UnknownTradeType(String),

    #[error("trade log for {ticker} is not in chronological order")]
    OutOfOrder { ticker: String },
}

/// Les six types de trades reconnus par le moteur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeKind {
    BuyStock,
    SellStock,
    SellPut,
    SellCall,
    BuyPut,
    BuyCall,
}

impl TradeKind {
    /// Valeurs acceptées dans la colonne trade_type
    pub const VALID_TYPES: [&'static str; 6] = [
        "BUY_STOCK",
        "SELL_STOCK",
        "SELL_PUT",
        "SELL_CALL",
        "BUY_PUT",
        "BUY_CALL",
    ];

    pub fn parse(value: &str) -> Result<Self, EngineError> {
        match value {
            "BUY_STOCK" => Ok(Self::BuyStock),
            "SELL_STOCK" => Ok(Self::SellStock),
            "SELL_PUT" => Ok(Self::SellPut),
            "SELL_CALL" => Ok(Self::SellCall),
            "BUY_PUT" => Ok(Self::BuyPut),
            "BUY_CALL" => Ok(Self::BuyCall),
            other => Err(EngineError::UnknownTradeType(other.to_string())),
        }
    }

    pub fn is_option(self) -> bool {
        matches!(
            self,
            Self::SellPut | Self::SellCall | Self::BuyPut | Self::BuyCall
        )
    }

    /// Variation du nombre d'actions détenues.
    /// Les options n'en touchent aucune: seule la prime circule.
    pub fn share_delta(self, quantity: i32) -> i64 {
        match self {
            Self::BuyStock => i64::from(quantity),
            Self::SellStock => -i64::from(quantity),
            _ => 0,
        }
    }

    /// Flux de trésorerie signé du trade: vente = encaissement,
    /// achat = décaissement, primes d'options multipliées par 100.
    pub fn cash_delta(self, quantity: i32, price: Decimal) -> Decimal {
        let gross = price * Decimal::from(quantity) * self.multiplier();
        match self {
            Self::SellStock | Self::SellPut | Self::SellCall => gross,
            Self::BuyStock | Self::BuyPut | Self::BuyCall => -gross,
        }
    }

    fn multiplier(self) -> Decimal {
        if self.is_option() {
            Decimal::from(CONTRACT_MULTIPLIER)
        } else {
            Decimal::ONE
        }
    }
}
