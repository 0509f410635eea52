//! Client HTTP pour les taux de change (API Frankfurter).

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

const BASE_URL: &str = "https://api.frankfurter.app";

#[derive(Error, Debug)]
pub enum RateError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("no {quote} rate in response for base {base}")]
    MissingRate { base: String, quote: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Deserialize)]
struct RateEnvelope {
    rates: HashMap<String, f64>,
}

/// Source des taux de change: spot pour l'affichage du résumé,
/// historique pour figer le taux d'un trade à sa date de saisie.
#[async_trait]
pub trait RateSource {
    async fn spot_rate(&self, base: &str, quote: &str) -> Result<Decimal, RateError>;

    async fn historical_rate(
        &self,
        base: &str,
        quote: &str,
        date: NaiveDate,
    ) -> Result<Decimal, RateError>;
}

pub struct FrankfurterClient {
    http: Client,
}

impl FrankfurterClient {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }

    async fn fetch_rate(&self, path: &str, base: &str, quote: &str) -> Result<Decimal, RateError> {
        let url = format!("{}/{}", BASE_URL, path);
        let envelope: RateEnvelope = self
            .http
            .get(&url)
            .query(&[("from", base), ("to", quote)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let raw = envelope
            .rates
            .get(quote)
            .copied()
            .ok_or_else(|| RateError::MissingRate {
                base: base.to_string(),
                quote: quote.to_string(),
            })?;

        Decimal::from_f64(raw)
            .ok_or_else(|| RateError::InvalidResponse(format!("non-finite rate: {}", raw)))
    }
}

#[async_trait]
impl RateSource for FrankfurterClient {
    async fn spot_rate(&self, base: &str, quote: &str) -> Result<Decimal, RateError> {
        self.fetch_rate("latest", base, quote).await
    }

    /// Taux à une date passée (l'API retombe d'elle-même sur le dernier
    /// jour ouvré pour un weekend ou un férié)
    async fn historical_rate(
        &self,
        base: &str,
        quote: &str,
        date: NaiveDate,
    ) -> Result<Decimal, RateError> {
        self.fetch_rate(&date.format("%Y-%m-%d").to_string(), base, quote)
            .await
    }
}
