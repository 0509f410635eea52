pub mod engine;
pub mod market_data;
pub mod portfolio_service;
pub mod rates;
pub mod trade_service;
